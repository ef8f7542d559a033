//! Schema tree construction
//!
//! Walks a document depth-first, inferring each top-level key independently
//! and naming every record it finds. Records are collected post-order, so a
//! record always appears after every record it references and the root comes
//! last.

use super::infer::infer_value;
use super::naming::{self, NameRegistry};
use super::path::KeyPath;
use super::shape::{FieldShape, PrimitiveKind, RecordShape};
use crate::error::{StructuralError, json_type_name};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Default name of the type aggregating all top-level fields
pub const DEFAULT_ROOT_TYPE: &str = "ConfigKeys";

/// A field type with nested records resolved to their type names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Primitive(PrimitiveKind),
    Optional(Box<FieldType>),
    List(Box<FieldType>),
    Named(String),
}

impl FieldType {
    /// True when this type, or any type nested in it, is a widened scalar
    pub fn uses_widened(&self) -> bool {
        match self {
            FieldType::Primitive(kind) => *kind == PrimitiveKind::Widened,
            FieldType::Optional(inner) | FieldType::List(inner) => inner.uses_widened(),
            FieldType::Named(_) => false,
        }
    }
}

/// One field of a generated record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
    /// Key as it appears in the document
    pub key: String,
    /// Identifier in generated code, unique within the record
    pub ident: String,
    pub ty: FieldType,
}

/// A named record type
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDef {
    pub name: String,
    /// First path the record was inferred from
    pub path: KeyPath,
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.key == key)
    }
}

/// Every record inferred for one document, in dependency order
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTree {
    /// Nested records; each appears after the records it references
    pub records: Vec<RecordDef>,
    /// The type aggregating all top-level fields
    pub root: RecordDef,
}

impl SchemaTree {
    /// Nested records followed by the root
    pub fn iter(&self) -> impl Iterator<Item = &RecordDef> {
        self.records.iter().chain(std::iter::once(&self.root))
    }

    pub fn find(&self, name: &str) -> Option<&RecordDef> {
        self.iter().find(|record| record.name == name)
    }

    /// Number of record definitions, root included
    pub fn len(&self) -> usize {
        self.records.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.root.fields.is_empty()
    }

    pub fn uses_widened(&self) -> bool {
        self.iter()
            .flat_map(|record| record.fields.iter())
            .any(|field| field.ty.uses_widened())
    }
}

/// Build the schema tree for a document with the default root type name
pub fn build(raw: &Value) -> Result<SchemaTree, StructuralError> {
    build_with_root(raw, DEFAULT_ROOT_TYPE)
}

/// Build the schema tree for a document. Fails without partial output when
/// the document is not an object.
pub fn build_with_root(raw: &Value, root_type: &str) -> Result<SchemaTree, StructuralError> {
    let Value::Object(map) = raw else {
        return Err(StructuralError::NotAnObject {
            path: KeyPath::root().to_string(),
            found: json_type_name(raw),
        });
    };

    let root_name = naming::root_type_name(root_type);
    let mut builder = TreeBuilder::new(&root_name);
    let root_path = KeyPath::root();

    let mut resolved = Vec::with_capacity(map.len());
    for (key, value) in map {
        let shape = infer_value(value);
        let ty = builder.resolve(&shape, &root_path.child(key))?;
        resolved.push((key.clone(), ty));
    }

    let root = RecordDef {
        name: root_name,
        path: root_path,
        fields: assign_idents(resolved),
    };

    tracing::debug!(
        "built schema tree: {} records under `{}`",
        builder.records.len(),
        root.name
    );

    Ok(SchemaTree {
        records: builder.records,
        root,
    })
}

struct TreeBuilder {
    registry: NameRegistry,
    records: Vec<RecordDef>,
    /// (base name, fields) -> allocated name, for reusing identical records
    seen: HashMap<(String, Vec<FieldDef>), String>,
}

impl TreeBuilder {
    fn new(root_name: &str) -> Self {
        Self {
            registry: NameRegistry::new(root_name),
            records: Vec::new(),
            seen: HashMap::new(),
        }
    }

    fn resolve(&mut self, shape: &FieldShape, path: &KeyPath) -> Result<FieldType, StructuralError> {
        Ok(match shape {
            FieldShape::Primitive(kind) => FieldType::Primitive(*kind),
            FieldShape::Optional(inner) => FieldType::Optional(Box::new(self.resolve(inner, path)?)),
            FieldShape::List(element) => FieldType::List(Box::new(self.resolve(element, &path.item())?)),
            FieldShape::Record(record) => FieldType::Named(self.record(record, path)?),
        })
    }

    fn record(&mut self, shape: &RecordShape, path: &KeyPath) -> Result<String, StructuralError> {
        let mut resolved = Vec::with_capacity(shape.len());
        for (key, field) in &shape.fields {
            let ty = self.resolve(field, &path.child(key))?;
            resolved.push((key.clone(), ty));
        }
        let fields = assign_idents(resolved);

        let signature = (naming::base_type_name(path), fields);
        if let Some(name) = self.seen.get(&signature) {
            tracing::trace!("reusing `{}` for {}", name, path);
            return Ok(name.clone());
        }

        let name = self.registry.allocate(path)?;
        tracing::trace!("record `{}` at {}", name, path);
        self.records.push(RecordDef {
            name: name.clone(),
            path: path.clone(),
            fields: signature.1.clone(),
        });
        self.seen.insert(signature, name.clone());
        Ok(name)
    }
}

/// Field identifiers, made unique within one record in key order
fn assign_idents(fields: Vec<(String, FieldType)>) -> Vec<FieldDef> {
    let mut used = HashSet::new();
    fields
        .into_iter()
        .map(|(key, ty)| {
            let base = naming::field_name(&key);
            let mut ident = base.clone();
            let mut n = 2;
            while !used.insert(ident.clone()) {
                ident = format!("{base}_{n}");
                n += 1;
            }
            FieldDef { key, ident, ty }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prim(kind: PrimitiveKind) -> FieldType {
        FieldType::Primitive(kind)
    }

    #[test]
    fn test_rejects_non_object_root() {
        let err = build(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            StructuralError::NotAnObject {
                path: "<root>".to_string(),
                found: "an array"
            }
        );
    }

    #[test]
    fn test_empty_document() {
        let tree = build(&json!({})).unwrap();
        assert!(tree.is_empty());
        assert!(tree.records.is_empty());
        assert_eq!(tree.root.name, "ConfigKeys");
    }

    #[test]
    fn test_children_precede_parents() {
        let tree = build(&json!({
            "database": {"primary": {"host": "a"}, "port": 5432}
        }))
        .unwrap();
        let names: Vec<&str> = tree.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Primary", "Database", "ConfigKeys"]);
    }

    #[test]
    fn test_list_union_item_type() {
        let tree = build(&json!({"items": [{"a": 1}, {"a": 2, "b": "x"}]})).unwrap();
        let item = tree.find("ItemsItem").expect("item record");
        assert_eq!(item.field("a").unwrap().ty, prim(PrimitiveKind::Integer));
        assert_eq!(
            item.field("b").unwrap().ty,
            FieldType::Optional(Box::new(prim(PrimitiveKind::String)))
        );
        assert_eq!(
            tree.root.field("items").unwrap().ty,
            FieldType::List(Box::new(FieldType::Named("ItemsItem".to_string())))
        );
    }

    #[test]
    fn test_case_colliding_top_level_keys() {
        let tree = build(&json!({
            "Cache": {"ttl": 60},
            "cache": {"size": 10}
        }))
        .unwrap();
        let names: Vec<&str> = tree.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cache", "Cache2"]);
        let idents: Vec<&str> = tree.root.fields.iter().map(|f| f.ident.as_str()).collect();
        assert_eq!(idents, vec!["cache", "cache_2"]);
    }

    #[test]
    fn test_suffix_only_at_top_level() {
        let tree = build(&json!({
            "webcam_plugin": {"fps": 30},
            "devices": {"webcam_plugin": {"fps": 60, "index": 0}}
        }))
        .unwrap();
        assert!(tree.find("WebcamPlugin_P").is_some());
        let nested = tree
            .find("Devices")
            .and_then(|devices| devices.field("webcam_plugin"))
            .unwrap();
        assert_eq!(nested.ty, FieldType::Named("WebcamPlugin".to_string()));
    }

    #[test]
    fn test_identical_records_are_shared() {
        let tree = build(&json!({
            "primary": {"tls": {"cert": "a"}},
            "replica": {"tls": {"cert": "b"}}
        }))
        .unwrap();
        let tls: Vec<&RecordDef> = tree.records.iter().filter(|r| r.name.ends_with("Tls")).collect();
        assert_eq!(tls.len(), 1);
    }

    #[test]
    fn test_different_shapes_same_key_get_distinct_names() {
        let tree = build(&json!({
            "primary": {"tls": {"cert": "a"}},
            "replica": {"tls": {"enabled": true}}
        }))
        .unwrap();
        assert!(tree.find("Tls").is_some());
        assert!(tree.find("ReplicaTls").is_some());
    }

    #[test]
    fn test_widened_fields_are_reported() {
        let tree = build(&json!({"ports": [80, "http"]})).unwrap();
        assert!(tree.uses_widened());
        assert!(!build(&json!({"port": 80})).unwrap().uses_widened());
    }
}
