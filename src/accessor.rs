//! Live read view over the configuration document
//!
//! An [`AccessorRoot`] is bound from a raw document and the schema tree built
//! from that same document, so every value lands in the variant its inferred
//! type predicts. Binding never fails: a value that does not match its
//! declared type (possible only if the tree came from a different document)
//! is kept as [`TypedValue::Untyped`].
//!
//! The compile-time view of the same data is the generated artifact; this
//! module is what the running process reads through.

use crate::schema::{FieldType, PrimitiveKind, RecordDef, SchemaTree};
use serde_json::{Map, Number, Value};

/// A bound value, typed according to the schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// An optional field that is missing or `null`
    Absent,
    List(Vec<TypedValue>),
    Record(RecordView),
    /// A value with no inferred type, kept verbatim
    Untyped(Value),
}

impl TypedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Floats, or integers converted to floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Float(n) => Some(*n),
            TypedValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordView> {
        match self {
            TypedValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TypedValue::Absent)
    }

    /// Child value for one path segment: a field key for records, an index for lists
    pub fn child(&self, segment: &str) -> Option<&TypedValue> {
        match self {
            TypedValue::Record(record) => record.get(segment),
            TypedValue::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// JSON rendering of the bound value
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::String(text) => Value::String(text.clone()),
            TypedValue::Integer(n) => Value::from(*n),
            TypedValue::Float(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            TypedValue::Boolean(flag) => Value::Bool(*flag),
            TypedValue::Absent => Value::Null,
            TypedValue::List(items) => Value::Array(items.iter().map(TypedValue::to_json).collect()),
            TypedValue::Record(record) => record.to_json(),
            TypedValue::Untyped(value) => value.clone(),
        }
    }
}

/// One bound field of a record
#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    pub key: String,
    pub ident: String,
    pub value: TypedValue,
}

/// A bound instance of one generated record type
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    type_name: String,
    fields: Vec<BoundField>,
}

impl RecordView {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    /// Field by document key, falling back to the generated identifier
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields
            .iter()
            .find(|field| field.key == name)
            .or_else(|| self.fields.iter().find(|field| field.ident == name))
            .map(|field| &field.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Absent optional fields are left out
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .filter(|field| !field.value.is_absent())
            .map(|field| (field.key.clone(), field.value.to_json()))
            .collect();
        Value::Object(map)
    }
}

/// The typed view of a whole document, paired with the tree it was bound from
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorRoot {
    schema: SchemaTree,
    root: RecordView,
}

impl AccessorRoot {
    /// Bind `raw` to the records of `schema`
    pub fn bind(schema: SchemaTree, raw: &Value) -> Self {
        let empty = Map::new();
        let object = raw.as_object().unwrap_or(&empty);
        let root = bind_record(&schema.root, object, &schema);
        tracing::debug!("bound accessor `{}` with {} fields", root.type_name, root.len());
        Self { schema, root }
    }

    pub fn schema(&self) -> &SchemaTree {
        &self.schema
    }

    pub fn root(&self) -> &RecordView {
        &self.root
    }

    pub fn type_name(&self) -> &str {
        self.root.type_name()
    }

    /// Top-level field by key or generated identifier
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.root.get(name)
    }

    /// Value at a dotted path such as `database.host` or `servers.0.name`
    pub fn lookup(&self, path: &str) -> Option<&TypedValue> {
        let mut segments = path.split('.').filter(|segment| !segment.is_empty());
        let first = segments.next()?;
        segments.try_fold(self.root.get(first)?, |value, segment| value.child(segment))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }
}

fn bind_record(def: &RecordDef, object: &Map<String, Value>, schema: &SchemaTree) -> RecordView {
    let fields = def
        .fields
        .iter()
        .map(|field| BoundField {
            key: field.key.clone(),
            ident: field.ident.clone(),
            value: bind_value(&field.ty, object.get(&field.key).unwrap_or(&Value::Null), schema),
        })
        .collect();
    RecordView {
        type_name: def.name.clone(),
        fields,
    }
}

fn bind_value(ty: &FieldType, value: &Value, schema: &SchemaTree) -> TypedValue {
    match ty {
        FieldType::Optional(inner) => match value {
            Value::Null => TypedValue::Absent,
            other => bind_value(inner, other, schema),
        },
        FieldType::Primitive(kind) => bind_primitive(*kind, value),
        FieldType::List(element) => match value {
            Value::Array(items) => {
                TypedValue::List(items.iter().map(|item| bind_value(element, item, schema)).collect())
            }
            other => untyped(other),
        },
        FieldType::Named(name) => match (value, schema.find(name)) {
            (Value::Object(map), Some(def)) => TypedValue::Record(bind_record(def, map, schema)),
            (other, _) => untyped(other),
        },
    }
}

fn bind_primitive(kind: PrimitiveKind, value: &Value) -> TypedValue {
    match (kind, value) {
        (PrimitiveKind::String, Value::String(text)) => TypedValue::String(text.clone()),
        (PrimitiveKind::Integer, Value::Number(n)) => n.as_i64().map_or_else(|| untyped(value), TypedValue::Integer),
        (PrimitiveKind::Float, Value::Number(n)) => n.as_f64().map_or_else(|| untyped(value), TypedValue::Float),
        (PrimitiveKind::Boolean, Value::Bool(flag)) => TypedValue::Boolean(*flag),
        (PrimitiveKind::Widened, Value::String(text)) => TypedValue::String(text.clone()),
        (PrimitiveKind::Widened, Value::Number(n)) => TypedValue::String(n.to_string()),
        (PrimitiveKind::Widened, Value::Bool(flag)) => TypedValue::String(flag.to_string()),
        (_, other) => untyped(other),
    }
}

fn untyped(value: &Value) -> TypedValue {
    TypedValue::Untyped(value.clone())
}
