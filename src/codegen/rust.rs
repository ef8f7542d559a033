//! Rust accessor source generator
//!
//! Renders a [`SchemaTree`] into one immutable struct per record plus the
//! root struct, using [`quote`] for the token streams and [`prettyplease`] to
//! format them. The output depends on nothing but the tree, so an unchanged
//! document always produces byte-identical source.

use crate::schema::naming::{self, WIDENED_TYPE};
use crate::schema::{FieldDef, FieldType, PrimitiveKind, RecordDef, SchemaTree};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

/// Prepended to every generated artifact
pub const GENERATED_HEADER: &str = "\
// @generated by config-keys. Do not edit by hand.\n\
// This file is replaced on every regeneration; edit the source document instead.\n\n";

// ── Public API ────────────────────────────────────────────────────────────────

/// Generate the complete artifact for a schema tree
pub fn generate_rust(tree: &SchemaTree) -> String {
    let mut items: Vec<TokenStream> = Vec::with_capacity(tree.len() + 2);
    if tree.uses_widened() {
        items.push(emit_widened_string());
    }
    items.extend(tree.records.iter().map(emit_record));
    items.push(emit_record(&tree.root));
    items.push(emit_root_impl(&tree.root));

    let file_tokens = quote! { #(#items)* };
    let body = match syn::parse2::<syn::File>(file_tokens.clone()) {
        Ok(file) => prettyplease::unparse(&file),
        Err(err) => {
            tracing::warn!("generated tokens did not parse ({}); writing them unformatted", err);
            file_tokens.to_string()
        }
    };

    format!("{GENERATED_HEADER}{body}")
}

/// Rust type written for a field type
pub fn rust_type(ty: &FieldType) -> TokenStream {
    match ty {
        FieldType::Primitive(kind) => match kind {
            PrimitiveKind::String => quote!(String),
            PrimitiveKind::Integer => quote!(i64),
            PrimitiveKind::Float => quote!(f64),
            PrimitiveKind::Boolean => quote!(bool),
            PrimitiveKind::Unknown => quote!(serde_json::Value),
            PrimitiveKind::Widened => {
                let ident = type_ident(WIDENED_TYPE);
                quote!(#ident)
            }
        },
        FieldType::Optional(inner) => {
            let inner = rust_type(inner);
            quote!(Option<#inner>)
        }
        FieldType::List(element) => {
            let element = rust_type(element);
            quote!(Vec<#element>)
        }
        FieldType::Named(name) => {
            let ident = type_ident(name);
            quote!(#ident)
        }
    }
}

// ── Items ─────────────────────────────────────────────────────────────────────

fn emit_record(record: &RecordDef) -> TokenStream {
    let name = type_ident(&record.name);
    let doc = if record.path.is_root() {
        " Root of the configuration document.".to_string()
    } else {
        format!(" Inferred from `{}`.", record.path)
    };
    let allow = if record.name.contains('_') {
        quote!(#[allow(non_camel_case_types)])
    } else {
        quote!()
    };
    let fields = record.fields.iter().map(emit_field);

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
        #allow
        pub struct #name {
            #(#fields,)*
        }
    }
}

fn emit_field(field: &FieldDef) -> TokenStream {
    let ident = field_ident(&field.ident);
    let ty = rust_type(&field.ty);
    let rename = if field.ident != field.key {
        let key = &field.key;
        quote!(#[serde(rename = #key)])
    } else {
        quote!()
    };
    let optional = if matches!(field.ty, FieldType::Optional(_)) {
        quote!(#[serde(default, skip_serializing_if = "Option::is_none")])
    } else {
        quote!()
    };

    quote! {
        #rename
        #optional
        pub #ident: #ty
    }
}

fn emit_root_impl(root: &RecordDef) -> TokenStream {
    let name = type_ident(&root.name);
    quote! {
        impl #name {
            /// Deserialize the whole configuration document.
            pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
                serde_json::from_value(value)
            }

            /// Parse the configuration document from JSON text.
            pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
                serde_json::from_str(json)
            }
        }
    }
}

fn emit_widened_string() -> TokenStream {
    let name = type_ident(WIDENED_TYPE);
    quote! {
        /// A value whose samples disagreed in scalar kind, kept as text.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
        #[serde(transparent)]
        pub struct #name(pub String);

        impl #name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> serde::Deserialize<'de> for #name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                match <serde_json::Value as serde::Deserialize>::deserialize(deserializer)? {
                    serde_json::Value::String(text) => Ok(#name(text)),
                    serde_json::Value::Number(number) => Ok(#name(number.to_string())),
                    serde_json::Value::Bool(flag) => Ok(#name(flag.to_string())),
                    other => Err(serde::de::Error::custom(format!(
                        "expected a scalar, found {other}"
                    ))),
                }
            }
        }
    }
}

// ── Identifiers ───────────────────────────────────────────────────────────────

fn type_ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

fn field_ident(name: &str) -> Ident {
    if naming::is_keyword(name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;
    use serde_json::json;

    fn generate(value: serde_json::Value) -> String {
        generate_rust(&build(&value).unwrap())
    }

    #[test]
    fn test_output_is_valid_rust() {
        let source = generate(json!({
            "database": {"host": "db.local", "port": 5432, "replicas": ["a", "b"]},
            "servers": [{"name": "a", "tls": true}, {"name": "b"}],
            "ratio": 0.5,
            "nothing": null,
            "ports": [80, "http"],
            "type": "primary",
            "maxRetries": 3
        }));
        assert!(source.starts_with("// @generated"));
        syn::parse_file(&source).expect("generated source should parse");
    }

    #[test]
    fn test_field_types() {
        let source = generate(json!({
            "database": {"host": "db.local", "port": 5432, "replicas": ["a"], "ratio": 0.5, "debug": false}
        }));
        assert!(source.contains("pub struct Database {"));
        assert!(source.contains("pub host: String,"));
        assert!(source.contains("pub port: i64,"));
        assert!(source.contains("pub replicas: Vec<String>,"));
        assert!(source.contains("pub ratio: f64,"));
        assert!(source.contains("pub debug: bool,"));
        assert!(source.contains("pub database: Database,"));
    }

    #[test]
    fn test_optional_and_untyped_fields() {
        let source = generate(json!({"items": [{"a": 1}, {"a": 2, "b": "x"}], "nothing": null}));
        assert!(source.contains("pub a: i64,"));
        assert!(source.contains("pub b: Option<String>,"));
        assert!(source.contains("skip_serializing_if = \"Option::is_none\""));
        assert!(source.contains("pub items: Vec<ItemsItem>,"));
        assert!(source.contains("pub nothing: Option<serde_json::Value>,"));
    }

    #[test]
    fn test_renames_and_raw_identifiers() {
        let source = generate(json!({"maxRetries": 3, "type": "x"}));
        assert!(source.contains("#[serde(rename = \"maxRetries\")]"));
        assert!(source.contains("pub max_retries: i64,"));
        assert!(source.contains("pub r#type: String,"));
    }

    #[test]
    fn test_widened_newtype_only_when_needed() {
        let with = generate(json!({"ports": [80, "http"]}));
        assert!(with.contains("pub struct WidenedString(pub String);"));
        assert!(with.contains("pub ports: Vec<WidenedString>,"));

        let without = generate(json!({"ports": [80, 443]}));
        assert!(!without.contains("WidenedString"));
    }

    #[test]
    fn test_discriminator_types_allow_naming_lint() {
        let source = generate(json!({"webcam_plugin": {"fps": 30}}));
        assert!(source.contains("#[allow(non_camel_case_types)]"));
        assert!(source.contains("pub struct WebcamPlugin_P {"));
    }

    #[test]
    fn test_definitions_precede_root() {
        let source = generate(json!({"database": {"primary": {"host": "a"}}}));
        let primary = source.find("pub struct Primary").unwrap();
        let database = source.find("pub struct Database").unwrap();
        let root = source.find("pub struct ConfigKeys").unwrap();
        assert!(primary < database && database < root);
    }

    #[test]
    fn test_idempotent() {
        let value = json!({"a": {"b": [{"c": 1}, {"d": null}]}, "e": [1, 2.5]});
        let tree = build(&value).unwrap();
        assert_eq!(generate_rust(&tree), generate_rust(&tree));
        assert_eq!(generate_rust(&tree), generate_rust(&build(&value).unwrap()));
    }

    #[test]
    fn test_empty_root() {
        let source = generate(json!({}));
        assert!(source.contains("pub struct ConfigKeys {}"));
        assert!(source.contains("pub fn from_value"));
    }
}
