//! Type and field identifier synthesis
//!
//! Keys are split on `_`, `-`, whitespace and case boundaries (via `heck`),
//! rejoined, and stripped down to ASCII identifier characters. Type names are
//! unique within one generation run; the [`NameRegistry`] resolves collisions
//! deterministically in document order.

use super::path::KeyPath;
use crate::error::StructuralError;
use heck::{ToSnakeCase, ToUpperCamelCase};
use std::collections::HashSet;

/// Top-level type names ending in one of these words get a short discriminator
pub const DOMAIN_SUFFIXES: [(&str, &str); 3] =
    [("Plugin", "_P"), ("Util", "_U"), ("Manager", "_M")];

/// Suffix for the element type of a list of objects
pub const ITEM_SUFFIX: &str = "Item";

/// Name of the newtype emitted for widened scalars
pub const WIDENED_TYPE: &str = "WidenedString";

/// Names the generated artifact relies on and must never shadow
pub const PRELUDE_NAMES: [&str; 10] = [
    "Self", "Option", "Some", "None", "Vec", "String", "Box", "Result", "Ok", "Err",
];

const MAX_NUMERIC_SUFFIX: usize = 1000;

const KEYWORDS: [&str; 52] = [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: [&str; 4] = ["self", "Self", "super", "crate"];

/// Canonical UpperCamelCase identifier for an arbitrary key
pub fn type_case(key: &str) -> String {
    let name: String = key
        .to_upper_camel_case()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    match name.chars().next() {
        None => "Unnamed".to_string(),
        Some(first) if first.is_ascii_digit() => format!("Key{name}"),
        Some(_) => name,
    }
}

/// Root type name for a configured value; names the artifact itself relies
/// on get a `Root` suffix
pub fn root_type_name(configured: &str) -> String {
    let name = type_case(configured);
    if name == WIDENED_TYPE || PRELUDE_NAMES.contains(&name.as_str()) {
        format!("{name}Root")
    } else {
        name
    }
}

/// snake_case field identifier for a key. Rust keywords are returned as-is
/// (the emitter writes them as raw identifiers) except those that cannot be
/// raw, which get a trailing underscore.
pub fn field_name(key: &str) -> String {
    let name: String = key
        .to_snake_case()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let name = name.trim_matches('_').to_string();
    match name.chars().next() {
        None => "field".to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{name}"),
        Some(_) if NON_RAW_KEYWORDS.contains(&name.as_str()) => format!("{name}_"),
        Some(_) => name,
    }
}

/// True when `name` must be written as a raw identifier
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name) && !NON_RAW_KEYWORDS.contains(&name)
}

/// Apply the top-level discriminator rule to a canonical type name
pub fn with_domain_suffix(name: &str) -> String {
    for (word, suffix) in DOMAIN_SUFFIXES {
        if name.ends_with(word) {
            return format!("{name}{suffix}");
        }
    }
    name.to_string()
}

/// Preferred type name for the record found at `path`, before collision handling
pub fn base_type_name(path: &KeyPath) -> String {
    let keys = path.keys();
    let Some(last) = keys.last() else {
        return "Root".to_string();
    };
    let mut name = type_case(last);
    if path.is_item() {
        name.push_str(ITEM_SUFFIX);
    }
    if path.depth() == 0 {
        name = with_domain_suffix(&name);
    }
    name
}

/// Allocates unique type names for one generation run
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    /// Registry with the root type and the artifact's own names reserved
    pub fn new(root_type: &str) -> Self {
        let mut registry = Self::default();
        registry.reserve(root_type);
        registry.reserve(WIDENED_TYPE);
        for name in PRELUDE_NAMES {
            registry.reserve(name);
        }
        registry
    }

    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// Claim a unique name for the record at `path`.
    ///
    /// Tries the base name, then the base name prefixed by progressively more
    /// ancestor keys, then numeric suffixes.
    pub fn allocate(&mut self, path: &KeyPath) -> Result<String, StructuralError> {
        let base = base_type_name(path);
        let keys = path.keys();
        let ancestors = &keys[..keys.len().saturating_sub(1)];

        let mut candidates = vec![base.clone()];
        let mut prefix = String::new();
        for ancestor in ancestors.iter().rev() {
            prefix = format!("{}{}", type_case(ancestor), prefix);
            candidates.push(format!("{prefix}{base}"));
        }

        for candidate in candidates {
            if self.taken.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }

        let mut last = base.clone();
        for n in 2..=MAX_NUMERIC_SUFFIX {
            last = format!("{base}{n}");
            if self.taken.insert(last.clone()) {
                tracing::debug!("type name `{}` taken, using `{}` for {}", base, last, path);
                return Ok(last);
            }
        }

        Err(StructuralError::NameCollision {
            path: path.to_string(),
            name: last,
        })
    }
}
