//! Inferred shape of a JSON value

use std::fmt;

/// Scalar kinds a field can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Integer,
    Float,
    Boolean,
    /// No sample supplied a concrete kind (only `null`s, empty lists), or the
    /// samples mixed scalars with lists/objects
    Unknown,
    /// Samples disagreed in scalar kind and were widened to their string form
    Widened,
}

impl PrimitiveKind {
    /// Kind of a single JSON scalar; `None` for null, arrays and objects
    pub fn of(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(_) => Some(PrimitiveKind::String),
            serde_json::Value::Bool(_) => Some(PrimitiveKind::Boolean),
            serde_json::Value::Number(n) if n.is_i64() => Some(PrimitiveKind::Integer),
            serde_json::Value::Number(_) => Some(PrimitiveKind::Float),
            _ => None,
        }
    }

    /// Most permissive common representation of two kinds.
    ///
    /// Integer and float unify to float; every other disagreement widens to
    /// a string.
    pub fn unify(self, other: Self) -> Self {
        use PrimitiveKind::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Unknown, k) | (k, Unknown) => k,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Widened,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Unknown => "unknown",
            PrimitiveKind::Widened => "widened string",
        };
        f.write_str(name)
    }
}

/// Inferred type of one key at one nesting level
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    Primitive(PrimitiveKind),
    Optional(Box<FieldShape>),
    List(Box<FieldShape>),
    Record(RecordShape),
}

/// Union of the keys observed across every object sample, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordShape {
    pub fields: Vec<(String, FieldShape)>,
}

impl FieldShape {
    /// Wrap in `Optional`, never nesting two optionals
    pub fn optional(inner: FieldShape) -> Self {
        match inner {
            FieldShape::Optional(_) => inner,
            other => FieldShape::Optional(Box::new(other)),
        }
    }

    pub fn list(element: FieldShape) -> Self {
        FieldShape::List(Box::new(element))
    }

    /// Placeholder for a value with no known type (`null`, empty list element)
    pub fn untyped() -> Self {
        FieldShape::optional(FieldShape::Primitive(PrimitiveKind::Unknown))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldShape::Optional(_))
    }

    pub fn as_record(&self) -> Option<&RecordShape> {
        match self {
            FieldShape::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl RecordShape {
    pub fn field(&self, key: &str) -> Option<&FieldShape> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, shape)| shape)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_scalars() {
        assert_eq!(PrimitiveKind::of(&json!("x")), Some(PrimitiveKind::String));
        assert_eq!(PrimitiveKind::of(&json!(3)), Some(PrimitiveKind::Integer));
        assert_eq!(PrimitiveKind::of(&json!(3.5)), Some(PrimitiveKind::Float));
        assert_eq!(PrimitiveKind::of(&json!(true)), Some(PrimitiveKind::Boolean));
        assert_eq!(PrimitiveKind::of(&json!(null)), None);
        assert_eq!(PrimitiveKind::of(&json!([1])), None);
    }

    #[test]
    fn test_unify_numeric_and_mixed() {
        use PrimitiveKind::*;
        assert_eq!(Integer.unify(Float), Float);
        assert_eq!(Integer.unify(String), Widened);
        assert_eq!(Boolean.unify(Integer), Widened);
        assert_eq!(Unknown.unify(Boolean), Boolean);
        assert_eq!(Widened.unify(Float), Widened);
    }

    #[test]
    fn test_optional_does_not_nest() {
        let once = FieldShape::optional(FieldShape::Primitive(PrimitiveKind::String));
        let twice = FieldShape::optional(once.clone());
        assert_eq!(once, twice);
    }
}
