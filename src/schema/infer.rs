//! Shape inference over one or more sample values
//!
//! All samples describe the same logical field. Lists contribute their
//! elements (flattened across every list sample), objects contribute the union
//! of their keys, and `null` makes the result optional. Field order follows
//! first-seen order across samples, which with `serde_json`'s
//! `preserve_order` feature is document order.

use super::shape::{FieldShape, PrimitiveKind, RecordShape};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Infer the canonical shape of a field from every sample seen for it
pub fn infer(samples: &[&Value]) -> FieldShape {
    let mut nullable = false;
    let mut scalar: Option<PrimitiveKind> = None;
    let mut lists: Vec<&Vec<Value>> = Vec::new();
    let mut objects: Vec<&Map<String, Value>> = Vec::new();

    for sample in samples {
        match sample {
            Value::Null => nullable = true,
            Value::Array(items) => lists.push(items),
            Value::Object(map) => objects.push(map),
            other => {
                if let Some(kind) = PrimitiveKind::of(other) {
                    scalar = Some(scalar.map_or(kind, |seen| seen.unify(kind)));
                }
            }
        }
    }

    let categories =
        usize::from(scalar.is_some()) + usize::from(!lists.is_empty()) + usize::from(!objects.is_empty());

    let shape = if categories == 0 {
        return FieldShape::untyped();
    } else if categories > 1 {
        tracing::trace!(
            "samples mix scalars, lists and objects; falling back to an untyped value"
        );
        FieldShape::Primitive(PrimitiveKind::Unknown)
    } else if let Some(kind) = scalar {
        FieldShape::Primitive(kind)
    } else if !lists.is_empty() {
        infer_list(&lists)
    } else {
        FieldShape::Record(infer_record(&objects))
    };

    if nullable {
        FieldShape::optional(shape)
    } else {
        shape
    }
}

/// Shape of a single value
pub fn infer_value(value: &Value) -> FieldShape {
    infer(&[value])
}

/// One element shape for every list sample. An empty list tells us nothing
/// about its elements, so it only contributes when all lists are empty.
fn infer_list(lists: &[&Vec<Value>]) -> FieldShape {
    let elements: Vec<&Value> = lists.iter().flat_map(|items| items.iter()).collect();
    if elements.is_empty() {
        return FieldShape::list(FieldShape::untyped());
    }
    FieldShape::list(infer(&elements))
}

/// Union of keys across every object; keys absent from some objects are optional
pub fn infer_record(objects: &[&Map<String, Value>]) -> RecordShape {
    let mut order: Vec<(&str, Vec<&Value>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for object in objects {
        for (key, value) in object.iter() {
            match index.get(key.as_str()) {
                Some(&slot) => order[slot].1.push(value),
                None => {
                    index.insert(key.as_str(), order.len());
                    order.push((key.as_str(), vec![value]));
                }
            }
        }
    }

    let fields = order
        .into_iter()
        .map(|(key, values)| {
            let shape = infer(&values);
            let shape = if values.len() < objects.len() {
                FieldShape::optional(shape)
            } else {
                shape
            };
            tracing::trace!("inferred field `{}`: {:?}", key, shape);
            (key.to_string(), shape)
        })
        .collect();

    RecordShape { fields }
}
