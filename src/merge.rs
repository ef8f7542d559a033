//! Recursive merge of JSON documents

use serde_json::{Map, Value};

/// Merge `update` into `base`. Objects merge key by key; on any other conflict
/// the value from `update` replaces the one in `base`. Keys keep their
/// position in `base`, and new keys are appended in `update` order.
pub fn deep_merge(base: &mut Value, update: Value) {
    match (base, update) {
        (Value::Object(base), Value::Object(update)) => merge_maps(base, update),
        (base, update) => *base = update,
    }
}

fn merge_maps(base: &mut Map<String, Value>, update: Map<String, Value>) {
    for (key, value) in update {
        match base.get_mut(&key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

/// Copy into `base` every key of `defaults` it does not already have,
/// recursing where both sides hold objects. Existing values always win.
pub fn fill_missing(base: &mut Value, defaults: Value) {
    let (Value::Object(base), Value::Object(defaults)) = (base, defaults) else {
        return;
    };
    for (key, value) in defaults {
        match base.get_mut(&key) {
            Some(existing) => fill_missing(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

/// Nested object holding `value` at a dotted key path: `a.b` becomes
/// `{"a": {"b": value}}`
pub fn nest(path: &str, value: Value) -> Value {
    path.rsplit('.')
        .filter(|segment| !segment.is_empty())
        .fold(value, |inner, key| {
            let mut map = Map::new();
            map.insert(key.to_string(), inner);
            Value::Object(map)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_wins_on_conflict() {
        let mut base = json!({"database": {"host": "old", "port": 5432}, "debug": false});
        deep_merge(&mut base, json!({"database": {"host": "db.local"}}));
        assert_eq!(
            base,
            json!({"database": {"host": "db.local", "port": 5432}, "debug": false})
        );
    }

    #[test]
    fn test_lists_are_replaced_not_concatenated() {
        let mut base = json!({"hosts": ["a", "b"]});
        deep_merge(&mut base, json!({"hosts": ["c"]}));
        assert_eq!(base, json!({"hosts": ["c"]}));
    }

    #[test]
    fn test_scalar_replaced_by_object() {
        let mut base = json!({"cache": true});
        deep_merge(&mut base, json!({"cache": {"ttl": 60}}));
        assert_eq!(base, json!({"cache": {"ttl": 60}}));
    }

    #[test]
    fn test_key_order_is_kept() {
        let mut base = json!({"b": 1, "a": 2});
        deep_merge(&mut base, json!({"c": 3, "b": 4}));
        let keys: Vec<&String> = base.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_fill_missing_keeps_existing_values() {
        let mut base = json!({"camera": {"fps": 60}, "debug": true});
        fill_missing(&mut base, json!({"camera": {"fps": 30, "index": 0}, "audio": {"rate": 44100}}));
        assert_eq!(
            base,
            json!({"camera": {"fps": 60, "index": 0}, "debug": true, "audio": {"rate": 44100}})
        );
    }

    #[test]
    fn test_nest() {
        assert_eq!(nest("database.host", json!("x")), json!({"database": {"host": "x"}}));
        assert_eq!(nest("debug", json!(true)), json!({"debug": true}));
        assert_eq!(nest("", json!(1)), json!(1));
    }
}
