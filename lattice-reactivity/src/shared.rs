//! Predicates shared by the tracker and the proxy layer.

use crate::value::{Object, Value};

/// Whether `value` is structured, i.e. a raw object or a wrapper over one.
pub fn is_object(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Reactive(_))
}

/// Whether `key` is an own property of `target`.
pub fn has_own(target: &Object, key: &str) -> bool {
    target.contains_key(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_not_objects() {
        assert!(!is_object(&Value::Null));
        assert!(!is_object(&Value::Bool(true)));
        assert!(!is_object(&Value::Number(0.0)));
        assert!(!is_object(&Value::from("x")));
        assert!(is_object(&Value::Object(Object::new())));
    }

    #[test]
    fn has_own_sees_only_present_keys() {
        let target: Object = [("a", Value::Null)].into_iter().collect();
        assert!(has_own(&target, "a"));
        assert!(!has_own(&target, "b"));
    }
}
