//! Value kinds for mock arguments and return values.
//!
//! Mock values are [`serde_json::Value`]s; [`ValueKind`] names the variant so
//! type mismatches can be reported at the resolution boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Returns the kind of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_kind_of() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!(3.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({"id": 1})), ValueKind::Object);
    }
}
