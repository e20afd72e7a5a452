/// Discriminated view of a stored value
///
/// The structured helpers decide what they may edit by matching on a
/// [`Shape`] rather than inspecting a raw JSON value ad hoc.
use serde_json::{Map, Value};
use std::fmt;

/// Coarse kind of a stored value, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Absent,
    Scalar,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Absent => "absent value",
            ValueKind::Scalar => "scalar",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A decoded value classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Key missing, empty, or holding JSON `null`
    Absent,
    /// String, number or boolean
    Scalar(Value),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl Shape {
    pub fn kind(&self) -> ValueKind {
        match self {
            Shape::Absent => ValueKind::Absent,
            Shape::Scalar(_) => ValueKind::Scalar,
            Shape::Array(_) => ValueKind::Array,
            Shape::Object(_) => ValueKind::Object,
        }
    }

    /// Convert back into the optional value `get` would have returned
    pub fn into_value(self) -> Option<Value> {
        match self {
            Shape::Absent => None,
            Shape::Scalar(value) => Some(value),
            Shape::Array(items) => Some(Value::Array(items)),
            Shape::Object(fields) => Some(Value::Object(fields)),
        }
    }
}

impl From<Value> for Shape {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Shape::Absent,
            Value::Array(items) => Shape::Array(items),
            Value::Object(fields) => Shape::Object(fields),
            scalar => Shape::Scalar(scalar),
        }
    }
}

impl From<Option<Value>> for Shape {
    fn from(value: Option<Value>) -> Self {
        value.map(Shape::from).unwrap_or(Shape::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifies_each_kind() {
        assert_eq!(Shape::from(None).kind(), ValueKind::Absent);
        assert_eq!(Shape::from(json!(null)).kind(), ValueKind::Absent);
        assert_eq!(Shape::from(json!("text")).kind(), ValueKind::Scalar);
        assert_eq!(Shape::from(json!(4.5)).kind(), ValueKind::Scalar);
        assert_eq!(Shape::from(json!(false)).kind(), ValueKind::Scalar);
        assert_eq!(Shape::from(json!([1, 2])).kind(), ValueKind::Array);
        assert_eq!(Shape::from(json!({"a": 1})).kind(), ValueKind::Object);
    }

    #[test]
    fn test_into_value_restores_original() {
        let original = json!({"hello": ["world", 1]});
        let shape = Shape::from(Some(original.clone()));
        assert_eq!(shape.into_value(), Some(original));
        assert_eq!(Shape::Absent.into_value(), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ValueKind::Object.to_string(), "object");
        assert_eq!(ValueKind::Absent.to_string(), "absent value");
    }
}
