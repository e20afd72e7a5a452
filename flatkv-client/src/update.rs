/// Read-modify-write helpers for object and array values
///
/// Each helper reads the whole value, edits it in memory and writes the whole
/// value back. Nothing guards the gap between the read and the write, so two
/// callers editing the same key race and the later write wins.
use crate::client::Client;
use crate::error::{ClientError, Result};
use crate::shape::{Shape, ValueKind};
use serde::Serialize;
use serde_json::{Map, Value};

impl Client {
    /// Set one field of the object stored at `key`
    ///
    /// # Returns
    /// The object as written back
    ///
    /// # Errors
    /// [`ClientError::TypeMismatch`] unless `key` holds a JSON object. Arrays,
    /// scalars and absent keys are all rejected.
    ///
    /// # Example
    /// ```no_run
    /// # use flatkv_client::Client;
    /// # use serde_json::json;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::connect("http://localhost:8080")?;
    /// client.set("profile", &json!({"hello": "world"})).await?;
    /// let updated = client.update_object("profile", "hello", "there").await?;
    /// assert_eq!(updated["hello"], "there");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_object<T: Serialize + ?Sized>(
        &self,
        key: &str,
        object_key: &str,
        value: &T,
    ) -> Result<Map<String, Value>> {
        let mut object = match self.get_shape(key).await? {
            Shape::Object(object) => object,
            other => return Err(ClientError::type_mismatch(key, ValueKind::Object, other.kind())),
        };

        object.insert(object_key.to_string(), to_json(value)?);
        self.set(key, &object).await?;
        Ok(object)
    }

    /// Append `item` to the array stored at `key`
    pub async fn push_array<T: Serialize + ?Sized>(&self, key: &str, item: &T) -> Result<Vec<Value>> {
        let mut items = self.fetch_array(key).await?;
        items.push(to_json(item)?);
        self.set(key, &items).await?;
        Ok(items)
    }

    /// Remove the element at `index` from the array stored at `key`
    ///
    /// An index past the end removes nothing; the array is still written back.
    /// Positions count from the front only; there is no negative,
    /// from-the-end form.
    pub async fn delete_array_item_by_index(&self, key: &str, index: usize) -> Result<Vec<Value>> {
        let mut items = self.fetch_array(key).await?;
        if index < items.len() {
            items.remove(index);
        }
        self.set(key, &items).await?;
        Ok(items)
    }

    /// Remove the first element of the array at `key` whose `object_key`
    /// field loosely equals `search_value`
    ///
    /// # Errors
    /// [`ClientError::NotFound`] when no element matches.
    pub async fn delete_array_item_by_value<T: Serialize + ?Sized>(
        &self,
        key: &str,
        object_key: &str,
        search_value: &T,
    ) -> Result<Vec<Value>> {
        let search_value = to_json(search_value)?;
        let mut items = self.fetch_array(key).await?;

        let position = items
            .iter()
            .position(|item| loosely_equal(field(item, object_key), &search_value))
            .ok_or_else(|| ClientError::NotFound {
                key: key.to_string(),
                field: object_key.to_string(),
                value: search_value.clone(),
            })?;

        items.remove(position);
        self.set(key, &items).await?;
        Ok(items)
    }

    async fn fetch_array(&self, key: &str) -> Result<Vec<Value>> {
        match self.get_shape(key).await? {
            Shape::Array(items) => Ok(items),
            other => Err(ClientError::type_mismatch(key, ValueKind::Array, other.kind())),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(ClientError::Encode)
}

/// Field lookup; non-object elements have no fields
fn field<'a>(item: &'a Value, name: &str) -> Option<&'a Value> {
    item.as_object().and_then(|object| object.get(name))
}

/// JavaScript-style `==` between a possibly missing field and a JSON value
///
/// A missing field equals only `null`. Values of the same kind compare by
/// value, with arrays and objects compared structurally. An array or object
/// compared with a primitive is first reduced to the string JavaScript would
/// produce for it. Strings, numbers and booleans of different kinds then
/// compare numerically.
pub(crate) fn loosely_equal(left: Option<&Value>, right: &Value) -> bool {
    let left = match left {
        Some(left) => left,
        None => return right.is_null(),
    };

    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => left == right,
        (Value::Array(_) | Value::Object(_), primitive) => {
            loosely_equal(Some(&Value::String(to_js_string(left))), primitive)
        }
        (primitive, Value::Array(_) | Value::Object(_)) => {
            loosely_equal(Some(primitive), &Value::String(to_js_string(right)))
        }
        _ => match (to_number(left), to_number(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// String conversion as done by JavaScript's `String(value)`
///
/// Arrays join their elements with `,` (with `null` as the empty string) and
/// every object becomes `[object Object]`.
fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{}", f as i128),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(to_js_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(true) => Some(1.0),
        Value::Bool(false) => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => string_to_number(s),
        _ => None,
    }
}

/// Numeric conversion of a string as done by JavaScript's `Number(text)`
///
/// `None` stands for `NaN`.
fn string_to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return Some(digits.chars().fold(0.0, |acc, c| {
            acc * radix as f64 + c.to_digit(radix).unwrap_or(0) as f64
        }));
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // Rust also accepts "inf" and "nan" spellings that JavaScript rejects
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
