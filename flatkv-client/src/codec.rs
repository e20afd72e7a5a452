/// Text encoding between the client and the store
///
/// Keys and values travel percent-escaped with the same reserved set as
/// JavaScript's `encodeURIComponent`, values are stored as JSON text, and key
/// listings arrive as newline separated escaped keys.
use crate::error::{ClientError, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-escape a key, prefix or value for use in a URL or form body
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Reverse [`encode_component`]
pub fn decode_component(input: &str) -> Result<String> {
    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ClientError::Decode(format!("{:?}: {}", input, e)))
}

/// Build the `key=value` form body for a write
pub fn form_body(key: &str, json: &str) -> String {
    format!("{}={}", encode_component(key), encode_component(json))
}

/// Split a listing response into decoded keys
///
/// An empty body is an empty listing; otherwise every newline-separated
/// segment is a key.
pub fn parse_key_list(body: &str) -> Result<Vec<String>> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    body.split('\n').map(decode_component).collect()
}

/// Serialize a value to the JSON text stored remotely
pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(ClientError::Encode)
}

/// Decode stored text, mapping empty text and JSON `null` to `None`
pub fn decode_value(key: &str, text: &str) -> Result<Option<Value>> {
    if text.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(text).map_err(|source| ClientError::Parse {
        key: key.to_string(),
        source,
    })?;

    Ok(match value {
        Value::Null => None,
        value => Some(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_matches_uri_component() {
        assert_eq!(encode_component("abc-_.!~*'()XYZ09"), "abc-_.!~*'()XYZ09");
        assert_eq!(encode_component("1;b=2"), "1%3Bb%3D2");
        assert_eq!(encode_component("a b/c?d&e"), "a%20b%2Fc%3Fd%26e");
        assert_eq!(encode_component("key\nwit"), "key%0Awit");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn test_decode_reverses_encode() {
        for input in ["plain", "with space", "key\nwit", "1;b=2", "ünïcödé", "%literal"] {
            assert_eq!(decode_component(&encode_component(input)).unwrap(), input);
        }
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = decode_component("%FF%FE").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_form_body_escapes_both_sides() {
        assert_eq!(form_body("a", "\"1;b=2\""), "a=%221%3Bb%3D2%22");
        assert_eq!(form_body("x=y", "1"), "x%3Dy=1");
    }

    #[test]
    fn test_parse_key_list() {
        assert!(parse_key_list("").unwrap().is_empty());
        assert_eq!(parse_key_list("one").unwrap(), vec!["one"]);
        assert_eq!(
            parse_key_list("keywidout\nkey%0Awit").unwrap(),
            vec!["keywidout", "key\nwit"]
        );
    }

    #[test]
    fn test_decode_value() {
        assert_eq!(decode_value("k", "").unwrap(), None);
        assert_eq!(decode_value("k", "null").unwrap(), None);
        assert_eq!(decode_value("k", "\"1;b=2\"").unwrap(), Some(json!("1;b=2")));
        assert_eq!(decode_value("k", "[1,2]").unwrap(), Some(json!([1, 2])));
    }

    #[test]
    fn test_decode_value_reports_key_on_parse_failure() {
        let err = decode_value("greeting", "hello there").unwrap_err();
        match &err {
            ClientError::Parse { key, .. } => assert_eq!(key, "greeting"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("greeting"));
        assert!(err.to_string().contains("get_raw"));
    }

    #[test]
    fn test_encode_value() {
        assert_eq!(encode_value(&json!({"a": [1, true]})).unwrap(), r#"{"a":[1,true]}"#);
        assert_eq!(encode_value("text").unwrap(), "\"text\"");
    }
}
