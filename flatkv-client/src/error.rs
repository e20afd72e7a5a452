/// Error types for the flatkv client
use crate::shape::ValueKind;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to parse value of {key}, try get_raw to read the raw value: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Type mismatch at {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Not found: no element of {key} has {field} equal to {value}")]
    NotFound {
        key: String,
        field: String,
        value: Value,
    },

    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid key encoding: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub(crate) fn type_mismatch(key: &str, expected: ValueKind, found: ValueKind) -> Self {
        ClientError::TypeMismatch {
            key: key.to_string(),
            expected,
            found,
        }
    }
}
