/// flatkv Client Library
///
/// This crate provides an async Rust client for flat HTTP key-value stores:
/// get/set/delete/list primitives, multi-key helpers built on them, and
/// read-modify-write helpers for JSON objects and arrays stored under one key.

pub mod error;
pub mod config;
pub mod codec;
pub mod shape;
pub mod client;
pub mod batch;
pub mod update;

// Re-export key types
pub use client::{Client, Fetched, GetOptions};
pub use config::{ClientConfig, ENDPOINT_ENV_VAR};
pub use error::{ClientError, Result};
pub use serde_json::Value;
pub use shape::{Shape, ValueKind};
