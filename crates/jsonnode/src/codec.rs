//! Decode/encode boundary between JSON text and [`Value`].
//!
//! Parsing and serialization are delegated to `serde_json`; this module only
//! picks the entry points and maps failures onto [`JsonError`].
//!
//! Two decoding flavours exist:
//!
//! - [`decode`] requires the whole input to be exactly one JSON value.
//! - [`decode_first`] reads the first JSON value and ignores whatever follows,
//!   the way a stream decoder stops after one document.

use crate::error::{JsonError, Result};
use crate::value::Value;

/// Decode `text` as a single JSON document.
///
/// Integers keep their exact 64-bit form and wider numbers keep their text;
/// see [`Value`].
///
/// # Examples
///
/// ```
/// use jsonnode::{codec, Value};
///
/// let value = codec::decode(r#"{"id": 18446744073709551615}"#).unwrap();
/// let id = value.as_object().unwrap()["id"].clone();
/// assert_eq!(id, Value::Uint(u64::MAX));
/// ```
pub fn decode(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(JsonError::Decode)
}

/// Decode the first JSON document in `text`, ignoring anything after it.
///
/// Empty or whitespace-only input is an error.
pub fn decode_first(text: &str) -> Result<Value> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(result) => result.map_err(JsonError::Decode),
        // Reuse serde_json's own EOF diagnostic for empty input.
        None => serde_json::from_str::<Value>(text).map_err(JsonError::Decode),
    }
}

/// Encode a value as compact JSON text.
pub fn encode(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(JsonError::Encode)
}

/// Encode a value as JSON text indented with two spaces.
pub fn encode_pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(JsonError::Encode)
}
