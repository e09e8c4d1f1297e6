//! Error types for decoding, encoding, copying and time coercion.

use thiserror::Error;

/// Errors surfaced by the value tree.
///
/// Only structural failures are reported. Reading a value as the wrong kind
/// or navigating into a missing container never produces an error; those
/// paths degrade to empty handles and zero values instead.
#[derive(Error, Debug)]
pub enum JsonError {
    /// The input text was not well-formed JSON.
    #[error("JSON decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The addressed value could not be written as JSON text.
    #[error("JSON encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// A caller-supplied value could not be copied into the tree
    /// (e.g. a map with non-string keys).
    #[error("cannot copy value into tree: {0}")]
    Copy(#[source] serde_json::Error),

    /// The handle addresses an array position that no longer exists, so
    /// there is nowhere to store the value.
    #[error("cannot store at {location}: array position no longer exists")]
    Vacant { location: String },

    /// None of the accepted timestamp layouts matched.
    /// `source` is the error of the last layout tried (RFC 3339).
    #[error("cannot parse {input:?} as a timestamp: {source}")]
    TimeParse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Convenience alias used throughout jsonnode.
pub type Result<T> = std::result::Result<T, JsonError>;
