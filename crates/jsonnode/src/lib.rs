//! # jsonnode
//!
//! Schema-less JSON value tree with path navigation, lazy in-place mutation
//! and lenient type coercion.
//!
//! Decode arbitrary JSON into a [`Node`], walk it with [`Node::get`] and
//! [`Node::get_index`], build or rewrite it with [`Node::set`],
//! [`Node::add_index`] and [`Node::assign`], and read any leaf as a string,
//! integer, float, boolean or timestamp without declaring a schema.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonnode::Node;
//!
//! let doc: Node = r#"{"user":{"id":"42","active":1,"tags":["a","b"]}}"#.parse().unwrap();
//!
//! // Lenient reads: strings parse, numbers truthy, missing keys default.
//! assert_eq!(doc.get("user").get("id").as_i64(), 42);
//! assert!(doc.get("user").get("active").as_bool());
//! assert_eq!(doc.get("user").get("tags").array_len(), 2);
//! assert_eq!(doc.get("user").get("nope").as_string(), "");
//!
//! // Writes create missing objects on the way down.
//! doc.set("user").set("profile").set("name").assign("Ada");
//! assert_eq!(doc.get("user").get("profile").get("name").as_string(), "Ada");
//! ```
//!
//! ## Modules
//!
//! - [`node`] — the [`Node`] handle: navigation, mutation, coercion
//! - [`value`] — the [`Value`] data model and [`Kind`] tags
//! - [`coerce`] — lenient conversions between value kinds
//! - [`codec`] — JSON text ⇄ [`Value`] via `serde_json`
//! - [`error`] — [`JsonError`] for decode, encode, copy and time parsing

pub mod codec;
pub mod coerce;
pub mod error;
pub mod node;
pub mod value;

pub use error::{JsonError, Result};
pub use node::{Location, Node, Step};
pub use value::{Kind, Map, Value};
