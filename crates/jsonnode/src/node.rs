//! Handles onto locations inside a shared value tree.
//!
//! A [`Node`] never owns a private copy of the data it addresses. All handles
//! derived from one root share the same tree, and each handle remembers *where*
//! it points rather than *what* it points at:
//!
//! - [`Location::Root`] addresses the tree's root value, which may be unset.
//! - [`Location::Slot`] addresses `parent[key]`, with the parent object found
//!   again from the root on every access.
//! - [`Location::Element`] addresses `array[index]`, resolved by position on
//!   every access.
//!
//! Because every access re-resolves, a handle always reflects mutations made
//! through any other handle on the same tree, and a handle into an array keeps
//! addressing the same position even after the array has grown.
//!
//! Reads never create anything. Writes create what they need: writing through
//! a slot handle materializes every missing object on the way down ("lazy path
//! creation"), replacing values of the wrong kind.

use crate::codec;
use crate::error::{JsonError, Result};
use crate::value::{Kind, Map, Value};
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

type Tree = Rc<RefCell<Option<Value>>>;

/// One hop from a container to a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// What a [`Node`] addresses. The three modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Location {
    /// The root value of the tree.
    #[default]
    Root,
    /// Member `key` of the object found at `parent`.
    Slot { parent: Vec<Step>, key: String },
    /// Position `index` of the array found at `array`.
    Element { array: Vec<Step>, index: usize },
}

impl Location {
    /// Steps from the root to the addressed value.
    fn path(&self) -> Vec<Step> {
        match self {
            Location::Root => Vec::new(),
            Location::Slot { parent, key } => {
                let mut path = parent.clone();
                path.push(Step::Key(key.clone()));
                path
            }
            Location::Element { array, index } => {
                let mut path = array.clone();
                path.push(Step::Index(*index));
                path
            }
        }
    }
}

/// Dotted form with bracketed indexes, e.g. `.items[2].name`; `.` for the
/// root.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path();
        if path.is_empty() {
            return f.write_str(".");
        }
        for step in path {
            match step {
                Step::Key(key) => write!(f, ".{key}")?,
                Step::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A handle onto one location of a JSON value tree.
///
/// Cloning a `Node` yields another handle onto the same location of the same
/// tree; it does not copy the data.
///
/// # Examples
///
/// ```
/// use jsonnode::Node;
///
/// let root = Node::new();
/// root.set("server").set("port").assign(8080);
/// root.set("server").set("hosts").add_index().assign("a.example");
///
/// assert_eq!(root.get("server").get("port").as_i64(), 8080);
/// assert_eq!(root.get("server").get("hosts").get_index(0).as_string(), "a.example");
/// assert!(root.get("server").get("missing").is_null());
/// assert_eq!(
///     root.encode().unwrap(),
///     r#"{"server":{"port":8080,"hosts":["a.example"]}}"#
/// );
/// ```
#[derive(Clone, Default)]
pub struct Node {
    tree: Tree,
    location: Location,
}

impl Node {
    /// An empty root handle with a tree of its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// A root handle owning `value`.
    pub fn from_value(value: impl Into<Value>) -> Self {
        Node {
            tree: Rc::new(RefCell::new(Some(value.into()))),
            location: Location::Root,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// A handle on the same tree at `location`.
    fn at(&self, location: Location) -> Node {
        Node {
            tree: Rc::clone(&self.tree),
            location,
        }
    }

    /// Run `f` on the addressed value, or on `None` when the node is empty.
    fn read<R>(&self, f: impl FnOnce(Option<&Value>) -> R) -> R {
        let tree = self.tree.borrow();
        let target = tree.as_ref().and_then(|root| match &self.location {
            Location::Root => Some(root),
            Location::Slot { parent, key } => {
                lookup(root, parent)?.as_object()?.get(key.as_str())
            }
            Location::Element { array, index } => lookup(root, array)?.as_array()?.get(*index),
        });
        f(target)
    }

    /// Run `f` on the addressed slot, creating it (and any missing ancestor
    /// objects) first. Returns `None` without calling `f` when the location
    /// cannot be materialized, i.e. it runs through an array position that
    /// no longer exists.
    fn write<R>(&self, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        let mut tree = self.tree.borrow_mut();
        let root = tree.get_or_insert(Value::Null);
        let target = match &self.location {
            Location::Root => root,
            Location::Slot { parent, key } => materialize(root, parent)?
                .make_object()
                .entry(key.clone())
                .or_insert(Value::Null),
            Location::Element { array, index } => {
                lookup_mut(root, array)?.as_array_mut()?.get_mut(*index)?
            }
        };
        Some(f(target))
    }

    /// Run `f` on the addressed value if it exists, without creating anything.
    fn modify<R>(&self, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        let mut tree = self.tree.borrow_mut();
        let root = tree.as_mut()?;
        let target = match &self.location {
            Location::Root => root,
            Location::Slot { parent, key } => {
                lookup_mut(root, parent)?.as_object_mut()?.get_mut(key.as_str())?
            }
            Location::Element { array, index } => {
                lookup_mut(root, array)?.as_array_mut()?.get_mut(*index)?
            }
        };
        Some(f(target))
    }

    /// Replace the addressed value.
    ///
    /// Root handles always materialize; only paths through a vanished array
    /// position fail.
    fn store(&self, value: Value) -> Result<()> {
        self.write(|slot| *slot = value)
            .ok_or_else(|| JsonError::Vacant {
                location: self.location.to_string(),
            })
    }

    // -----------------------------------------------------------------------
    // Decode / encode
    // -----------------------------------------------------------------------

    /// Decode the first JSON document in `text` and store it at this node.
    /// Trailing content after that document is ignored.
    ///
    /// # Errors
    ///
    /// [`JsonError::Decode`] if `text` does not start with a well-formed JSON
    /// value, [`JsonError::Vacant`] if this handle's array position no longer
    /// exists. The tree is left untouched in both cases.
    pub fn load(&self, text: &str) -> Result<()> {
        let value = codec::decode_first(text)?;
        self.store(value)
    }

    /// Decode `text`, which must be exactly one JSON document, and store it
    /// at this node.
    ///
    /// # Errors
    ///
    /// [`JsonError::Decode`] on malformed input or trailing content,
    /// [`JsonError::Vacant`] for a stale element handle; the tree is left
    /// untouched.
    pub fn load_str(&self, text: &str) -> Result<()> {
        let value = codec::decode(text)?;
        self.store(value)
    }

    /// Compact JSON text of the addressed value; empty for an empty node.
    pub fn encode(&self) -> Result<String> {
        self.read(|value| value.map_or(Ok(String::new()), codec::encode))
    }

    /// Two-space indented JSON text of the addressed value; empty for an
    /// empty node.
    pub fn encode_pretty(&self) -> Result<String> {
        self.read(|value| value.map_or(Ok(String::new()), codec::encode_pretty))
    }

    // -----------------------------------------------------------------------
    // Read-only navigation
    // -----------------------------------------------------------------------

    /// Handle on member `key`, if this node holds an object.
    ///
    /// Otherwise returns a detached empty handle: reads through it yield
    /// defaults and writes through it build a new, unrelated tree.
    pub fn get(&self, key: &str) -> Node {
        if self.kind() != Kind::Object {
            return Node::new();
        }
        self.at(Location::Slot {
            parent: self.location.path(),
            key: key.to_owned(),
        })
    }

    /// Handle on element `index`, if this node holds an array that long.
    /// Otherwise returns a detached empty handle.
    pub fn get_index(&self, index: usize) -> Node {
        if index >= self.array_len() {
            return Node::new();
        }
        self.at(Location::Element {
            array: self.location.path(),
            index,
        })
    }

    /// Snapshot of the addressed value.
    pub fn value(&self) -> Option<Value> {
        self.read(|value| value.cloned())
    }

    /// Snapshot of the addressed object; `None` for any other kind.
    pub fn map(&self) -> Option<Map> {
        self.read(|value| value.and_then(Value::as_object).cloned())
    }

    /// Snapshot of the addressed array; `None` for any other kind.
    pub fn array(&self) -> Option<Vec<Value>> {
        self.read(|value| value.and_then(Value::as_array).cloned())
    }

    pub fn array_len(&self) -> usize {
        self.read(|value| value.and_then(Value::as_array).map_or(0, Vec::len))
    }

    /// True when the node addresses nothing: no root value, a missing key, or
    /// a vanished array position. An explicit `null` is *not* empty.
    pub fn is_null(&self) -> bool {
        self.read(|value| value.is_none())
    }

    /// Alias of [`Node::is_null`].
    pub fn is_nil(&self) -> bool {
        self.is_null()
    }

    pub fn kind(&self) -> Kind {
        self.read(|value| value.map_or(Kind::Invalid, Value::kind))
    }

    // -----------------------------------------------------------------------
    // Write-oriented navigation
    // -----------------------------------------------------------------------

    /// Handle on member `key`, turning this location into an object first.
    ///
    /// An existing object is reused. Anything else (absent, `null`, a scalar,
    /// an array) is replaced with an empty object, discarding the old value.
    pub fn set(&self, key: &str) -> Node {
        self.write(|slot| {
            slot.make_object();
        });
        self.at(Location::Slot {
            parent: self.location.path(),
            key: key.to_owned(),
        })
    }

    /// Remove member `key` if this node holds an object; otherwise a no-op.
    pub fn del(&self, key: &str) {
        self.modify(|value| {
            if let Some(map) = value.as_object_mut() {
                map.shift_remove(key);
            }
        });
    }

    /// Append `null` to the array at this location and return a handle on the
    /// new element. A non-array value is replaced with an empty array first.
    pub fn add_index(&self) -> Node {
        let index = self.write(|slot| {
            let items = slot.make_array();
            items.push(Value::Null);
            items.len() - 1
        });
        match index {
            Some(index) => self.at(Location::Element {
                array: self.location.path(),
                index,
            }),
            None => Node::new(),
        }
    }

    /// Store `value` at this location.
    ///
    /// The tree takes ownership, so later changes to the caller's data cannot
    /// reach it. Through a stale element handle the value is dropped; use
    /// [`Node::try_assign`] to find out.
    pub fn assign(&self, value: impl Into<Value>) {
        let _ = self.store(value.into());
    }

    /// Like [`Node::assign`], but reports a stale element handle.
    ///
    /// # Errors
    ///
    /// [`JsonError::Vacant`] if this handle's array position no longer
    /// exists.
    pub fn try_assign(&self, value: impl Into<Value>) -> Result<()> {
        self.store(value.into())
    }

    /// Store a deep copy of any serializable value at this location.
    ///
    /// # Errors
    ///
    /// [`JsonError::Copy`] when `value` has no JSON shape (for example a map
    /// keyed by non-strings), [`JsonError::Vacant`] for a stale element
    /// handle. The tree is left untouched in both cases.
    pub fn set_any<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let copy = serde_json::to_value(value).map_err(JsonError::Copy)?;
        self.store(Value::from(copy))
    }

    // -----------------------------------------------------------------------
    // Coercions
    // -----------------------------------------------------------------------

    /// See [`Value::as_string`]; `""` for an empty node.
    pub fn as_string(&self) -> String {
        self.read(|value| value.map(Value::as_string).unwrap_or_default())
    }

    pub fn as_i64(&self) -> i64 {
        self.read(|value| value.map_or(0, Value::as_i64))
    }

    pub fn as_u64(&self) -> u64 {
        self.read(|value| value.map_or(0, Value::as_u64))
    }

    pub fn as_f64(&self) -> f64 {
        self.read(|value| value.map_or(0.0, Value::as_f64))
    }

    pub fn as_bool(&self) -> bool {
        self.read(|value| value.is_some_and(Value::as_bool))
    }

    /// See [`Value::as_time`]. An empty node reads as `""` and fails to parse.
    pub fn as_time(&self) -> Result<DateTime<FixedOffset>> {
        self.as_time_in(&chrono::Local)
    }

    pub fn as_time_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<FixedOffset>> {
        self.read(|value| match value {
            Some(value) => value.as_time_in(tz),
            None => Value::Null.as_time_in(tz),
        })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("location", &self.location)
            .field("value", &self.value())
            .finish()
    }
}

impl FromStr for Node {
    type Err = JsonError;

    fn from_str(text: &str) -> Result<Self> {
        codec::decode(text).map(Node::from_value)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::from_value(value)
    }
}

/// Follow `path` without creating anything.
fn lookup<'v>(mut value: &'v Value, path: &[Step]) -> Option<&'v Value> {
    for step in path {
        value = match step {
            Step::Key(key) => value.as_object()?.get(key.as_str())?,
            Step::Index(index) => value.as_array()?.get(*index)?,
        };
    }
    Some(value)
}

fn lookup_mut<'v>(mut value: &'v mut Value, path: &[Step]) -> Option<&'v mut Value> {
    for step in path {
        value = match step {
            Step::Key(key) => value.as_object_mut()?.get_mut(key.as_str())?,
            Step::Index(index) => value.as_array_mut()?.get_mut(*index)?,
        };
    }
    Some(value)
}

/// Follow `path`, creating objects for key steps as needed.
///
/// Index steps are never created. If any of them no longer resolves the walk
/// returns `None` before touching the tree.
fn materialize<'v>(mut value: &'v mut Value, path: &[Step]) -> Option<&'v mut Value> {
    let last_index = path.iter().rposition(|step| matches!(step, Step::Index(_)));
    if let Some(last) = last_index {
        lookup(value, &path[..=last])?;
    }
    for step in path {
        value = match step {
            Step::Key(key) => value
                .make_object()
                .entry(key.clone())
                .or_insert(Value::Null),
            Step::Index(index) => value.as_array_mut()?.get_mut(*index)?,
        };
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_path_includes_key() {
        let root = Node::new();
        let leaf = root.set("a").set("b");
        assert_eq!(
            leaf.location().path(),
            vec![Step::Key("a".into()), Step::Key("b".into())]
        );
    }

    #[test]
    fn element_path_includes_index() {
        let root = Node::new();
        let item = root.set("list").add_index();
        assert_eq!(
            *item.location(),
            Location::Element {
                array: vec![Step::Key("list".into())],
                index: 0
            }
        );
    }

    #[test]
    fn location_display() {
        let root = Node::new();
        assert_eq!(root.location().to_string(), ".");
        let item = root.set("rows").add_index().set("name");
        assert_eq!(item.location().to_string(), ".rows[0].name");
    }

    #[test]
    fn materialize_replaces_scalars_on_key_steps() {
        let mut root = Value::from("scalar");
        let slot = materialize(&mut root, &[Step::Key("a".into())]).unwrap();
        *slot = Value::Int(1);
        assert_eq!(root.as_object().unwrap()["a"], Value::Int(1));
    }

    #[test]
    fn materialize_stops_at_missing_index() {
        let mut root = Value::Array(vec![]);
        assert!(materialize(&mut root, &[Step::Index(0)]).is_none());
        assert_eq!(root, Value::Array(vec![]));
    }

    #[test]
    fn materialize_leaves_tree_alone_when_index_is_gone() {
        let mut root = Value::Object(Map::new());
        let path = [Step::Key("list".into()), Step::Index(0), Step::Key("x".into())];
        assert!(materialize(&mut root, &path).is_none());
        assert_eq!(root, Value::Object(Map::new()));
    }
}
