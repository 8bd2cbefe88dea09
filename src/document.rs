//! Navigation layer over parsed Travis v3 response bodies.
//!
//! The v3 API is hypermedia-shaped: every entity may carry an `@href` link
//! back to its canonical resource, and collections carry a `@pagination`
//! block. Rather than modeling each resource's schema, the client wraps the
//! parsed JSON in a [`Document`] that re-wraps nested containers on the way
//! out, so navigation composes and any reachable entity can be followed
//! through the client that produced it.

use std::fmt;

use serde_json::Value;

use crate::client::TravisClient;
use crate::error::{Result, TravisError};
use crate::response::ApiResponse;

/// JSON field marking a node as resolvable to a fuller resource.
pub(crate) const HREF_KEY: &str = "@href";

/// A key-or-index selector into a [`Document`].
///
/// Built implicitly from strings and integers, so navigation reads as
/// `doc.get("builds")` or `doc.get(-1)`. Negative indices count from the
/// end of a list (`-1` is the last element).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// String key into an object-shaped node.
    Key(String),
    /// Integer index into a list-shaped node.
    Index(i64),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<i64> for Segment {
    fn from(index: i64) -> Self {
        Segment::Index(index)
    }
}

impl From<i32> for Segment {
    fn from(index: i32) -> Self {
        Segment::Index(i64::from(index))
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index as i64)
    }
}

/// The result of extracting a value from a [`Document`].
///
/// Containers come back re-wrapped and bound to the same client; scalars
/// come back as raw JSON values; a missing key or out-of-range index is the
/// explicit [`Item::Absent`] marker, never an error. `false`, `0` and `""`
/// are ordinary present scalars.
#[derive(Clone)]
pub enum Item {
    /// An object- or list-shaped value, re-wrapped for further navigation.
    Document(Document),
    /// A raw scalar value (string, number, boolean or null).
    Scalar(Value),
    /// The key or index was not present.
    Absent,
}

impl Item {
    /// Returns true for the absent marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, Item::Absent)
    }

    /// Returns true for a re-wrapped container.
    pub fn is_document(&self) -> bool {
        matches!(self, Item::Document(_))
    }

    /// Returns true for a raw scalar.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Item::Scalar(_))
    }

    /// Borrow the wrapped document, if this is a container.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Item::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Consume into the wrapped document, if this is a container.
    pub fn into_document(self) -> Option<Document> {
        match self {
            Item::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Borrow the underlying JSON value, scalar or container.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Document(doc) => Some(doc.value()),
            Item::Scalar(value) => Some(value),
            Item::Absent => None,
        }
    }

    /// The scalar as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Item::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    /// The scalar as an i64, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Item::Scalar(value) => value.as_i64(),
            _ => None,
        }
    }

    /// The scalar as a u64, if it is one.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Item::Scalar(value) => value.as_u64(),
            _ => None,
        }
    }

    /// The scalar as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Item::Scalar(value) => value.as_bool(),
            _ => None,
        }
    }

    /// Navigate one step deeper. Anything but a container yields `Absent`.
    pub fn get(&self, segment: impl Into<Segment>) -> Item {
        match self {
            Item::Document(doc) => doc.get(segment),
            _ => Item::Absent,
        }
    }

    /// First element of a wrapped list; `Absent` otherwise.
    pub fn first(&self) -> Item {
        self.get(0)
    }

    /// Last element of a wrapped list; `Absent` otherwise.
    pub fn last(&self) -> Item {
        self.get(-1)
    }

    /// Follow this item's `@href` link.
    ///
    /// # Errors
    ///
    /// [`TravisError::NotFollowable`] when the item is a scalar, absent, or
    /// an object without a link; [`TravisError::IndexRequired`] when it is
    /// list-shaped.
    pub async fn follow(&self) -> Result<ApiResponse> {
        match self {
            Item::Document(doc) => doc.follow().await,
            _ => Err(TravisError::NotFollowable),
        }
    }

    /// Select `index` from a wrapped list and follow the element's link.
    pub async fn follow_entry(&self, index: i64) -> Result<ApiResponse> {
        match self {
            Item::Document(doc) => doc.follow_entry(index).await,
            _ => Err(TravisError::NotFollowable),
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Document(doc) => f.debug_tuple("Document").field(doc.value()).finish(),
            Item::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Item::Absent => f.write_str("Absent"),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Absent, Item::Absent) => true,
            _ => match (self.as_value(), other.as_value()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl PartialEq<Value> for Item {
    fn eq(&self, other: &Value) -> bool {
        self.as_value() == Some(other)
    }
}

/// A navigable view over one parsed JSON node.
///
/// Holds a clone of the owning [`TravisClient`] so that `@href` links can be
/// resolved with the context's base URL, headers and query options. Every
/// container extracted from a document comes back as a fresh document bound
/// to the same client; documents are never mutated after construction, so
/// concurrent reads are safe.
#[derive(Clone)]
pub struct Document {
    client: TravisClient,
    value: Value,
}

impl Document {
    pub(crate) fn new(client: TravisClient, value: Value) -> Self {
        Self { client, value }
    }

    /// The underlying JSON node.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns true if the node is object-shaped.
    pub fn is_object(&self) -> bool {
        self.value.is_object()
    }

    /// Returns true if the node is list-shaped.
    pub fn is_list(&self) -> bool {
        self.value.is_array()
    }

    /// Extract by key or index.
    ///
    /// Containers are re-wrapped, scalars returned raw, misses yield
    /// [`Item::Absent`]. A key applied to a list, or an index applied to an
    /// object, is a miss.
    pub fn get(&self, segment: impl Into<Segment>) -> Item {
        match self.lookup(&segment.into()) {
            Some(value) => self.wrap(value.clone()),
            None => Item::Absent,
        }
    }

    /// Extract by key or index, treating a miss as an error.
    ///
    /// # Errors
    ///
    /// [`TravisError::KeyNotFound`] for a missing object key,
    /// [`TravisError::IndexOutOfRange`] for a bad list index.
    pub fn fetch(&self, segment: impl Into<Segment>) -> Result<Item> {
        let segment = segment.into();
        match self.lookup(&segment) {
            Some(value) => Ok(self.wrap(value.clone())),
            None => Err(self.miss(&segment)),
        }
    }

    /// Extract by key or index, producing a default lazily on a miss.
    ///
    /// The closure runs only when the segment is absent; its result is
    /// re-wrapped if it is itself a container.
    pub fn fetch_or(&self, segment: impl Into<Segment>, default: impl FnOnce() -> Value) -> Item {
        match self.lookup(&segment.into()) {
            Some(value) => self.wrap(value.clone()),
            None => self.wrap(default()),
        }
    }

    /// Descend along a path of keys/indices.
    ///
    /// Descends while each step yields a container; the first step that
    /// yields a scalar returns it immediately and the remaining path is
    /// unused; a miss at any step yields [`Item::Absent`]. A single-segment
    /// path behaves exactly like [`get`](Self::get).
    pub fn dig<I>(&self, path: I) -> Item
    where
        I: IntoIterator,
        I::Item: Into<Segment>,
    {
        let mut current = &self.value;
        for segment in path {
            match lookup_in(current, &segment.into()) {
                Some(value) if value.is_object() || value.is_array() => current = value,
                Some(value) => return Item::Scalar(value.clone()),
                None => return Item::Absent,
            }
        }
        self.wrap(current.clone())
    }

    /// Iterate an object-shaped node's `(key, value)` pairs.
    ///
    /// Values are the raw JSON nodes, deliberately not re-wrapped: object
    /// iteration exposes attributes, list iteration exposes navigable
    /// children. Empty on list-shaped nodes.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.value.as_object().into_iter().flatten()
    }

    /// Iterate a list-shaped node's elements, each wrapped as a fresh
    /// document bound to the same client. Empty on object-shaped nodes.
    pub fn items(&self) -> Vec<Document> {
        self.value
            .as_array()
            .into_iter()
            .flatten()
            .map(|element| Document::new(self.client.clone(), element.clone()))
            .collect()
    }

    /// First element of a list-shaped node; always `Absent` on objects.
    pub fn first(&self) -> Item {
        self.get(0)
    }

    /// Last element of a list-shaped node; always `Absent` on objects.
    pub fn last(&self) -> Item {
        self.get(-1)
    }

    /// Resolve this node's `@href` link and fetch the full resource.
    ///
    /// Issues a GET through the owning client at the base URL joined with
    /// the href, carrying the client's current query options.
    ///
    /// # Errors
    ///
    /// [`TravisError::NotFollowable`] when the node is object-shaped with no
    /// `@href` (or the link is not a string); [`TravisError::IndexRequired`]
    /// when the node is list-shaped — select an element with
    /// [`follow_entry`](Self::follow_entry) instead.
    pub async fn follow(&self) -> Result<ApiResponse> {
        if self.is_list() {
            return Err(TravisError::IndexRequired);
        }
        let href = match self.value.get(HREF_KEY).and_then(Value::as_str) {
            Some(href) => href.to_string(),
            None => return Err(TravisError::NotFollowable),
        };
        self.client.get(&href).await
    }

    /// Select `index` from a list-shaped node and follow that element.
    ///
    /// Equivalent to `fetch(index)` then `follow()`: the index must be in
    /// range and the element must itself carry an `@href`.
    pub async fn follow_entry(&self, index: i64) -> Result<ApiResponse> {
        match self.fetch(index)? {
            Item::Document(doc) => doc.follow().await,
            _ => Err(TravisError::NotFollowable),
        }
    }

    /// Number of entries (object) or elements (list); 0 for scalars.
    pub fn len(&self) -> usize {
        match &self.value {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    /// Returns true when the node has no entries or elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of an object-shaped node; empty on lists.
    pub fn keys(&self) -> Vec<&str> {
        self.value
            .as_object()
            .into_iter()
            .flatten()
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Raw attribute values of an object-shaped node; empty on lists.
    pub fn values(&self) -> Vec<&Value> {
        self.value
            .as_object()
            .into_iter()
            .flatten()
            .map(|(_, v)| v)
            .collect()
    }

    /// Key-existence test; always false on list-shaped nodes.
    pub fn contains_key(&self, key: &str) -> bool {
        self.value
            .as_object()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    fn lookup(&self, segment: &Segment) -> Option<&Value> {
        lookup_in(&self.value, segment)
    }

    fn wrap(&self, value: Value) -> Item {
        if value.is_object() || value.is_array() {
            Item::Document(Document::new(self.client.clone(), value))
        } else {
            Item::Scalar(value)
        }
    }

    fn miss(&self, segment: &Segment) -> TravisError {
        match segment {
            Segment::Key(key) => TravisError::KeyNotFound { key: key.clone() },
            Segment::Index(index) => TravisError::IndexOutOfRange {
                index: *index,
                len: self.value.as_array().map(Vec::len).unwrap_or(0),
            },
        }
    }
}

fn lookup_in<'v>(value: &'v Value, segment: &Segment) -> Option<&'v Value> {
    match (value, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key),
        (Value::Array(items), Segment::Index(index)) => {
            normalize_index(*index, items.len()).and_then(|i| items.get(i))
        }
        _ => None,
    }
}

/// Resolve a possibly-negative index against a list length.
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        let index = index as usize;
        (index < len).then_some(index)
    } else {
        let from_end = index.checked_add(len as i64)?;
        (from_end >= 0).then_some(from_end as usize)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document").field("value", &self.value).finish()
    }
}

impl PartialEq for Document {
    /// Structural equality over the wrapped value; the owning client is
    /// ignored so repeated extractions compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
