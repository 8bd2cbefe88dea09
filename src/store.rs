//! Ordered key-value stores for query options and request headers.
//!
//! The Travis v3 API is driven by an open-ended set of query parameters
//! (`limit`, `offset`, `sort_by`, ...) and a small set of headers, so the
//! client keeps both in an order-preserving bag rather than typed structs.

use std::fmt;

use url::form_urlencoded;

/// An ordered key-value bag.
///
/// Keys keep their first-appearance position; setting an existing key
/// replaces its value in place. Used for both the query-option store and
/// the header store of a [`TravisClient`](crate::TravisClient).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    pairs: Vec<(String, String)>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key.
    ///
    /// An existing key keeps its position and gets the new value; a new
    /// key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Look up a key's value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a key, returning its previous value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(pos).1)
    }

    /// Returns true if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Merge another store into this one.
    ///
    /// On key collision the incoming store wins; colliding keys keep this
    /// store's position, new keys are appended in the incoming order.
    pub fn merge(&mut self, other: &Store) {
        for (k, v) in &other.pairs {
            self.set(k.clone(), v.clone());
        }
    }

    /// Render as a query string (`?k=v&k2=v2`), or an empty string when
    /// the store is empty. Keys and values are form-urlencoded.
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        format!("?{encoded}")
    }

    /// Iterate the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Store {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Store::new();
        for (k, v) in iter {
            store.set(k, v);
        }
        store
    }
}
