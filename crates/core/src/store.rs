//! Key-value store abstraction.
//!
//! The ledger reads and writes exclusively through [`Store`]. Keys are
//! slash-separated string paths namespaced by a short prefix:
//! ```text
//! d/<ticker>            deployment record
//! b/<address>/<ticker>  balance
//! s/<signature>         replay marker
//! dl/<ticker>           creation index of a deployment
//! dli/<n>               deployment key at index n
//! dc                    number of deployments
//! m/legacy              legacy migration flag
//! mr/<legacy key>       legacy record already replayed
//! ```

use crate::Hash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored value is raw bytes.
pub type Value = Vec<u8>;

/// The only side-effecting boundary of the ledger.
pub trait Store {
    /// Read the value at `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write `value` at `key`, replacing what was there.
    fn put(&mut self, key: &str, value: Value);
}

/// A single write produced by applying an operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub key: String,
    pub value: Value,
}

/// An ordered in-memory store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all key-value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys under a prefix, in key order.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.as_str())
    }

    /// Content hash of the entire store.
    ///
    /// Two replicas that applied the same ordered operations have equal hashes.
    pub fn state_hash(&self) -> Hash {
        Hash::of_entries(self.iter().map(|(k, v)| (k, v.as_slice())))
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }
}

/// A write buffer layered over a read-only base store.
///
/// Reads see buffered writes first. Nothing reaches the base store; the
/// caller either discards the overlay or flushes [`Overlay::into_mutations`].
pub struct Overlay<'a> {
    base: &'a dyn Store,
    writes: BTreeMap<String, Value>,
}

impl<'a> Overlay<'a> {
    pub fn new(base: &'a dyn Store) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// The buffered writes, in key order.
    pub fn into_mutations(self) -> Vec<Mutation> {
        self.writes
            .into_iter()
            .map(|(key, value)| Mutation { key, value })
            .collect()
    }
}

impl Store for Overlay<'_> {
    fn get(&self, key: &str) -> Option<Value> {
        match self.writes.get(key) {
            Some(v) => Some(v.clone()),
            None => self.base.get(key),
        }
    }

    fn put(&mut self, key: &str, value: Value) {
        self.writes.insert(key.to_string(), value);
    }
}
