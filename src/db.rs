//! In-memory document collections.
//!
//! Each collection keeps its documents keyed by `_id` together with a
//! monotonically increasing insertion sequence. The sequence plays the role
//! of a database's natural `_id` ordering: listing a collection returns
//! documents oldest first, and the catalog's default sort walks it backwards.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::{mapref::entry::Entry, DashMap};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),
}

/// A value stored in a [`Collection`].
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Generates a fresh document identifier.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Clone)]
struct Record<T> {
    seq: u64,
    doc: T,
}

pub struct Collection<T: Document> {
    /// DashMap allows concurrent readers and single-document writers
    /// without an outer lock.
    docs: DashMap<String, Record<T>>,
    next_seq: AtomicU64,

    /// Unique secondary key (e.g. a lowercased email) to owning document id.
    /// A key is claimed here before the document is written, so two writers
    /// racing for the same key cannot both succeed.
    unique: DashMap<String, String>,
    unique_key: Option<fn(&T) -> String>,
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> Collection<T> {
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            next_seq: AtomicU64::new(0),
            unique: DashMap::new(),
            unique_key: None,
        }
    }

    /// A collection in which no two documents may share `key(doc)`.
    pub fn with_unique_key(key: fn(&T) -> String) -> Self {
        Self {
            unique_key: Some(key),
            ..Self::new()
        }
    }

    /// Inserts a new document. Fails if the id or the unique key is taken.
    pub fn insert(&self, doc: T) -> Result<T, StoreError> {
        let id = doc.id().to_string();

        let key = self.unique_key.map(|key| key(&doc));
        if let Some(key) = &key {
            match self.unique.entry(key.clone()) {
                Entry::Occupied(_) => return Err(StoreError::Duplicate(key.clone())),
                Entry::Vacant(slot) => {
                    slot.insert(id.clone());
                }
            }
        }

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        match self.docs.entry(id.clone()) {
            Entry::Occupied(_) => {
                if let Some(key) = &key {
                    self.unique.remove(key);
                }
                Err(StoreError::Duplicate(id))
            }
            Entry::Vacant(slot) => {
                slot.insert(Record {
                    seq,
                    doc: doc.clone(),
                });
                Ok(doc)
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.docs.get(id).map(|r| r.doc.clone())
    }

    /// Looks a document up by its unique key.
    pub fn get_by_key(&self, key: &str) -> Option<T> {
        let id = self.unique.get(key)?.value().clone();
        self.get(&id)
    }

    /// Replaces an existing document, keeping its insertion position.
    /// Returns `Ok(None)` when no document with that id exists, and
    /// `Duplicate` when the new unique key belongs to another document.
    pub fn replace(&self, doc: T) -> Result<Option<T>, StoreError> {
        let id = doc.id().to_string();

        let claimed = match self.unique_key.map(|key| key(&doc)) {
            Some(key) => match self.unique.entry(key.clone()) {
                Entry::Occupied(owner) if *owner.get() != id => {
                    return Err(StoreError::Duplicate(key))
                }
                Entry::Occupied(_) => None,
                Entry::Vacant(slot) => {
                    slot.insert(id.clone());
                    Some(key)
                }
            },
            None => None,
        };

        let Some(mut record) = self.docs.get_mut(&id) else {
            if let Some(key) = claimed {
                self.unique.remove(&key);
            }
            return Ok(None);
        };
        let previous = std::mem::replace(&mut record.doc, doc.clone());
        drop(record);

        // The key changed: release the old one.
        if claimed.is_some() {
            if let Some(old) = self.unique_key.map(|key| key(&previous)) {
                self.unique.remove_if(&old, |_, owner| *owner == id);
            }
        }
        Ok(Some(doc))
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        let (_, record) = self.docs.remove(id)?;
        if let Some(key) = self.unique_key.map(|key| key(&record.doc)) {
            self.unique.remove_if(&key, |_, owner| owner == id);
        }
        Some(record.doc)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// All documents in insertion order.
    pub fn all(&self) -> Vec<T> {
        let mut records: Vec<(u64, T)> = self
            .docs
            .iter()
            .map(|r| (r.seq, r.doc.clone()))
            .collect();
        records.sort_by_key(|(seq, _)| *seq);
        records.into_iter().map(|(_, doc)| doc).collect()
    }

    /// Documents matching `pred`, in insertion order.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.all().into_iter().filter(|d| pred(d)).collect()
    }
}
