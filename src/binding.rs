//! In-memory mirror of one collection.
//!
//! Every write is followed by a full reload, so the mirror always reflects
//! what the store actually holds rather than an optimistic guess. Failures are
//! never propagated: they land in `error()` and the call reports `false`.

use std::sync::Arc;

use tracing::warn;

use crate::store::{Database, Record, StorageError};

pub struct CollectionBinding<T: Record> {
    store: Arc<Database>,
    collection: String,
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T: Record> CollectionBinding<T> {
    /// Create a binding without touching the store. The mirror starts empty
    /// and in the loading state until the first `load`.
    pub fn new(store: Arc<Database>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            items: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// Create a binding and load it immediately.
    pub fn open(store: Arc<Database>, collection: impl Into<String>) -> Self {
        let mut binding = Self::new(store, collection);
        binding.load();
        binding
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the mirror with every row in the collection. On failure the
    /// previous mirror is kept.
    pub fn load(&mut self) -> bool {
        self.loading = true;
        self.error = None;
        let result = self.store.get_all::<T>(&self.collection);
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                true
            }
            Err(err) => {
                self.record_failure("load", err);
                false
            }
        }
    }

    pub fn save(&mut self, item: &T) -> bool {
        self.error = None;
        match self.store.put(&self.collection, item) {
            Ok(_) => {
                self.load();
                true
            }
            Err(err) => {
                self.record_failure("save", err);
                false
            }
        }
    }

    /// Read one row straight from the store. The mirror is left alone.
    pub fn get(&mut self, id: &str) -> Option<T> {
        self.error = None;
        match self.store.get_by_id(&self.collection, id) {
            Ok(found) => found,
            Err(err) => {
                self.record_failure("get", err);
                None
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.error = None;
        match self.store.remove(&self.collection, id) {
            Ok(()) => {
                self.load();
                true
            }
            Err(err) => {
                self.record_failure("delete", err);
                false
            }
        }
    }

    fn record_failure(&mut self, op: &'static str, err: StorageError) {
        warn!(collection = %self.collection, op, error = %err, "collection operation failed");
        self.error = Some(err.to_string());
    }
}
