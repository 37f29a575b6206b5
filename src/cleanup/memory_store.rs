use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::DocumentStore;
use crate::firebase::{DocumentRef, FirebaseError};

/// A process-local document store for exercising cleanup runs in unit tests.
///
/// Failures can be injected per document id or for the listing call.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeSet<String>>>,
    failing_ids: Mutex<HashSet<String>>,
    failing_list: AtomicBool,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &str, id: &str) {
        self.collections
            .lock()
            .expect("memory store mutex poisoned")
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string());
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .expect("memory store mutex poisoned")
            .get(collection)
            .map_or(0, BTreeSet::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Number of delete calls received so far, failed ones included.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Makes every delete of `id` fail with a server error.
    pub fn fail_deletes_of(&self, id: &str) {
        self.failing_ids
            .lock()
            .expect("memory store mutex poisoned")
            .insert(id.to_string());
    }

    /// Makes the listing call fail.
    pub fn fail_listing(&self) {
        self.failing_list.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(
        &self,
        collection: &str,
        _page_size: u32,
    ) -> Result<Vec<DocumentRef>, FirebaseError> {
        if self.failing_list.load(Ordering::SeqCst) {
            return Err(FirebaseError::Api {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "listing unavailable".to_string(),
            });
        }
        let collections = self.collections.lock().expect("memory store mutex poisoned");
        Ok(collections
            .get(collection)
            .into_iter()
            .flatten()
            .map(|id| DocumentRef {
                collection: collection.to_string(),
                id: id.clone(),
            })
            .collect())
    }

    async fn delete(&self, doc: &DocumentRef) -> Result<(), FirebaseError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self
            .failing_ids
            .lock()
            .expect("memory store mutex poisoned")
            .contains(&doc.id)
        {
            return Err(FirebaseError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("could not delete {}", doc.id),
            });
        }
        if let Some(ids) = self
            .collections
            .lock()
            .expect("memory store mutex poisoned")
            .get_mut(&doc.collection)
        {
            ids.remove(&doc.id);
        }
        Ok(())
    }
}
