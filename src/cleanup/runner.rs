use std::sync::Arc;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use super::DocumentStore;
use crate::config::CleanupConfig;
use crate::firebase::{DocumentRef, FirebaseError};

/// The listing phase failed; no delete was issued.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("could not list collection '{collection}': {source}")]
    Enumerate {
        collection: String,
        #[source]
        source: FirebaseError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of one cleanup run.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupReport {
    pub collection: String,
    /// Documents present when the collection was listed.
    pub found: usize,
    pub deleted: usize,
    pub failures: Vec<DeleteFailure>,
}

impl CleanupReport {
    /// True when every listed document was deleted.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.deleted == self.found
    }
}

/// Deletes every document of one collection.
pub struct Cleanup {
    store: Arc<dyn DocumentStore>,
    config: CleanupConfig,
}

impl Cleanup {
    pub fn new(store: Arc<dyn DocumentStore>, config: CleanupConfig) -> Self {
        Self { store, config }
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Phase one: the documents present right now.
    pub async fn enumerate(&self) -> Result<Vec<DocumentRef>, CleanupError> {
        self.store
            .list(&self.config.collection, self.config.page_size)
            .await
            .map_err(|source| CleanupError::Enumerate {
                collection: self.config.collection.clone(),
                source,
            })
    }

    /// Phase two: one delete per document, all in flight together unless
    /// `max_concurrent_deletes` caps them. Returns one result per document.
    pub async fn delete_each<'a>(
        &self,
        docs: &'a [DocumentRef],
    ) -> Vec<(&'a DocumentRef, Result<(), FirebaseError>)> {
        let deletes = docs.iter().map(|doc| {
            let store = self.store.clone();
            async move { (doc, store.delete(doc).await) }
        });

        match self.config.max_concurrent_deletes {
            Some(limit) if limit > 0 => stream::iter(deletes).buffer_unordered(limit).collect().await,
            _ => join_all(deletes).await,
        }
    }

    /// Enumerates, then deletes everything that was listed.
    pub async fn run(&self) -> Result<CleanupReport, CleanupError> {
        let collection = self.config.collection.clone();
        info!(collection = collection.as_str(), "starting cleanup");

        let docs = self.enumerate().await.inspect_err(|e| {
            error!(collection = collection.as_str(), "cleanup aborted: {}", e);
        })?;
        info!(
            collection = collection.as_str(),
            found = docs.len(),
            "enumerated documents"
        );

        if docs.is_empty() {
            info!(collection = collection.as_str(), "collection already empty");
            return Ok(CleanupReport {
                collection,
                found: 0,
                deleted: 0,
                failures: Vec::new(),
            });
        }

        let mut deleted = 0;
        let mut failures = Vec::new();
        for (doc, result) in self.delete_each(&docs).await {
            match result {
                Ok(()) => deleted += 1,
                Err(e) => {
                    warn!(
                        collection = collection.as_str(),
                        id = doc.id.as_str(),
                        "delete failed: {}",
                        e
                    );
                    failures.push(DeleteFailure {
                        id: doc.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        failures.sort_by(|a, b| a.id.cmp(&b.id));

        let report = CleanupReport {
            collection,
            found: docs.len(),
            deleted,
            failures,
        };
        info!(
            collection = report.collection.as_str(),
            found = report.found,
            deleted = report.deleted,
            failed = report.failures.len(),
            "cleanup finished"
        );
        Ok(report)
    }
}
