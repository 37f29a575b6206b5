use async_trait::async_trait;

use crate::firebase::{DocumentRef, FirebaseError, FirestoreClient};

/// The two document-store calls a cleanup run needs.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document currently in `collection`.
    async fn list(&self, collection: &str, page_size: u32)
        -> Result<Vec<DocumentRef>, FirebaseError>;
    /// Delete one document; a document that is already gone is not an error.
    async fn delete(&self, doc: &DocumentRef) -> Result<(), FirebaseError>;
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list(
        &self,
        collection: &str,
        page_size: u32,
    ) -> Result<Vec<DocumentRef>, FirebaseError> {
        self.list_documents(collection, page_size).await
    }

    async fn delete(&self, doc: &DocumentRef) -> Result<(), FirebaseError> {
        self.delete_document(&doc.collection, &doc.id).await
    }
}
