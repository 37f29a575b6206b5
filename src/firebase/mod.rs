//! REST clients for the Firebase services this app uses.
//!
//! [`FirebaseApp`] is the single entry point: it validates the project
//! configuration once and hands out the auth, document store and blob store
//! handles, all bound to the same project.

pub mod app;
pub mod auth;
pub mod error;
pub mod firestore;
pub mod storage;

pub use app::FirebaseApp;
pub use auth::{AuthClient, AuthUser};
pub use error::FirebaseError;
pub use firestore::{Document, DocumentRef, FirestoreClient};
pub use storage::{ObjectListing, ObjectMetadata, ObjectRef, StorageClient};
