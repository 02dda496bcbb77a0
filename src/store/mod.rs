//! # Store Gateway
//!
//! The seam between the RPC handler and the document database.
//!
//! [`DocumentStore`] knows how to connect, insert one document into a named collection
//! and disconnect. It knows nothing about events: [`insert_record`] projects any
//! [`Record`] and hands the document over, then turns the generated id into the
//! canonical hex string.
//!
//! Two implementations ship with the crate:
//! - [`MongoStore`]: a MongoDB client with a connection pool shared by all requests.
//! - [`MemoryStore`]: documents kept in process, for tests and `--in-memory` runs.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use eventhub_framework::bson::{Bson, Document};
use eventhub_framework::{project, ProjectionError, Record};
use tracing::debug;

/// Errors raised by the store gateway.
///
/// Messages may carry driver detail and are for logs only; they never reach a client.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Could not connect to the document store: {0}")]
    Connection(String),
    #[error("Document store did not answer the liveness probe: {0}")]
    Liveness(String),
    #[error("Document store is not connected")]
    NotConnected,
    #[error("Insert into '{collection}' failed: {reason}")]
    Insert { collection: String, reason: String },
    #[error("Document store returned a non-ObjectId identifier: {0}")]
    UnexpectedId(String),
    #[error("Could not disconnect from the document store: {0}")]
    Disconnect(String),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// A database that stores documents in named collections.
///
/// Implementations are shared across every in-flight request and must be safe for
/// concurrent use.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Opens the connection pool and verifies the server answers.
    async fn connect(&self) -> Result<(), StoreError>;

    /// Inserts one document and returns the identifier the store generated.
    async fn insert(&self, collection: &str, document: Document) -> Result<Bson, StoreError>;

    /// Releases the connection pool.
    async fn disconnect(&self) -> Result<(), StoreError>;
}

/// Persists a record and returns its new identifier as 24 lowercase hex characters.
///
/// The record itself is not modified; callers assign the returned id.
pub async fn insert_record<S, R>(store: &S, record: &R) -> Result<String, StoreError>
where
    S: DocumentStore + ?Sized,
    R: Record,
{
    let document = project(record)?;
    debug!(collection = R::COLLECTION, fields = document.len(), "Projected record");

    match store.insert(R::COLLECTION, document).await? {
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        other => Err(StoreError::UnexpectedId(format!("{:?}", other.element_type()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Event;
    use eventhub_framework::bson::doc;

    #[tokio::test]
    async fn insert_record_returns_hex_id() {
        let store = MemoryStore::new();
        store.connect().await.unwrap();

        let id = insert_record(&store, &Event::new("Launch", "", "t")).await.unwrap();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let stored = store.documents("eventhub");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].get_object_id("_id").unwrap().to_hex(), id);
    }

    #[tokio::test]
    async fn insert_record_sends_projected_document() {
        let store = MemoryStore::new();
        store.connect().await.unwrap();

        let mut event = Event::new("Launch", "Product launch", "t");
        event.id = "caller-chosen".into();
        insert_record(&store, &event).await.unwrap();

        let mut stored = store.documents("eventhub").remove(0);
        stored.remove("_id");
        assert_eq!(
            stored,
            doc! { "name": "Launch", "description": "Product launch", "timestamp": "t" }
        );
    }

    #[tokio::test]
    async fn non_object_id_is_rejected() {
        let store = MemoryStore::new().with_integer_ids();
        store.connect().await.unwrap();

        let err = insert_record(&store, &Event::new("a", "b", "c")).await.unwrap_err();
        assert!(matches!(err, StoreError::UnexpectedId(_)));
    }

    #[tokio::test]
    async fn insert_before_connect_fails() {
        let store = MemoryStore::new();
        let err = insert_record(&store, &Event::new("a", "b", "c")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotConnected));
        assert_eq!(store.len(), 0);
    }
}
