//! Driven port for document persistence.
//!
//! Adapters provide durable keyed storage for [`Document`] aggregates. The
//! service treats collaborator addition as read-modify-write: it fetches the
//! document immediately before mutating, so adapters only need to persist
//! whole aggregates, not individual set operations.

use async_trait::async_trait;

use crate::domain::{Document, DocumentId, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by document repository adapters.
    pub enum DocumentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "document repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "document repository query failed: {message}",
    }
}

/// Port for document storage and retrieval.
///
/// `update` must persist the full aggregate state: content, title,
/// `updated_at`, and any collaborators added since the last write.
/// Collaborator rows are only ever added (there is no unshare operation),
/// so adapters may treat membership writes as insert-if-absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Fetch a document by id. Returns `None` when it does not exist.
    async fn find_by_id(
        &self,
        id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Every document `user` owns or collaborates on, ordered by
    /// `updated_at` descending.
    async fn find_accessible(
        &self,
        user: &UserId,
    ) -> Result<Vec<Document>, DocumentRepositoryError>;

    /// Persist a newly created document.
    async fn insert(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    /// Persist mutations to an existing document.
    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError>;
}

/// Fixture implementation for wiring tests without a real database.
///
/// Lookups return nothing and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentRepository;

#[async_trait]
impl DocumentRepository for FixtureDocumentRepository {
    async fn find_by_id(
        &self,
        _id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(None)
    }

    async fn find_accessible(
        &self,
        _user: &UserId,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _document: &Document) -> Result<(), DocumentRepositoryError> {
        Ok(())
    }

    async fn update(&self, _document: &Document) -> Result<(), DocumentRepositoryError> {
        Ok(())
    }
}
