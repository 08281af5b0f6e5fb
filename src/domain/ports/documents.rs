//! Driving ports for the document use-cases.
//!
//! HTTP handlers depend on these traits rather than the concrete service so
//! handler tests can substitute doubles. Reads and writes are split: the
//! query port never mutates, the command port always re-fetches before it
//! mutates, and notification delivery stands alone because it neither reads
//! nor grants access.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Document, DocumentId, EmailAddress, Error, UserId};

/// Read-side use-cases over documents.
#[async_trait]
pub trait DocumentsQuery: Send + Sync {
    /// Every document `user` owns or collaborates on, most recently
    /// updated first.
    async fn list_documents(&self, user: &UserId) -> Result<Vec<Document>, Error>;

    /// Fetch a single document `user` may access.
    async fn get_document(&self, user: &UserId, id: DocumentId) -> Result<Document, Error>;
}

/// Write-side use-cases over documents.
#[async_trait]
pub trait DocumentsCommand: Send + Sync {
    /// Create an empty document owned by `owner`.
    async fn create_document(
        &self,
        owner: &UserId,
        title: Option<String>,
    ) -> Result<Document, Error>;

    /// Replace the content of a document `user` may access.
    async fn update_content(
        &self,
        user: &UserId,
        id: DocumentId,
        content: String,
    ) -> Result<Document, Error>;

    /// Grant collaborator access to the user registered under `email`.
    ///
    /// Only the owner may share. Sharing with an existing collaborator or
    /// with the owner is a no-op.
    async fn share_with_user(
        &self,
        owner: &UserId,
        id: DocumentId,
        email: &EmailAddress,
    ) -> Result<Document, Error>;
}

/// Out-of-band share notification use-case.
///
/// Deliberately grants nothing: it only tells `recipient` a document was
/// shared with them. Access changes go through
/// [`DocumentsCommand::share_with_user`].
#[async_trait]
pub trait ShareNotification: Send + Sync {
    /// Send a share notification for document `id` to `recipient`.
    async fn notify_share(&self, id: DocumentId, recipient: &EmailAddress) -> Result<(), Error>;
}

/// Fixture implementation backing wiring tests without real storage.
///
/// Queries find nothing, creation succeeds in memory only, and
/// notifications are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocuments;

#[async_trait]
impl DocumentsQuery for FixtureDocuments {
    async fn list_documents(&self, _user: &UserId) -> Result<Vec<Document>, Error> {
        Ok(Vec::new())
    }

    async fn get_document(&self, _user: &UserId, id: DocumentId) -> Result<Document, Error> {
        Err(Error::not_found(format!("document {id} does not exist")))
    }
}

#[async_trait]
impl DocumentsCommand for FixtureDocuments {
    async fn create_document(
        &self,
        owner: &UserId,
        title: Option<String>,
    ) -> Result<Document, Error> {
        Ok(Document::create(*owner, title, Utc::now()))
    }

    async fn update_content(
        &self,
        _user: &UserId,
        id: DocumentId,
        _content: String,
    ) -> Result<Document, Error> {
        Err(Error::not_found(format!("document {id} does not exist")))
    }

    async fn share_with_user(
        &self,
        _owner: &UserId,
        id: DocumentId,
        _email: &EmailAddress,
    ) -> Result<Document, Error> {
        Err(Error::not_found(format!("document {id} does not exist")))
    }
}

#[async_trait]
impl ShareNotification for FixtureDocuments {
    async fn notify_share(&self, _id: DocumentId, _recipient: &EmailAddress) -> Result<(), Error> {
        Ok(())
    }
}
