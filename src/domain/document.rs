//! Document aggregate: ownership, collaborator membership, and content.
//!
//! The access predicate lives here so read and write paths cannot drift:
//! every operation asks [`Document::can_access`] rather than re-deriving
//! owner/collaborator checks inline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Title assigned when a document is created without one.
pub const DEFAULT_TITLE: &str = "Untitled Document";

/// Stable document identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a new random [`DocumentId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-validated UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collaborative document.
///
/// ## Invariants
/// - Exactly one owner, set at creation and immutable thereafter.
/// - `collaborators` holds no duplicates and never the owner; insertion
///   order is preserved.
/// - `updated_at` never moves backwards across accepted mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: DocumentId,
    title: String,
    content: String,
    owner: UserId,
    collaborators: Vec<UserId>,
    updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a fresh document owned by `owner` with empty content.
    ///
    /// A missing or blank title falls back to [`DEFAULT_TITLE`].
    pub fn create(owner: UserId, title: Option<String>, now: DateTime<Utc>) -> Self {
        let title = title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());
        Self {
            id: DocumentId::random(),
            title,
            content: String::new(),
            owner,
            collaborators: Vec::new(),
            updated_at: now,
        }
    }

    /// Rehydrate a document from persisted parts.
    ///
    /// The collaborator list is de-duplicated and stripped of the owner so
    /// rows written by older code cannot violate the aggregate invariants.
    pub fn from_parts(
        id: DocumentId,
        title: String,
        content: String,
        owner: UserId,
        collaborators: Vec<UserId>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut document = Self {
            id,
            title,
            content,
            owner,
            collaborators: Vec::with_capacity(collaborators.len()),
            updated_at,
        };
        for collaborator in collaborators {
            document.add_collaborator(collaborator);
        }
        document
    }

    /// Stable document identifier.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current content payload.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The user who created the document.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Collaborators in insertion order.
    pub fn collaborators(&self) -> &[UserId] {
        &self.collaborators
    }

    /// Timestamp of the last accepted content mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` created this document.
    pub fn is_owner(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Whether `user` has been granted collaborator access.
    pub fn is_collaborator(&self, user: &UserId) -> bool {
        self.collaborators.contains(user)
    }

    /// Shared access predicate: owner or collaborator may read and write.
    pub fn can_access(&self, user: &UserId) -> bool {
        self.is_owner(user) || self.is_collaborator(user)
    }

    /// Idempotently grant collaborator access to `user`.
    ///
    /// Returns `true` when membership changed. Re-adding an existing
    /// collaborator or the owner is a no-op, never an error.
    pub fn add_collaborator(&mut self, user: UserId) -> bool {
        if self.is_owner(&user) || self.is_collaborator(&user) {
            return false;
        }
        self.collaborators.push(user);
        true
    }

    /// Replace the content in full and advance `updated_at`.
    ///
    /// Last-write-wins: no merging or conflict detection happens here.
    /// A stale clock cannot move `updated_at` backwards.
    pub fn replace_content(&mut self, content: String, now: DateTime<Utc>) {
        self.content = content;
        self.updated_at = self.updated_at.max(now);
    }
}
