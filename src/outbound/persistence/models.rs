//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{document_collaborators, documents, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub owner_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new document records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub owner_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating existing document records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = documents)]
pub(crate) struct DocumentUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading collaborator grants.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = document_collaborators)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CollaboratorRow {
    pub document_id: Uuid,
    pub user_id: Uuid,
    #[expect(dead_code, reason = "only read for ordering in queries")]
    pub added_at: DateTime<Utc>,
}

/// Insertable struct for recording a collaborator grant.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = document_collaborators)]
pub(crate) struct NewCollaboratorRow {
    pub document_id: Uuid,
    pub user_id: Uuid,
}
