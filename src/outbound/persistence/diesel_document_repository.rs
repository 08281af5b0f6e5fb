//! PostgreSQL-backed `DocumentRepository` implementation using Diesel.
//!
//! Documents persist across two tables: the aggregate row and one
//! `document_collaborators` row per grant. Grants are insert-only (there is
//! no unshare), so updates reconcile membership with
//! `ON CONFLICT DO NOTHING` rather than deleting rows.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{DocumentRepository, DocumentRepositoryError};
use crate::domain::{Document, DocumentId, UserId};

use super::models::{CollaboratorRow, DocumentRow, DocumentUpdate, NewCollaboratorRow, NewDocumentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{document_collaborators, documents};

/// Diesel-backed implementation of the `DocumentRepository` port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentRepositoryError {
    DocumentRepositoryError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> DocumentRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DocumentRepositoryError::connection("database connection error")
        }
        _ => DocumentRepositoryError::query("database error"),
    }
}

fn row_to_document(row: DocumentRow, collaborators: Vec<UserId>) -> Document {
    Document::from_parts(
        DocumentId::from_uuid(row.id),
        row.title,
        row.content,
        UserId::from_uuid(row.owner_id),
        collaborators,
        row.updated_at,
    )
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn find_by_id(
        &self,
        id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DocumentRow> = documents::table
            .find(id.as_uuid())
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let collaborators: Vec<CollaboratorRow> = document_collaborators::table
            .filter(document_collaborators::document_id.eq(id.as_uuid()))
            .order(document_collaborators::added_at.asc())
            .select(CollaboratorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let collaborators = collaborators
            .into_iter()
            .map(|grant| UserId::from_uuid(grant.user_id))
            .collect();
        Ok(Some(row_to_document(row, collaborators)))
    }

    async fn find_accessible(
        &self,
        user: &UserId,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let shared_ids = document_collaborators::table
            .filter(document_collaborators::user_id.eq(user.as_uuid()))
            .select(document_collaborators::document_id);

        let rows: Vec<DocumentRow> = documents::table
            .filter(documents::owner_id.eq(user.as_uuid()))
            .or_filter(documents::id.eq_any(shared_ids))
            .order(documents::updated_at.desc())
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
        let grants: Vec<CollaboratorRow> = document_collaborators::table
            .filter(document_collaborators::document_id.eq_any(&ids))
            .order(document_collaborators::added_at.asc())
            .select(CollaboratorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut by_document: HashMap<uuid::Uuid, Vec<UserId>> = HashMap::new();
        for grant in grants {
            by_document
                .entry(grant.document_id)
                .or_default()
                .push(UserId::from_uuid(grant.user_id));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let collaborators = by_document.remove(&row.id).unwrap_or_default();
                row_to_document(row, collaborators)
            })
            .collect())
    }

    async fn insert(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewDocumentRow {
            id: *document.id().as_uuid(),
            title: document.title(),
            content: document.content(),
            owner_id: *document.owner().as_uuid(),
            updated_at: document.updated_at(),
        };

        diesel::insert_into(documents::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        sync_collaborators(&mut conn, document).await
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = DocumentUpdate {
            title: document.title(),
            content: document.content(),
            updated_at: document.updated_at(),
        };

        diesel::update(documents::table.find(document.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        sync_collaborators(&mut conn, document).await
    }
}

/// Record any collaborator grants not yet persisted.
///
/// Membership rows are only ever added; a grant raced in by a concurrent
/// share is left untouched via `ON CONFLICT DO NOTHING`.
async fn sync_collaborators<C>(
    conn: &mut C,
    document: &Document,
) -> Result<(), DocumentRepositoryError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let rows: Vec<NewCollaboratorRow> = document
        .collaborators()
        .iter()
        .map(|user| NewCollaboratorRow {
            document_id: *document.id().as_uuid(),
            user_id: *user.as_uuid(),
        })
        .collect();

    if rows.is_empty() {
        return Ok(());
    }

    diesel::insert_into(document_collaborators::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(())
}
