//! Documents API handlers.
//!
//! ```text
//! POST /api/v1/documents {"title":"Road Trip Plan"}
//! GET /api/v1/documents
//! GET /api/v1/documents/{id}
//! PUT /api/v1/documents/{id} {"content":"..."}
//! POST /api/v1/documents/{id}/share {"email":"bob@example.com"}
//! POST /api/v1/documents/{id}/share-email {"email":"bob@example.com"}
//! ```
//!
//! All routes except `share-email` require an authenticated session.
//! `share-email` only sends a notification and grants nothing, so it is
//! reachable without a session.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Document, DocumentId, EmailAddress};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_document_id, parse_email,
};

const ID_FIELD: FieldName = FieldName::new("id");
const EMAIL_FIELD: FieldName = FieldName::new("email");
const CONTENT_FIELD: FieldName = FieldName::new("content");

/// Request payload for `POST /api/v1/documents`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub title: Option<String>,
}

/// Request payload for `PUT /api/v1/documents/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    pub content: Option<String>,
}

/// Request payload for the share and share-email endpoints.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub email: Option<String>,
}

fn parse_path_id(raw: &str) -> ApiResult<DocumentId> {
    parse_document_id(raw, ID_FIELD)
}

fn parse_share_email(payload: ShareRequest) -> ApiResult<EmailAddress> {
    let raw = payload
        .email
        .ok_or_else(|| missing_field_error(EMAIL_FIELD))?;
    parse_email(&raw, EMAIL_FIELD)
}

/// Create an empty document owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = crate::inbound::http::schemas::DocumentSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "createDocument"
)]
#[post("/documents")]
pub async fn create_document(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<CreateDocumentRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_caller()?;
    let document = state
        .documents_command
        .create_document(&user_id, payload.into_inner().title)
        .await?;
    Ok(HttpResponse::Created().json(document))
}

/// List documents the authenticated user owns or collaborates on.
#[utoipa::path(
    get,
    path = "/api/v1/documents",
    responses(
        (status = 200, description = "Accessible documents, most recently updated first", body = [crate::inbound::http::schemas::DocumentSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "listDocuments"
)]
#[get("/documents")]
pub async fn list_documents(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Document>>> {
    let user_id = session.require_caller()?;
    let documents = state.documents_query.list_documents(&user_id).await?;
    Ok(web::Json(documents))
}

/// Fetch a single document the authenticated user may access.
#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document", body = crate::inbound::http::schemas::DocumentSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "No access", body = ErrorSchema),
        (status = 404, description = "Document does not exist", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "getDocument"
)]
#[get("/documents/{id}")]
pub async fn get_document(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Document>> {
    let user_id = session.require_caller()?;
    let id = parse_path_id(&path)?;
    let document = state.documents_query.get_document(&user_id, id).await?;
    Ok(web::Json(document))
}

/// Replace a document's content in full.
#[utoipa::path(
    put,
    path = "/api/v1/documents/{id}",
    params(("id" = String, Path, description = "Document id")),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Updated document", body = crate::inbound::http::schemas::DocumentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "No access", body = ErrorSchema),
        (status = 404, description = "Document does not exist", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "updateContent"
)]
#[put("/documents/{id}")]
pub async fn update_content(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateContentRequest>,
) -> ApiResult<web::Json<Document>> {
    let user_id = session.require_caller()?;
    let id = parse_path_id(&path)?;
    let content = payload
        .into_inner()
        .content
        .ok_or_else(|| missing_field_error(CONTENT_FIELD))?;
    let document = state
        .documents_command
        .update_content(&user_id, id, content)
        .await?;
    Ok(web::Json(document))
}

/// Grant collaborator access to the user registered under an email.
#[utoipa::path(
    post,
    path = "/api/v1/documents/{id}/share",
    params(("id" = String, Path, description = "Document id")),
    request_body = ShareRequest,
    responses(
        (status = 200, description = "Share accepted (idempotent)"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Only the owner may share", body = ErrorSchema),
        (status = 404, description = "Document or recipient does not exist", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "shareDocument"
)]
#[post("/documents/{id}/share")]
pub async fn share_document(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ShareRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_caller()?;
    let id = parse_path_id(&path)?;
    let email = parse_share_email(payload.into_inner())?;
    state
        .documents_command
        .share_with_user(&user_id, id, &email)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "document shared" })))
}

/// Send a share notification without changing access.
#[utoipa::path(
    post,
    path = "/api/v1/documents/{id}/share-email",
    params(("id" = String, Path, description = "Document id")),
    request_body = ShareRequest,
    responses(
        (status = 200, description = "Notification sent"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Document does not exist", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Delivery endpoint unavailable", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "shareDocumentByEmail",
    security([])
)]
#[post("/documents/{id}/share-email")]
pub async fn share_document_by_email(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ShareRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_path_id(&path)?;
    let email = parse_share_email(payload.into_inner())?;
    state.share_notification.notify_share(id, &email).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "notification sent" })))
}
