/**
 * Document API Handlers
 *
 * Thin request/response handlers over the document store. The realtime
 * layer never persists content; these endpoints are the explicit save
 * and sharing surface that clients invoke on their own schedule.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::documents::{db, AccessLevel, Document};
use crate::error::AppError;
use crate::middleware::AuthUser;

/// Request body for `POST /api/documents`
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
}

/// Request body for `PUT /api/documents/{id}`
#[derive(Debug, Deserialize)]
pub struct SaveDocumentRequest {
    pub content: String,
}

/// Request body for `PUT /api/documents/{id}/permissions`
///
/// `access: null` revokes the collaborator's entry.
#[derive(Debug, Deserialize)]
pub struct UpdatePermissionsRequest {
    pub user_id: Uuid,
    pub access: Option<AccessLevel>,
}

/// Handle `POST /api/documents`: create a document owned by the caller.
pub async fn create_document(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let document = db::create_document(&pool, user.user_id, request.title).await?;
    tracing::info!("[Documents] {} created {}", user.identity, document.id);
    Ok((StatusCode::CREATED, Json(document)))
}

/// Handle `GET /api/documents/{id}`: fetch a document.
///
/// Readable by the owner and any collaborator.
pub async fn get_document(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, AppError> {
    let document = db::find_document(&pool, id).await?;
    if !document.can_read(&user.identity) {
        return Err(AppError::permission_denied("no access to document"));
    }
    Ok(Json(document))
}

/// Handle `PUT /api/documents/{id}`: persist document content.
///
/// This is the save path; it is deliberately separate from the
/// realtime broadcast, which never writes the store.
pub async fn save_document(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveDocumentRequest>,
) -> Result<StatusCode, AppError> {
    let document = db::find_document(&pool, id).await?;
    if !document.can_edit(&user.identity) {
        return Err(AppError::permission_denied("no write access to document"));
    }
    db::save_content(&pool, id, &request.content).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle `PUT /api/documents/{id}/permissions`: share or unshare.
///
/// Owner only. The owner's own access is implicit and cannot be
/// granted or revoked, which also keeps the owner out of the
/// collaborator list.
pub async fn update_document_permissions(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePermissionsRequest>,
) -> Result<StatusCode, AppError> {
    let document = db::find_document(&pool, id).await?;
    if document.owner_id != user.user_id {
        return Err(AppError::permission_denied(
            "only the owner can change permissions",
        ));
    }
    if request.user_id == document.owner_id {
        return Err(AppError::permission_denied(
            "the owner's access cannot be changed",
        ));
    }
    db::update_permissions(&pool, id, request.user_id, request.access).await?;
    tracing::info!(
        "[Documents] {} set access {:?} for {} on {}",
        user.identity,
        request.access,
        request.user_id,
        id
    );
    Ok(StatusCode::NO_CONTENT)
}
