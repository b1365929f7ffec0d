/**
 * Document Database Operations
 *
 * This module handles document rows and their collaborator entries.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::documents::{AccessLevel, Collaborator, Document};
use crate::error::AppError;

/// Row shape for the documents table.
#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// Load a document with its permission state
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `id` - Document ID
///
/// # Returns
/// The document, or `AppError::NotFound` if it does not exist
pub async fn find_document(pool: &PgPool, id: Uuid) -> Result<Document, AppError> {
    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, owner_id, title, content, created_at, updated_at
        FROM documents
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("document"))?;

    let collaborator_rows: Vec<(Uuid, String)> = sqlx::query_as(
        r#"
        SELECT user_id, access
        FROM document_collaborators
        WHERE document_id = $1
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let collaborators = collaborator_rows
        .into_iter()
        .filter_map(|(user_id, access)| {
            AccessLevel::from_name(&access).map(|access| Collaborator { user_id, access })
        })
        .collect();

    Ok(Document {
        id: row.id,
        owner_id: row.owner_id,
        title: row.title,
        content: row.content,
        collaborators,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Create a new document owned by `owner_id`
pub async fn create_document(
    pool: &PgPool,
    owner_id: Uuid,
    title: String,
) -> Result<Document, AppError> {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        INSERT INTO documents (id, owner_id, title, content, created_at, updated_at)
        VALUES ($1, $2, $3, '', $4, $4)
        RETURNING id, owner_id, title, content, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(&title)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(Document {
        id: row.id,
        owner_id: row.owner_id,
        title: row.title,
        content: row.content,
        collaborators: Vec::new(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Persist document content (the explicit save path)
pub async fn save_content(pool: &PgPool, id: Uuid, content: &str) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE documents
        SET content = $2, updated_at = $3
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(content)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("document"));
    }
    Ok(())
}

/// Grant, change, or revoke one collaborator's access
///
/// `access = Some(level)` upserts the entry, `access = None` removes
/// it. The composite primary key keeps each collaborator unique.
pub async fn update_permissions(
    pool: &PgPool,
    document_id: Uuid,
    user_id: Uuid,
    access: Option<AccessLevel>,
) -> Result<(), AppError> {
    match access {
        Some(level) => {
            sqlx::query(
                r#"
                INSERT INTO document_collaborators (document_id, user_id, access)
                VALUES ($1, $2, $3)
                ON CONFLICT (document_id, user_id) DO UPDATE SET access = $3
                "#,
            )
            .bind(document_id)
            .bind(user_id)
            .bind(level.as_str())
            .execute(pool)
            .await?;
        }
        None => {
            sqlx::query(
                r#"
                DELETE FROM document_collaborators
                WHERE document_id = $1 AND user_id = $2
                "#,
            )
            .bind(document_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}
