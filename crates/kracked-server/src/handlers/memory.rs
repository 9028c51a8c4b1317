//! Memory HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use kracked_store::{memory, NewMemory};

use crate::dto::{MemoriesResponse, StoreMemoryRequest, StoreMemoryResponse};
use crate::error::AppError;
use crate::handlers::required;
use crate::ServerState;

/// Lists the memory entries of a project.
pub async fn list(
    State(state): State<Arc<ServerState>>,
    Path(project_id): Path<String>,
) -> Result<Json<MemoriesResponse>, AppError> {
    let memories = state
        .with_db(move |conn| memory::list_memory(conn, &project_id))
        .await?;
    Ok(Json(MemoriesResponse { memories }))
}

/// Stores a memory entry.
pub async fn store(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<StoreMemoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StoreMemoryResponse>), AppError> {
    let Json(req) = payload?;
    let key = required(req.key).ok_or_else(|| AppError::BadRequest("key required".into()))?;
    let entry = NewMemory {
        project_id: required(req.project_id),
        key,
        value: req.value,
        kind: required(req.kind),
    };

    let stored = state
        .with_db(move |conn| memory::store_memory(conn, entry))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(StoreMemoryResponse {
            id: stored.id,
            key: stored.key,
            kind: stored.kind,
        }),
    ))
}
