//! Project HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use kracked_store::{projects, Project};

use crate::dto::{CreateProjectRequest, ProjectsResponse};
use crate::error::AppError;
use crate::handlers::required;
use crate::ServerState;

/// Lists projects, newest first.
pub async fn list(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let projects = state.with_db(projects::list_projects).await?;
    Ok(Json(ProjectsResponse { projects }))
}

/// Creates a project.
pub async fn create(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let Json(req) = payload?;
    let name = required(req.name).ok_or_else(|| AppError::BadRequest("name required".into()))?;
    let scale = required(req.scale);

    let project = state
        .with_db(move |conn| projects::create_project(conn, &name, scale.as_deref()))
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}
