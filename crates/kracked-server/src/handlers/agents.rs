//! Agent HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use kracked_store::{agents, Agent, XpAward};

use crate::dto::{AgentsResponse, AwardXpRequest};
use crate::error::AppError;
use crate::ServerState;

/// Lists all agents.
pub async fn list(State(state): State<Arc<ServerState>>) -> Result<Json<AgentsResponse>, AppError> {
    let agents = state.with_db(agents::list_agents).await?;
    Ok(Json(AgentsResponse { agents }))
}

/// Returns a single agent.
pub async fn get(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Agent>, AppError> {
    state
        .with_db(move |conn| agents::get_agent(conn, &id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Agent not found".into()))
}

/// Adds XP to an agent. The amount must be a non-zero integer.
pub async fn award_xp(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    payload: Result<Json<AwardXpRequest>, JsonRejection>,
) -> Result<Json<XpAward>, AppError> {
    let amount = payload
        .ok()
        .and_then(|Json(req)| req.amount)
        .filter(|amount| *amount != 0)
        .ok_or_else(|| AppError::BadRequest("amount (number) required".into()))?;

    state
        .with_db(move |conn| agents::award_xp(conn, &id, amount))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Agent not found".into()))
}
