use axum::{extract::{Path, State}, http::{HeaderMap, StatusCode}, Json};
use serde::Serialize;

use models::event::Event;
use service::events::domain::CreateEventInput;

use crate::errors::ApiError;
use crate::routes::auth::{bearer_token, ServerState};

#[derive(Serialize)]
pub struct VoteOutput {
    pub success: bool,
    pub votes: u32,
}

/// 列出全部活动（含票数），过滤与搜索由前端完成
#[utoipa::path(get, path = "/api/events", tag = "events",
    responses((status = 200, description = "Full event collection, votes included")))]
pub async fn list_events(State(state): State<ServerState>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.events.list().await?))
}

/// 获取单个活动
#[utoipa::path(get, path = "/api/events/{id}", tag = "events",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event"),
        (status = 404, description = "Unknown event id")))]
pub async fn get_event(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.events.get(&id).await?))
}

/// 创建活动；id、票数与时间戳由服务端生成
#[utoipa::path(post, path = "/api/events", tag = "events",
    request_body = crate::openapi::CreateEventRequest,
    responses(
        (status = 201, description = "Event created"),
        (status = 400, description = "Missing required fields")))]
pub async fn create_event(
    State(state): State<ServerState>,
    Json(input): Json<CreateEventInput>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.events.create(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Vote gates run in order: the token must resolve to an account (401), the
/// event must exist (404), and the account must not have voted yet (400).
/// Nothing is persisted when a gate fails.
#[utoipa::path(post, path = "/api/events/{id}/vote", tag = "events",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Vote recorded; body carries the new count"),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Unknown event id"),
        (status = 400, description = "Already voted")))]
pub async fn vote(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<VoteOutput>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "authentication required"))?;
    let user = state.auth.verify(&token).await?;
    let votes = state.events.vote(&id, user.id).await?;
    Ok(Json(VoteOutput { success: true, votes }))
}
