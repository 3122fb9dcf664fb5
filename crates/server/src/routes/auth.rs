use std::sync::Arc;

use axum::{extract::State, http::{HeaderMap, StatusCode}, Json};
use serde::Serialize;

use models::user::PublicUser;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::errors::AuthError;
use service::auth::AuthService;
use service::events::EventService;
use service::storage::JsonStore;

use crate::errors::ApiError;

/// Shared handler state: the two business services over the JSON store.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<JsonStore>>,
    pub events: Arc<EventService<JsonStore>>,
}

#[derive(Serialize)]
pub struct SessionOutput {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct VerifyOutput {
    pub authenticated: bool,
    pub user: PublicUser,
}

/// Raw bearer credential from the `authorization` header. The legacy client
/// sends the bare token; a `Bearer ` prefix is tolerated for curl users.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Account created; body carries the lifetime token"),
        (status = 400, description = "Validation failed or account already exists")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<SessionOutput>), ApiError> {
    let session = state.auth.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionOutput { token: session.token, user: session.user }),
    ))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in; body carries the stored lifetime token"),
        (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<SessionOutput>, ApiError> {
    let session = state.auth.login(input).await?;
    Ok(Json(SessionOutput { token: session.token, user: session.user }))
}

#[utoipa::path(get, path = "/api/auth/verify", tag = "auth",
    responses(
        (status = 200, description = "Token resolves to an account"),
        (status = 401, description = "Missing or unknown token")))]
pub async fn verify(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<VerifyOutput>, (StatusCode, Json<serde_json::Value>)> {
    // 失败时固定返回 {"authenticated": false}，不透露更多信息
    let unauthenticated = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "authenticated": false })),
        )
    };
    let Some(token) = bearer_token(&headers) else {
        return Err(unauthenticated());
    };
    match state.auth.verify(&token).await {
        Ok(user) => Ok(Json(VerifyOutput { authenticated: true, user })),
        Err(AuthError::Unauthorized) => Err(unauthenticated()),
        Err(e) => {
            let api: ApiError = e.into();
            Err((api.status, Json(serde_json::json!({ "error": api.message }))))
        }
    }
}
