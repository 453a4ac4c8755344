use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::rider::{LoginRequest, ProfileResponse, SessionResponse},
    error::StorageError,
};
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::{CurrentRider, SessionSettings};

use super::services;

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Logged in; use the token as a bearer token", body = SessionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "No rider registered with this email")
    ),
    tag = "sessions"
)]
pub async fn login(
    State(db): State<Database>,
    Extension(settings): Extension<SessionSettings>,
    Json(req): Json<LoginRequest>,
) -> WebResult<Response> {
    req.validate()?;

    let session = services::login(db.pool(), &req.email, settings.ttl)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => WebError::Unauthorized,
            other => WebError::from(other),
        })?;

    Ok((StatusCode::CREATED, Json(session)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/sessions",
    security(
        ("session_token" = [])
    ),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "sessions"
)]
pub async fn logout(
    State(db): State<Database>,
    Extension(current): Extension<CurrentRider>,
) -> WebResult<Response> {
    services::logout(db.pool(), current.token).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/me",
    security(
        ("session_token" = [])
    ),
    responses(
        (status = 200, description = "Logged-in rider with their submissions", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "sessions"
)]
pub async fn profile(
    State(db): State<Database>,
    Extension(current): Extension<CurrentRider>,
) -> WebResult<Response> {
    let profile = services::profile(db.pool(), current.rider).await?;

    Ok(Json(profile).into_response())
}
