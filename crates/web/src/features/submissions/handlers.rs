use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::submission::{CreateSubmissionRequest, SubmissionResponse},
    services::lap_time::parse_lap_time,
};
use validator::Validate;

use crate::error::WebResult;
use crate::middleware::auth::CurrentRider;

use super::services;

#[utoipa::path(
    post,
    path = "/api/rounds/{slug}/submissions",
    params(
        ("slug" = String, Path, description = "Round slug")
    ),
    request_body = CreateSubmissionRequest,
    security(
        ("session_token" = [])
    ),
    responses(
        (status = 201, description = "Time submitted, pending review", body = SubmissionResponse),
        (status = 400, description = "Invalid time or validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Round not found"),
        (status = 409, description = "Round is closed")
    ),
    tag = "submissions"
)]
pub async fn create_submission(
    State(db): State<Database>,
    Extension(current): Extension<CurrentRider>,
    Path(slug): Path<String>,
    Json(req): Json<CreateSubmissionRequest>,
) -> WebResult<Response> {
    req.validate()?;

    let raw_time_ms = parse_lap_time(&req.time)?;

    let submission = services::submit_time(
        db.pool(),
        &slug,
        current.rider.rider_id,
        raw_time_ms,
        req.penalties,
        req.video_url.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(submission))).into_response())
}
