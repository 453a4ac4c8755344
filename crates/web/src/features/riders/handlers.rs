use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::rider::{RegisterRiderRequest, RiderResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    post,
    path = "/api/riders",
    request_body = RegisterRiderRequest,
    responses(
        (status = 201, description = "Rider registered successfully", body = RiderResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "riders"
)]
pub async fn register_rider(
    State(db): State<Database>,
    Json(req): Json<RegisterRiderRequest>,
) -> WebResult<Response> {
    req.validate()?;

    let rider = services::register_rider(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(RiderResponse::from(rider))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/riders/{rider_id}",
    params(
        ("rider_id" = Uuid, Path, description = "Rider ID")
    ),
    responses(
        (status = 200, description = "Rider found", body = RiderResponse),
        (status = 404, description = "Rider not found")
    ),
    tag = "riders"
)]
pub async fn get_rider(
    State(db): State<Database>,
    Path(rider_id): Path<Uuid>,
) -> WebResult<Response> {
    let rider = services::get_rider(db.pool(), rider_id).await?;

    Ok(Json(RiderResponse::from(rider)).into_response())
}
