use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::round::{CreateRoundRequest, RoundListFilter, RoundResponse, UpdateRoundRequest},
};
use validator::Validate;

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rounds",
    params(RoundListFilter),
    responses(
        (status = 200, description = "List rounds, newest first", body = Vec<RoundResponse>)
    ),
    tag = "rounds"
)]
pub async fn list_rounds(
    State(db): State<Database>,
    Query(filter): Query<RoundListFilter>,
) -> WebResult<Json<Vec<RoundResponse>>> {
    let rounds = services::list_rounds(db.pool(), filter.status).await?;

    let response: Vec<RoundResponse> = rounds.into_iter().map(RoundResponse::from).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/rounds/{slug}",
    params(
        ("slug" = String, Path, description = "Round slug")
    ),
    responses(
        (status = 200, description = "Round found", body = RoundResponse),
        (status = 404, description = "Round not found")
    ),
    tag = "rounds"
)]
pub async fn get_round(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> WebResult<Response> {
    let round = services::get_round_by_slug(db.pool(), &slug).await?;

    Ok(Json(RoundResponse::from(round)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rounds",
    request_body = CreateRoundRequest,
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 201, description = "Round created successfully", body = RoundResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "rounds"
)]
pub async fn create_round(
    State(db): State<Database>,
    Json(req): Json<CreateRoundRequest>,
) -> WebResult<Response> {
    req.validate()?;

    let round = services::create_round(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(RoundResponse::from(round))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/rounds/{slug}",
    params(
        ("slug" = String, Path, description = "Round slug")
    ),
    request_body = UpdateRoundRequest,
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Round updated; closing or reopening is done through `status`", body = RoundResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Round not found")
    ),
    tag = "rounds"
)]
pub async fn update_round(
    State(db): State<Database>,
    Path(slug): Path<String>,
    Json(update_req): Json<UpdateRoundRequest>,
) -> WebResult<Response> {
    update_req.validate()?;

    let updated = services::update_round(db.pool(), &slug, &update_req).await?;

    Ok(Json(RoundResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/rounds/{slug}",
    params(
        ("slug" = String, Path, description = "Round slug")
    ),
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 204, description = "Round and its submissions deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Round not found")
    ),
    tag = "rounds"
)]
pub async fn delete_round(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> WebResult<Response> {
    services::delete_round(db.pool(), &slug).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
