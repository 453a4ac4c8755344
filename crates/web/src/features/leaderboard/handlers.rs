use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::leaderboard::LeaderboardResponse};

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rounds/{slug}/leaderboard",
    params(
        ("slug" = String, Path, description = "Round slug")
    ),
    responses(
        (status = 200, description = "Best approved run of each rider, ranked by final time", body = LeaderboardResponse),
        (status = 404, description = "Round not found")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> WebResult<Response> {
    let leaderboard = services::get_leaderboard(db.pool(), &slug).await?;

    Ok(Json(leaderboard).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{slug}/leaderboard.csv",
    params(
        ("slug" = String, Path, description = "Round slug")
    ),
    responses(
        (status = 200, description = "Leaderboard as CSV", content_type = "text/csv", body = String),
        (status = 404, description = "Round not found")
    ),
    tag = "leaderboard"
)]
pub async fn export_leaderboard_csv(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> WebResult<Response> {
    let csv = services::export_leaderboard_csv(db.pool(), &slug).await?;
    let disposition = format!("attachment; filename=\"{}-leaderboard.csv\"", slug);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
