use axum::{Json, extract::Query};
use storage::{
    dto::{
        leaderboard::{LapTimePreviewQuery, LapTimePreviewResponse},
        submission::MAX_PENALTIES,
    },
    services::{
        lap_time::{format_lap_time, parse_lap_time},
        scoring,
    },
};

use crate::error::{WebError, WebResult};

/// Parse a typed time and show it the way the leaderboard will
#[utoipa::path(
    get,
    path = "/api/lap-times/normalize",
    params(LapTimePreviewQuery),
    responses(
        (status = 200, description = "Normalized raw and final time", body = LapTimePreviewResponse),
        (status = 400, description = "Invalid time format or penalty count")
    ),
    tag = "lap-times"
)]
pub async fn normalize_lap_time(
    Query(query): Query<LapTimePreviewQuery>,
) -> WebResult<Json<LapTimePreviewResponse>> {
    let penalties = query.penalties.unwrap_or(0);
    if !(0..=i64::from(MAX_PENALTIES)).contains(&penalties) {
        return Err(WebError::BadRequest(format!(
            "Penalties must be between 0 and {}",
            MAX_PENALTIES
        )));
    }

    let raw_time_ms = parse_lap_time(&query.time)?;
    let final_time_ms = scoring::final_time_ms(raw_time_ms, penalties);

    Ok(Json(LapTimePreviewResponse {
        raw_time_ms,
        raw_time: format_lap_time(raw_time_ms),
        penalties,
        final_time_ms,
        final_time: format_lap_time(final_time_ms),
    }))
}
