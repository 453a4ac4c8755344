use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::scoring;

/// A lap time sent in by a rider for one round.
///
/// `raw_time_ms` and `penalties` never change after creation; review only
/// touches `status`, `review_note` and `reviewed_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub submission_id: Uuid,
    pub round_id: Uuid,
    pub rider_id: Uuid,
    pub raw_time_ms: i64,
    pub penalties: i32,
    pub video_url: Option<String>,
    pub status: String,
    pub review_note: Option<String>,
    pub submitted_at: NaiveDateTime,
    pub reviewed_at: Option<NaiveDateTime>,
}

impl Submission {
    pub fn final_time_ms(&self) -> i64 {
        scoring::final_time_ms(self.raw_time_ms, i64::from(self.penalties))
    }
}
