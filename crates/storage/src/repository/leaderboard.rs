use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::services::scoring::TimedEntry;

/// One approved submission, joined with its rider.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRow {
    pub submission_id: Uuid,
    pub rider_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub motorcycle: Option<String>,
    pub raw_time_ms: i64,
    pub penalties: i32,
    pub submitted_at: NaiveDateTime,
}

impl TimedEntry for LeaderboardRow {
    fn raw_time_ms(&self) -> Option<i64> {
        Some(self.raw_time_ms)
    }

    fn penalties(&self) -> Option<i64> {
        Some(i64::from(self.penalties))
    }

    fn submitted_at(&self) -> Option<NaiveDateTime> {
        Some(self.submitted_at)
    }
}

pub struct LeaderboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All approved submissions of a round; ranking happens in Rust
    pub async fn approved_for_round(&self, round_id: Uuid) -> Result<Vec<LeaderboardRow>> {
        let rows = sqlx::query_as::<_, LeaderboardRow>(
            r#"
            SELECT s.submission_id, rd.rider_id, rd.first_name, rd.last_name, rd.nickname,
                   rd.motorcycle, s.raw_time_ms, s.penalties, s.submitted_at
            FROM submissions s
            INNER JOIN riders rd ON s.rider_id = rd.rider_id
            WHERE s.round_id = $1 AND s.status = 'approved'
            ORDER BY s.submitted_at ASC, s.submission_id ASC
            "#,
        )
        .bind(round_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
