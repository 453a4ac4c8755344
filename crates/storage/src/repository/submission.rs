use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool, QueryBuilder, Postgres};
use uuid::Uuid;

use crate::dto::rider::RiderSummary;
use crate::dto::submission::{
    ReviewQueueEntry, ReviewQueueFilter, RiderSubmissionEntry, SubmissionStatus,
};
use crate::error::{Result, StorageError};
use crate::models::{Submission, display_name};
use crate::services::lap_time::format_lap_time;
use crate::services::scoring::final_time_ms;

const SUBMISSION_COLUMNS: &str = "submission_id, round_id, rider_id, raw_time_ms, penalties, \
     video_url, status, review_note, submitted_at, reviewed_at";

#[derive(FromRow)]
struct RiderSubmissionRow {
    submission_id: Uuid,
    round_slug: String,
    round_name: String,
    raw_time_ms: i64,
    penalties: i32,
    status: String,
    review_note: Option<String>,
    submitted_at: NaiveDateTime,
}

#[derive(FromRow)]
struct ReviewRow {
    submission_id: Uuid,
    round_slug: String,
    round_name: String,
    rider_id: Uuid,
    first_name: String,
    last_name: String,
    nickname: Option<String>,
    motorcycle: Option<String>,
    raw_time_ms: i64,
    penalties: i32,
    video_url: Option<String>,
    status: String,
    submitted_at: NaiveDateTime,
}

pub struct NewSubmission<'a> {
    pub round_id: Uuid,
    pub rider_id: Uuid,
    pub raw_time_ms: i64,
    pub penalties: i32,
    pub video_url: Option<&'a str>,
}

pub struct SubmissionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubmissionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewSubmission<'_>) -> Result<Submission> {
        let query = format!(
            r#"
            INSERT INTO submissions (submission_id, round_id, rider_id, raw_time_ms, penalties, video_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Submission>(&query)
            .bind(Uuid::new_v4())
            .bind(new.round_id)
            .bind(new.rider_id)
            .bind(new.raw_time_ms)
            .bind(new.penalties)
            .bind(new.video_url)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                let error = StorageError::from(e);
                if error.is_foreign_key_violation() {
                    StorageError::NotFound
                } else {
                    error
                }
            })
    }

    pub async fn list_for_rider(&self, rider_id: Uuid) -> Result<Vec<RiderSubmissionEntry>> {
        let rows = sqlx::query_as::<_, RiderSubmissionRow>(
            r#"
            SELECT s.submission_id, r.slug as round_slug, r.name as round_name,
                   s.raw_time_ms, s.penalties, s.status, s.review_note, s.submitted_at
            FROM submissions s
            INNER JOIN rounds r ON s.round_id = r.round_id
            WHERE s.rider_id = $1
            ORDER BY s.submitted_at DESC
            "#,
        )
        .bind(rider_id)
        .fetch_all(self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(|row| {
                let final_ms = final_time_ms(row.raw_time_ms, i64::from(row.penalties));
                RiderSubmissionEntry {
                    submission_id: row.submission_id,
                    round_slug: row.round_slug,
                    round_name: row.round_name,
                    raw_time: format_lap_time(row.raw_time_ms),
                    penalties: row.penalties,
                    final_time_ms: final_ms,
                    final_time: format_lap_time(final_ms),
                    status: row.status,
                    review_note: row.review_note,
                    submitted_at: row.submitted_at,
                }
            })
            .collect();

        Ok(entries)
    }

    /// Review queue, oldest first, with the total count for pagination
    pub async fn list_for_review(
        &self,
        filter: &ReviewQueueFilter,
    ) -> Result<(Vec<ReviewQueueEntry>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::new(
            r#"
            SELECT COUNT(*)
            FROM submissions s
            INNER JOIN rounds r ON s.round_id = r.round_id
            WHERE 1=1
            "#,
        );
        push_review_filters(&mut count, filter);

        let total_items = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::new(
            r#"
            SELECT s.submission_id, r.slug as round_slug, r.name as round_name,
                   rd.rider_id, rd.first_name, rd.last_name, rd.nickname, rd.motorcycle,
                   s.raw_time_ms, s.penalties, s.video_url, s.status, s.submitted_at
            FROM submissions s
            INNER JOIN rounds r ON s.round_id = r.round_id
            INNER JOIN riders rd ON s.rider_id = rd.rider_id
            WHERE 1=1
            "#,
        );
        push_review_filters(&mut query, filter);
        query.push(" ORDER BY s.submitted_at ASC, s.submission_id ASC LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let rows: Vec<ReviewRow> = query.build_query_as().fetch_all(self.pool).await?;

        let entries = rows
            .into_iter()
            .map(|row| ReviewQueueEntry {
                submission_id: row.submission_id,
                round_slug: row.round_slug,
                round_name: row.round_name,
                rider: RiderSummary {
                    rider_id: row.rider_id,
                    display_name: display_name(
                        &row.first_name,
                        &row.last_name,
                        row.nickname.as_deref(),
                    ),
                    motorcycle: row.motorcycle,
                },
                raw_time: format_lap_time(row.raw_time_ms),
                penalties: row.penalties,
                final_time: format_lap_time(final_time_ms(
                    row.raw_time_ms,
                    i64::from(row.penalties),
                )),
                video_url: row.video_url,
                status: row.status,
                submitted_at: row.submitted_at,
            })
            .collect();

        Ok((entries, total_items))
    }

    /// Approve or reject; raw time and penalties stay untouched
    pub async fn review(
        &self,
        id: Uuid,
        status: SubmissionStatus,
        note: Option<&str>,
    ) -> Result<Submission> {
        let query = format!(
            r#"
            UPDATE submissions
            SET status = $2, review_note = $3, reviewed_at = NOW()
            WHERE submission_id = $1
            RETURNING {SUBMISSION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(note)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

fn push_review_filters<'a>(query: &mut QueryBuilder<'a, Postgres>, filter: &'a ReviewQueueFilter) {
    if let Some(status) = filter.status {
        query.push(" AND s.status = ");
        query.push_bind(status.as_str());
    }

    if let Some(ref round) = filter.round {
        query.push(" AND r.slug = ");
        query.push_bind(round.as_str());
    }
}
