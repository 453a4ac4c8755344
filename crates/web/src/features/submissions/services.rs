use sqlx::PgPool;
use storage::{
    error::Result,
    models::Submission,
    repository::{
        round::RoundRepository,
        submission::{NewSubmission, SubmissionRepository},
    },
};
use uuid::Uuid;

/// Store a parsed lap time for an open round
pub async fn submit_time(
    pool: &PgPool,
    slug: &str,
    rider_id: Uuid,
    raw_time_ms: i64,
    penalties: i32,
    video_url: Option<&str>,
) -> Result<Submission> {
    let round = RoundRepository::new(pool).find_by_slug(slug).await?;
    round.ensure_open()?;

    let submission = SubmissionRepository::new(pool)
        .create(&NewSubmission {
            round_id: round.round_id,
            rider_id,
            raw_time_ms,
            penalties,
            video_url,
        })
        .await?;

    tracing::info!(
        round = %round.slug,
        %rider_id,
        raw_time_ms,
        penalties,
        "Time submitted"
    );

    Ok(submission)
}
