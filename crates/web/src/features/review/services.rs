use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginatedResponse,
        submission::{ReviewQueueEntry, ReviewQueueFilter, SubmissionStatus},
    },
    error::Result,
    models::Submission,
    repository::submission::SubmissionRepository,
};
use uuid::Uuid;

pub async fn list_review_queue(
    pool: &PgPool,
    filter: &ReviewQueueFilter,
) -> Result<PaginatedResponse<ReviewQueueEntry>> {
    let (entries, total_items) = SubmissionRepository::new(pool)
        .list_for_review(filter)
        .await?;

    Ok(PaginatedResponse::new(
        entries,
        &filter.pagination(),
        total_items,
    ))
}

pub async fn review_submission(
    pool: &PgPool,
    submission_id: Uuid,
    status: SubmissionStatus,
    note: Option<&str>,
) -> Result<Submission> {
    let submission = SubmissionRepository::new(pool)
        .review(submission_id, status, note)
        .await?;

    tracing::info!(%submission_id, status = status.as_str(), "Submission reviewed");

    Ok(submission)
}
