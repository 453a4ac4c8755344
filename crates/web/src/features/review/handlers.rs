use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        submission::{
            ReviewQueueEntry, ReviewQueueFilter, ReviewSubmissionRequest, SubmissionResponse,
            SubmissionStatus,
        },
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{WebError, WebResult};

use super::services;

#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    params(ReviewQueueFilter),
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Submissions awaiting or past review, oldest first", body = PaginatedResponse<ReviewQueueEntry>),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "review"
)]
pub async fn list_review_queue(
    State(db): State<Database>,
    Query(filter): Query<ReviewQueueFilter>,
) -> WebResult<Json<PaginatedResponse<ReviewQueueEntry>>> {
    filter.validate().map_err(WebError::BadRequest)?;

    let queue = services::list_review_queue(db.pool(), &filter).await?;

    Ok(Json(queue))
}

#[utoipa::path(
    put,
    path = "/api/admin/submissions/{submission_id}/approve",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    request_body(content = ReviewSubmissionRequest, description = "Optional note for the rider"),
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Submission approved", body = SubmissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Submission not found")
    ),
    tag = "review"
)]
pub async fn approve_submission(
    State(db): State<Database>,
    Path(submission_id): Path<Uuid>,
    body: Bytes,
) -> WebResult<Response> {
    review(db, submission_id, SubmissionStatus::Approved, body).await
}

#[utoipa::path(
    put,
    path = "/api/admin/submissions/{submission_id}/reject",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    request_body(content = ReviewSubmissionRequest, description = "Optional note for the rider"),
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Submission rejected", body = SubmissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Submission not found")
    ),
    tag = "review"
)]
pub async fn reject_submission(
    State(db): State<Database>,
    Path(submission_id): Path<Uuid>,
    body: Bytes,
) -> WebResult<Response> {
    review(db, submission_id, SubmissionStatus::Rejected, body).await
}

async fn review(
    db: Database,
    submission_id: Uuid,
    status: SubmissionStatus,
    body: Bytes,
) -> WebResult<Response> {
    let req = review_request(&body)?;
    req.validate()?;

    let submission =
        services::review_submission(db.pool(), submission_id, status, req.note.as_deref())
            .await?;

    Ok(Json(SubmissionResponse::from(submission)).into_response())
}

/// An absent or blank body means "no note"; anything else must be valid JSON.
fn review_request(body: &[u8]) -> WebResult<ReviewSubmissionRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReviewSubmissionRequest::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| WebError::BadRequest(format!("Invalid review body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_body_means_no_note() {
        assert!(review_request(b"").unwrap().note.is_none());
        assert!(review_request(b"  \n").unwrap().note.is_none());
    }

    #[test]
    fn test_note_is_read() {
        let req = review_request(br#"{"note": "video cuts before the finish"}"#).unwrap();
        assert_eq!(req.note.as_deref(), Some("video cuts before the finish"));
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert!(matches!(
            review_request(br#"{"note": "#),
            Err(WebError::BadRequest(_))
        ));
        assert!(matches!(
            review_request(br#"{"note": 42}"#),
            Err(WebError::BadRequest(_))
        ));
    }
}
