use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationParams;
use super::rider::RiderSummary;
use crate::services::lap_time::format_lap_time;

pub const MAX_PENALTIES: i32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Lap time sent by a logged-in rider
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSubmissionRequest {
    /// `M:SS.mmm`, `S.mmm` or whole seconds
    #[validate(length(min = 1, max = 32, message = "Time is required"))]
    pub time: String,

    #[serde(default)]
    #[validate(range(min = 0, max = 99, message = "Penalties must be between 0 and 99"))]
    pub penalties: i32,

    #[validate(url)]
    #[validate(length(max = 500))]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReviewSubmissionRequest {
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

// Pagination fields are spelled out rather than flattened: serde's flatten
// loses the string-to-number coercion of query strings.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReviewQueueFilter {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<SubmissionStatus>,
    /// Round slug
    pub round: Option<String>,
}

impl ReviewQueueFilter {
    pub fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    pub submission_id: Uuid,
    pub round_id: Uuid,
    pub rider_id: Uuid,
    pub raw_time_ms: i64,
    pub raw_time: String,
    pub penalties: i32,
    pub final_time_ms: i64,
    pub final_time: String,
    pub video_url: Option<String>,
    pub status: String,
    pub review_note: Option<String>,
    pub submitted_at: NaiveDateTime,
    pub reviewed_at: Option<NaiveDateTime>,
}

/// Submission listed on the rider's own profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiderSubmissionEntry {
    pub submission_id: Uuid,
    pub round_slug: String,
    pub round_name: String,
    pub raw_time: String,
    pub penalties: i32,
    pub final_time_ms: i64,
    pub final_time: String,
    pub status: String,
    pub review_note: Option<String>,
    pub submitted_at: NaiveDateTime,
}

/// Submission listed in the admin review queue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewQueueEntry {
    pub submission_id: Uuid,
    pub round_slug: String,
    pub round_name: String,
    pub rider: RiderSummary,
    pub raw_time: String,
    pub penalties: i32,
    pub final_time: String,
    pub video_url: Option<String>,
    pub status: String,
    pub submitted_at: NaiveDateTime,
}

impl From<crate::models::Submission> for SubmissionResponse {
    fn from(submission: crate::models::Submission) -> Self {
        let final_time_ms = submission.final_time_ms();
        Self {
            submission_id: submission.submission_id,
            round_id: submission.round_id,
            rider_id: submission.rider_id,
            raw_time_ms: submission.raw_time_ms,
            raw_time: format_lap_time(submission.raw_time_ms),
            penalties: submission.penalties,
            final_time_ms,
            final_time: format_lap_time(final_time_ms),
            video_url: submission.video_url,
            status: submission.status,
            review_note: submission.review_note,
            submitted_at: submission.submitted_at,
            reviewed_at: submission.reviewed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(time: &str, penalties: i32) -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            time: time.to_string(),
            penalties,
            video_url: None,
        }
    }

    #[test]
    fn test_penalty_range() {
        assert!(request("1:23.456", 0).validate().is_ok());
        assert!(request("1:23.456", MAX_PENALTIES).validate().is_ok());
        assert!(request("1:23.456", -1).validate().is_err());
        assert!(request("1:23.456", 100).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_video_url() {
        let mut req = request("1:23.456", 0);
        req.video_url = Some("not a url".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_penalties_default_to_zero() {
        let req: CreateSubmissionRequest = serde_json::from_str(r#"{"time": "83.4"}"#).unwrap();
        assert_eq!(req.penalties, 0);
    }

    #[test]
    fn test_response_formats_times() {
        let submission = crate::models::Submission {
            submission_id: Uuid::nil(),
            round_id: Uuid::nil(),
            rider_id: Uuid::nil(),
            raw_time_ms: 83_456,
            penalties: 2,
            video_url: None,
            status: "pending".to_string(),
            review_note: None,
            submitted_at: NaiveDateTime::default(),
            reviewed_at: None,
        };

        let response = SubmissionResponse::from(submission);
        assert_eq!(response.raw_time, "1:23.456");
        assert_eq!(response.final_time_ms, 85_456);
        assert_eq!(response.final_time, "1:25.456");
    }
}
