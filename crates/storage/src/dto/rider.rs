use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::submission::RiderSubmissionEntry;

/// Request payload for registering a rider
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRiderRequest {
    #[validate(email(message = "Email must be a valid address"))]
    #[validate(length(max = 255))]
    pub email: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "First name must be between 1 and 100 characters"
    ))]
    pub first_name: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Last name must be between 1 and 100 characters"
    ))]
    pub last_name: String,

    #[validate(length(max = 50))]
    pub nickname: Option<String>,

    #[validate(length(max = 100))]
    pub motorcycle: Option<String>,
}

/// Email-only login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiderResponse {
    pub rider_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub motorcycle: Option<String>,
    pub display_name: String,
    pub created_at: NaiveDateTime,
}

/// Rider as shown on leaderboards and review lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiderSummary {
    pub rider_id: Uuid,
    pub display_name: String,
    pub motorcycle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub token: Uuid,
    pub expires_at: NaiveDateTime,
    pub rider: RiderResponse,
}

/// The logged-in rider with all of their submissions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub rider: RiderResponse,
    pub email: String,
    pub submissions: Vec<RiderSubmissionEntry>,
}

impl From<crate::models::Rider> for RiderResponse {
    fn from(rider: crate::models::Rider) -> Self {
        let display_name = rider.display_name();
        Self {
            rider_id: rider.rider_id,
            first_name: rider.first_name,
            last_name: rider.last_name,
            nickname: rider.nickname,
            motorcycle: rider.motorcycle,
            display_name,
            created_at: rider.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, first_name: &str) -> RegisterRiderRequest {
        RegisterRiderRequest {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: "Moreau".to_string(),
            nickname: None,
            motorcycle: Some("SV650".to_string()),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(request("lea@example.com", "Léa").validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let errors = request("not-an-email", "Léa").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_request_rejects_empty_name() {
        let errors = request("lea@example.com", "").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }
}
