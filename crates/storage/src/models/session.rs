use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub token: Uuid,
    pub rider_id: Uuid,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl Session {
    /// A session stops working the moment it reaches `expires_at`
    pub fn is_live(expires_at: NaiveDateTime, now: NaiveDateTime) -> bool {
        now < expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn test_expired_session_is_not_live() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 14)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();

        assert!(Session::is_live(now + Duration::hours(1), now));
        assert!(!Session::is_live(now, now));
        assert!(!Session::is_live(now - Duration::seconds(1), now));
    }
}
