use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::round::RoundStatus;
use crate::error::{Result, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Round {
    pub round_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

impl Round {
    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Open.as_str()
    }

    /// Submissions are only accepted while the round is open
    pub fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StorageError::ConstraintViolation(
                "Round is closed".to_string(),
            ))
        }
    }

    /// `closed_at` once the round moves to `status`: closing stamps `now`
    /// unless already closed, reopening clears it.
    pub fn closed_at_after(
        &self,
        status: RoundStatus,
        now: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        match status {
            RoundStatus::Open => None,
            RoundStatus::Closed if self.is_open() => Some(now),
            RoundStatus::Closed => self.closed_at.or(Some(now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 14)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn round(status: RoundStatus, closed_at: Option<NaiveDateTime>) -> Round {
        Round {
            round_id: Uuid::nil(),
            name: "Round 1".to_string(),
            slug: "round-1".to_string(),
            description: None,
            status: status.as_str().to_string(),
            created_at: at(8),
            closed_at,
        }
    }

    #[test]
    fn test_closed_round_rejects_submissions() {
        assert!(round(RoundStatus::Open, None).ensure_open().is_ok());

        let err = round(RoundStatus::Closed, Some(at(9))).ensure_open().unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(ref msg) if msg == "Round is closed"));
    }

    #[test]
    fn test_closing_stamps_closed_at() {
        let open = round(RoundStatus::Open, None);
        assert_eq!(open.closed_at_after(RoundStatus::Closed, at(12)), Some(at(12)));
        assert_eq!(open.closed_at_after(RoundStatus::Open, at(12)), None);
    }

    #[test]
    fn test_closing_again_keeps_first_stamp() {
        let closed = round(RoundStatus::Closed, Some(at(9)));
        assert_eq!(closed.closed_at_after(RoundStatus::Closed, at(12)), Some(at(9)));
    }

    #[test]
    fn test_reopening_clears_closed_at() {
        let closed = round(RoundStatus::Closed, Some(at(9)));
        assert_eq!(closed.closed_at_after(RoundStatus::Open, at(12)), None);
    }
}
