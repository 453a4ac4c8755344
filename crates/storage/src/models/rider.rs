use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rider {
    pub rider_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub motorcycle: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Rider {
    /// Nickname when set, otherwise "First Last".
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name, self.nickname.as_deref())
    }
}

pub(crate) fn display_name(first_name: &str, last_name: &str, nickname: Option<&str>) -> String {
    match nickname.map(str::trim).filter(|n| !n.is_empty()) {
        Some(nickname) => nickname.to_string(),
        None => format!("{} {}", first_name, last_name),
    }
}

/// Emails are compared case-insensitively and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
