use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::rider::RegisterRiderRequest;
use crate::error::{Result, StorageError};
use crate::models::{Rider, normalize_email};

const RIDER_COLUMNS: &str =
    "rider_id, email, first_name, last_name, nickname, motorcycle, created_at";

pub struct RiderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RiderRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Rider> {
        let query = format!("SELECT {RIDER_COLUMNS} FROM riders WHERE rider_id = $1");
        sqlx::query_as::<_, Rider>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Case-insensitive lookup used by the email-only login
    pub async fn find_by_email(&self, email: &str) -> Result<Rider> {
        let query = format!("SELECT {RIDER_COLUMNS} FROM riders WHERE email = $1");
        sqlx::query_as::<_, Rider>(&query)
            .bind(normalize_email(email))
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &RegisterRiderRequest) -> Result<Rider> {
        let query = format!(
            r#"
            INSERT INTO riders (rider_id, email, first_name, last_name, nickname, motorcycle)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RIDER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Rider>(&query)
            .bind(Uuid::new_v4())
            .bind(normalize_email(&req.email))
            .bind(req.first_name.trim())
            .bind(req.last_name.trim())
            .bind(trimmed(req.nickname.as_deref()))
            .bind(trimmed(req.motorcycle.as_deref()))
            .fetch_one(self.pool)
            .await
            .map_err(|e| StorageError::from(e).on_unique_violation("Email already registered"))
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
