use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Rider, Session};

#[derive(FromRow)]
struct SessionRiderRow {
    expires_at: NaiveDateTime,
    #[sqlx(flatten)]
    rider: Rider,
}

pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, rider_id: Uuid, ttl: Duration) -> Result<Session> {
        let expires_at = Utc::now()
            .naive_utc()
            .checked_add_signed(ttl)
            .ok_or_else(|| {
                StorageError::ConstraintViolation("Session lifetime out of range".to_string())
            })?;

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, rider_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, rider_id, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(rider_id)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(session)
    }

    /// Rider owning a token that has not expired yet
    pub async fn find_rider(&self, token: Uuid) -> Result<Rider> {
        let row = sqlx::query_as::<_, SessionRiderRow>(
            r#"
            SELECT s.expires_at, r.rider_id, r.email, r.first_name, r.last_name, r.nickname,
                   r.motorcycle, r.created_at
            FROM sessions s
            INNER JOIN riders r ON s.rider_id = r.rider_id
            WHERE s.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        if !Session::is_live(row.expires_at, Utc::now().naive_utc()) {
            return Err(StorageError::NotFound);
        }

        Ok(row.rider)
    }

    pub async fn delete(&self, token: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Returns the number of sessions removed
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(Utc::now().naive_utc())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
