use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::round::{CreateRoundRequest, RoundStatus, UpdateRoundRequest, slugify};
use crate::error::{Result, StorageError};
use crate::models::Round;

const ROUND_COLUMNS: &str = "round_id, name, slug, description, status, created_at, closed_at";

/// Repository for Round database operations
pub struct RoundRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoundRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List rounds, newest first, optionally only open or closed ones
    pub async fn list(&self, status: Option<RoundStatus>) -> Result<Vec<Round>> {
        let mut query = QueryBuilder::new(format!("SELECT {ROUND_COLUMNS} FROM rounds WHERE 1=1"));

        if let Some(status) = status {
            query.push(" AND status = ");
            query.push_bind(status.as_str());
        }

        query.push(" ORDER BY created_at DESC");

        let rounds = query.build_query_as::<Round>().fetch_all(self.pool).await?;

        Ok(rounds)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Round> {
        let query = format!("SELECT {ROUND_COLUMNS} FROM rounds WHERE slug = $1");
        sqlx::query_as::<_, Round>(&query)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Append -2, -3, ... to `base` until no round uses it
    pub async fn generate_unique_slug(&self, base: &str) -> Result<String> {
        let mut slug = base.to_string();
        let mut counter = 2;

        while sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM rounds WHERE slug = $1)")
            .bind(&slug)
            .fetch_one(self.pool)
            .await?
        {
            slug = format!("{}-{}", base, counter);
            counter += 1;
        }

        Ok(slug)
    }

    pub async fn create(&self, req: &CreateRoundRequest) -> Result<Round> {
        let slug = match &req.slug {
            Some(slug) => slug.clone(),
            None => self.generate_unique_slug(&slugify(&req.name)).await?,
        };

        let query = format!(
            r#"
            INSERT INTO rounds (round_id, name, slug, description, status, closed_at)
            VALUES ($1, $2, $3, $4, $5, CASE WHEN $5 = 'closed' THEN NOW() END)
            RETURNING {ROUND_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Round>(&query)
            .bind(Uuid::new_v4())
            .bind(req.name.trim())
            .bind(slug)
            .bind(req.description.as_deref())
            .bind(req.status.as_str())
            .fetch_one(self.pool)
            .await
            .map_err(|e| StorageError::from(e).on_unique_violation("Slug already exists"))
    }

    /// Apply the fields present in `req`. Closing stamps `closed_at`, reopening clears it.
    pub async fn update(&self, existing: &Round, req: &UpdateRoundRequest) -> Result<Round> {
        let name = req.name.as_deref().unwrap_or(&existing.name);
        let description = req.description.as_deref().or(existing.description.as_deref());
        let closed_at = match req.status {
            Some(status) => existing.closed_at_after(status, Utc::now().naive_utc()),
            None => existing.closed_at,
        };
        let status = req
            .status
            .map(|s| s.as_str())
            .unwrap_or(existing.status.as_str());

        let query = format!(
            r#"
            UPDATE rounds
            SET name = $2, description = $3, status = $4, closed_at = $5
            WHERE round_id = $1
            RETURNING {ROUND_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Round>(&query)
            .bind(existing.round_id)
            .bind(name)
            .bind(description)
            .bind(status)
            .bind(closed_at)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn set_status(&self, slug: &str, status: RoundStatus) -> Result<Round> {
        let existing = self.find_by_slug(slug).await?;
        let req = UpdateRoundRequest {
            status: Some(status),
            ..Default::default()
        };
        self.update(&existing, &req).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM rounds WHERE round_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
