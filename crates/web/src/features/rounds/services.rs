use sqlx::PgPool;
use storage::{
    dto::round::{CreateRoundRequest, RoundStatus, UpdateRoundRequest},
    error::Result,
    models::Round,
    repository::round::RoundRepository,
};

/// List rounds, optionally filtered by status
pub async fn list_rounds(pool: &PgPool, status: Option<RoundStatus>) -> Result<Vec<Round>> {
    let repo = RoundRepository::new(pool);
    repo.list(status).await
}

pub async fn get_round_by_slug(pool: &PgPool, slug: &str) -> Result<Round> {
    let repo = RoundRepository::new(pool);
    repo.find_by_slug(slug).await
}

pub async fn create_round(pool: &PgPool, request: &CreateRoundRequest) -> Result<Round> {
    let repo = RoundRepository::new(pool);
    let round = repo.create(request).await?;
    tracing::info!(slug = %round.slug, status = %round.status, "Round created");
    Ok(round)
}

pub async fn update_round(
    pool: &PgPool,
    slug: &str,
    request: &UpdateRoundRequest,
) -> Result<Round> {
    let repo = RoundRepository::new(pool);

    let existing = repo.find_by_slug(slug).await?;
    let updated = repo.update(&existing, request).await?;
    if updated.status != existing.status {
        tracing::info!(slug = %updated.slug, status = %updated.status, "Round status changed");
    }
    Ok(updated)
}

pub async fn delete_round(pool: &PgPool, slug: &str) -> Result<()> {
    let repo = RoundRepository::new(pool);
    let round = repo.find_by_slug(slug).await?;
    repo.delete(round.round_id).await
}
