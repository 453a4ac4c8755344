use sqlx::PgPool;
use storage::{
    dto::rider::RegisterRiderRequest, error::Result, models::Rider,
    repository::rider::RiderRepository,
};
use uuid::Uuid;

/// Register a new rider
pub async fn register_rider(pool: &PgPool, request: &RegisterRiderRequest) -> Result<Rider> {
    let repo = RiderRepository::new(pool);
    let rider = repo.create(request).await?;
    tracing::info!(rider_id = %rider.rider_id, "Rider registered");
    Ok(rider)
}

pub async fn get_rider(pool: &PgPool, rider_id: Uuid) -> Result<Rider> {
    let repo = RiderRepository::new(pool);
    repo.find_by_id(rider_id).await
}
