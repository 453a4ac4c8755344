use sqlx::PgPool;
use storage::{
    dto::rider::{ProfileResponse, RiderResponse, SessionResponse},
    error::Result,
    models::Rider,
    repository::{
        rider::RiderRepository, session::SessionRepository, submission::SubmissionRepository,
    },
};
use uuid::Uuid;

/// Email-only login: any registered address gets a fresh session
pub async fn login(pool: &PgPool, email: &str, ttl: chrono::Duration) -> Result<SessionResponse> {
    let rider = RiderRepository::new(pool).find_by_email(email).await?;

    let sessions = SessionRepository::new(pool);
    let purged = sessions.purge_expired().await?;
    if purged > 0 {
        tracing::debug!(purged, "Removed expired sessions");
    }

    let session = sessions.create(rider.rider_id, ttl).await?;
    tracing::info!(rider_id = %rider.rider_id, "Rider logged in");

    Ok(SessionResponse {
        token: session.token,
        expires_at: session.expires_at,
        rider: RiderResponse::from(rider),
    })
}

pub async fn logout(pool: &PgPool, token: Uuid) -> Result<()> {
    SessionRepository::new(pool).delete(token).await
}

pub async fn profile(pool: &PgPool, rider: Rider) -> Result<ProfileResponse> {
    let submissions = SubmissionRepository::new(pool)
        .list_for_rider(rider.rider_id)
        .await?;

    Ok(ProfileResponse {
        email: rider.email.clone(),
        rider: RiderResponse::from(rider),
        submissions,
    })
}
