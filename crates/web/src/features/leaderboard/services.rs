use sqlx::PgPool;
use storage::{dto::leaderboard::LeaderboardResponse, error::Result, services::leaderboard};

/// Ranked best runs of a round
pub async fn get_leaderboard(pool: &PgPool, slug: &str) -> Result<LeaderboardResponse> {
    leaderboard::round_leaderboard(pool, slug).await
}

/// Same leaderboard rendered as CSV
pub async fn export_leaderboard_csv(pool: &PgPool, slug: &str) -> Result<String> {
    let leaderboard = leaderboard::round_leaderboard(pool, slug).await?;
    leaderboard.to_csv()
}
