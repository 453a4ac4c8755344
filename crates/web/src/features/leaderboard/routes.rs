use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{export_leaderboard_csv, get_leaderboard};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/:slug/leaderboard", get(get_leaderboard))
        .route("/:slug/leaderboard.csv", get(export_leaderboard_csv))
}
