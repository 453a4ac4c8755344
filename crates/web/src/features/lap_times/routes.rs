use axum::{Router, routing::get};
use storage::Database;

use super::handlers::normalize_lap_time;

pub fn routes() -> Router<Database> {
    Router::new().route("/normalize", get(normalize_lap_time))
}
