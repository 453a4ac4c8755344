use axum::{Router, middleware, routing::post};
use storage::Database;

use super::handlers::create_submission;
use crate::middleware::auth::require_session;

pub fn routes(db: Database) -> Router<Database> {
    Router::new()
        .route("/:slug/submissions", post(create_submission))
        .route_layer(middleware::from_fn_with_state(db, require_session))
}
