use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{login, logout, profile};
use crate::middleware::auth::require_session;

pub fn routes(db: Database) -> Router<Database> {
    let protected = Router::new()
        .route("/", delete(logout))
        .route_layer(middleware::from_fn_with_state(db, require_session));

    Router::new().route("/", post(login)).merge(protected)
}

pub fn profile_routes(db: Database) -> Router<Database> {
    Router::new()
        .route("/", get(profile))
        .route_layer(middleware::from_fn_with_state(db, require_session))
}
