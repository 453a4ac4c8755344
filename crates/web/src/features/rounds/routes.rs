use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{create_round, delete_round, get_round, list_rounds, update_round};
use crate::features::{leaderboard, submissions};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys, db: Database) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_round))
        .route("/:slug", put(update_round))
        .route("/:slug", delete(delete_round))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_rounds))
        .route("/:slug", get(get_round))
        .merge(leaderboard::routes::routes())
        .merge(submissions::routes::routes(db))
        .merge(protected)
}
