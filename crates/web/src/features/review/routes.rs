use axum::{
    Router, middleware,
    routing::{get, put},
};
use storage::Database;

use super::handlers::{approve_submission, list_review_queue, reject_submission};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/", get(list_review_queue))
        .route("/:submission_id/approve", put(approve_submission))
        .route("/:submission_id/reject", put(reject_submission))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
