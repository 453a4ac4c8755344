use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{get_rider, register_rider};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", post(register_rider))
        .route("/:rider_id", get(get_rider))
}
