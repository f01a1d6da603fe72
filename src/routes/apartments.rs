//! Apartment CRUD routes under `/apartments`.

use crate::handlers::apartments::{create, delete, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn apartment_routes(state: AppState) -> Router {
    Router::new()
        .route("/apartments", get(list).post(create))
        .route("/apartments/:id", get(read).put(update).delete(delete))
        .with_state(state)
}
