pub mod health;
pub mod index;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::talking_points::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        .route("/generate", post(handlers::handle_generate))
        .with_state(state)
}
