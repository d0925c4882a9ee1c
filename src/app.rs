use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/points", post(handlers::add_point_form))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/points", post(handlers::add_point))
        .with_state(state)
}
