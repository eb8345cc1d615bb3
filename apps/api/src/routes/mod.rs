pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route(
            "/api/v1/screenings/evaluate",
            post(handlers::handle_evaluate),
        )
        .route("/api/v1/screenings", get(handlers::handle_list))
        .route("/api/v1/screenings/recent", get(handlers::handle_recent))
        .route("/api/v1/screenings/top", get(handlers::handle_top))
        .route("/api/v1/screenings/export", get(handlers::handle_export))
        .with_state(state)
}
