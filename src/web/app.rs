use axum::{
    Router,
    routing::{get, patch},
};
use tower_http::trace::TraceLayer;

use crate::web::{handlers, state::AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        .route(
            "/activity",
            get(handlers::list_activities).post(handlers::create_activity),
        )
        .route(
            "/activity/:id",
            get(handlers::get_activity).delete(handlers::delete_activity),
        )
        .route("/activity/:id/complete", patch(handlers::complete_activity))
        .route("/activity/:id/archive", patch(handlers::archive_activity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
