use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/moods",
            get(handlers::list_moods).post(handlers::log_mood),
        )
        .route("/api/insights", get(handlers::get_insights))
        .route(
            "/api/preferences",
            get(handlers::get_preferences).put(handlers::put_preferences),
        )
        .route(
            "/api/storage",
            get(handlers::storage_status).delete(handlers::clear_storage),
        )
        .with_state(state)
}
