use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route(
            "/api/reminders",
            get(handlers::list_reminders)
                .post(handlers::create_reminder)
                .delete(handlers::clear_reminders),
        )
        .route("/api/reminders/load", post(handlers::load_reminders))
        .route("/api/reminders/:id", delete(handlers::delete_reminder))
        .route("/healthz", get(handlers::health))
        .with_state(state)
}
