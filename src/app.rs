use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/chart-data", get(handlers::chart_data))
        .route("/add", post(handlers::add_progress))
        .route("/set-total", post(handlers::set_total))
        .route("/set-goal", post(handlers::set_goal))
        .route("/reset", post(handlers::reset))
        .route("/api/timer", get(handlers::timer_status))
        .route("/api/timer/start", post(handlers::timer_start))
        .route("/api/timer/pause", post(handlers::timer_pause))
        .route("/api/timer/reset", post(handlers::timer_reset))
        .with_state(state)
}
