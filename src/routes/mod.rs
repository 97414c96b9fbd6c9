pub mod assets;
pub mod day;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full HTTP surface: day page, actions, JSON view and static assets.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(day::router())
        .merge(assets::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
