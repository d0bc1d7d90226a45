//! reportgen API: HTTP surface for report requests.

pub mod config;
pub mod error;
pub mod namespace;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router without transport layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/reports", routes::reports::router())
        .with_state(state)
}
