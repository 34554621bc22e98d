//! HTTP front end for capturing a signature in the browser.
//!
//! The capture page draws on a canvas and posts the snapshot as a data URI.
//! The service validates it, stores it in the single signature slot and
//! hands it back for retrieval or download.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use state::AppState;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health_check))
        .route("/save_canvas", post(api::save_canvas))
        .route("/retrieve_canvas", get(api::retrieve_canvas))
        .route("/download_canvas", get(api::download_canvas))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
