//! Link board backend.
//!
//! Boards are grids of link cells stored as one JSON document per post. Cells
//! rotate between weighted link variants, pages grow and shrink by whole rows
//! and columns, and click counters feed read-only analytics.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod grid;
pub mod models;
pub mod rotation;
pub mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // Viewer routes
    let public_routes = Router::new()
        .route("/boards/{post_id}/view", get(api::view_board))
        .route(
            "/boards/{post_id}/cells/{cell_id}/links/{link_id}/click",
            post(api::record_click),
        );

    // Moderator routes
    let moderator_routes = Router::new()
        .route(
            "/boards/{post_id}",
            get(api::get_board)
                .put(api::put_board)
                .delete(api::delete_board),
        )
        // Grid structure
        .route("/boards/{post_id}/pages/{page}", put(api::update_page))
        .route("/boards/{post_id}/pages/{page}/rows", post(api::add_row))
        .route(
            "/boards/{post_id}/pages/{page}/rows/{row}",
            axum::routing::delete(api::remove_row),
        )
        .route(
            "/boards/{post_id}/pages/{page}/columns",
            post(api::add_column),
        )
        .route(
            "/boards/{post_id}/pages/{page}/columns/{col}",
            axum::routing::delete(api::remove_column),
        )
        // Cells and variants
        .route("/boards/{post_id}/cells/{cell_id}", put(api::update_cell))
        .route(
            "/boards/{post_id}/cells/{cell_id}/links",
            post(api::add_variant),
        )
        .route(
            "/boards/{post_id}/cells/{cell_id}/links/{link_id}",
            put(api::update_variant).delete(api::remove_variant),
        )
        .route(
            "/boards/{post_id}/cells/{cell_id}/probabilities",
            get(api::variant_probabilities),
        )
        // Analytics
        .route("/boards/{post_id}/analytics", get(api::get_analytics))
        .route(
            "/boards/{post_id}/analytics/reset",
            post(api::reset_analytics),
        )
        .route(
            "/boards/{post_id}/pages/{page}/heatmap",
            get(api::get_heatmap),
        )
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(moderator_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
