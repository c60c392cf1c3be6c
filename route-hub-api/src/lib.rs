//! Route Hub API Server
//!
//! REST API for managing the notification route tree, filtering it,
//! and previewing alert routing.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Route tree
        .route(
            "/api/routes",
            get(handlers::get_route_tree).put(handlers::replace_route_tree),
        )
        .route("/api/routes/filter", post(handlers::filter_routes))
        .route("/api/routes/preview", post(handlers::preview_routing))
        .route(
            "/api/routes/:id",
            post(handlers::insert_route)
                .patch(handlers::update_route)
                .delete(handlers::delete_route),
        )
        // Contact points
        .route(
            "/api/contact-points",
            post(handlers::create_contact_point).get(handlers::list_contact_points),
        )
        .route(
            "/api/contact-points/:name",
            delete(handlers::delete_contact_point),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
