//! Route Hub - Main Application Entry Point
//!
//! A notification-policy routing service: stores an alertmanager-style
//! route tree and serves filtering, editing, and routing preview.

use route_hub_api::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,route_hub=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    tracing::info!("Starting Route Hub server on {}:{}", host, port);

    tracing::info!("Initializing InMemory storage...");
    let storage = Arc::new(route_hub_storage::InMemoryStorage::new());

    // Create shared application state
    let app_state = Arc::new(AppState::with_storage(storage));

    // Build our application with routes
    let app = route_hub_api::create_router(app_state);

    // Run it
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
