//! Application state shared across handlers

use route_hub_storage::{ContactPointStorage, InMemoryStorage, RouteTreeStorage, Storage};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub route_storage: Arc<dyn RouteTreeStorage + Send + Sync>,
    pub contact_point_storage: Arc<dyn ContactPointStorage + Send + Sync>,
}

impl AppState {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStorage::new());
        Self::with_storage(store)
    }

    /// Create with custom storage backend
    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            route_storage: storage.clone(),
            contact_point_storage: storage,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
