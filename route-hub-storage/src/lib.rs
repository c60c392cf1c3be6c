//! Storage layer for Route Hub
//!
//! Provides persistence for the versioned route tree and contact
//! points, with an in-memory backend for development and testing.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StorageError;
pub use memory::InMemoryStorage;
pub use traits::{ContactPointStorage, RouteTreeStorage};

/// Unified storage trait
#[async_trait::async_trait]
pub trait Storage: RouteTreeStorage + ContactPointStorage + Send + Sync {}

#[async_trait::async_trait]
impl<T> Storage for T where T: RouteTreeStorage + ContactPointStorage + Send + Sync {}
