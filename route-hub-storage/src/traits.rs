//! Storage traits defining the interface for persistence

use async_trait::async_trait;
use route_hub_core::{ContactPoint, RouteNode, VersionedRouteTree};

use crate::StorageError;

/// Trait for route tree storage operations.
///
/// The tree is stored whole and versioned; concurrent editors are
/// detected through the version they last saw.
#[async_trait]
pub trait RouteTreeStorage: Send + Sync {
    /// Get the current tree with its version
    async fn get_tree(&self) -> Result<VersionedRouteTree, StorageError>;

    /// Replace the tree. Fails with [`StorageError::Conflict`] when
    /// `expected_version` is not the stored version. Node ids are
    /// reassigned on every replacement.
    async fn replace_tree(
        &self,
        expected_version: u64,
        root: RouteNode,
    ) -> Result<VersionedRouteTree, StorageError>;
}

/// Trait for contact point storage operations
#[async_trait]
pub trait ContactPointStorage: Send + Sync {
    /// Save a new contact point; names are unique
    async fn save(&self, contact_point: ContactPoint) -> Result<ContactPoint, StorageError>;

    /// Get a contact point by name
    async fn get_by_name(&self, name: &str) -> Result<Option<ContactPoint>, StorageError>;

    /// List all contact points, ordered by name
    async fn list(&self) -> Result<Vec<ContactPoint>, StorageError>;

    /// Delete a contact point by name
    async fn delete(&self, name: &str) -> Result<(), StorageError>;
}
