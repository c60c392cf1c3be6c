//! In-memory storage implementation for development and testing

use async_trait::async_trait;
use route_hub_core::{ContactPoint, RouteNode, VersionedRouteTree};
use route_hub_tree::add_unique_identifiers;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::{ContactPointStorage, RouteTreeStorage, StorageError};

/// In-memory storage for development and testing.
///
/// Starts at version 1 with an empty root policy, which is assumed to
/// always exist.
pub struct InMemoryStorage {
    tree: RwLock<VersionedRouteTree>,
    contact_points: RwLock<HashMap<String, ContactPoint>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(VersionedRouteTree {
                version: 1,
                root: add_unique_identifiers(RouteNode::default()),
            }),
            contact_points: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouteTreeStorage for InMemoryStorage {
    async fn get_tree(&self) -> Result<VersionedRouteTree, StorageError> {
        let tree = self.tree.read().unwrap();
        Ok(tree.clone())
    }

    async fn replace_tree(
        &self,
        expected_version: u64,
        root: RouteNode,
    ) -> Result<VersionedRouteTree, StorageError> {
        let mut tree = self.tree.write().unwrap();

        if tree.version != expected_version {
            return Err(StorageError::Conflict {
                expected: expected_version,
                actual: tree.version,
            });
        }

        *tree = VersionedRouteTree {
            version: tree.version + 1,
            root: add_unique_identifiers(root),
        };
        tracing::debug!("Replaced route tree, now at version {}", tree.version);

        Ok(tree.clone())
    }
}

#[async_trait]
impl ContactPointStorage for InMemoryStorage {
    async fn save(&self, contact_point: ContactPoint) -> Result<ContactPoint, StorageError> {
        let mut contact_points = self.contact_points.write().unwrap();

        if contact_points.contains_key(&contact_point.name) {
            return Err(StorageError::AlreadyExists(format!(
                "Contact point '{}' already exists",
                contact_point.name
            )));
        }

        contact_points.insert(contact_point.name.clone(), contact_point.clone());
        Ok(contact_point)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<ContactPoint>, StorageError> {
        let contact_points = self.contact_points.read().unwrap();
        Ok(contact_points.get(name).cloned())
    }

    async fn list(&self) -> Result<Vec<ContactPoint>, StorageError> {
        let contact_points = self.contact_points.read().unwrap();
        let mut all: Vec<_> = contact_points.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let mut contact_points = self.contact_points.write().unwrap();
        if contact_points.remove(name).is_some() {
            Ok(())
        } else {
            Err(StorageError::NotFound(format!(
                "Contact point '{}' not found",
                name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_tree_is_an_empty_root() {
        let storage = InMemoryStorage::new();
        let tree = storage.get_tree().await.unwrap();

        assert_eq!(tree.version, 1);
        assert!(tree.root.routes.is_empty());
        assert!(tree.root.receiver.is_none());
    }

    #[tokio::test]
    async fn test_replace_bumps_version_and_reassigns_ids() {
        let storage = InMemoryStorage::new();
        let old = storage.get_tree().await.unwrap();

        let new_root = RouteNode {
            receiver: Some("default".into()),
            routes: vec![RouteNode::default()],
            ..Default::default()
        };
        let replaced = storage.replace_tree(old.version, new_root).await.unwrap();

        assert_eq!(replaced.version, 2);
        assert_eq!(replaced.root.routes.len(), 1);
        assert_ne!(replaced.root.id, old.root.id);
    }

    #[tokio::test]
    async fn test_stale_replace_conflicts() {
        let storage = InMemoryStorage::new();
        let seen = storage.get_tree().await.unwrap();

        // another editor replaces first
        storage
            .replace_tree(seen.version, RouteNode::default())
            .await
            .unwrap();

        let err = storage
            .replace_tree(seen.version, RouteNode::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Conflict {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_contact_point_lifecycle() {
        let storage = InMemoryStorage::new();
        let cp = ContactPoint::new("ops".into(), vec!["email".into()]);

        storage.save(cp.clone()).await.unwrap();
        assert!(matches!(
            storage.save(cp).await,
            Err(StorageError::AlreadyExists(_))
        ));

        let found = storage.get_by_name("ops").await.unwrap().unwrap();
        assert_eq!(found.integrations, vec!["email".to_string()]);

        storage
            .save(ContactPoint::new("a-team".into(), vec![]))
            .await
            .unwrap();
        let names: Vec<_> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["a-team".to_string(), "ops".to_string()]);

        storage.delete("ops").await.unwrap();
        assert!(matches!(
            storage.delete("ops").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
