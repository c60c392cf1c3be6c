//! Route identity management
//!
//! External configuration carries no node identities; ids are assigned
//! when a tree is ingested and stripped again before it is persisted,
//! so stored configuration stays byte-compatible with its schema.

use route_hub_core::{RouteNode, RouteWithId};
use uuid::Uuid;

/// Assign a fresh unique id to every node
pub fn add_unique_identifiers(node: RouteNode) -> RouteWithId {
    RouteWithId {
        id: Uuid::new_v4(),
        receiver: node.receiver,
        object_matchers: node.object_matchers,
        group_by: node.group_by,
        group_wait: node.group_wait,
        group_interval: node.group_interval,
        repeat_interval: node.repeat_interval,
        mute_time_intervals: node.mute_time_intervals,
        continue_matching: node.continue_matching,
        routes: node.routes.into_iter().map(add_unique_identifiers).collect(),
    }
}

/// Drop all node ids, yielding the external configuration shape
pub fn strip_identifiers(route: &RouteWithId) -> RouteNode {
    RouteNode {
        receiver: route.receiver.clone(),
        object_matchers: route.object_matchers.clone(),
        group_by: route.group_by.clone(),
        group_wait: route.group_wait.clone(),
        group_interval: route.group_interval.clone(),
        repeat_interval: route.repeat_interval.clone(),
        mute_time_intervals: route.mute_time_intervals.clone(),
        continue_matching: route.continue_matching,
        routes: route.routes.iter().map(strip_identifiers).collect(),
    }
}
