//! Pure edit operations on an identified route tree

use route_hub_core::{InsertPosition, RouteNode, RouteUpdate, RouteWithId};
use uuid::Uuid;

use crate::ids::add_unique_identifiers;
use crate::TreeError;

/// Insert a new route relative to the route with id `reference`.
///
/// `Above`/`Below` insert a sibling before/after the reference (the root
/// has no siblings, so that is an error); `Child` appends to the
/// reference's children.
pub fn add_route(
    root: &RouteWithId,
    reference: Uuid,
    new_route: RouteNode,
    position: InsertPosition,
) -> Result<RouteWithId, TreeError> {
    if root.id == reference && position != InsertPosition::Child {
        return Err(TreeError::CannotInsertAtRoot);
    }

    let new_route = add_unique_identifiers(new_route);
    let mut root = root.clone();
    if insert(&mut root, reference, &new_route, position) {
        Ok(root)
    } else {
        Err(TreeError::RouteNotFound(reference))
    }
}

fn insert(
    node: &mut RouteWithId,
    reference: Uuid,
    new_route: &RouteWithId,
    position: InsertPosition,
) -> bool {
    if position == InsertPosition::Child && node.id == reference {
        node.routes.push(new_route.clone());
        return true;
    }

    if position != InsertPosition::Child {
        if let Some(idx) = node.routes.iter().position(|child| child.id == reference) {
            let at = match position {
                InsertPosition::Above => idx,
                InsertPosition::Below => idx + 1,
                InsertPosition::Child => unreachable!("handled above"),
            };
            node.routes.insert(at, new_route.clone());
            return true;
        }
    }

    node.routes
        .iter_mut()
        .any(|child| insert(child, reference, new_route, position))
}

/// Merge a partial update into the route with the given id.
/// Only fields present in the update are replaced; children and identity
/// are untouched.
pub fn update_route(
    root: &RouteWithId,
    id: Uuid,
    update: &RouteUpdate,
) -> Result<RouteWithId, TreeError> {
    let mut root = root.clone();
    if merge(&mut root, id, update) {
        Ok(root)
    } else {
        Err(TreeError::RouteNotFound(id))
    }
}

fn merge(node: &mut RouteWithId, id: Uuid, update: &RouteUpdate) -> bool {
    if node.id == id {
        if let Some(receiver) = &update.receiver {
            node.receiver = Some(receiver.clone());
        }
        if let Some(matchers) = &update.object_matchers {
            node.object_matchers = matchers.clone();
        }
        if let Some(group_by) = &update.group_by {
            node.group_by = Some(group_by.clone());
        }
        if let Some(group_wait) = &update.group_wait {
            node.group_wait = Some(group_wait.clone());
        }
        if let Some(group_interval) = &update.group_interval {
            node.group_interval = Some(group_interval.clone());
        }
        if let Some(repeat_interval) = &update.repeat_interval {
            node.repeat_interval = Some(repeat_interval.clone());
        }
        if let Some(mute) = &update.mute_time_intervals {
            node.mute_time_intervals = mute.clone();
        }
        if let Some(continue_matching) = update.continue_matching {
            node.continue_matching = continue_matching;
        }
        return true;
    }

    node.routes.iter_mut().any(|child| merge(child, id, update))
}

/// Remove the subtree rooted at the route with the given id
pub fn omit_route(root: &RouteWithId, id: Uuid) -> Result<RouteWithId, TreeError> {
    if root.id == id {
        return Err(TreeError::CannotRemoveRoot);
    }

    let mut root = root.clone();
    if omit(&mut root, id) {
        Ok(root)
    } else {
        Err(TreeError::RouteNotFound(id))
    }
}

fn omit(node: &mut RouteWithId, id: Uuid) -> bool {
    let before = node.routes.len();
    node.routes.retain(|child| child.id != id);
    if node.routes.len() < before {
        return true;
    }

    node.routes.iter_mut().any(|child| omit(child, id))
}
