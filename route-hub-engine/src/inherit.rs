//! Route tree inheritance resolution
//!
//! A policy that leaves an attribute unset uses the nearest ancestor's
//! value. Resolution walks the tree pre-order (a child's effective value
//! depends on its parent's resolved value) and returns a fresh tree of
//! identical shape and identities with every effective value filled in.

use route_hub_core::RouteWithId;

/// The attributes a route inherits from its ancestors when unset
#[derive(Debug, Clone, Default)]
struct InheritableProperties {
    receiver: Option<String>,
    group_by: Option<Vec<String>>,
    group_wait: Option<String>,
    group_interval: Option<String>,
    repeat_interval: Option<String>,
    mute_time_intervals: Vec<String>,
}

impl InheritableProperties {
    /// Overlay a node's own values on top of what it inherits
    fn overlay(&self, route: &RouteWithId) -> Self {
        Self {
            receiver: route.receiver.clone().or_else(|| self.receiver.clone()),
            group_by: route.group_by.clone().or_else(|| self.group_by.clone()),
            group_wait: route.group_wait.clone().or_else(|| self.group_wait.clone()),
            group_interval: route
                .group_interval
                .clone()
                .or_else(|| self.group_interval.clone()),
            repeat_interval: route
                .repeat_interval
                .clone()
                .or_else(|| self.repeat_interval.clone()),
            mute_time_intervals: if route.mute_time_intervals.is_empty() {
                self.mute_time_intervals.clone()
            } else {
                route.mute_time_intervals.clone()
            },
        }
    }
}

/// Compute the fully inherited tree.
///
/// Pure: the input is untouched, node identities carry over unchanged.
/// Resolving an already-resolved tree is a no-op (every attribute is
/// already set where an ancestor defines one).
pub fn compute_inherited_tree(root: &RouteWithId) -> RouteWithId {
    resolve(root, &InheritableProperties::default())
}

fn resolve(route: &RouteWithId, inherited: &InheritableProperties) -> RouteWithId {
    let effective = inherited.overlay(route);

    RouteWithId {
        id: route.id,
        receiver: effective.receiver.clone(),
        object_matchers: route.object_matchers.clone(),
        group_by: effective.group_by.clone(),
        group_wait: effective.group_wait.clone(),
        group_interval: effective.group_interval.clone(),
        repeat_interval: effective.repeat_interval.clone(),
        mute_time_intervals: effective.mute_time_intervals.clone(),
        continue_matching: route.continue_matching,
        routes: route
            .routes
            .iter()
            .map(|child| resolve(child, &effective))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn route(receiver: Option<&str>, routes: Vec<RouteWithId>) -> RouteWithId {
        RouteWithId {
            id: Uuid::new_v4(),
            receiver: receiver.map(str::to_string),
            object_matchers: vec![],
            group_by: None,
            group_wait: None,
            group_interval: None,
            repeat_interval: None,
            mute_time_intervals: vec![],
            continue_matching: false,
            routes,
        }
    }

    #[test]
    fn test_children_inherit_unset_receiver() {
        let tree = route(
            Some("default"),
            vec![route(None, vec![]), route(Some("b-team"), vec![])],
        );

        let resolved = compute_inherited_tree(&tree);
        assert_eq!(resolved.receiver.as_deref(), Some("default"));
        assert_eq!(resolved.routes[0].receiver.as_deref(), Some("default"));
        assert_eq!(resolved.routes[1].receiver.as_deref(), Some("b-team"));
    }

    #[test]
    fn test_inheritance_skips_a_generation() {
        let tree = route(
            Some("default"),
            vec![route(None, vec![route(None, vec![])])],
        );

        let resolved = compute_inherited_tree(&tree);
        assert_eq!(
            resolved.routes[0].routes[0].receiver.as_deref(),
            Some("default")
        );
    }

    #[test]
    fn test_identity_and_shape_preserved() {
        let tree = route(Some("default"), vec![route(None, vec![])]);
        let resolved = compute_inherited_tree(&tree);

        assert_eq!(resolved.id, tree.id);
        assert_eq!(resolved.routes.len(), 1);
        assert_eq!(resolved.routes[0].id, tree.routes[0].id);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut inner = route(None, vec![]);
        inner.group_wait = Some("30s".into());
        let mut tree = route(Some("default"), vec![inner]);
        tree.group_by = Some(vec!["alertname".into()]);
        tree.mute_time_intervals = vec!["weekends".into()];

        let once = compute_inherited_tree(&tree);
        let twice = compute_inherited_tree(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unset_everywhere_stays_unset() {
        let tree = route(None, vec![route(None, vec![])]);
        let resolved = compute_inherited_tree(&tree);
        assert_eq!(resolved.routes[0].receiver, None);
    }

    #[test]
    fn test_timing_options_inherit() {
        let mut tree = route(Some("default"), vec![route(None, vec![])]);
        tree.group_wait = Some("45s".into());
        tree.repeat_interval = Some("4h".into());

        let resolved = compute_inherited_tree(&tree);
        assert_eq!(resolved.routes[0].group_wait.as_deref(), Some("45s"));
        assert_eq!(resolved.routes[0].repeat_interval.as_deref(), Some("4h"));
    }
}
