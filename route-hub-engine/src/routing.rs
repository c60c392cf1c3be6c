//! Label-set routing preview
//!
//! Given a concrete alert label set, determine which policies it would
//! be delivered to. This is the alertmanager descent: a policy accepts
//! a label set when all of its matchers hold; the first accepting child
//! handles it, unless that child sets `continue`, in which case its
//! later siblings are evaluated too. A policy whose children all reject
//! the label set handles it itself.

use route_hub_core::{AlertLabels, RouteWithId};

use crate::matcher::matcher_matches_labels;

/// Find the routes an alert label set is delivered to.
///
/// The returned routes come from the tree passed in; pass a resolved
/// tree (see [`crate::compute_inherited_tree`]) when effective receivers
/// are needed. The root accepts every label set, so the result is never
/// empty.
pub fn find_matching_routes<'a>(root: &'a RouteWithId, labels: &AlertLabels) -> Vec<&'a RouteWithId> {
    let mut matches = Vec::new();
    descend(root, labels, &mut matches);
    matches
}

fn descend<'a>(route: &'a RouteWithId, labels: &AlertLabels, matches: &mut Vec<&'a RouteWithId>) {
    let mut handled_by_child = false;

    for child in &route.routes {
        if !accepts(child, labels) {
            continue;
        }

        descend(child, labels, matches);
        handled_by_child = true;

        if !child.continue_matching {
            break;
        }
    }

    if !handled_by_child {
        matches.push(route);
    }
}

fn accepts(route: &RouteWithId, labels: &AlertLabels) -> bool {
    route
        .object_matchers
        .iter()
        .all(|matcher| matcher_matches_labels(matcher, labels))
}
