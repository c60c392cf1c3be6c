//! Filter combinator
//!
//! Runs one predicate match per active filter category and intersects
//! the per-category results by node id.

use route_hub_core::{RouteFilters, RouteWithId};

use crate::inherit::compute_inherited_tree;
use crate::matcher::{find_routes_matching_predicate, route_matches_filter_matchers};
use crate::EngineError;

pub use crate::matcher::FilterResult;

/// Outcome of applying a [`RouteFilters`] to the tree
#[derive(Debug, Clone, Default)]
pub struct RoutesMatchingFilters {
    /// False when no filter was active (or there was no tree to filter);
    /// callers render the full tree in that case
    pub filters_applied: bool,
    /// Matched node ids with their root-first ancestor paths
    pub matched_routes_with_path: FilterResult,
}

/// Apply the active filters to the route tree.
///
/// With no root or no active filter this returns immediately without
/// touching the tree. Otherwise the tree is resolved once (contact-point
/// filtering compares effective, inherited receivers) and matched once
/// per active filter category; a node ends up in the result only if
/// every active category matched it.
///
/// Intersection is defined for any number of categories: the first
/// category's map is authoritative for paths, which are identical per
/// node anyway since all passes walk the same tree.
pub fn find_routes_matching_filters(
    root: Option<&RouteWithId>,
    filters: &RouteFilters,
) -> Result<RoutesMatchingFilters, EngineError> {
    let Some(root) = root else {
        return Ok(RoutesMatchingFilters::default());
    };
    if !filters.is_active() {
        return Ok(RoutesMatchingFilters::default());
    }

    let full_route = compute_inherited_tree(root);

    let mut category_results: Vec<FilterResult> = Vec::new();

    if let Some(contact_point) = filters.contact_point.as_deref() {
        category_results.push(find_routes_matching_predicate(&full_route, |route| {
            route.receiver.as_deref() == Some(contact_point)
        })?);
    }

    if !filters.label_matchers.is_empty() {
        category_results.push(find_routes_matching_predicate(&full_route, |route| {
            route_matches_filter_matchers(route, &filters.label_matchers)
        })?);
    }

    Ok(RoutesMatchingFilters {
        filters_applied: true,
        matched_routes_with_path: intersect(category_results),
    })
}

/// N-way intersection by node id; one category is the degenerate case
fn intersect(mut results: Vec<FilterResult>) -> FilterResult {
    if results.len() <= 1 {
        return results.pop().unwrap_or_default();
    }

    let (first, rest) = results.split_first().expect("len checked above");
    first
        .iter()
        .filter(|(id, _)| rest.iter().all(|other| other.contains_key(*id)))
        .map(|(id, path)| (*id, path.clone()))
        .collect()
}
