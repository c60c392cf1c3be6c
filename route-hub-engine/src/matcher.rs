//! Predicate matching over the route tree and label matcher evaluation

use std::collections::{HashMap, HashSet};

use regex::Regex;
use route_hub_core::{AlertLabels, MatchOperator, ObjectMatcher, RouteWithId};
use uuid::Uuid;

use crate::EngineError;

/// Matched node id mapped to its root-first ancestor path, the matched
/// node itself included as the path terminus
pub type FilterResult = HashMap<Uuid, Vec<Uuid>>;

/// Collect every route for which the predicate holds, together with its
/// ancestor path.
///
/// Depth-first, every node visited exactly once; a match does not prune
/// sibling subtrees. The predicate must be side-effect-free. Duplicate
/// node ids abort the walk, since an id-keyed result cannot represent
/// them faithfully.
pub fn find_routes_matching_predicate<P>(
    root: &RouteWithId,
    predicate: P,
) -> Result<FilterResult, EngineError>
where
    P: Fn(&RouteWithId) -> bool,
{
    let mut matches = FilterResult::new();
    let mut seen = HashSet::new();
    let mut path = Vec::new();
    visit(root, &predicate, &mut path, &mut seen, &mut matches)?;
    Ok(matches)
}

fn visit<P>(
    route: &RouteWithId,
    predicate: &P,
    path: &mut Vec<Uuid>,
    seen: &mut HashSet<Uuid>,
    matches: &mut FilterResult,
) -> Result<(), EngineError>
where
    P: Fn(&RouteWithId) -> bool,
{
    if !seen.insert(route.id) {
        return Err(EngineError::DuplicateRouteId(route.id));
    }

    path.push(route.id);
    if predicate(route) {
        matches.insert(route.id, path.clone());
    }
    for child in &route.routes {
        visit(child, predicate, path, seen, matches)?;
    }
    path.pop();

    Ok(())
}

/// Whether a route matches a label-matcher filter: every filter matcher
/// must appear verbatim among the route's own configured matchers.
///
/// A route with no matchers of its own never matches.
pub fn route_matches_filter_matchers(route: &RouteWithId, filter_matchers: &[ObjectMatcher]) -> bool {
    if route.object_matchers.is_empty() {
        return false;
    }

    filter_matchers
        .iter()
        .all(|wanted| route.object_matchers.contains(wanted))
}

/// Evaluate a single matcher against an alert label set.
///
/// Absent labels compare as the empty string, matching alertmanager
/// semantics. Regex patterns are fully anchored. A matcher whose pattern
/// fails to compile matches nothing, regardless of negation.
pub fn matcher_matches_labels(matcher: &ObjectMatcher, labels: &AlertLabels) -> bool {
    let value = labels
        .get(&matcher.label)
        .map(String::as_str)
        .unwrap_or("");

    match matcher.operator {
        MatchOperator::Equal => value == matcher.value,
        MatchOperator::NotEqual => value != matcher.value,
        MatchOperator::Regex => match compile_anchored(&matcher.value) {
            Some(re) => re.is_match(value),
            None => false,
        },
        MatchOperator::NotRegex => match compile_anchored(&matcher.value) {
            Some(re) => !re.is_match(value),
            None => false,
        },
    }
}

fn compile_anchored(pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::debug!("Ignoring matcher with invalid regex '{}': {}", pattern, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_hub_core::MatchOperator;
    use std::cell::Cell;

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
    fn test_matches_carry_root_first_paths() {
        let leaf = route(Some("ops"), vec![]);
        let mid = route(None, vec![leaf.clone()]);
        let root = route(Some("ops"), vec![mid.clone()]);

        let result =
            find_routes_matching_predicate(&root, |r| r.receiver.as_deref() == Some("ops"))
                .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[&root.id], vec![root.id]);
        assert_eq!(result[&leaf.id], vec![root.id, mid.id, leaf.id]);
    }

    #[test]
    fn test_every_node_visited_exactly_once() {
        let tree = route(
            Some("a"),
            vec![
                route(Some("b"), vec![route(Some("c"), vec![])]),
                route(Some("d"), vec![]),
            ],
        );

        let visits = Cell::new(0usize);
        let result = find_routes_matching_predicate(&tree, |_| {
            visits.set(visits.get() + 1);
            true
        })
        .unwrap();

        // matching a node must not prune its own or sibling subtrees
        assert_eq!(visits.get(), 4);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let child = route(None, vec![]);
        let mut dup = route(None, vec![]);
        dup.id = child.id;
        let root = route(Some("default"), vec![child, dup]);

        let err = find_routes_matching_predicate(&root, |_| true).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateRouteId(_)));
    }

    #[test]
    fn test_route_without_matchers_never_matches_filter() {
        let bare = route(None, vec![]);
        let wanted = vec![ObjectMatcher::new("team", MatchOperator::Equal, "ops")];
        assert!(!route_matches_filter_matchers(&bare, &wanted));
    }

    #[test]
    fn test_filter_matchers_compare_by_triple_equality() {
        let mut r = route(None, vec![]);
        r.object_matchers = vec![
            ObjectMatcher::new("team", MatchOperator::Equal, "ops"),
            ObjectMatcher::new("severity", MatchOperator::Equal, "critical"),
        ];

        let subset = vec![ObjectMatcher::new("team", MatchOperator::Equal, "ops")];
        assert!(route_matches_filter_matchers(&r, &subset));

        // same label and value but a different operator is a different matcher
        let other_op = vec![ObjectMatcher::new("team", MatchOperator::Regex, "ops")];
        assert!(!route_matches_filter_matchers(&r, &other_op));

        let missing = vec![
            ObjectMatcher::new("team", MatchOperator::Equal, "ops"),
            ObjectMatcher::new("env", MatchOperator::Equal, "prod"),
        ];
        assert!(!route_matches_filter_matchers(&r, &missing));
    }

    #[test]
    fn test_label_evaluation_operators() {
        let labels: AlertLabels = [("env".to_string(), "prod-eu".to_string())]
            .into_iter()
            .collect();

        let eq = ObjectMatcher::new("env", MatchOperator::Equal, "prod-eu");
        assert!(matcher_matches_labels(&eq, &labels));

        let ne = ObjectMatcher::new("env", MatchOperator::NotEqual, "prod-eu");
        assert!(!matcher_matches_labels(&ne, &labels));

        let re = ObjectMatcher::new("env", MatchOperator::Regex, "prod-.*");
        assert!(matcher_matches_labels(&re, &labels));

        let nre = ObjectMatcher::new("env", MatchOperator::NotRegex, "dev-.*");
        assert!(matcher_matches_labels(&nre, &labels));
    }

    #[test]
    fn test_regex_is_anchored() {
        let labels: AlertLabels = [("env".to_string(), "preprod".to_string())]
            .into_iter()
            .collect();

        // "prod" occurs inside the value but does not span it
        let re = ObjectMatcher::new("env", MatchOperator::Regex, "prod");
        assert!(!matcher_matches_labels(&re, &labels));
    }

    #[test]
    fn test_absent_label_compares_as_empty() {
        let labels = AlertLabels::new();

        let eq_empty = ObjectMatcher::new("team", MatchOperator::Equal, "");
        assert!(matcher_matches_labels(&eq_empty, &labels));

        let ne = ObjectMatcher::new("team", MatchOperator::NotEqual, "ops");
        assert!(matcher_matches_labels(&ne, &labels));
    }

    #[test]
    fn test_invalid_regex_matches_nothing() {
        let labels: AlertLabels = [("env".to_string(), "prod".to_string())]
            .into_iter()
            .collect();

        let bad = ObjectMatcher::new("env", MatchOperator::Regex, "prod[");
        assert!(!matcher_matches_labels(&bad, &labels));

        // negated form does not invert into matching everything
        let bad_neg = ObjectMatcher::new("env", MatchOperator::NotRegex, "prod[");
        assert!(!matcher_matches_labels(&bad_neg, &labels));
    }
}
