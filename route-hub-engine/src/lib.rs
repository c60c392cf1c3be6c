//! Route filtering and matching engine
//!
//! Pure computations over an identified route tree: inheritance
//! resolution, predicate matching with ancestor paths, filter
//! combination, and label-set routing preview.

pub mod error;
pub mod filter;
pub mod inherit;
pub mod matcher;
pub mod routing;

pub use error::EngineError;
pub use filter::{find_routes_matching_filters, FilterResult, RoutesMatchingFilters};
pub use inherit::compute_inherited_tree;
pub use matcher::{find_routes_matching_predicate, matcher_matches_labels, route_matches_filter_matchers};
pub use routing::find_matching_routes;
