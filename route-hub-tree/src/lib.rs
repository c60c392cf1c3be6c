//! Structural edits on the route tree
//!
//! Identity management (assigning ids at ingestion, stripping them
//! before persisting) and pure edit operations: insert relative to a
//! reference route, merge a partial update, remove a subtree. Every
//! operation leaves its input untouched and returns a fresh tree.

pub mod error;
pub mod ids;
pub mod ops;

pub use error::TreeError;
pub use ids::{add_unique_identifiers, strip_identifiers};
pub use ops::{add_route, omit_route, update_route};
