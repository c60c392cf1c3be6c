//! Engine error types

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The tree contains the same node id more than once. Match results
    /// are keyed by id, so traversal refuses to continue.
    #[error("Duplicate route id in tree: {0}")]
    DuplicateRouteId(Uuid),
}
