//! Tree edit error types

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Route {0} not found in tree")]
    RouteNotFound(Uuid),

    #[error("Cannot insert a sibling of the root route")]
    CannotInsertAtRoot,

    #[error("Cannot remove the root route")]
    CannotRemoveRoot,
}
