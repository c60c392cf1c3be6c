//! Core domain models for Route Hub
//!
//! This crate contains the shared data structures used across
//! the routing engine: RouteNode, RouteWithId, ObjectMatcher,
//! ContactPoint, and the API request/response types.

pub mod error;
pub mod models;

pub use error::CoreError;
pub use models::*;
