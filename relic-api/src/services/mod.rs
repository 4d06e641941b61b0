//! Service Layer
//!
//! Business logic between the route handlers and the store: validate the
//! request, check the referenced creator, mutate or read the store, join
//! creators in explicitly and map to response types.

mod artifact_service;
mod creator_service;

pub use artifact_service::*;
pub use creator_service::*;
