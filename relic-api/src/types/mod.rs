//! API Request and Response Types
//!
//! Wire shapes for the REST surface. Field names are camelCase on the wire.
//! Requests carry optional fields so that a missing value surfaces as a
//! validation error rather than a JSON decode failure.

mod artifact;
mod creator;

pub use artifact::*;
pub use creator::*;
