//! Custom request extractors.
//!
//! Both extractors reject with the regular `{status, error, message}` body
//! so malformed ids and bodies look like every other 400.

mod json;
mod path_id;

pub use json::ApiJson;
pub use path_id::{PathId, PathIdError};
