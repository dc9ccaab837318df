//! Run specification validation
//!
//! Rejects numeric values no default can stand in for. Policy strings are not
//! checked here; they resolve with a fallback in [`crate::config::RunConfig`].

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::validate_spec;
