//! HTTP security components.
//!
//! - [`security`] - Policy, middleware, authentication and CSRF support
//! - [`error`] - Error types

pub mod error;
pub mod security;
