//! Error types.

mod auth_error;
mod policy_error;

pub use auth_error::AuthError;
pub use policy_error::PolicyError;
