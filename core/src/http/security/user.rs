//! User model for authentication.
//!
//! # Spring Equivalent
//! `UserDetails` interface

use std::fmt;

/// An account known to an [`Authenticator`](crate::http::security::Authenticator).
///
/// # Example
/// ```
/// use banking_security_core::http::security::User;
///
/// let user = User::new("alice".into(), "secret".into());
/// assert_eq!(user.get_username(), "alice");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    username: String,
    password: String,
}

impl User {
    /// Creates a new user with username and plain-text password.
    ///
    /// # Note
    /// Pair plain-text passwords with `NoOpPasswordEncoder` only; prefer
    /// `with_encoded_password` and a real encoder.
    pub fn new(username: String, password: String) -> Self {
        User { username, password }
    }

    /// Creates a new user with username and pre-encoded password.
    ///
    /// # Spring Security Equivalent
    /// `User.withUsername().password("{argon2}...").build()`
    pub fn with_encoded_password(username: &str, encoded_password: String) -> Self {
        User {
            username: username.to_string(),
            password: encoded_password,
        }
    }

    /// Returns the username.
    pub fn get_username(&self) -> &str {
        &self.username
    }

    /// Returns the stored (possibly encoded) password.
    pub fn get_password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"[PROTECTED]")
            .finish()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}
