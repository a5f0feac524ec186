//! In-Memory User Details Manager.
//!
//! # Spring Security Equivalent
//! `org.springframework.security.provisioning.InMemoryUserDetailsManager`

use std::collections::HashMap;
use std::sync::Arc;

use actix_session::SessionExt;
use actix_web::dev::ServiceRequest;
use tracing::warn;

use crate::http::security::config::Authenticator;
use crate::http::security::crypto::{NoOpPasswordEncoder, PasswordEncoder};
use crate::http::security::user::User;

#[cfg(feature = "http-basic")]
use crate::http::security::http_basic::extract_basic_auth;

/// Session key holding the username of a form-login session.
pub const SESSION_USER_KEY: &str = "security_user";

/// Verifies a username/password pair.
///
/// # Spring Security Equivalent
/// `AuthenticationManager.authenticate(UsernamePasswordAuthenticationToken)`
pub trait CredentialAuthenticator {
    fn verify_credentials(&self, username: &str, password: &str) -> Option<User>;
}

/// In-memory user store for authentication.
///
/// Resolves the user of a request from, in order:
/// 1. the form-login session (`SESSION_USER_KEY`)
/// 2. `Authorization: Basic` credentials, once enabled with
///    [`http_basic`](Self::http_basic) (feature `http-basic`)
///
/// # Example
/// ```ignore
/// use banking_security_core::http::security::{Argon2PasswordEncoder, MemoryAuthenticator, PasswordEncoder, User};
///
/// let encoder = Argon2PasswordEncoder::new();
/// let authenticator = MemoryAuthenticator::new()
///     .password_encoder(encoder.clone())
///     .http_basic(true)
///     .with_user(User::with_encoded_password("teller", encoder.encode("secret")));
/// ```
#[derive(Clone)]
pub struct MemoryAuthenticator {
    users: HashMap<String, User>,
    password_encoder: Arc<dyn PasswordEncoder>,
    http_basic: bool,
}

impl MemoryAuthenticator {
    /// Creates a new in-memory authenticator with no users.
    pub fn new() -> Self {
        MemoryAuthenticator {
            users: HashMap::new(),
            password_encoder: Arc::new(NoOpPasswordEncoder),
            http_basic: false,
        }
    }

    /// Sets the password encoder for verifying passwords.
    ///
    /// # Spring Security Equivalent
    /// `AuthenticationManagerBuilder.passwordEncoder(PasswordEncoder)`
    pub fn password_encoder<E: PasswordEncoder + 'static>(mut self, encoder: E) -> Self {
        self.password_encoder = Arc::new(encoder);
        self
    }

    /// Accepts `Authorization: Basic` credentials on every request.
    /// Off by default: only the form-login session identifies a user.
    ///
    /// # Spring Security Equivalent
    /// `HttpSecurity.httpBasic(...)`
    pub fn http_basic(mut self, enabled: bool) -> Self {
        self.http_basic = enabled;
        self
    }

    /// Adds a user to the in-memory store. The first user registered under
    /// a name wins.
    pub fn with_user(mut self, user: User) -> Self {
        use std::collections::hash_map::Entry;
        let user_name = user.get_username().to_string();
        match self.users.entry(user_name) {
            Entry::Occupied(e) => {
                warn!(username = %e.key(), "user already exists, skipping");
            }
            Entry::Vacant(e) => {
                e.insert(user);
            }
        }
        self
    }

    /// Looks a user up by name without checking a password.
    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    fn session_user(&self, req: &ServiceRequest) -> Option<User> {
        let username = req
            .get_session()
            .get::<String>(SESSION_USER_KEY)
            .ok()
            .flatten()?;
        self.find_user(&username).cloned()
    }
}

impl Default for MemoryAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialAuthenticator for MemoryAuthenticator {
    fn verify_credentials(&self, username: &str, password: &str) -> Option<User> {
        self.users.get(username).and_then(|user| {
            if self.password_encoder.matches(password, user.get_password()) {
                Some(user.clone())
            } else {
                None
            }
        })
    }
}

impl Authenticator for MemoryAuthenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        if let Some(user) = self.session_user(req) {
            return Some(user);
        }

        if self.http_basic {
            #[cfg(feature = "http-basic")]
            return extract_basic_auth(req, |username, password| {
                self.verify_credentials(username, password)
            });
        }

        None
    }
}
