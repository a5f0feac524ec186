//! HTTP Basic Authentication support.
//!
//! # Spring Security Equivalent
//! `org.springframework.security.web.authentication.www.BasicAuthenticationFilter`
//!
//! # Feature Flag
//! Credential extraction requires the `http-basic` feature (enabled by default).

#[cfg(feature = "http-basic")]
use actix_web::dev::ServiceRequest;
#[cfg(feature = "http-basic")]
use actix_web::http;
#[cfg(feature = "http-basic")]
use base64::prelude::*;

#[cfg(feature = "http-basic")]
use crate::http::security::user::User;

/// Extracts credentials from the `Authorization: Basic <base64(user:pass)>`
/// header and hands them to `verify`.
#[cfg(feature = "http-basic")]
pub fn extract_basic_auth<F>(req: &ServiceRequest, verify: F) -> Option<User>
where
    F: FnOnce(&str, &str) -> Option<User>,
{
    let auth_header = req.headers().get(http::header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;

    let credentials = auth_str.strip_prefix("Basic ")?;

    let decoded = BASE64_STANDARD.decode(credentials).ok()?;
    let decoded_str = String::from_utf8(decoded).ok()?;

    let (username, password) = decoded_str.split_once(':')?;

    verify(username, password)
}

/// HTTP Basic challenge configuration.
///
/// # Spring Security Equivalent
/// `HttpSecurity.httpBasic()`
#[derive(Clone, Debug)]
pub struct HttpBasicConfig {
    realm: String,
}

impl HttpBasicConfig {
    /// Creates a new HTTP Basic configuration with default realm "Realm",
    /// as Spring's `BasicAuthenticationEntryPoint` does.
    pub fn new() -> Self {
        HttpBasicConfig {
            realm: "Realm".to_string(),
        }
    }

    /// Sets the realm name for the WWW-Authenticate header.
    pub fn realm(mut self, realm: &str) -> Self {
        self.realm = realm.to_string();
        self
    }

    /// Creates the WWW-Authenticate header value.
    pub fn www_authenticate_header(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm)
    }
}

impl Default for HttpBasicConfig {
    fn default() -> Self {
        Self::new()
    }
}
