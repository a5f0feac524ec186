//! Configuration traits and the static security configuration.
//!
//! # Spring Equivalent
//! `AuthenticationProvider` / `AuthenticationEntryPoint` interfaces and the
//! `SecurityFilterChain` bean built from `HttpSecurity`

use actix_web::dev::ServiceRequest;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::http::error::PolicyError;
use crate::http::security::csrf::CsrfConfig;
use crate::http::security::form_login::FormLoginConfig;
use crate::http::security::policy::{AuthorizationPolicy, BANKING_PUBLIC_PATHS};
use crate::http::security::user::User;

/// Trait for extracting user identity from an HTTP request.
///
/// # Spring Equivalent
/// `AuthenticationProvider` / `SecurityContextRepository`
///
/// Returns an owned `User` so it can be stored in request extensions
/// for access by handlers.
pub trait Authenticator {
    /// Attempts to authenticate the request and returns the user if successful.
    fn get_user(&self, req: &ServiceRequest) -> Option<User>;
}

/// Produces the response that starts authentication for a request that
/// needs it and carries no valid credentials.
///
/// # Spring Equivalent
/// `AuthenticationEntryPoint`
pub trait AuthenticationEntryPoint {
    fn commence(&self, req: &ServiceRequest) -> HttpResponse;

    /// Whether the original request is saved for replay after login.
    /// Only entry points that send the client to a login page should say yes.
    fn saves_request(&self) -> bool {
        false
    }
}

/// Static security settings, loaded once at startup.
///
/// # Spring Equivalent
/// The `SecurityFilterChain` bean:
/// ```java
/// http.csrf(csrf -> csrf.disable())
///     .authorizeHttpRequests(auth -> auth
///         .requestMatchers("/health", "/swagger-ui.html", "/swagger-ui/**", "/v3/api-docs/**").permitAll()
///         .anyRequest().authenticated())
///     .formLogin(Customizer.withDefaults());
/// // no .httpBasic(): Basic credentials are ignored unless `http_basic` is set
/// ```
///
/// Deserializable so a host application can embed it in its own settings.
/// Missing fields fall back to [`SecurityConfig::banking_defaults`].
///
/// # Example
/// ```
/// use banking_security_core::http::security::SecurityConfig;
///
/// let config = SecurityConfig::banking_defaults();
/// let policy = config.authorization_policy().unwrap();
/// assert!(policy.evaluate("/health").is_public());
/// assert!(!config.is_csrf_enabled());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// `permitAll()` patterns, in evaluation order.
    public_paths: Vec<String>,
    /// Consumed by the CSRF filter only, never by the authorization policy.
    csrf_enabled: bool,
    /// `httpBasic()`; off unless asked for.
    http_basic: bool,
    form_login: FormLoginConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::banking_defaults()
    }
}

impl SecurityConfig {
    /// The banking application's settings: health probe and API docs are
    /// public, CSRF protection is off, form login is the only way in.
    pub fn banking_defaults() -> Self {
        SecurityConfig {
            public_paths: BANKING_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
            csrf_enabled: false,
            http_basic: false,
            form_login: FormLoginConfig::new(),
        }
    }

    /// Replaces the public path patterns.
    pub fn public_paths<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.public_paths = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        self
    }

    pub fn csrf_enabled(mut self, enabled: bool) -> Self {
        self.csrf_enabled = enabled;
        self
    }

    /// Also accepts `Authorization: Basic` credentials.
    pub fn http_basic(mut self, enabled: bool) -> Self {
        self.http_basic = enabled;
        self
    }

    pub fn form_login(mut self, config: FormLoginConfig) -> Self {
        self.form_login = config;
        self
    }

    pub fn get_public_paths(&self) -> &[String] {
        &self.public_paths
    }

    pub fn is_csrf_enabled(&self) -> bool {
        self.csrf_enabled
    }

    pub fn is_http_basic_enabled(&self) -> bool {
        self.http_basic
    }

    pub fn get_form_login(&self) -> &FormLoginConfig {
        &self.form_login
    }

    /// Builds the rule table: every public path, then the catch-all.
    ///
    /// # Errors
    /// Fails when `public_paths` is empty or holds a malformed pattern.
    pub fn authorization_policy(&self) -> Result<AuthorizationPolicy, PolicyError> {
        AuthorizationPolicy::builder()
            .permit_all(&self.public_paths)
            .build()
    }

    /// CSRF filter settings for this configuration.
    ///
    /// Logs a warning when protection is disabled.
    pub fn csrf_config(&self) -> CsrfConfig {
        if !self.csrf_enabled {
            warn!("CSRF protection is disabled; state-changing requests are accepted without a token");
        }
        CsrfConfig::new().enabled(self.csrf_enabled)
    }
}
