//! CSRF (Cross-Site Request Forgery) Protection.
//!
//! # Spring Security Equivalent
//! `CsrfFilter` with `HttpSessionCsrfTokenRepository`, switched by
//! `http.csrf(...)`.
//!
//! The on/off switch lives here and nowhere else: URL authorization never
//! looks at it. A disabled filter forwards every request untouched.
//!
//! # Example
//! ```rust,ignore
//! use banking_security_core::http::security::csrf::{CsrfConfig, CsrfProtection};
//!
//! App::new()
//!     .wrap(security_transform)
//!     .wrap(CsrfProtection::new(CsrfConfig::new()))  // needs the session below
//!     .wrap(session_middleware)
//! ```

use std::rc::Rc;

use actix_session::SessionExt;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::{body::EitherBody, Error, HttpMessage, ResponseError};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use tracing::{debug, warn};

use crate::http::error::{AuthError, PolicyError};
use crate::http::security::ant_matcher::AntMatchers;

// =============================================================================
// CSRF Token
// =============================================================================

/// CSRF token, available to handlers through request extensions
/// (`web::ReqData<CsrfToken>`).
///
/// # Spring Security Equivalent
/// `CsrfToken`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    token: String,
    header_name: String,
    parameter_name: String,
}

impl CsrfToken {
    /// Create a new CSRF token with the default header and parameter names.
    pub fn new(token: String) -> Self {
        Self::with_names(token, DEFAULT_HEADER_NAME, DEFAULT_PARAMETER_NAME)
    }

    /// Create with custom header and parameter names.
    pub fn with_names(token: String, header_name: &str, parameter_name: &str) -> Self {
        Self {
            token,
            header_name: header_name.to_string(),
            parameter_name: parameter_name.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.token
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }
}

const DEFAULT_HEADER_NAME: &str = "X-CSRF-TOKEN";
const DEFAULT_PARAMETER_NAME: &str = "_csrf";
const DEFAULT_SESSION_KEY: &str = "csrf_token";
const TOKEN_LENGTH: usize = 32;

// =============================================================================
// CSRF Configuration
// =============================================================================

/// CSRF protection configuration.
///
/// # Spring Security Equivalent
/// `CsrfConfigurer`
#[derive(Clone, Debug)]
pub struct CsrfConfig {
    enabled: bool,
    /// Methods that must present a token
    protected_methods: Vec<Method>,
    /// Paths exempt from validation
    ignored: AntMatchers,
    header_name: String,
    parameter_name: String,
    session_key: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrfConfig {
    /// Enabled protection with Spring's defaults:
    /// - POST, PUT, DELETE, PATCH must present a token
    /// - header `X-CSRF-TOKEN`, query parameter `_csrf`
    /// - token stored in the session
    pub fn new() -> Self {
        Self {
            enabled: true,
            protected_methods: vec![Method::POST, Method::PUT, Method::DELETE, Method::PATCH],
            ignored: AntMatchers::new(),
            header_name: DEFAULT_HEADER_NAME.to_string(),
            parameter_name: DEFAULT_PARAMETER_NAME.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }

    /// `http.csrf(csrf -> csrf.disable())`
    pub fn disabled() -> Self {
        Self::new().enabled(false)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the methods that require CSRF protection.
    pub fn protected_methods(mut self, methods: Vec<Method>) -> Self {
        self.protected_methods = methods;
        self
    }

    /// `csrf.ignoringRequestMatchers(patterns)`
    ///
    /// # Errors
    /// Fails on the first malformed Ant pattern.
    pub fn ignore_paths<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, PolicyError> {
        self.ignored = self.ignored.add_all(patterns)?;
        Ok(self)
    }

    pub fn header_name(mut self, name: &str) -> Self {
        self.header_name = name.to_string();
        self
    }

    pub fn parameter_name(mut self, name: &str) -> Self {
        self.parameter_name = name.to_string();
        self
    }

    pub fn session_key(mut self, key: &str) -> Self {
        self.session_key = key.to_string();
        self
    }

    fn requires_protection(&self, method: &Method, path: &str) -> bool {
        self.protected_methods.contains(method) && !self.ignored.matches(path)
    }

    fn generate_token(&self) -> CsrfToken {
        let value: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        CsrfToken::with_names(value, &self.header_name, &self.parameter_name)
    }

    /// Loads the session token, creating and storing one if absent.
    fn load_or_create_token(&self, req: &ServiceRequest) -> CsrfToken {
        let session = req.get_session();
        if let Some(value) = session.get::<String>(&self.session_key).ok().flatten() {
            return CsrfToken::with_names(value, &self.header_name, &self.parameter_name);
        }
        let token = self.generate_token();
        if let Err(e) = session.insert(&self.session_key, token.value()) {
            warn!(error = %e, "could not store CSRF token in session");
        }
        token
    }

    /// Token submitted with the request: header first, then query string.
    fn submitted_token(&self, req: &ServiceRequest) -> Option<String> {
        if let Some(value) = req.headers().get(self.header_name.as_str()) {
            if let Ok(token) = value.to_str() {
                return Some(token.to_string());
            }
        }

        req.query_string().split('&').find_map(|pair| {
            pair.split_once('=')
                .filter(|(name, _)| *name == self.parameter_name)
                .map(|(_, value)| value.to_string())
        })
    }
}

// =============================================================================
// CSRF Protection Middleware
// =============================================================================

/// CSRF protection middleware.
///
/// # Behavior
/// 1. Disabled: forward untouched
/// 2. Otherwise load or create the session token and expose it as `CsrfToken`
/// 3. Protected methods must echo the token, else `403 Forbidden`
#[derive(Clone)]
pub struct CsrfProtection {
    config: Rc<CsrfConfig>,
}

impl CsrfProtection {
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CsrfProtection
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CsrfMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CsrfMiddleware {
            service: Rc::new(service),
            config: Rc::clone(&self.config),
        })
    }
}

/// CSRF middleware service.
pub struct CsrfMiddleware<S> {
    service: Rc<S>,
    config: Rc<CsrfConfig>,
}

impl<S, B> Service<ServiceRequest> for CsrfMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = Rc::clone(&self.config);

        Box::pin(async move {
            if !config.enabled {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            let token = config.load_or_create_token(&req);
            req.extensions_mut().insert(token.clone());

            if config.requires_protection(req.method(), req.path()) {
                let rejection = match config.submitted_token(&req) {
                    Some(submitted) if submitted == token.value() => None,
                    Some(_) => Some(AuthError::CsrfTokenMismatch),
                    None => Some(AuthError::CsrfTokenMissing),
                };
                if let Some(error) = rejection {
                    debug!(path = %req.path(), error = %error, "CSRF check failed");
                    let response = error.error_response().map_into_right_body();
                    return Ok(req.into_response(response));
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
