//! Authentication entry points.
//!
//! # Spring Security Equivalent
//! `org.springframework.security.web.AuthenticationEntryPoint`
//!
//! The policy only says a request needs credentials. What the client gets
//! back when it has none is decided here:
//!
//! - [`LoginUrlEntryPoint`] - `302` to the login page (form login default)
//! - [`HttpStatusEntryPoint`] - `401`, optionally with a Basic challenge

use actix_web::dev::ServiceRequest;
use actix_web::http::header::{LOCATION, WWW_AUTHENTICATE};
use actix_web::HttpResponse;

use crate::http::security::config::AuthenticationEntryPoint;
use crate::http::security::http_basic::HttpBasicConfig;

/// Redirects to the login page.
///
/// # Spring Security Equivalent
/// `LoginUrlAuthenticationEntryPoint`
#[derive(Clone, Debug)]
pub struct LoginUrlEntryPoint {
    login_url: String,
}

impl LoginUrlEntryPoint {
    pub fn new(login_url: &str) -> Self {
        LoginUrlEntryPoint {
            login_url: login_url.to_string(),
        }
    }
}

impl Default for LoginUrlEntryPoint {
    fn default() -> Self {
        Self::new("/login")
    }
}

impl AuthenticationEntryPoint for LoginUrlEntryPoint {
    fn commence(&self, _req: &ServiceRequest) -> HttpResponse {
        HttpResponse::Found()
            .append_header((LOCATION, self.login_url.as_str()))
            .finish()
    }

    fn saves_request(&self) -> bool {
        true
    }
}

/// Answers `401 Unauthorized`.
///
/// # Spring Security Equivalent
/// `HttpStatusEntryPoint(HttpStatus.UNAUTHORIZED)` or, with a realm,
/// `BasicAuthenticationEntryPoint`
#[derive(Clone, Debug, Default)]
pub struct HttpStatusEntryPoint {
    basic: Option<HttpBasicConfig>,
}

impl HttpStatusEntryPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `WWW-Authenticate: Basic realm="..."` challenge.
    pub fn http_basic(mut self, config: HttpBasicConfig) -> Self {
        self.basic = Some(config);
        self
    }
}

impl AuthenticationEntryPoint for HttpStatusEntryPoint {
    fn commence(&self, _req: &ServiceRequest) -> HttpResponse {
        let mut response = HttpResponse::Unauthorized();
        if let Some(basic) = &self.basic {
            response.append_header((WWW_AUTHENTICATE, basic.www_authenticate_header()));
        }
        response.finish()
    }
}
