//! Form-based Login Authentication.
//!
//! # Spring Security Equivalent
//! `formLogin(Customizer.withDefaults())`: the generated login page,
//! `UsernamePasswordAuthenticationFilter` and `LogoutFilter`.
//!
//! # Features
//! - Generated login page (GET)
//! - POST-based login form processing into a cookie session
//! - Saved request redirect after login
//! - Session id renewal on login (fixation protection)
//! - Logout
//!
//! # Example
//! ```rust,ignore
//! use banking_security_core::http::security::form_login::{FormLoginConfig, FormLoginService};
//!
//! let service = FormLoginService::new(authenticator, FormLoginConfig::new());
//!
//! App::new()
//!     .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
//!     .configure(|cfg| service.clone().configure(cfg))
//! ```

use std::collections::HashMap;

use actix_session::Session;
use actix_web::http::header::LOCATION;
use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::http::security::authenticator::{CredentialAuthenticator, SESSION_USER_KEY};
use crate::http::security::csrf::CsrfToken;
use crate::http::security::User;

/// Session key holding the URL to return to after login.
pub const SAVED_REQUEST_KEY: &str = "security_saved_request";

// =============================================================================
// Form Login Configuration
// =============================================================================

/// Form login configuration.
///
/// # Spring Security Equivalent
/// `FormLoginConfigurer`
///
/// # Example
/// ```rust,ignore
/// let config = FormLoginConfig::new()
///     .login_page("/login")
///     .login_processing_url("/login")
///     .username_parameter("username")
///     .password_parameter("password")
///     .default_success_url("/")
///     .failure_url("/login?error");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FormLoginConfig {
    /// URL of the login page (GET)
    login_page: String,
    /// URL that processes login form (POST)
    login_processing_url: String,
    /// Form parameter name for username
    username_parameter: String,
    /// Form parameter name for password
    password_parameter: String,
    /// Default URL after successful login
    default_success_url: String,
    /// Always redirect to default success URL (ignore saved request)
    always_use_default_success_url: bool,
    /// URL after failed login
    failure_url: String,
    /// URL for logout (POST)
    logout_url: String,
    /// URL after successful logout
    logout_success_url: String,
}

impl Default for FormLoginConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FormLoginConfig {
    /// Create a new form login configuration with Spring's default values.
    pub fn new() -> Self {
        Self {
            login_page: "/login".to_string(),
            login_processing_url: "/login".to_string(),
            username_parameter: "username".to_string(),
            password_parameter: "password".to_string(),
            default_success_url: "/".to_string(),
            always_use_default_success_url: false,
            failure_url: "/login?error".to_string(),
            logout_url: "/logout".to_string(),
            logout_success_url: "/login?logout".to_string(),
        }
    }

    /// `formLogin().loginPage("/login")`
    pub fn login_page(mut self, url: &str) -> Self {
        self.login_page = url.to_string();
        self
    }

    /// `formLogin().loginProcessingUrl("/login")`
    pub fn login_processing_url(mut self, url: &str) -> Self {
        self.login_processing_url = url.to_string();
        self
    }

    /// `formLogin().usernameParameter("username")`
    pub fn username_parameter(mut self, param: &str) -> Self {
        self.username_parameter = param.to_string();
        self
    }

    /// `formLogin().passwordParameter("password")`
    pub fn password_parameter(mut self, param: &str) -> Self {
        self.password_parameter = param.to_string();
        self
    }

    /// `formLogin().defaultSuccessUrl("/", alwaysUse)`
    pub fn default_success_url(mut self, url: &str) -> Self {
        self.default_success_url = url.to_string();
        self
    }

    pub fn always_use_default_success_url(mut self, always: bool) -> Self {
        self.always_use_default_success_url = always;
        self
    }

    /// `formLogin().failureUrl("/login?error")`
    pub fn failure_url(mut self, url: &str) -> Self {
        self.failure_url = url.to_string();
        self
    }

    /// `logout().logoutUrl("/logout")`
    pub fn logout_url(mut self, url: &str) -> Self {
        self.logout_url = url.to_string();
        self
    }

    /// `logout().logoutSuccessUrl("/login?logout")`
    pub fn logout_success_url(mut self, url: &str) -> Self {
        self.logout_success_url = url.to_string();
        self
    }

    pub fn get_login_page(&self) -> &str {
        &self.login_page
    }

    pub fn get_login_processing_url(&self) -> &str {
        &self.login_processing_url
    }

    pub fn get_username_parameter(&self) -> &str {
        &self.username_parameter
    }

    pub fn get_password_parameter(&self) -> &str {
        &self.password_parameter
    }

    pub fn get_default_success_url(&self) -> &str {
        &self.default_success_url
    }

    pub fn get_failure_url(&self) -> &str {
        &self.failure_url
    }

    pub fn get_logout_url(&self) -> &str {
        &self.logout_url
    }

    pub fn get_logout_success_url(&self) -> &str {
        &self.logout_success_url
    }

    /// True for the login page, the processing URL and the logout URL.
    ///
    /// These run ahead of authorization in Spring's filter chain, so the
    /// middleware lets them through without consulting the policy.
    pub fn is_login_url(&self, path: &str) -> bool {
        path == self.login_page || path == self.login_processing_url || path == self.logout_url
    }

    /// Remembers `url` so a later successful login returns to it.
    ///
    /// # Spring Equivalent
    /// `HttpSessionRequestCache.saveRequest(...)`, GET requests only.
    pub fn save_request(&self, session: &Session, method: &Method, url: &str) {
        if *method != Method::GET {
            return;
        }
        if let Err(e) = session.insert(SAVED_REQUEST_KEY, url) {
            warn!(error = %e, "could not save request before login redirect");
        }
    }

    fn take_saved_request(&self, session: &Session) -> Option<String> {
        let saved = session.get::<String>(SAVED_REQUEST_KEY).ok().flatten();
        if saved.is_some() {
            session.remove(SAVED_REQUEST_KEY);
        }
        saved
    }
}

// =============================================================================
// Form Login Service
// =============================================================================

/// Registers and serves the login page, login processing and logout routes.
///
/// # Spring Security Equivalent
/// `DefaultLoginPageGeneratingFilter` + `UsernamePasswordAuthenticationFilter`
/// + `LogoutFilter`
#[derive(Clone)]
pub struct FormLoginService<A>
where
    A: CredentialAuthenticator + Clone,
{
    authenticator: A,
    config: FormLoginConfig,
}

impl<A> FormLoginService<A>
where
    A: CredentialAuthenticator + Clone + 'static,
{
    pub fn new(authenticator: A, config: FormLoginConfig) -> Self {
        Self {
            authenticator,
            config,
        }
    }

    pub fn config(&self) -> &FormLoginConfig {
        &self.config
    }

    /// Registers the login and logout routes.
    ///
    /// Requires `SessionMiddleware` somewhere above these routes.
    pub fn configure(self, cfg: &mut web::ServiceConfig) {
        let login_page = self.config.login_page.clone();
        let processing_url = self.config.login_processing_url.clone();
        let logout_url = self.config.logout_url.clone();

        cfg.app_data(web::Data::new(self));

        // A resource only falls through to the next one on a path mismatch,
        // so GET and POST on the same path must share one resource.
        if login_page == processing_url {
            cfg.service(
                web::resource(login_page)
                    .route(web::get().to(login_page_handler::<A>))
                    .route(web::post().to(login_processing_handler::<A>)),
            );
        } else {
            cfg.service(web::resource(login_page).route(web::get().to(login_page_handler::<A>)));
            cfg.service(
                web::resource(processing_url)
                    .route(web::post().to(login_processing_handler::<A>)),
            );
        }
        cfg.service(web::resource(logout_url).route(web::post().to(logout_handler::<A>)));
    }

    /// Checks the submitted form and logs the user in.
    pub fn attempt_authentication(
        &self,
        session: &Session,
        form: &HashMap<String, String>,
    ) -> HttpResponse {
        let username = form
            .get(&self.config.username_parameter)
            .map(String::as_str)
            .unwrap_or_default();
        let password = form
            .get(&self.config.password_parameter)
            .map(String::as_str)
            .unwrap_or_default();

        match self.authenticator.verify_credentials(username, password) {
            Some(user) => self.on_authentication_success(session, &user),
            None => {
                info!(username = %username, "form login failed");
                self.on_authentication_failure()
            }
        }
    }

    /// Stores the user in a renewed session and redirects to the saved
    /// request or the default success URL.
    pub fn on_authentication_success(&self, session: &Session, user: &User) -> HttpResponse {
        let saved = self.config.take_saved_request(session);

        session.renew();
        if let Err(e) = session.insert(SESSION_USER_KEY, user.get_username()) {
            warn!(error = %e, "could not store user in session");
            return self.on_authentication_failure();
        }
        info!(username = %user.get_username(), "form login succeeded");

        let redirect_url = if self.config.always_use_default_success_url {
            self.config.default_success_url.clone()
        } else {
            saved.unwrap_or_else(|| self.config.default_success_url.clone())
        };

        HttpResponse::Found()
            .insert_header((LOCATION, redirect_url))
            .finish()
    }

    /// Redirects to the failure URL.
    pub fn on_authentication_failure(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((LOCATION, self.config.failure_url.clone()))
            .finish()
    }

    /// Clears the session and redirects to the logout success URL.
    pub fn on_logout(&self, session: &Session) -> HttpResponse {
        session.purge();
        HttpResponse::Found()
            .insert_header((LOCATION, self.config.logout_success_url.clone()))
            .finish()
    }

    /// Renders the default login page.
    pub fn render_login_page(&self, query: &str, csrf: Option<&CsrfToken>) -> String {
        let mut notice = String::new();
        if query.split('&').any(|p| p == "error" || p.starts_with("error=")) {
            notice.push_str("<p class=\"error\">Bad credentials</p>\n");
        }
        if query.split('&').any(|p| p == "logout" || p.starts_with("logout=")) {
            notice.push_str("<p class=\"info\">You have been signed out</p>\n");
        }

        // The CSRF filter reads the token from the header or the query string,
        // so the form carries it in its action URL.
        let action = match csrf {
            Some(token) => format!(
                "{}?{}={}",
                self.config.login_processing_url,
                token.parameter_name(),
                token.value()
            ),
            None => self.config.login_processing_url.clone(),
        };

        format!(
            "<!DOCTYPE html>\n<html>\n<head><title>Please sign in</title></head>\n<body>\n\
             <h2>Please sign in</h2>\n{notice}\
             <form method=\"post\" action=\"{action}\">\n\
             <p><label for=\"{user}\">Username</label> <input type=\"text\" id=\"{user}\" name=\"{user}\" autofocus></p>\n\
             <p><label for=\"{pass}\">Password</label> <input type=\"password\" id=\"{pass}\" name=\"{pass}\"></p>\n\
             <button type=\"submit\">Sign in</button>\n</form>\n</body>\n</html>\n",
            notice = notice,
            action = action,
            user = self.config.username_parameter,
            pass = self.config.password_parameter,
        )
    }
}

async fn login_page_handler<A>(
    req: HttpRequest,
    service: web::Data<FormLoginService<A>>,
    csrf: Option<web::ReqData<CsrfToken>>,
) -> HttpResponse
where
    A: CredentialAuthenticator + Clone + 'static,
{
    let body = service.render_login_page(req.query_string(), csrf.as_deref());
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

async fn login_processing_handler<A>(
    session: Session,
    service: web::Data<FormLoginService<A>>,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse
where
    A: CredentialAuthenticator + Clone + 'static,
{
    service.attempt_authentication(&session, &form)
}

async fn logout_handler<A>(
    session: Session,
    service: web::Data<FormLoginService<A>>,
) -> HttpResponse
where
    A: CredentialAuthenticator + Clone + 'static,
{
    debug!("logout requested");
    service.on_logout(&session)
}
