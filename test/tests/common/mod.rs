//! Common test utilities and configuration.
//!
//! This module provides shared test infrastructure including:
//! - Test users
//! - Test app builders
//! - Session login and CSRF helpers

#![allow(dead_code)]

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::LOCATION;
use actix_web::{get, post, test, web, App, HttpResponse, Responder};
use base64::prelude::*;
use serde_json::json;

use banking_security_core::http::security::{
    AuthenticatedUser, AuthenticationEntryPoint, AuthenticationManager, CsrfProtection,
    FormLoginService, HttpBasicConfig, HttpStatusEntryPoint, LoginUrlEntryPoint,
    MemoryAuthenticator, OptionalUser, SecurityConfig, SecurityTransform, User,
};

// =============================================================================
// Test Configuration
// =============================================================================

/// Creates a test authenticator with predefined users.
///
/// Users (plain-text passwords, Argon2 is covered by the unit tests):
/// - teller/teller
/// - auditor/auditor
pub fn test_authenticator() -> MemoryAuthenticator {
    AuthenticationManager::in_memory_authentication()
        .with_user(User::new("teller".into(), "teller".into()))
        .with_user(User::new("auditor".into(), "auditor".into()))
}

/// Helper function to create Basic Auth header value.
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    format!("Basic {}", BASE64_STANDARD.encode(credentials))
}

/// Session cookie set by a response, if any.
pub fn session_cookie(resp: &ServiceResponse) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned())
}

/// Logs in through the form and returns the authenticated session cookie.
pub async fn login<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/");
    session_cookie(&resp).expect("login sets a session cookie")
}

/// Logs in through the form of a CSRF-protected app. Returns the
/// authenticated session cookie and the session's CSRF token.
pub async fn login_with_csrf<S>(
    app: &S,
    username: &str,
    password: &str,
) -> (Cookie<'static>, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::get().uri("/login").to_request();
    let resp = test::call_service(app, req).await;
    let cookie = session_cookie(&resp).expect("login page stores a CSRF token");
    let body = test::read_body(resp).await;
    let token = csrf_token_from_login_page(&String::from_utf8_lossy(&body))
        .expect("login form carries the CSRF token");

    let req = test::TestRequest::post()
        .uri(&format!("/login?_csrf={token}"))
        .cookie(cookie)
        .set_form([("username", username), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/");
    let cookie = session_cookie(&resp).expect("login sets a session cookie");
    (cookie, token)
}

/// Reads the CSRF token out of the rendered login form.
pub fn csrf_token_from_login_page(html: &str) -> Option<String> {
    let start = html.find("_csrf=")? + "_csrf=".len();
    let token: String = html[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    (!token.is_empty()).then_some(token)
}

// =============================================================================
// Test Handlers
// =============================================================================

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "UP" }))
}

#[get("/swagger-ui.html")]
pub async fn swagger_ui_html() -> impl Responder {
    HttpResponse::Ok().body("swagger-ui.html")
}

#[get("/swagger-ui/{tail:.*}")]
pub async fn swagger_ui(tail: web::Path<String>) -> impl Responder {
    HttpResponse::Ok().body(format!("swagger-ui/{}", tail.into_inner()))
}

#[get("/v3/api-docs{tail:.*}")]
pub async fn api_docs(tail: web::Path<String>) -> impl Responder {
    HttpResponse::Ok().body(format!("api-docs{}", tail.into_inner()))
}

#[get("/")]
pub async fn index(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().body(format!("Welcome, {}!", user.get_username()))
}

#[get("/accounts/{id}")]
pub async fn account(user: AuthenticatedUser, id: web::Path<u64>) -> impl Responder {
    HttpResponse::Ok().body(format!("Account {} of {}", id.into_inner(), user.get_username()))
}

#[post("/transfers")]
pub async fn transfer(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().body(format!("Transfer by {}", user.get_username()))
}

#[get("/whoami")]
pub async fn whoami(user: OptionalUser) -> impl Responder {
    match user.into_inner() {
        Some(user) => HttpResponse::Ok().body(user.get_username().to_string()),
        None => HttpResponse::Ok().body("anonymous"),
    }
}

// =============================================================================
// Test App
// =============================================================================

/// Creates a test application for `config` that answers unauthenticated
/// requests through `entry_point`.
pub async fn create_app_with<E>(
    config: SecurityConfig,
    entry_point: E,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
where
    E: AuthenticationEntryPoint + 'static,
{
    let policy = config
        .authorization_policy()
        .expect("test security config must build");
    let authenticator = test_authenticator().http_basic(config.is_http_basic_enabled());
    let form_login = FormLoginService::new(authenticator.clone(), config.get_form_login().clone());

    test::init_service(
        App::new().service(
            web::scope("")
                .wrap(
                    SecurityTransform::new(policy)
                        .authenticator(authenticator)
                        .entry_point(entry_point)
                        .form_login(config.get_form_login().clone()),
                )
                .wrap(CsrfProtection::new(config.csrf_config()))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .configure(|cfg| form_login.configure(cfg))
                .service(health)
                .service(swagger_ui_html)
                .service(swagger_ui)
                .service(api_docs)
                .service(index)
                .service(account)
                .service(transfer)
                .service(whoami),
        ),
    )
    .await
}

/// Creates the banking application: default public paths, CSRF disabled,
/// form login at `/login` as the only way in.
pub async fn create_test_app(
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    create_app_with(SecurityConfig::banking_defaults(), LoginUrlEntryPoint::default()).await
}

/// Same as [`create_test_app`] with CSRF protection switched on.
pub async fn create_csrf_app(
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    create_app_with(
        SecurityConfig::banking_defaults().csrf_enabled(true),
        LoginUrlEntryPoint::default(),
    )
    .await
}

/// Same as [`create_test_app`] with HTTP Basic switched on and answering
/// `401` with a Basic challenge.
pub async fn create_basic_app(
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    create_app_with(
        SecurityConfig::banking_defaults().http_basic(true),
        HttpStatusEntryPoint::new().http_basic(HttpBasicConfig::new().realm("Banking")),
    )
    .await
}
