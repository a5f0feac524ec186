//! Banking Security Demo Application
//!
//! The health probe and the API documentation are public, everything else
//! goes through form login.


use std::io;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use banking_security_core::http::security::{
    Argon2PasswordEncoder, AuthenticationManager, CsrfProtection, FormLoginService,
    LoginUrlEntryPoint, MemoryAuthenticator, PasswordEncoder, SecurityConfig, SecurityTransform,
    User,
};

/// Creates the authenticator with demo users.
///
/// # Spring Security Equivalent
/// ```java
/// @Bean
/// public UserDetailsService userDetailsService(PasswordEncoder encoder) {
///     return new InMemoryUserDetailsManager(
///         User.withUsername("teller").password(encoder.encode("teller")).build(),
///         User.withUsername("auditor").password(encoder.encode("auditor")).build()
///     );
/// }
/// ```
fn authenticator(config: &SecurityConfig) -> MemoryAuthenticator {
    let encoder = Argon2PasswordEncoder::new();

    AuthenticationManager::in_memory_authentication()
        .password_encoder(encoder.clone())
        .http_basic(config.is_http_basic_enabled())
        .with_user(User::with_encoded_password("teller", encoder.encode("teller")))
        .with_user(User::with_encoded_password("auditor", encoder.encode("auditor")))
}

fn print_startup_info(config: &SecurityConfig) {
    info!("Server: http://127.0.0.1:8080");
    info!(public = ?config.get_public_paths(), "public paths, everything else requires login");
    info!(csrf_enabled = config.is_csrf_enabled(), "CSRF protection");
    info!(http_basic = config.is_http_basic_enabled(), "HTTP Basic authentication");
    info!("Demo users: teller/teller, auditor/auditor");
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SecurityConfig::banking_defaults();
    let policy = config
        .authorization_policy()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let csrf = config.csrf_config();
    let authenticator = authenticator(&config);
    let form_login = FormLoginService::new(authenticator.clone(), config.get_form_login().clone());
    let session_key = Key::generate();

    print_startup_info(&config);

    HttpServer::new(move || {
        let form_login = form_login.clone();
        App::new().service(
            web::scope("")
                .wrap(
                    SecurityTransform::new(policy.clone())
                        .authenticator(authenticator.clone())
                        .entry_point(LoginUrlEntryPoint::new(
                            form_login.config().get_login_page(),
                        ))
                        .form_login(form_login.config().clone()),
                )
                .wrap(CsrfProtection::new(csrf.clone()))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                        .cookie_secure(false)
                        .build(),
                )
                .configure(|cfg| form_login.configure(cfg))
                .service(handlers::health::health)
                .service(handlers::docs::swagger_ui_redirect)
                .service(handlers::docs::swagger_ui)
                .service(handlers::docs::api_docs)
                .service(handlers::accounts::home)
                .service(handlers::accounts::account),
        )
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
