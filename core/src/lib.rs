//! # Banking Security Core
//!
//! URL authorization policy and security filter chain for Actix Web,
//! modelled on Spring Security's `authorizeHttpRequests` configuration.
//!
//! The centre of the crate is [`http::security::AuthorizationPolicy`]: an
//! ordered, immutable table of `(path pattern, requirement)` rules evaluated
//! first-match-wins and always terminated by an `anyRequest().authenticated()`
//! catch-all. The rest of the crate is the request pipeline that consumes
//! its decisions:
//!
//! - [`http::security::middleware::SecurityTransform`] - the filter chain
//! - [`http::security::entry_point`] - login redirect or `401` responses
//! - [`http::security::form_login`] - session-backed form login
//! - [`http::security::csrf`] - CSRF filter behind its own on/off switch
//!
//! ## Example
//!
//! ```rust,ignore
//! use actix_web::{App, web};
//! use banking_security_core::http::security::{
//!     LoginUrlEntryPoint, SecurityConfig, SecurityTransform,
//! };
//!
//! let config = SecurityConfig::banking_defaults();
//! let policy = config.authorization_policy()?;
//!
//! App::new().service(
//!     web::scope("")
//!         .wrap(
//!             SecurityTransform::new(policy.clone())
//!                 .authenticator(authenticator.clone())
//!                 .entry_point(LoginUrlEntryPoint::new(config.get_form_login().get_login_page()))
//!                 .form_login(config.get_form_login().clone()),
//!         ),
//! );
//! ```

pub mod http;
