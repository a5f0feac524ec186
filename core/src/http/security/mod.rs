//! Security module providing URL authorization and the filter chain around it.
//!
//! # Spring Equivalent
//! `org.springframework.security` package
//!
//! # Module Structure
//!
//! - `policy` - Ordered first-match authorization rules (the decision table)
//! - `ant_matcher` - Ant-style URL pattern matching
//! - `config` - Core traits (Authenticator, AuthenticationEntryPoint) and `SecurityConfig`
//! - `middleware` - Security middleware (SecurityTransform)
//! - `entry_point` - Responses that start authentication (login redirect, 401)
//! - `authenticator` - In-memory user store (MemoryAuthenticator)
//! - `form_login` - Login page, login processing and logout
//! - `csrf` - CSRF filter with its own on/off switch
//! - `crypto` - Password encoding (Argon2, NoOp)
//! - `http_basic` - HTTP Basic credentials
//! - `extractor` - Actix Web extractors (AuthenticatedUser, OptionalUser)
//! - `manager` - Factory method (AuthenticationManager)
//! - `user` - User model
//!
//! # Feature Flags
//! - `argon2`: Enables `Argon2PasswordEncoder`
//! - `http-basic`: Enables HTTP Basic credential extraction

// Re-exports for convenience
pub use ant_matcher::{AntMatcher, AntMatchers};
pub use authenticator::{CredentialAuthenticator, MemoryAuthenticator};
pub use config::{AuthenticationEntryPoint, Authenticator, SecurityConfig};
#[cfg(feature = "argon2")]
pub use crypto::Argon2PasswordEncoder;
pub use crypto::{NoOpPasswordEncoder, PasswordEncoder};
pub use csrf::{CsrfConfig, CsrfProtection, CsrfToken};
pub use entry_point::{HttpStatusEntryPoint, LoginUrlEntryPoint};
pub use extractor::{AuthenticatedUser, OptionalUser};
pub use form_login::{FormLoginConfig, FormLoginService};
pub use http_basic::HttpBasicConfig;
pub use manager::AuthenticationManager;
pub use middleware::SecurityTransform;
pub use policy::{
    AuthorizationPolicy, AuthorizationPolicyBuilder, AuthorizationRule, Decision, RequestMatcher,
    Requirement, BANKING_PUBLIC_PATHS,
};
pub use user::User;

// Internal modules (private implementation details)
mod extractor;
mod user;

// Public modules
pub mod ant_matcher;
pub mod authenticator;
pub mod config;
pub mod crypto;
pub mod csrf;
pub mod entry_point;
pub mod form_login;
pub mod http_basic;
pub mod manager;
pub mod middleware;
pub mod policy;
