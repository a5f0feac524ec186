//! Ordered, first-match-wins URL authorization policy.
//!
//! # Spring Security Equivalent
//! `HttpSecurity.authorizeHttpRequests(...)` backed by
//! `RequestMatcherDelegatingAuthorizationManager`
//!
//! The policy is an immutable list of `(matcher, requirement)` rules. Rules
//! are checked in declaration order and the first match decides. Building a
//! policy always appends `anyRequest().authenticated()` as the last rule, so
//! every path resolves to exactly one [`Requirement`].
//!
//! # Example
//! ```
//! use banking_security_core::http::security::policy::{AuthorizationPolicy, Requirement};
//!
//! let policy = AuthorizationPolicy::builder()
//!     .permit_all(&["/health", "/swagger-ui/**"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(policy.evaluate("/health"), Requirement::Public);
//! assert_eq!(policy.evaluate("/swagger-ui/index.html"), Requirement::Public);
//! assert_eq!(policy.evaluate("/accounts/42"), Requirement::Authenticated);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::http::error::PolicyError;
use crate::http::security::ant_matcher::AntMatcher;

/// Paths the banking application serves without authentication: the
/// health probe and the OpenAPI documentation UI and document endpoints.
pub const BANKING_PUBLIC_PATHS: &[&str] = &[
    "/health",
    "/swagger-ui.html",
    "/swagger-ui/**",
    "/v3/api-docs/**",
];

const ANY_REQUEST: &str = "anyRequest";

/// What a request needs before it may reach its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Requirement {
    /// `permitAll()` - no credential verification.
    Public,
    /// `authenticated()` - credential verification first.
    Authenticated,
}

impl Requirement {
    pub fn is_public(self) -> bool {
        self == Requirement::Public
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Public => f.write_str("PUBLIC"),
            Requirement::Authenticated => f.write_str("AUTHENTICATED"),
        }
    }
}

/// Selects the requests a rule applies to.
///
/// # Spring Security Equivalent
/// `RequestMatcher` (`PathPatternRequestMatcher` / `AnyRequestMatcher`)
#[derive(Debug, Clone)]
pub enum RequestMatcher {
    Pattern(AntMatcher),
    /// Matches every path, including ones no pattern could match.
    AnyRequest,
}

impl RequestMatcher {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            RequestMatcher::Pattern(matcher) => matcher.matches(path),
            RequestMatcher::AnyRequest => true,
        }
    }

    /// The pattern text, or `anyRequest` for the catch-all.
    pub fn describe(&self) -> &str {
        match self {
            RequestMatcher::Pattern(matcher) => matcher.pattern(),
            RequestMatcher::AnyRequest => ANY_REQUEST,
        }
    }
}

/// A single `(matcher, requirement)` entry of the policy.
#[derive(Debug, Clone)]
pub struct AuthorizationRule {
    matcher: RequestMatcher,
    requirement: Requirement,
}

impl AuthorizationRule {
    pub fn matcher(&self) -> &RequestMatcher {
        &self.matcher
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }
}

/// Outcome of evaluating a path, with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision<'a> {
    pub requirement: Requirement,
    /// Position of the matching rule in [`AuthorizationPolicy::rules`].
    pub rule_index: usize,
    /// Pattern of the matching rule, `anyRequest` for the catch-all.
    pub matched: &'a str,
}

/// Immutable authorization rule table.
///
/// Cloning is cheap (the rules are behind an `Arc`), so each Actix worker
/// can hold its own handle without synchronization.
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    rules: Arc<[AuthorizationRule]>,
}

impl AuthorizationPolicy {
    pub fn builder() -> AuthorizationPolicyBuilder {
        AuthorizationPolicyBuilder::new()
    }

    /// The banking application's table: [`BANKING_PUBLIC_PATHS`] are public,
    /// everything else requires authentication.
    pub fn banking_defaults() -> Result<Self, PolicyError> {
        Self::builder().permit_all(BANKING_PUBLIC_PATHS).build()
    }

    /// Returns the requirement of the first rule matching `path`.
    pub fn evaluate(&self, path: &str) -> Requirement {
        self.decide(path).requirement
    }

    /// Like [`evaluate`](Self::evaluate), also reporting which rule matched.
    pub fn decide(&self, path: &str) -> Decision<'_> {
        for (rule_index, rule) in self.rules.iter().enumerate() {
            if rule.matcher.matches(path) {
                return Decision {
                    requirement: rule.requirement,
                    rule_index,
                    matched: rule.matcher.describe(),
                };
            }
        }
        // build() always terminates the table with AnyRequest
        Decision {
            requirement: Requirement::Authenticated,
            rule_index: self.rules.len().saturating_sub(1),
            matched: ANY_REQUEST,
        }
    }

    /// All rules in evaluation order, catch-all last.
    pub fn rules(&self) -> &[AuthorizationRule] {
        &self.rules
    }

    /// Patterns of the explicit `PUBLIC` rules, in order.
    pub fn public_patterns(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.requirement.is_public())
            .map(|rule| rule.matcher.describe())
            .collect()
    }
}

/// Builder for [`AuthorizationPolicy`].
///
/// # Spring Security Equivalent
/// `AuthorizeHttpRequestsConfigurer.AuthorizationManagerRequestMatcherRegistry`
///
/// Patterns are only compiled in [`build`](Self::build), so every
/// configuration problem surfaces as a single `Result` at startup.
#[derive(Debug, Default)]
pub struct AuthorizationPolicyBuilder {
    entries: Vec<(String, Requirement)>,
    error: Option<PolicyError>,
}

impl AuthorizationPolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `requestMatchers(patterns).permitAll()`
    pub fn permit_all<S: AsRef<str>>(self, patterns: &[S]) -> Self {
        self.push(patterns, Requirement::Public)
    }

    /// `requestMatchers(patterns).authenticated()`
    pub fn authenticated<S: AsRef<str>>(self, patterns: &[S]) -> Self {
        self.push(patterns, Requirement::Authenticated)
    }

    fn push<S: AsRef<str>>(mut self, patterns: &[S], requirement: Requirement) -> Self {
        if patterns.is_empty() && self.error.is_none() {
            self.error = Some(PolicyError::EmptyPatternList { requirement });
        }
        self.entries.extend(
            patterns
                .iter()
                .map(|pattern| (pattern.as_ref().to_string(), requirement)),
        );
        self
    }

    /// Compiles the rules and appends `anyRequest().authenticated()`.
    ///
    /// # Errors
    /// See [`PolicyError`]. An empty table is an error, never a permit-all.
    pub fn build(self) -> Result<AuthorizationPolicy, PolicyError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.entries.is_empty() {
            return Err(PolicyError::EmptyRuleTable);
        }

        let mut rules = Vec::with_capacity(self.entries.len() + 1);
        let mut seen = HashSet::new();
        let mut after_catch_all = false;

        for (pattern, requirement) in self.entries {
            if after_catch_all {
                return Err(PolicyError::RuleAfterCatchAll { pattern });
            }
            let matcher = AntMatcher::parse(&pattern)?;
            if matcher.is_catch_all() {
                if requirement.is_public() {
                    warn!(pattern = %pattern, "explicit catch-all rule permits every request");
                }
                after_catch_all = true;
            }
            if !seen.insert(pattern.clone()) {
                warn!(pattern = %pattern, "duplicate authorization pattern can never match");
            }
            rules.push(AuthorizationRule {
                matcher: RequestMatcher::Pattern(matcher),
                requirement,
            });
        }

        rules.push(AuthorizationRule {
            matcher: RequestMatcher::AnyRequest,
            requirement: Requirement::Authenticated,
        });

        info!(rules = rules.len(), "authorization policy built");
        Ok(AuthorizationPolicy {
            rules: rules.into(),
        })
    }
}
