use derive_more::{Display, Error};

use crate::http::security::policy::Requirement;

/// Configuration errors raised while building an authorization policy.
///
/// These surface at startup. A policy that fails to build must stop the
/// process rather than fall back to permitting every request.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PolicyError {
    /// No explicit rule was configured.
    #[display("authorization rule table is empty")]
    EmptyRuleTable,
    /// A `permit_all` / `authenticated` call received no pattern.
    #[display("no path pattern given for {requirement} rule")]
    EmptyPatternList { requirement: Requirement },
    /// A path pattern could not be parsed.
    #[display("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    /// A rule was declared after a `/**` pattern and can never match.
    #[display("rule '{pattern}' follows the catch-all pattern '/**' and is unreachable")]
    RuleAfterCatchAll { pattern: String },
}

impl PolicyError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: &str) -> Self {
        PolicyError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}
