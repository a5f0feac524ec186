//! Ant-style Path Matcher
//!
//! Spring-style Ant path patterns used by the authorization policy and the
//! CSRF ignore list.
//!
//! # Pattern Syntax
//!
//! - `?` matches exactly one character
//! - `*` matches zero or more characters within a path segment
//! - `**` matches zero or more path segments (must be a whole segment)
//!
//! Matching is case-sensitive and does not normalize the request path:
//! empty segments count, so `/health/` and `//health` are both distinct
//! from `/health`. Decoding and sanitizing paths belongs to whatever sits
//! in front of the matcher.
//!
//! # Examples
//!
//! ```rust
//! use banking_security_core::http::security::ant_matcher::AntMatcher;
//!
//! // Prefix match: the prefix itself and anything below it
//! let matcher = AntMatcher::parse("/swagger-ui/**").unwrap();
//! assert!(matcher.matches("/swagger-ui"));
//! assert!(matcher.matches("/swagger-ui/index.html"));
//! assert!(!matcher.matches("/swagger-uix"));
//!
//! // Single segment wildcard
//! let matcher = AntMatcher::parse("/accounts/*/statements").unwrap();
//! assert!(matcher.matches("/accounts/42/statements"));
//! assert!(!matcher.matches("/accounts/42/7/statements"));
//! ```
//!
//! # Spring Equivalent
//!
//! `org.springframework.web.util.pattern.PathPattern`

use crate::http::error::PolicyError;

/// A compiled Ant-style path pattern.
#[derive(Debug, Clone)]
pub struct AntMatcher {
    pattern: String,
    segments: Vec<PatternSegment>,
}

/// A segment of the pattern
#[derive(Debug, Clone, PartialEq)]
enum PatternSegment {
    /// Literal text (no wildcards)
    Literal(String),
    /// Whole-segment wildcard (*)
    SingleWildcard,
    /// Multi-segment wildcard (**)
    DoubleWildcard,
    /// Segment mixing literal characters with * or ?
    Pattern(Vec<char>),
}

impl PatternSegment {
    fn parse(pattern: &str, part: &str) -> Result<Self, PolicyError> {
        let segment = match part {
            "**" => PatternSegment::DoubleWildcard,
            "*" => PatternSegment::SingleWildcard,
            _ if part.contains("**") => {
                return Err(PolicyError::invalid_pattern(
                    pattern,
                    "'**' must be a whole path segment",
                ))
            }
            _ if part.contains(|c| c == '*' || c == '?') => {
                PatternSegment::Pattern(part.chars().collect())
            }
            _ => PatternSegment::Literal(part.to_string()),
        };
        Ok(segment)
    }

    /// Matches exactly one path segment. `DoubleWildcard` is handled by the
    /// caller since it spans a variable number of segments.
    fn matches_one(&self, segment: &str) -> bool {
        match self {
            PatternSegment::Literal(literal) => literal == segment,
            PatternSegment::SingleWildcard => !segment.is_empty(),
            PatternSegment::DoubleWildcard => true,
            PatternSegment::Pattern(chars) => {
                let text: Vec<char> = segment.chars().collect();
                match_chars(chars, &text)
            }
        }
    }
}

impl AntMatcher {
    /// Compiles a pattern.
    ///
    /// # Errors
    /// Returns [`PolicyError::InvalidPattern`] when the pattern is empty,
    /// does not start with `/`, or uses `**` inside a larger segment.
    pub fn parse(pattern: &str) -> Result<Self, PolicyError> {
        if pattern.is_empty() {
            return Err(PolicyError::invalid_pattern(pattern, "pattern is empty"));
        }
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| PolicyError::invalid_pattern(pattern, "pattern must start with '/'"))?;

        let segments = rest
            .split('/')
            .map(|part| PatternSegment::parse(pattern, part))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// Get the original pattern string
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True for `/**`, which matches every well-formed path.
    pub fn is_catch_all(&self) -> bool {
        self.segments == [PatternSegment::DoubleWildcard]
    }

    /// Check if the given path matches this pattern.
    ///
    /// A path that does not start with `/` never matches.
    pub fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else {
            return false;
        };
        let path_segments: Vec<&str> = rest.split('/').collect();
        match_segments(&self.segments, &path_segments)
    }
}

/// Matches path segments in `O(pattern * path)`: `reachable[j]` holds when
/// the pattern consumed so far matches the first `j` path segments.
fn match_segments(pattern: &[PatternSegment], path: &[&str]) -> bool {
    let mut reachable = vec![false; path.len() + 1];
    reachable[0] = true;

    for segment in pattern {
        let mut next = vec![false; path.len() + 1];
        match segment {
            PatternSegment::DoubleWildcard => {
                // ** consumes 0, 1, 2, ... segments
                let mut any = false;
                for (j, slot) in next.iter_mut().enumerate() {
                    any |= reachable[j];
                    *slot = any;
                }
            }
            _ => {
                for (j, part) in path.iter().enumerate() {
                    if reachable[j] && segment.matches_one(part) {
                        next[j + 1] = true;
                    }
                }
            }
        }
        reachable = next;
    }

    reachable[path.len()]
}

/// Greedy wildcard match with single-star backtracking; linear in the
/// pattern for each retry, never exponential.
fn match_chars(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    // position of the last `*` and the text index it currently absorbs up to
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Ordered collection of matchers.
#[derive(Debug, Clone, Default)]
pub struct AntMatchers {
    matchers: Vec<AntMatcher>,
}

impl AntMatchers {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// Compiles and appends every pattern, failing on the first malformed one.
    pub fn add_all<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, PolicyError> {
        for pattern in patterns {
            self.matchers.push(AntMatcher::parse(pattern.as_ref())?);
        }
        Ok(self)
    }

    /// Check if any pattern matches the given path
    pub fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    /// Get the first matching pattern, if any
    pub fn find_match(&self, path: &str) -> Option<&AntMatcher> {
        self.matchers.iter().find(|m| m.matches(path))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
