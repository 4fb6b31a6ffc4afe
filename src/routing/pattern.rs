//! Route pattern compilation and matching
//!
//! A pattern is compiled once into a list of tagged segments:
//! - literal text (slashes included), matched byte for byte
//! - `:name`, capturing exactly one non-empty path segment
//! - a trailing `*`, capturing the remainder of the path including slashes
//!
//! Matching is case-sensitive and anchored at both ends.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Malformed route pattern, reported at registration time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("route pattern is empty")]
    Empty,

    #[error("route pattern '{0}' must start with '/' or be '*'")]
    MissingLeadingSlash(String),

    #[error("route pattern '{pattern}': parameter segment '{segment}' has no valid name")]
    InvalidParamName { pattern: String, segment: String },

    #[error("route pattern '{pattern}': ':' must start a segment (found '{segment}')")]
    MisplacedMarker { pattern: String, segment: String },

    #[error("route pattern '{pattern}': '*' must be a whole segment (found '{segment}')")]
    MisplacedWildcard { pattern: String, segment: String },

    #[error("route pattern '{0}': '*' is only allowed as the last segment")]
    WildcardNotLast(String),

    #[error("route pattern '{pattern}': parameter '{name}' appears more than once")]
    DuplicateParam { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// A compiled route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    capture_count: usize,
}

impl RoutePattern {
    /// Compile a pattern such as `/`, `/assets/:file`, `/static/*` or `*`
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }

        if pattern == "*" {
            return Ok(Self {
                source: pattern.to_string(),
                segments: vec![Segment::Wildcard],
                capture_count: 1,
            });
        }

        let Some(body) = pattern.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        };

        let parts: Vec<&str> = body.split('/').collect();
        let last_index = parts.len() - 1;
        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        let mut literal = String::from("/");

        for (index, part) in parts.iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if !is_valid_param_name(name) {
                    return Err(PatternError::InvalidParamName {
                        pattern: pattern.to_string(),
                        segment: (*part).to_string(),
                    });
                }
                if names.contains(&name) {
                    return Err(PatternError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                names.push(name);
                flush_literal(&mut literal, &mut segments);
                segments.push(Segment::Param(name.to_string()));
            } else if *part == "*" {
                if index != last_index {
                    return Err(PatternError::WildcardNotLast(pattern.to_string()));
                }
                flush_literal(&mut literal, &mut segments);
                segments.push(Segment::Wildcard);
            } else if part.contains(':') {
                return Err(PatternError::MisplacedMarker {
                    pattern: pattern.to_string(),
                    segment: (*part).to_string(),
                });
            } else if part.contains('*') {
                return Err(PatternError::MisplacedWildcard {
                    pattern: pattern.to_string(),
                    segment: (*part).to_string(),
                });
            } else {
                literal.push_str(part);
            }

            if index != last_index {
                literal.push('/');
            }
        }
        flush_literal(&mut literal, &mut segments);

        let capture_count = segments
            .iter()
            .filter(|s| !matches!(s, Segment::Literal(_)))
            .count();

        Ok(Self {
            source: pattern.to_string(),
            segments,
            capture_count,
        })
    }

    /// Match a request path (query string already stripped)
    ///
    /// Returns the captured substrings in pattern order, or `None` when the
    /// whole path does not match.
    pub fn matches(&self, path: &str) -> Option<Vec<String>> {
        let mut rest = path;
        let mut spans: Vec<&str> = Vec::with_capacity(self.capture_count);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rest = rest.strip_prefix(text.as_str())?,
                Segment::Param(_) => {
                    let end = rest.find('/').unwrap_or(rest.len());
                    if end == 0 {
                        return None;
                    }
                    spans.push(&rest[..end]);
                    rest = &rest[end..];
                }
                Segment::Wildcard => {
                    spans.push(rest);
                    rest = "";
                }
            }
        }

        if !rest.is_empty() {
            return None;
        }
        Some(spans.into_iter().map(str::to_string).collect())
    }

    /// Parameter names in left-to-right order (`*` is reported as `"*"`)
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Wildcard => Some("*"),
            Segment::Literal(_) => None,
        })
    }

    /// True when the pattern matches every path (`*`)
    pub fn is_catch_all(&self) -> bool {
        self.segments == [Segment::Wildcard]
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn is_valid_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
