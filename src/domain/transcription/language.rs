//! Language tag value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidLanguageError;

/// Default recognition language
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Value object representing an IETF-style language tag (e.g. "en-US", "ja").
/// Validated and canonicalized on creation: primary subtag lowercase,
/// region subtag uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    tag: String,
}

impl Language {
    /// Get the canonical tag string
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    fn canonicalize(primary: &str, region: Option<&str>) -> String {
        match region {
            Some(r) => format!("{}-{}", primary.to_lowercase(), r.to_uppercase()),
            None => primary.to_lowercase(),
        }
    }
}

impl FromStr for Language {
    type Err = InvalidLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || InvalidLanguageError {
            input: s.to_string(),
        };

        let mut parts = input.split('-');
        let primary = parts.next().ok_or_else(invalid)?;
        if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let region = match parts.next() {
            Some(r) => {
                if !(2..=4).contains(&r.len()) || !r.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(invalid());
                }
                Some(r)
            }
            None => None,
        };

        // More than two subtags is beyond what the backend accepts
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            tag: Self::canonicalize(primary, region),
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self {
            tag: DEFAULT_LANGUAGE.to_string(),
        }
    }
}
