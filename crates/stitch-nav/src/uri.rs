//! Scheme-qualified source identifiers (`kibana://reference/api`).
//!
//! The scheme names a repository and the path is relative to that
//! repository's documentation root. Paths are compared segment-wise, so
//! `a://docs` is a prefix of `a://docs/api` but not of `a://docsite`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Error returned when a string is not a `scheme://path` URI.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UriError {
    /// No `://` separator.
    #[error("'{0}' is not a scheme qualified URI")]
    MissingScheme(String),
    /// Scheme is empty or contains characters outside `[A-Za-z0-9+.-]`.
    #[error("'{0}' has an invalid scheme")]
    InvalidScheme(String),
}

/// A repository-scoped source identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct SourceUri {
    scheme: String,
    path: String,
}

impl SourceUri {
    /// Build from parts. Leading and trailing slashes of `path` are dropped.
    #[must_use]
    pub fn new(scheme: impl Into<String>, path: &str) -> Self {
        Self {
            scheme: scheme.into(),
            path: path.trim_matches('/').to_owned(),
        }
    }

    /// Parse `scheme://path`.
    ///
    /// # Errors
    ///
    /// Returns [`UriError`] if there is no `://` or the scheme is invalid.
    pub fn parse(value: &str) -> Result<Self, UriError> {
        let trimmed = value.trim();
        let Some((scheme, path)) = trimmed.split_once("://") else {
            return Err(UriError::MissingScheme(value.to_owned()));
        };
        let valid = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'));
        if !valid {
            return Err(UriError::InvalidScheme(value.to_owned()));
        }
        Ok(Self::new(scheme, path))
    }

    /// Repository name.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Path without leading or trailing slashes; empty for a repository root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// First path segment, empty for a repository root.
    #[must_use]
    pub fn host(&self) -> &str {
        self.path.split('/').next().unwrap_or_default()
    }

    /// Segment-aware prefix test within the same scheme.
    #[must_use]
    pub fn starts_with(&self, other: &Self) -> bool {
        if self.scheme != other.scheme {
            return false;
        }
        if other.path.is_empty() {
            return true;
        }
        match self.path.strip_prefix(other.path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// The URI with one more path appended.
    #[must_use]
    pub fn join(&self, path: &str) -> Self {
        let path = path.trim_matches('/');
        if self.path.is_empty() {
            Self::new(self.scheme.clone(), path)
        } else if path.is_empty() {
            self.clone()
        } else {
            Self::new(self.scheme.clone(), &format!("{}/{path}", self.path))
        }
    }

    /// The parent directory URI, or `None` at the repository root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.path.is_empty() {
            return None;
        }
        let parent = self.path.rsplit_once('/').map_or("", |(dir, _)| dir);
        Some(Self::new(self.scheme.clone(), parent))
    }
}

impl fmt::Display for SourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)
    }
}

impl FromStr for SourceUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<SourceUri> for String {
    fn from(uri: SourceUri) -> Self {
        uri.to_string()
    }
}
