//! Published link registries (`links.json`).
//!
//! Every repository publishes the markdown paths it serves. The registries
//! back cross-link validation and the prefix checker.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stitch_config::AssemblerConfig;

use crate::error::AssembleError;

/// One published path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkEntry {
    /// Heading anchors available on the page.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<String>,
    /// Published but excluded from navigation.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

/// A repository's published links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RepositoryLinks {
    /// URL prefix the repository was last published under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path_prefix: Option<String>,
    /// Published markdown paths.
    pub links: BTreeMap<String, LinkEntry>,
    /// Cross-links the repository itself makes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cross_links: Vec<String>,
}

impl RepositoryLinks {
    /// Parse a registry.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load a registry from disk.
    pub fn load(path: &Path) -> Result<Self, AssembleError> {
        let content = std::fs::read_to_string(path).map_err(|source| AssembleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| AssembleError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// True if `path` is published. Paths with a `#fragment` must name a known anchor.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        let (path, anchor) = match path.split_once('#') {
            Some((path, anchor)) => (path, Some(anchor)),
            None => (path, None),
        };
        match (self.links.get(path.trim_matches('/')), anchor) {
            (Some(entry), Some(anchor)) => entry.anchors.iter().any(|a| a == anchor),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Registries of every configured repository, keyed by repository name.
///
/// A missing registry is skipped with a warning; a malformed one is an error.
pub fn load_registries(
    config: &AssemblerConfig,
) -> Result<BTreeMap<String, RepositoryLinks>, AssembleError> {
    let mut registries = BTreeMap::new();
    for repository in config.all_repositories() {
        let path = config.links_file_for(&repository);
        if !path.is_file() {
            tracing::warn!(repository, path = %path.display(), "No link registry found");
            continue;
        }
        let links = RepositoryLinks::load(&path)?;
        tracing::debug!(repository, links = links.links.len(), "Loaded link registry");
        registries.insert(repository, links);
    }
    Ok(registries)
}
