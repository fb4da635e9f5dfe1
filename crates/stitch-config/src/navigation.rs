//! Serde model of the cross-repository `navigation.yml` manifest.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// The global navigation manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigationFile {
    /// Top-level references, in site order.
    pub toc: Vec<TocReference>,
    /// Routing-only tables of contents excluded from menus and collision checks.
    pub phantoms: Vec<PhantomReference>,
}

/// A manifest reference to one repository's table of contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TocReference {
    /// Source URI (`scheme://path`) or a bare narrative path.
    pub toc: String,
    /// URL path the referenced table of contents is mounted at.
    pub path_prefix: Option<String>,
    /// Nested references.
    pub children: Vec<TocReference>,
}

/// A phantom declaration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhantomReference {
    /// Source URI of the phantom.
    pub toc: String,
}

impl NavigationFile {
    /// Parse the manifest from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(trimmed)?)
    }

    /// Load the manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file is missing, or an I/O or
    /// YAML error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
