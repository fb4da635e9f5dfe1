//! Serde models of `docset.yml` and nested `toc.yml` files.
//!
//! These are the raw documents as authored. Path joining, folder discovery
//! and validation happen when the navigation crate expands them.

use serde::Deserialize;

use crate::ConfigError;

/// A documentation set's `docset.yml` (or `_docset.yml`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DocsetFile {
    /// Project title, used for the set's navigation title.
    pub project: Option<String>,
    /// Repositories this set links to with `scheme://` cross-links.
    pub cross_links: Vec<String>,
    /// Top-level table of contents.
    pub toc: Vec<TocItem>,
}

impl DocsetFile {
    /// Parse a docset file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        parse(content)
    }
}

/// A nested `toc.yml` referenced by a `toc:` entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TocFile {
    /// Optional project title of the nested table of contents.
    pub project: Option<String>,
    /// Entries of the nested table of contents.
    pub toc: Vec<TocItem>,
}

impl TocFile {
    /// Parse a nested toc file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        parse(content)
    }
}

fn parse<T: for<'de> Deserialize<'de> + Default>(content: &str) -> Result<T, ConfigError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_str(trimmed)?)
}

/// `hidden:` is either a flag on a `file:` entry or a file path of its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Hidden {
    /// `hidden: true`
    Flag(bool),
    /// `hidden: path.md`
    File(String),
}

/// One raw entry of a table of contents.
///
/// Exactly one of `file`, `hidden` (as a path), `folder`, `toc` and
/// `crosslink` identifies the entry kind; `folder` may be combined with
/// `file` to name the folder's landing page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TocItem {
    /// Markdown file path.
    pub file: Option<String>,
    /// Hidden flag or hidden file path.
    pub hidden: Option<Hidden>,
    /// Folder path.
    pub folder: Option<String>,
    /// Nested table of contents directory.
    pub toc: Option<String>,
    /// Cross-link URI (`scheme://path.md`).
    pub crosslink: Option<String>,
    /// Title of a cross-link.
    pub title: Option<String>,
    /// Declared children. `None` when the key is absent.
    pub children: Option<Vec<TocItem>>,
}

impl TocItem {
    /// File path of a `file:` or `hidden: path` entry.
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        match (&self.file, &self.hidden) {
            (Some(file), _) => Some(file),
            (None, Some(Hidden::File(file))) => Some(file),
            _ => None,
        }
    }

    /// Whether the entry is hidden from rendered menus.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        match &self.hidden {
            Some(Hidden::Flag(flag)) => *flag,
            Some(Hidden::File(_)) => true,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_docset() {
        let docset = DocsetFile::from_yaml(
            r"
project: 'APM Agent'
cross_links:
  - docs-content
toc:
  - file: index.md
  - folder: setup
    children:
      - file: index.md
      - file: install.md
        hidden: true
  - hidden: internal.md
  - toc: reference
  - title: Elasticsearch
    crosslink: elasticsearch://index.md
",
        )
        .unwrap();

        assert_eq!(docset.project.as_deref(), Some("APM Agent"));
        assert_eq!(docset.cross_links, vec!["docs-content"]);
        assert_eq!(docset.toc.len(), 5);

        let setup = &docset.toc[1];
        assert_eq!(setup.folder.as_deref(), Some("setup"));
        let children = setup.children.as_ref().unwrap();
        assert_eq!(children[1].file_path(), Some("install.md"));
        assert!(children[1].is_hidden());
        assert!(!children[0].is_hidden());

        assert_eq!(docset.toc[2].file_path(), Some("internal.md"));
        assert!(docset.toc[2].is_hidden());
        assert_eq!(docset.toc[3].toc.as_deref(), Some("reference"));
        assert!(docset.toc[3].children.is_none());
        assert_eq!(
            docset.toc[4].crosslink.as_deref(),
            Some("elasticsearch://index.md")
        );
    }

    #[test]
    fn test_empty_children_distinct_from_absent() {
        let docset = DocsetFile::from_yaml("toc:\n  - folder: a\n    children: []\n").unwrap();

        assert_eq!(docset.toc[0].children.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn test_parse_empty_document() {
        let toc = TocFile::from_yaml("  \n").unwrap();

        assert!(toc.toc.is_empty());
        assert!(toc.project.is_none());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            DocsetFile::from_yaml("toc: [unclosed"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
