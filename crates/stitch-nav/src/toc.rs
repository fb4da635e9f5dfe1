//! Expanded table of contents entries.
//!
//! [`TocEntry`] is what the loader produces from `docset.yml`/`toc.yml`:
//! paths are already joined to the documentation set root and folder
//! contents are already discovered. Entries are input only and are dropped
//! once the navigation tree exists.

/// A markdown file, optionally with children of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRef {
    /// Path relative to the documentation set root.
    pub path: String,
    /// Excluded from menus.
    pub hidden: bool,
    /// Children declared under the file.
    pub children: Vec<TocEntry>,
    /// Configuration file the entry was declared in.
    pub context: String,
}

/// A directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderRef {
    /// Directory path relative to the documentation set root.
    pub path: String,
    /// Excluded from menus.
    pub hidden: bool,
    /// Declared or discovered children.
    pub children: Vec<TocEntry>,
    /// Configuration file the entry was declared in.
    pub context: String,
}

/// A link into another repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossLinkRef {
    /// `scheme://path.md` URI.
    pub uri: String,
    /// Menu title; defaults to the URI.
    pub title: Option<String>,
    /// Excluded from menus.
    pub hidden: bool,
    /// Configuration file the entry was declared in.
    pub context: String,
}

/// A nested `toc.yml` scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocRef {
    /// Directory holding the `toc.yml`.
    pub path: String,
    /// Excluded from menus.
    pub hidden: bool,
    /// Entries of the nested `toc.yml`.
    pub children: Vec<TocEntry>,
    /// The nested `toc.yml` path.
    pub context: String,
}

/// One table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TocEntry {
    /// `file:` / `hidden:`
    File(FileRef),
    /// `folder:`
    Folder(FolderRef),
    /// `crosslink:`
    CrossLink(CrossLinkRef),
    /// `toc:`
    Toc(TocRef),
}

impl TocEntry {
    /// Declared path, or the URI for cross-links.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::File(file) => &file.path,
            Self::Folder(folder) => &folder.path,
            Self::CrossLink(link) => &link.uri,
            Self::Toc(toc) => &toc.path,
        }
    }

    /// Nested entries.
    #[must_use]
    pub fn children(&self) -> &[TocEntry] {
        match self {
            Self::File(file) => &file.children,
            Self::Folder(folder) => &folder.children,
            Self::Toc(toc) => &toc.children,
            Self::CrossLink(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accessors() {
        let entry = TocEntry::Folder(FolderRef {
            path: "setup".to_owned(),
            hidden: false,
            children: vec![TocEntry::File(FileRef {
                path: "setup/index.md".to_owned(),
                hidden: false,
                children: Vec::new(),
                context: "docset.yml".to_owned(),
            })],
            context: "docset.yml".to_owned(),
        });

        assert_eq!(entry.path(), "setup");
        assert_eq!(entry.children().len(), 1);
        assert_eq!(entry.children()[0].path(), "setup/index.md");
    }

    #[test]
    fn test_cross_link_has_no_children() {
        let entry = TocEntry::CrossLink(CrossLinkRef {
            uri: "kibana://index.md".to_owned(),
            title: None,
            hidden: false,
            context: "docset.yml".to_owned(),
        });

        assert_eq!(entry.path(), "kibana://index.md");
        assert!(entry.children().is_empty());
    }
}
