//! Navigation tree model for stitch.
//!
//! Builds one documentation set's navigation from its `docset.yml` and
//! exposes the arena the assembler composes into a site:
//!
//! - [`NavigationTree`]: items, parents, children and re-homable URL scopes
//! - [`DocumentationSetNavigation`]: the single-set builder
//! - [`NavigationIndex`]: depth-first ordering and file lookup
//! - [`DiagnosticsCollector`]: where every build problem is reported
//!
//! # Example
//!
//! ```ignore
//! use stitch_nav::{DiagnosticsCollector, DocumentationSetNavigation, NoopCrossLinkResolver, SetOptions};
//! use stitch_storage::FsStorage;
//!
//! let storage = FsStorage::new("docs".into());
//! let diagnostics = DiagnosticsCollector::new(false);
//! let set = DocumentationSetNavigation::from_storage(
//!     "docs",
//!     &storage,
//!     &NoopCrossLinkResolver,
//!     &diagnostics,
//!     &SetOptions::default(),
//! );
//! ```

mod content;
mod diagnostics;
mod resolver;
mod set_builder;
mod short_id;
mod toc;
mod toc_loader;
mod traversal;
mod tree;
mod uri;

pub use content::{CrossLinkResolver, DocumentFactory, NoopCrossLinkResolver, StorageDocumentFactory};
pub use diagnostics::{Diagnostic, DiagnosticsCollector, Severity};
pub use set_builder::{DocumentationSetNavigation, SetOptions, SetParts};
pub use short_id::short_id;
pub use toc::{CrossLinkRef, FileRef, FolderRef, TocEntry, TocRef};
pub use toc_loader::{DOCSET_FILENAMES, DocsetToc, TOC_FILENAME, TocLoader};
pub use traversal::{NavigationIndex, file_key};
pub use tree::{
    Absorbed, CrossLinkLeaf, HomeId, HomeProvider, ItemId, ItemKind, LandingLeaf, NavItem,
    NavigationItem, NavigationTree, NodeItem, NodeKind, PageLeaf, RootInfo, Scope,
    markdown_path_to_url_path,
};
pub use uri::{SourceUri, UriError};
