//! Building one documentation set's navigation in isolation.

use std::collections::BTreeMap;
use std::sync::Arc;

use stitch_storage::{Storage, title_from_filename};

use crate::content::{CrossLinkResolver, DocumentFactory, StorageDocumentFactory};
use crate::diagnostics::DiagnosticsCollector;
use crate::resolver::TocResolver;
use crate::toc_loader::{DocsetToc, TocLoader};
use crate::traversal::NavigationIndex;
use crate::tree::{ItemId, NavigationTree, NodeKind, Scope};
use crate::uri::SourceUri;

/// How a documentation set is built.
#[derive(Clone, Debug, Default)]
pub struct SetOptions {
    /// Initial URL prefix of the set.
    pub path_prefix: Option<String>,
    /// Give every nested table of contents its own home so the global
    /// composer can re-home it.
    pub assembler_build: bool,
}

/// One repository's navigation tree with its lookups.
#[derive(Debug)]
pub struct DocumentationSetNavigation {
    tree: NavigationTree,
    root: ItemId,
    repository: Arc<str>,
    identifier: SourceUri,
    toc_nodes: BTreeMap<SourceUri, ItemId>,
    index: NavigationIndex,
    config_path: String,
}

/// A built set taken apart for composition.
#[derive(Debug)]
pub struct SetParts {
    /// Arena holding every item of the set.
    pub tree: NavigationTree,
    /// The documentation set root.
    pub root: ItemId,
    /// Repository name.
    pub repository: Arc<str>,
    /// `{repository}://`
    pub identifier: SourceUri,
    /// Every root of the set (itself and nested tables of contents).
    pub toc_nodes: BTreeMap<SourceUri, ItemId>,
    /// Docset file the set was loaded from.
    pub config_path: String,
}

impl DocumentationSetNavigation {
    /// Build a set from already loaded entries.
    ///
    /// Problems are reported to `diagnostics`; the returned set contains
    /// whatever could be built. A set without resolvable entries has no index.
    pub fn build(
        repository: &str,
        docset: &DocsetToc,
        factory: &dyn DocumentFactory,
        cross_links: &dyn CrossLinkResolver,
        diagnostics: &DiagnosticsCollector,
        options: &SetOptions,
    ) -> Self {
        let origin: Arc<str> = Arc::from(repository);
        let identifier = SourceUri::new(repository, "");

        let mut tree = NavigationTree::new();
        let root = tree.add_node(
            &origin,
            NodeKind::DocumentationSet,
            String::new(),
            Some(identifier.clone()),
            Scope::SelfScoped,
        );
        let home = tree.alloc_home(options.path_prefix.clone().unwrap_or_default(), root, "");
        tree.set_home(root, home);
        tree.set_node_title(
            root,
            docset
                .project
                .clone()
                .unwrap_or_else(|| title_from_filename(repository)),
        );

        let mut toc_nodes = BTreeMap::from([(identifier.clone(), root)]);
        let children = TocResolver {
            tree: &mut tree,
            factory,
            cross_links,
            diagnostics,
            origin: Arc::clone(&origin),
            assembler_build: options.assembler_build,
            toc_nodes: &mut toc_nodes,
        }
        .resolve_all(&docset.entries, root, root);

        if children.is_empty() {
            let name = docset.project.as_deref().unwrap_or(repository);
            let message = if docset.entries.is_empty() {
                format!("Documentation set '{name}' has no table of contents defined")
            } else {
                format!(
                    "Documentation set '{name}' table of contents has items defined but none could be created"
                )
            };
            diagnostics.emit_error(&docset.config_path, message);
        } else {
            tree.set_children(root, children);
        }

        let index = NavigationIndex::assign(&mut tree, root);
        tracing::debug!(
            repository,
            items = index.len(),
            tocs = toc_nodes.len(),
            "Built documentation set navigation"
        );

        Self {
            tree,
            root,
            repository: origin,
            identifier,
            toc_nodes,
            index,
            config_path: docset.config_path.clone(),
        }
    }

    /// Load `docset.yml` from storage and build the set.
    ///
    /// Returns `None` if the docset file is missing or malformed.
    pub fn from_storage(
        repository: &str,
        storage: &dyn Storage,
        cross_links: &dyn CrossLinkResolver,
        diagnostics: &DiagnosticsCollector,
        options: &SetOptions,
    ) -> Option<Self> {
        let docset = TocLoader::new(storage, diagnostics).load()?;
        let factory = StorageDocumentFactory::new(storage);
        Some(Self::build(
            repository,
            &docset,
            &factory,
            cross_links,
            diagnostics,
            options,
        ))
    }

    /// The arena.
    #[must_use]
    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    /// The set root.
    #[must_use]
    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Repository name.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// `{repository}://`
    #[must_use]
    pub fn identifier(&self) -> &SourceUri {
        &self.identifier
    }

    /// Navigation title of the set.
    #[must_use]
    pub fn title(&self) -> String {
        self.tree.navigation_title(self.root)
    }

    /// URL of the set's landing page.
    #[must_use]
    pub fn url(&self) -> String {
        self.tree.url(self.root)
    }

    /// Landing page, unset when nothing could be built.
    #[must_use]
    pub fn index(&self) -> Option<ItemId> {
        self.tree.index_of(self.root)
    }

    /// Result of the last ordering pass.
    #[must_use]
    pub fn navigation_index(&self) -> &NavigationIndex {
        &self.index
    }

    /// Every root of the set, keyed by identifier.
    #[must_use]
    pub fn toc_nodes(&self) -> &BTreeMap<SourceUri, ItemId> {
        &self.toc_nodes
    }

    /// Docset file the set was loaded from.
    #[must_use]
    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    /// Item for a markdown file of this set.
    #[must_use]
    pub fn find_file(&self, path: &str) -> Option<ItemId> {
        self.index.find_file(&self.repository, path)
    }

    /// Replace the top-level children and re-run the index and ordering passes.
    ///
    /// Calling it twice with the same children yields the same ordering.
    pub fn set_children(&mut self, children: Vec<ItemId>) {
        self.tree.set_children(self.root, children);
        self.index = NavigationIndex::assign(&mut self.tree, self.root);
    }

    /// Change the set's URL prefix. Every URL below the root follows.
    pub fn set_path_prefix(&mut self, path_prefix: impl Into<String>) {
        self.tree.set_path_prefix(self.root, path_prefix);
    }

    /// Take the set apart for composition into a larger tree.
    #[must_use]
    pub fn into_parts(self) -> SetParts {
        SetParts {
            tree: self.tree,
            root: self.root,
            repository: self.repository,
            identifier: self.identifier,
            toc_nodes: self.toc_nodes,
            config_path: self.config_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use stitch_storage::MockStorage;

    use super::*;
    use crate::content::NoopCrossLinkResolver;
    use crate::diagnostics::Severity;
    use crate::tree::ItemKind;

    fn build(storage: &MockStorage, options: &SetOptions) -> (DocumentationSetNavigation, DiagnosticsCollector) {
        let diagnostics = DiagnosticsCollector::new(false);
        let set = DocumentationSetNavigation::from_storage(
            "docs",
            storage,
            &NoopCrossLinkResolver,
            &diagnostics,
            options,
        )
        .unwrap();
        (set, diagnostics)
    }

    fn setup_storage() -> MockStorage {
        MockStorage::new()
            .with_file(
                "docset.yml",
                r"
project: Docs
toc:
  - file: index.md
  - folder: setup
    children:
      - file: install.md
      - file: index.md
",
            )
            .with_page("index.md", "Home")
            .with_page("setup/index.md", "Setup")
            .with_page("setup/install.md", "Install")
    }

    fn child_by_path(set: &DocumentationSetNavigation, parent: ItemId, path: &str) -> ItemId {
        set.tree()
            .children(parent)
            .iter()
            .copied()
            .find(|&c| set.tree().item(c).path() == Some(path))
            .unwrap()
    }

    #[test]
    fn test_end_to_end_urls() {
        let (mut set, diagnostics) = build(&setup_storage(), &SetOptions::default());
        let setup = child_by_path(&set, set.root(), "setup");
        let install = child_by_path(&set, setup, "setup/install.md");

        assert_eq!(diagnostics.errors(), 0);
        assert_eq!(set.url(), "/");
        assert_eq!(set.tree().url(setup), "/setup");
        assert_eq!(set.tree().url(install), "/setup/install");

        set.set_path_prefix("/v8.0");

        assert_eq!(set.tree().url(setup), "/v8.0/setup");
        assert_eq!(set.tree().url(install), "/v8.0/setup/install");
    }

    #[test]
    fn test_initial_path_prefix() {
        let options = SetOptions {
            path_prefix: Some("/docs".to_owned()),
            assembler_build: false,
        };
        let (set, _) = build(&setup_storage(), &options);

        assert_eq!(set.url(), "/docs");
        assert_eq!(set.title(), "Home");
    }

    #[test]
    fn test_index_first_regardless_of_position() {
        let (set, _) = build(&setup_storage(), &SetOptions::default());
        let setup = child_by_path(&set, set.root(), "setup");

        let first = set.tree().children(setup)[0];

        assert_eq!(set.tree().item(first).path(), Some("setup/index.md"));
        assert_eq!(set.tree().index_of(setup), Some(first));
    }

    #[test]
    fn test_navigation_index_unique_and_contiguous() {
        let (set, _) = build(&setup_storage(), &SetOptions::default());

        let indices: Vec<usize> = set
            .navigation_index()
            .by_order()
            .iter()
            .map(|&id| set.tree().item(id).navigation_index)
            .collect();

        let unique: HashSet<usize> = indices.iter().copied().collect();
        assert_eq!(unique.len(), indices.len());
        assert_eq!(indices, (0..indices.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_set_children_idempotent() {
        let (mut set, _) = build(&setup_storage(), &SetOptions::default());
        let children = set.tree().children(set.root()).to_vec();

        set.set_children(children.clone());
        let first: Vec<(ItemId, usize)> = snapshot(&set);
        set.set_children(children);
        let second = snapshot(&set);

        assert_eq!(first, second);
    }

    fn snapshot(set: &DocumentationSetNavigation) -> Vec<(ItemId, usize)> {
        set.navigation_index()
            .by_order()
            .iter()
            .map(|&id| (id, set.tree().item(id).navigation_index))
            .collect()
    }

    #[test]
    fn test_find_file() {
        let (set, _) = build(&setup_storage(), &SetOptions::default());

        let install = set.find_file("setup/install.md").unwrap();

        assert_eq!(set.tree().navigation_title(install), "Install");
        assert!(set.find_file("missing.md").is_none());
    }

    #[test]
    fn test_missing_file_is_omitted() {
        let storage = MockStorage::new()
            .with_file("docset.yml", "toc:\n  - file: index.md\n  - file: missing.md\n")
            .with_page("index.md", "Home");

        let (set, diagnostics) = build(&storage, &SetOptions::default());

        assert_eq!(set.tree().children(set.root()).len(), 1);
        assert_eq!(
            diagnostics.messages(Severity::Error),
            vec!["File navigation 'missing.md' could not be created"]
        );
    }

    #[test]
    fn test_empty_folder_rejected() {
        let storage = MockStorage::new()
            .with_file(
                "docset.yml",
                "toc:\n  - file: index.md\n  - folder: empty\n    children:\n      - file: gone.md\n",
            )
            .with_page("index.md", "Home");

        let (set, diagnostics) = build(&storage, &SetOptions::default());

        assert_eq!(set.tree().children(set.root()).len(), 1);
        assert!(
            diagnostics
                .messages(Severity::Error)
                .contains(&"Folder navigation 'empty' has children defined but none could be created".to_owned())
        );
    }

    #[test]
    fn test_empty_nested_toc_rejected() {
        let storage = MockStorage::new()
            .with_file("docset.yml", "toc:\n  - file: index.md\n  - toc: reference\n")
            .with_file("reference/toc.yml", "toc: []\n")
            .with_page("index.md", "Home");

        let (set, diagnostics) = build(&storage, &SetOptions::default());

        assert_eq!(set.tree().children(set.root()).len(), 1);
        assert_eq!(
            diagnostics.messages(Severity::Error),
            vec!["Table of contents navigation 'reference' has no children defined"]
        );
        assert_eq!(set.toc_nodes().len(), 1);
    }

    #[test]
    fn test_nested_toc_declared_but_unresolved() {
        let storage = MockStorage::new()
            .with_file("docset.yml", "toc:\n  - file: index.md\n  - toc: reference\n")
            .with_file("reference/toc.yml", "toc:\n  - file: gone.md\n")
            .with_page("index.md", "Home");

        let (_, diagnostics) = build(&storage, &SetOptions::default());

        assert!(diagnostics.messages(Severity::Error).contains(
            &"Table of contents navigation 'reference' has children defined but none could be created"
                .to_owned()
        ));
    }

    #[test]
    fn test_virtual_file_requires_children() {
        let storage = MockStorage::new()
            .with_file(
                "docset.yml",
                "toc:\n  - file: index.md\n  - file: guide.md\n    children:\n      - file: gone.md\n",
            )
            .with_page("index.md", "Home")
            .with_page("guide.md", "Guide");

        let (_, diagnostics) = build(&storage, &SetOptions::default());

        assert!(diagnostics.messages(Severity::Error).contains(
            &"File navigation 'guide.md' has children defined but none could be created".to_owned()
        ));
    }

    #[test]
    fn test_virtual_file_with_children() {
        let storage = MockStorage::new()
            .with_file(
                "docset.yml",
                "toc:\n  - file: index.md\n  - file: guide.md\n    children:\n      - file: advanced.md\n",
            )
            .with_page("index.md", "Home")
            .with_page("guide.md", "Guide")
            .with_page("advanced.md", "Advanced");

        let (set, _) = build(&storage, &SetOptions::default());
        let guide = set.find_file("guide.md").unwrap();
        let advanced = set.find_file("advanced.md").unwrap();

        assert_eq!(set.tree().url(guide), "/guide");
        assert_eq!(set.tree().children(guide), &[advanced]);
        assert_eq!(set.tree().item(advanced).parent, Some(guide));
        assert_eq!(set.tree().index_of(guide), None);
    }

    #[test]
    fn test_no_toc_defined() {
        let storage = MockStorage::new().with_file("docset.yml", "project: Empty\n");

        let (set, diagnostics) = build(&storage, &SetOptions::default());

        assert_eq!(set.index(), None);
        assert_eq!(
            diagnostics.messages(Severity::Error),
            vec!["Documentation set 'Empty' has no table of contents defined"]
        );
    }

    #[test]
    fn test_no_toc_items_created() {
        let storage = MockStorage::new().with_file("docset.yml", "project: Broken\ntoc:\n  - file: gone.md\n");

        let (set, diagnostics) = build(&storage, &SetOptions::default());

        assert_eq!(set.index(), None);
        assert_eq!(set.url(), "/");
        assert!(diagnostics.messages(Severity::Error).contains(
            &"Documentation set 'Broken' table of contents has items defined but none could be created".to_owned()
        ));
    }

    fn toc_storage() -> MockStorage {
        MockStorage::new()
            .with_file("docset.yml", "toc:\n  - file: index.md\n  - toc: reference\n")
            .with_file("reference/toc.yml", "toc:\n  - file: index.md\n  - file: api.md\n")
            .with_page("index.md", "Home")
            .with_page("reference/index.md", "Reference")
            .with_page("reference/api.md", "API")
    }

    #[test]
    fn test_isolated_toc_shares_home() {
        let (mut set, _) = build(&toc_storage(), &SetOptions::default());
        let toc = set.toc_nodes()[&SourceUri::new("docs", "reference")];
        let api = set.find_file("reference/api.md").unwrap();

        assert_eq!(set.tree().home_of(toc), set.tree().home_of(set.root()));
        assert_eq!(set.tree().navigation_root(api), Some(set.root()));
        assert_eq!(set.tree().url(api), "/reference/api");

        set.set_path_prefix("/v2");

        assert_eq!(set.tree().url(api), "/v2/reference/api");
        assert_eq!(set.tree().url(toc), "/v2/reference");
    }

    #[test]
    fn test_assembler_toc_gets_own_home() {
        let options = SetOptions {
            path_prefix: None,
            assembler_build: true,
        };
        let (set, _) = build(&toc_storage(), &options);
        let toc = set.toc_nodes()[&SourceUri::new("docs", "reference")];
        let api = set.find_file("reference/api.md").unwrap();

        assert_ne!(set.tree().home_of(toc), set.tree().home_of(set.root()));
        assert_eq!(set.tree().item(api).scope, toc);
        assert_eq!(set.tree().url(api), "/reference/api");
        assert_eq!(set.tree().navigation_root(api), Some(set.root()));
    }

    #[test]
    fn test_cross_link_unresolved_in_isolation() {
        let storage = MockStorage::new()
            .with_file(
                "docset.yml",
                "toc:\n  - file: index.md\n  - title: Kibana\n    crosslink: kibana://index.md\n",
            )
            .with_page("index.md", "Home");

        let (set, diagnostics) = build(&storage, &SetOptions::default());

        assert_eq!(set.tree().children(set.root()).len(), 1);
        assert!(
            set.tree()
                .children(set.root())
                .iter()
                .all(|&c| !matches!(set.tree().item(c).kind, ItemKind::CrossLink(_)))
        );
        assert_eq!(diagnostics.errors(), 1);
    }
}
