//! Composing every documentation set into one site navigation.
//!
//! Each set is built on its own. The manifest then picks tables of
//! contents out of the sets by source URI and mounts them under new URL
//! prefixes. A mounted table of contents keeps its own pages but drops the
//! nested tables of contents the manifest doesn't place under it.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use stitch_config::{NavigationFile, TocReference};
use stitch_nav::{
    DiagnosticsCollector, DocumentationSetNavigation, ItemId, ItemKind, NavigationIndex,
    NavigationTree, NodeKind, Scope, SourceUri,
};

use crate::mapping::{declared_sources, parse_toc_source, phantom_sources};

/// Options of the site composition.
#[derive(Clone, Debug)]
pub struct SiteOptions {
    /// Repository whose root pages are mounted at the site root.
    pub narrative_repository: String,
    /// Prefix of every site URL.
    pub site_prefix: Option<String>,
    /// Manifest path diagnostics are reported against.
    pub manifest_path: String,
}

/// `docs/` -> `/docs`; blank -> `None`.
#[must_use]
pub fn normalize_site_prefix(prefix: Option<&str>) -> Option<String> {
    let trimmed = prefix?.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    })
}

/// The composed site.
#[derive(Debug)]
pub struct SiteNavigation {
    tree: NavigationTree,
    root: ItemId,
    nodes: BTreeMap<SourceUri, ItemId>,
    set_roots: BTreeMap<String, ItemId>,
    phantoms: BTreeSet<SourceUri>,
    index: NavigationIndex,
    site_prefix: Option<String>,
}

struct Composer<'a> {
    tree: &'a mut NavigationTree,
    nodes: &'a BTreeMap<SourceUri, ItemId>,
    unseen: BTreeSet<SourceUri>,
    mounted: BTreeSet<ItemId>,
    declared: BTreeSet<SourceUri>,
    phantoms: &'a BTreeSet<SourceUri>,
    options: &'a SiteOptions,
    site_prefix: Option<&'a str>,
    diagnostics: &'a DiagnosticsCollector,
}

impl Composer<'_> {
    fn mount_prefix(&self, toc_ref: &TocReference, source: &SourceUri) -> String {
        let declared = toc_ref
            .path_prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        let prefix = match declared {
            Some(prefix) => prefix.to_owned(),
            None if source.scheme() == self.options.narrative_repository => source.path().to_owned(),
            None => {
                self.diagnostics.emit_error(
                    &self.options.manifest_path,
                    format!("path_prefix is required for TOC reference: {source}"),
                );
                format!(
                    "bad-mapping-{}-{}",
                    source.scheme(),
                    source.path().replace('/', "-")
                )
                .trim_end_matches('-')
                .to_owned()
            }
        };
        let prefix = prefix.trim_matches('/');
        match self.site_prefix {
            Some(site) if prefix.is_empty() => site.to_owned(),
            Some(site) => format!("{site}/{prefix}"),
            None => format!("/{prefix}"),
        }
    }

    /// Mount one manifest reference and its declared children under `parent`.
    ///
    /// `root` is the top-level mounted table of contents this reference is
    /// nested in; top-level references report themselves.
    fn mount(&mut self, toc_ref: &TocReference, parent: ItemId, root: Option<ItemId>) -> Option<ItemId> {
        let context = self.options.manifest_path.as_str();
        let source = match parse_toc_source(&toc_ref.toc, &self.options.narrative_repository) {
            Ok(source) => source,
            Err(e) => {
                self.diagnostics.emit_error(context, format!("Invalid TOC reference: {e}"));
                return None;
            }
        };

        let Some(&node) = self.nodes.get(&source) else {
            self.diagnostics.emit_error(
                context,
                format!("Could not find navigation node for identifier: {source}"),
            );
            return None;
        };
        if !self.mounted.insert(node) {
            self.diagnostics.emit_error(
                context,
                format!("Navigation node {source} is declared more than once in navigation.yml"),
            );
            return None;
        }
        self.unseen.remove(&source);
        let root = root.unwrap_or(node);

        let path_prefix = self.mount_prefix(toc_ref, &source);
        self.tree.item_mut(node).parent = Some(parent);
        let home = self.tree.rehome(node, path_prefix, root);

        // Nested tables of contents only come back through the manifest.
        // One mounted already keeps its own home and parent.
        let existing = self.tree.children(node).to_vec();
        let mut children = Vec::with_capacity(existing.len() + toc_ref.children.len());
        for &child in &existing {
            if self.tree.item(child).is_root() {
                if !self.mounted.contains(&child) {
                    self.tree.item_mut(child).parent = Some(node);
                    self.tree.set_home(child, home);
                }
                continue;
            }
            children.push(child);
        }

        for child_ref in &toc_ref.children {
            if let Some(child) = self.mount(child_ref, node, Some(root)) {
                children.push(child);
            }
        }

        for &child in &existing {
            let Some(identifier) = self.tree.identifier(child) else {
                continue;
            };
            if self.declared.contains(identifier) || self.phantoms.contains(identifier) {
                continue;
            }
            self.diagnostics.emit_warning(
                context,
                format!("Navigation does not explicitly declare: {identifier}"),
            );
        }

        self.tree.set_children(node, children);
        Some(node)
    }
}

impl SiteNavigation {
    /// Compose `sets` as laid out by `manifest`.
    ///
    /// Sets must be built in assembler mode so every nested table of
    /// contents can be mounted on its own. Problems are reported to
    /// `diagnostics`; unresolvable references are left out.
    pub fn compose(
        manifest: &NavigationFile,
        sets: Vec<DocumentationSetNavigation>,
        options: &SiteOptions,
        diagnostics: &DiagnosticsCollector,
    ) -> Self {
        let start = Instant::now();
        let site_prefix = normalize_site_prefix(options.site_prefix.as_deref());
        let context = options.manifest_path.as_str();

        let mut tree = NavigationTree::new();
        let origin: Arc<str> = Arc::from("site");
        let root = tree.add_node(
            &origin,
            NodeKind::Site,
            String::new(),
            Some(SourceUri::new("site", "")),
            Scope::SelfScoped,
        );
        let home = tree.alloc_home(site_prefix.clone().unwrap_or_default(), root, "");
        tree.set_home(root, home);

        let mut nodes = BTreeMap::new();
        let mut set_roots = BTreeMap::new();
        for set in sets {
            let parts = set.into_parts();
            let offsets = tree.absorb(parts.tree);
            set_roots.insert(parts.repository.to_string(), offsets.item(parts.root));
            for (identifier, id) in parts.toc_nodes {
                match nodes.entry(identifier) {
                    Entry::Vacant(entry) => {
                        entry.insert(offsets.item(id));
                    }
                    Entry::Occupied(entry) => diagnostics.emit_error(
                        context,
                        format!("Duplicate navigation identifier: {} in navigation.yml", entry.key()),
                    ),
                }
            }
        }

        let phantoms = phantom_sources(manifest, &options.narrative_repository);
        let mut composer = Composer {
            tree: &mut tree,
            nodes: &nodes,
            unseen: nodes.keys().cloned().collect(),
            mounted: BTreeSet::new(),
            declared: declared_sources(manifest, &options.narrative_repository),
            phantoms: &phantoms,
            options,
            site_prefix: site_prefix.as_deref(),
            diagnostics,
        };
        let mut children: Vec<ItemId> = manifest
            .toc
            .iter()
            .filter_map(|toc_ref| composer.mount(toc_ref, root, None))
            .collect();
        let mut unseen = std::mem::take(&mut composer.unseen);

        let narrative = options.narrative_repository.as_str();
        match set_roots.get(narrative) {
            Some(&narrative_root) => {
                let identifier = SourceUri::new(narrative, "");
                let placed = !unseen.contains(&identifier);
                if !placed {
                    unseen.remove(&identifier);
                    tree.rehome(narrative_root, site_prefix.clone().unwrap_or_default(), root);
                    tree.item_mut(narrative_root).parent = Some(root);
                }
                let pages = narrative_root_pages(&mut tree, narrative_root, placed);
                if placed && tree.children(narrative_root).is_empty() {
                    detach(&mut tree, &mut children, root, narrative_root);
                }
                if pages.is_empty() {
                    diagnostics.emit_warning(
                        context,
                        format!("Narrative repository '{narrative}' has no root-level pages"),
                    );
                }
                for page in pages {
                    if !children.contains(&page) {
                        children.push(page);
                    }
                }
            }
            None => diagnostics.emit_warning(
                context,
                format!("Narrative repository '{narrative}' is not part of the assembled sets"),
            ),
        }

        tree.set_children(root, children);

        for phantom in &phantoms {
            if let Some(&node) = nodes.get(phantom) {
                tree.item_mut(node).hidden = true;
            }
        }

        let index = NavigationIndex::assign(&mut tree, root);

        for identifier in &unseen {
            let Some(&node) = nodes.get(identifier) else {
                continue;
            };
            if !phantoms.contains(identifier) {
                diagnostics.emit_hint(
                    context,
                    format!("Navigation does not explicitly declare: {identifier} as a phantom"),
                );
            }
            tree.item_mut(node).parent = Some(root);
        }

        tracing::info!(
            sets = set_roots.len(),
            tocs = nodes.len(),
            items = index.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Navigation assembled"
        );

        Self {
            tree,
            root,
            nodes,
            set_roots,
            phantoms,
            index,
            site_prefix,
        }
    }

    /// The arena.
    #[must_use]
    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    /// The site root.
    #[must_use]
    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Site URL: the site prefix, or `/`.
    #[must_use]
    pub fn url(&self) -> String {
        self.tree.url(self.root)
    }

    /// Title of the site's index page.
    #[must_use]
    pub fn title(&self) -> String {
        self.tree.navigation_title(self.root)
    }

    /// Normalized site prefix.
    #[must_use]
    pub fn site_prefix(&self) -> Option<&str> {
        self.site_prefix.as_deref()
    }

    /// Every table of contents of every set, keyed by source.
    #[must_use]
    pub fn nodes(&self) -> &BTreeMap<SourceUri, ItemId> {
        &self.nodes
    }

    /// Root of a repository's documentation set.
    #[must_use]
    pub fn set_root(&self, repository: &str) -> Option<ItemId> {
        self.set_roots.get(repository).copied()
    }

    /// Declared phantoms.
    #[must_use]
    pub fn phantoms(&self) -> &BTreeSet<SourceUri> {
        &self.phantoms
    }

    /// Site-wide ordering.
    #[must_use]
    pub fn navigation_index(&self) -> &NavigationIndex {
        &self.index
    }

    /// Item for a repository's markdown file.
    #[must_use]
    pub fn find_file(&self, repository: &str, path: &str) -> Option<ItemId> {
        self.index.find_file(repository, path)
    }
}

/// Pages directly in the narrative repository's root directory.
///
/// When the narrative root is itself mounted the pages are moved out of it.
fn narrative_root_pages(tree: &mut NavigationTree, narrative_root: ItemId, placed: bool) -> Vec<ItemId> {
    let (pages, rest): (Vec<ItemId>, Vec<ItemId>) = tree
        .children(narrative_root)
        .iter()
        .copied()
        .partition(|&child| matches!(&tree.item(child).kind, ItemKind::Page(page) if !page.path.contains('/')));
    if placed && !pages.is_empty() {
        tree.set_children(narrative_root, rest);
    }
    pages
}

/// Remove an emptied node from wherever the manifest mounted it.
fn detach(tree: &mut NavigationTree, site_children: &mut Vec<ItemId>, site: ItemId, node: ItemId) {
    site_children.retain(|&child| child != node);
    match tree.item(node).parent {
        Some(parent) if parent != site => {
            let siblings = tree
                .children(parent)
                .iter()
                .copied()
                .filter(|&child| child != node)
                .collect();
            tree.set_children(parent, siblings);
        }
        _ => {}
    }
}
