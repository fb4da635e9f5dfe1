//! Turning [`TocEntry`] values into navigation items.
//!
//! Resolution never aborts: an entry that can't be built is reported and
//! omitted, and its siblings carry on.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::content::{CrossLinkResolver, DocumentFactory};
use crate::diagnostics::DiagnosticsCollector;
use crate::toc::{CrossLinkRef, FileRef, FolderRef, TocEntry, TocRef};
use crate::tree::{CrossLinkLeaf, ItemId, NavigationTree, NodeKind, Scope};
use crate::uri::SourceUri;

/// State shared by one documentation set's resolution.
pub(crate) struct TocResolver<'a> {
    pub tree: &'a mut NavigationTree,
    pub factory: &'a dyn DocumentFactory,
    pub cross_links: &'a dyn CrossLinkResolver,
    pub diagnostics: &'a DiagnosticsCollector,
    pub origin: Arc<str>,
    pub assembler_build: bool,
    pub toc_nodes: &'a mut BTreeMap<SourceUri, ItemId>,
}

impl TocResolver<'_> {
    /// Resolve every entry under `parent`, addressing through `scope`.
    pub fn resolve_all(&mut self, entries: &[TocEntry], parent: ItemId, scope: ItemId) -> Vec<ItemId> {
        entries
            .iter()
            .filter_map(|entry| self.resolve(entry, parent, scope))
            .collect()
    }

    /// Resolve one entry.
    pub fn resolve(&mut self, entry: &TocEntry, parent: ItemId, scope: ItemId) -> Option<ItemId> {
        let id = match entry {
            TocEntry::File(file) => self.resolve_file(file, scope),
            TocEntry::CrossLink(link) => self.resolve_cross_link(link, scope),
            TocEntry::Folder(folder) => self.resolve_folder(folder, scope),
            TocEntry::Toc(toc) => self.resolve_toc(toc, scope),
        }?;
        self.tree.item_mut(id).parent = Some(parent);
        Some(id)
    }

    fn resolve_file(&mut self, file: &FileRef, scope: ItemId) -> Option<ItemId> {
        let Some(model) = self.factory.try_create(&file.path) else {
            self.diagnostics.emit_error(
                &file.context,
                format!("File navigation '{}' could not be created", file.path),
            );
            return None;
        };

        if file.children.is_empty() {
            return Some(
                self.tree
                    .add_page(&self.origin, scope, file.path.clone(), model, file.hidden),
            );
        }

        let node = self.tree.add_node(
            &self.origin,
            NodeKind::VirtualFile(model),
            file.path.clone(),
            None,
            Scope::Delegate(scope),
        );
        self.tree.item_mut(node).hidden = file.hidden;

        let children = self.resolve_all(&file.children, node, scope);
        if children.is_empty() {
            self.diagnostics.emit_error(
                &file.context,
                format!(
                    "File navigation '{}' has children defined but none could be created",
                    file.path
                ),
            );
            return None;
        }
        self.tree.set_children(node, children);
        Some(node)
    }

    fn resolve_cross_link(&mut self, link: &CrossLinkRef, scope: ItemId) -> Option<ItemId> {
        let url = self
            .cross_links
            .try_resolve(&link.uri, self.diagnostics, &link.context)?;
        let title = link.title.clone().unwrap_or_else(|| link.uri.clone());
        Some(self.tree.add_cross_link(
            &self.origin,
            scope,
            CrossLinkLeaf {
                uri: link.uri.clone(),
                url,
                title,
            },
            link.hidden,
        ))
    }

    fn resolve_folder(&mut self, folder: &FolderRef, scope: ItemId) -> Option<ItemId> {
        let node = self.tree.add_node(
            &self.origin,
            NodeKind::Folder,
            folder.path.clone(),
            None,
            Scope::Delegate(scope),
        );
        self.tree.item_mut(node).hidden = folder.hidden;

        let children = self.resolve_all(&folder.children, node, scope);
        if children.is_empty() {
            self.diagnostics.emit_error(
                &folder.context,
                format!(
                    "Folder navigation '{}' has children defined but none could be created",
                    folder.path
                ),
            );
            return None;
        }
        self.tree.set_children(node, children);
        Some(node)
    }

    /// A nested table of contents becomes a root.
    ///
    /// Isolated builds share the parent's home. Assembler builds give every
    /// nested root a home of its own, seeded from the parent's current home,
    /// so the composer can re-home it without touching its siblings.
    fn resolve_toc(&mut self, toc: &TocRef, scope: ItemId) -> Option<ItemId> {
        let identifier = SourceUri::new(&*self.origin, &toc.path);
        let node = self.tree.add_node(
            &self.origin,
            NodeKind::TableOfContents,
            toc.path.clone(),
            Some(identifier.clone()),
            Scope::Delegate(scope),
        );
        self.tree.item_mut(node).hidden = toc.hidden;

        let child_scope = if self.assembler_build {
            let parent_home = self.tree.home_provider(scope).cloned();
            if let Some(parent_home) = parent_home {
                let home = self.tree.alloc_home(
                    parent_home.path_prefix,
                    parent_home.navigation_root,
                    parent_home.relative_to,
                );
                self.tree.set_home(node, home);
            }
            node
        } else {
            scope
        };

        let children = self.resolve_all(&toc.children, node, child_scope);
        if children.is_empty() {
            let message = if toc.children.is_empty() {
                format!("Table of contents navigation '{}' has no children defined", toc.path)
            } else {
                format!(
                    "Table of contents navigation '{}' has children defined but none could be created",
                    toc.path
                )
            };
            self.diagnostics.emit_error(&toc.context, message);
            return None;
        }
        self.tree.set_children(node, children);
        self.toc_nodes.insert(identifier, node);
        Some(node)
    }
}
