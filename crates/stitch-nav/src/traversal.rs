//! Depth-first ordering pass.
//!
//! Assigns `navigation_index` to every item reachable from a root and builds
//! the two lookups rendering needs: order -> item for prev/next, and
//! content file -> item.

use std::collections::HashMap;

use crate::tree::{ItemId, ItemKind, NavigationTree, NodeKind};

/// Key of the content-file lookup (`{repository}://{path}`).
#[must_use]
pub fn file_key(origin: &str, path: &str) -> String {
    format!("{origin}://{path}")
}

/// Result of one ordering pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationIndex {
    by_order: Vec<ItemId>,
    by_file: HashMap<String, ItemId>,
}

impl NavigationIndex {
    /// Walk the tree from `root` in pre-order, numbering items from zero.
    pub fn assign(tree: &mut NavigationTree, root: ItemId) -> Self {
        fn visit(tree: &mut NavigationTree, id: ItemId, index: &mut NavigationIndex) {
            tree.item_mut(id).navigation_index = index.by_order.len();
            index.by_order.push(id);

            let item = tree.item(id);
            let file = match &item.kind {
                ItemKind::Page(page) => Some(&page.path),
                ItemKind::Node(node) if matches!(node.kind, NodeKind::VirtualFile(_)) => {
                    Some(&node.path)
                }
                _ => None,
            };
            if let Some(path) = file {
                index.by_file.insert(file_key(&item.origin, path), id);
            }

            for child in tree.children(id).to_vec() {
                visit(tree, child, index);
            }
        }

        let mut index = Self::default();
        visit(tree, root, &mut index);
        index
    }

    /// Number of ordered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_order.len()
    }

    /// True if no item was ordered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_order.is_empty()
    }

    /// Items in navigation order.
    #[must_use]
    pub fn by_order(&self) -> &[ItemId] {
        &self.by_order
    }

    /// Item at a navigation index.
    #[must_use]
    pub fn get(&self, navigation_index: usize) -> Option<ItemId> {
        self.by_order.get(navigation_index).copied()
    }

    /// Item for a content file of a repository.
    #[must_use]
    pub fn find_file(&self, origin: &str, path: &str) -> Option<ItemId> {
        self.by_file.get(&file_key(origin, path)).copied()
    }

    /// Number of content files reachable from the root.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }

    fn position(&self, tree: &NavigationTree, id: ItemId) -> Option<usize> {
        let position = tree.item(id).navigation_index;
        (self.by_order.get(position) == Some(&id)).then_some(position)
    }

    fn is_page(tree: &NavigationTree, id: ItemId) -> bool {
        let item = tree.item(id);
        item.is_file() && !item.hidden
    }

    /// Next visible page after `id`.
    #[must_use]
    pub fn next(&self, tree: &NavigationTree, id: ItemId) -> Option<ItemId> {
        let position = self.position(tree, id)?;
        self.by_order[position + 1..]
            .iter()
            .copied()
            .find(|&c| Self::is_page(tree, c))
    }

    /// Previous visible page before `id`.
    #[must_use]
    pub fn previous(&self, tree: &NavigationTree, id: ItemId) -> Option<ItemId> {
        let position = self.position(tree, id)?;
        self.by_order[..position]
            .iter()
            .rev()
            .copied()
            .find(|&c| Self::is_page(tree, c))
    }
}
