//! Navigation tree arena.
//!
//! # Architecture
//!
//! Items live in a flat `Vec<NavigationItem>` and refer to each other by
//! [`ItemId`]. Children are owned top-down through `NodeItem::children`;
//! `parent` is a plain id resolved by lookup, so parent/child cycles never
//! form ownership cycles.
//!
//! URL prefixes live in a second arena of [`HomeProvider`] cells. Every item
//! carries a `scope`: the root whose home it addresses relative to. A root
//! either owns a home or delegates to its own scope, so re-homing a subtree
//! is one write to one cell and every descendant observes it on the next
//! [`NavigationTree::url`] call. URLs are never stored.

use std::sync::Arc;

use serde::Serialize;
use stitch_storage::{ContentModel, title_from_filename};

use crate::short_id::short_id;
use crate::uri::SourceUri;

/// Handle of an item in a [`NavigationTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    /// Position in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a [`HomeProvider`] in a [`NavigationTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HomeId(usize);

/// Mutable addressing cell shared by every item of a subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeProvider {
    /// URL prefix (e.g. `/docs/reference`), empty for site-relative.
    pub path_prefix: String,
    /// Root reported as `navigation_root` for every item using this home.
    pub navigation_root: ItemId,
    /// Source directory that paths are made relative to before prefixing.
    pub relative_to: String,
}

/// A markdown page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLeaf {
    /// Path relative to the documentation set root.
    pub path: String,
    /// Parsed content.
    pub model: ContentModel,
}

/// A resolved link into another repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossLinkLeaf {
    /// Declared `scheme://path` URI.
    pub uri: String,
    /// Resolved absolute URL.
    pub url: String,
    /// Menu title.
    pub title: String,
}

/// Placeholder landing page synthesized for a node without an index file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandingLeaf {
    /// Path the landing page is addressed by (`{dir}/index.md`).
    pub path: String,
    /// Menu title.
    pub title: String,
}

/// Kind of a [`NodeItem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A markdown file that has children of its own.
    VirtualFile(ContentModel),
    /// A directory.
    Folder,
    /// A nested `toc.yml` scope.
    TableOfContents,
    /// A whole repository's documentation set.
    DocumentationSet,
    /// The assembled site.
    Site,
    /// The codex portal.
    Codex,
    /// A codex group wrapper.
    Group,
}

/// Root data: the scheme-qualified identifier and, optionally, an own home.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootInfo {
    /// Cross-set lookup key.
    pub identifier: SourceUri,
    /// Own addressing cell. `None` delegates to the item's scope.
    pub home: Option<HomeId>,
}

/// An item with children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeItem {
    /// Node kind.
    pub kind: NodeKind,
    /// Source path (file path for virtual files, directory otherwise).
    pub path: String,
    /// Fallback title when the node has no index.
    pub title: Option<String>,
    /// Landing page of the node; its URL is the node's URL.
    pub index: Option<ItemId>,
    /// Ordered children.
    pub children: Vec<ItemId>,
    /// Present for roots.
    pub root: Option<RootInfo>,
}

/// Variant payload of a [`NavigationItem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// Markdown page.
    Page(PageLeaf),
    /// Cross-repository link.
    CrossLink(CrossLinkLeaf),
    /// Synthesized landing page.
    Landing(LandingLeaf),
    /// Node with children.
    Node(NodeItem),
}

/// One entry of the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationItem {
    /// Stable short id.
    pub id: String,
    /// Variant payload.
    pub kind: ItemKind,
    /// Non-owning parent handle.
    pub parent: Option<ItemId>,
    /// Root whose home this item addresses relative to.
    pub scope: ItemId,
    /// Excluded from rendered menus.
    pub hidden: bool,
    /// Position in the last depth-first ordering pass.
    pub navigation_index: usize,
    /// Replaces the computed navigation title.
    pub title_override: Option<String>,
    /// Repository the item was declared in.
    pub origin: Arc<str>,
}

impl NavigationItem {
    /// Node payload, if this item is a node.
    #[must_use]
    pub fn as_node(&self) -> Option<&NodeItem> {
        match &self.kind {
            ItemKind::Node(node) => Some(node),
            _ => None,
        }
    }

    fn as_node_mut(&mut self) -> Option<&mut NodeItem> {
        match &mut self.kind {
            ItemKind::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Source path of the item, if it has one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Page(page) => Some(&page.path),
            ItemKind::Landing(landing) => Some(&landing.path),
            ItemKind::Node(node) => Some(&node.path),
            ItemKind::CrossLink(_) => None,
        }
    }

    /// True for pages and virtual files: items backed by a markdown file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(
            &self.kind,
            ItemKind::Page(_)
                | ItemKind::Node(NodeItem {
                    kind: NodeKind::VirtualFile(_),
                    ..
                })
        )
    }

    /// True for roots (items with an identifier).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.as_node().is_some_and(|n| n.root.is_some())
    }
}

/// Navigation item with children for JSON export and templates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Stable short id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Resolved URL.
    pub url: String,
    /// Position in the depth-first ordering.
    pub navigation_index: usize,
    /// Hidden from menus.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Child navigation items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Id offsets applied by [`NavigationTree::absorb`].
#[derive(Clone, Copy, Debug)]
pub struct Absorbed {
    items: usize,
    homes: usize,
}

impl Absorbed {
    /// Translate an item id of the absorbed tree.
    #[must_use]
    pub fn item(&self, id: ItemId) -> ItemId {
        ItemId(id.0 + self.items)
    }

    /// Translate a home id of the absorbed tree.
    #[must_use]
    pub fn home(&self, id: HomeId) -> HomeId {
        HomeId(id.0 + self.homes)
    }
}

/// Arena of navigation items and their home providers.
#[derive(Clone, Debug, Default)]
pub struct NavigationTree {
    items: Vec<NavigationItem>,
    homes: Vec<HomeProvider>,
}

/// Where a new node's scope points.
#[derive(Clone, Copy, Debug)]
pub enum Scope {
    /// The node addresses relative to its own home.
    SelfScoped,
    /// The node delegates to another root.
    Delegate(ItemId),
}

/// Join a directory and a relative path with `/`.
pub(crate) fn join_path(dir: &str, path: &str) -> String {
    let path = path.trim_matches('/');
    let dir = dir.trim_matches('/');
    match (dir.is_empty(), path.is_empty()) {
        (true, _) => path.to_owned(),
        (false, true) => dir.to_owned(),
        (false, false) => format!("{dir}/{path}"),
    }
}

/// Directory part of a path (`a/b.md` -> `a`, `b.md` -> ``).
pub(crate) fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(cut) {
        return None;
    }
    value[cut..]
        .eq_ignore_ascii_case(suffix)
        .then(|| &value[..cut])
}

/// Convert a markdown path to a URL path (`setup/index.md` -> `setup`).
#[must_use]
pub fn markdown_path_to_url_path(path: &str) -> String {
    let path = path.trim_matches('/');
    if path.eq_ignore_ascii_case("index.md") {
        return String::new();
    }
    if let Some(dir) = strip_suffix_ignore_case(path, "/index.md") {
        return dir.to_owned();
    }
    strip_suffix_ignore_case(path, ".md")
        .unwrap_or(path)
        .to_owned()
}

/// Combine a URL prefix and a URL path into an absolute URL.
fn join_url(prefix: &str, url_path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let prefix = if prefix.is_empty() || prefix.starts_with('/') {
        prefix.to_owned()
    } else {
        format!("/{prefix}")
    };
    if url_path.is_empty() {
        if prefix.is_empty() {
            "/".to_owned()
        } else {
            prefix
        }
    } else {
        format!("{prefix}/{url_path}")
    }
}

fn is_index_file(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.eq_ignore_ascii_case("index.md")
}

impl NavigationTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in the arena, including detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another tree.
    #[must_use]
    pub fn item(&self, id: ItemId) -> &NavigationItem {
        &self.items[id.0]
    }

    /// Mutable item by id.
    pub fn item_mut(&mut self, id: ItemId) -> &mut NavigationItem {
        &mut self.items[id.0]
    }

    /// Home provider by id.
    #[must_use]
    pub fn home(&self, id: HomeId) -> &HomeProvider {
        &self.homes[id.0]
    }

    /// Ordered children of an item; empty for leaves.
    #[must_use]
    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.item(id).as_node().map_or(&[], |n| n.children.as_slice())
    }

    /// Children shown in menus: every child except a leading index.
    #[must_use]
    pub fn menu_children(&self, id: ItemId) -> &[ItemId] {
        let Some(node) = self.item(id).as_node() else {
            return &[];
        };
        match (node.index, node.children.first()) {
            (Some(index), Some(&first)) if index == first => &node.children[1..],
            _ => &node.children,
        }
    }

    /// Landing page of a node.
    #[must_use]
    pub fn index_of(&self, id: ItemId) -> Option<ItemId> {
        self.item(id).as_node().and_then(|n| n.index)
    }

    /// Identifier of a root.
    #[must_use]
    pub fn identifier(&self, id: ItemId) -> Option<&SourceUri> {
        self.item(id)
            .as_node()
            .and_then(|n| n.root.as_ref())
            .map(|r| &r.identifier)
    }

    fn push(&mut self, item: NavigationItem) -> ItemId {
        let id = ItemId(self.items.len());
        self.items.push(item);
        id
    }

    /// Add a markdown page.
    pub fn add_page(
        &mut self,
        origin: &Arc<str>,
        scope: ItemId,
        path: String,
        model: ContentModel,
        hidden: bool,
    ) -> ItemId {
        self.push(NavigationItem {
            id: short_id(&format!("{origin}://{path}")),
            kind: ItemKind::Page(PageLeaf { path, model }),
            parent: None,
            scope,
            hidden,
            navigation_index: 0,
            title_override: None,
            origin: Arc::clone(origin),
        })
    }

    /// Add a resolved cross-link.
    pub fn add_cross_link(
        &mut self,
        origin: &Arc<str>,
        scope: ItemId,
        link: CrossLinkLeaf,
        hidden: bool,
    ) -> ItemId {
        self.push(NavigationItem {
            id: short_id(&link.uri),
            kind: ItemKind::CrossLink(link),
            parent: None,
            scope,
            hidden,
            navigation_index: 0,
            title_override: None,
            origin: Arc::clone(origin),
        })
    }

    /// Add a node without children.
    ///
    /// Roots pass `identifier`; a self-scoped root must then receive a home
    /// through [`Self::set_home`] before any URL below it is read.
    pub fn add_node(
        &mut self,
        origin: &Arc<str>,
        kind: NodeKind,
        path: String,
        identifier: Option<SourceUri>,
        scope: Scope,
    ) -> ItemId {
        let id = ItemId(self.items.len());
        let key = identifier
            .as_ref()
            .map_or_else(|| format!("{origin}://{path}"), ToString::to_string);
        let scope = match scope {
            Scope::SelfScoped => id,
            Scope::Delegate(scope) => scope,
        };
        let title = match &kind {
            NodeKind::Folder | NodeKind::TableOfContents if !path.is_empty() => {
                Some(title_from_filename(&path))
            }
            _ => None,
        };
        self.push(NavigationItem {
            id: short_id(&key),
            kind: ItemKind::Node(NodeItem {
                kind,
                path,
                title,
                index: None,
                children: Vec::new(),
                root: identifier.map(|identifier| RootInfo {
                    identifier,
                    home: None,
                }),
            }),
            parent: None,
            scope,
            hidden: false,
            navigation_index: 0,
            title_override: None,
            origin: Arc::clone(origin),
        })
    }

    /// Set the fallback title of a node.
    pub fn set_node_title(&mut self, id: ItemId, title: impl Into<String>) {
        if let Some(node) = self.items[id.0].as_node_mut() {
            node.title = Some(title.into());
        }
    }

    /// Allocate a new home provider.
    pub fn alloc_home(
        &mut self,
        path_prefix: impl Into<String>,
        navigation_root: ItemId,
        relative_to: impl Into<String>,
    ) -> HomeId {
        let id = HomeId(self.homes.len());
        self.homes.push(HomeProvider {
            path_prefix: path_prefix.into(),
            navigation_root,
            relative_to: relative_to.into(),
        });
        id
    }

    /// Point a root at a home. The root becomes its own scope.
    ///
    /// Non-root items are left untouched.
    pub fn set_home(&mut self, root: ItemId, home: HomeId) {
        let item = &mut self.items[root.0];
        if let Some(info) = item.as_node_mut().and_then(|n| n.root.as_mut()) {
            info.home = Some(home);
            item.scope = root;
        }
    }

    /// Re-home a root: a fresh home with `path_prefix`, reporting
    /// `navigation_root`, and addressing paths relative to the root's own
    /// directory.
    pub fn rehome(
        &mut self,
        root: ItemId,
        path_prefix: impl Into<String>,
        navigation_root: ItemId,
    ) -> HomeId {
        let relative_to = self.scope_dir(root);
        let home = self.alloc_home(path_prefix, navigation_root, relative_to);
        self.set_home(root, home);
        home
    }

    /// Home resolved for an item, following root delegation.
    #[must_use]
    pub fn home_of(&self, id: ItemId) -> Option<HomeId> {
        let mut current = id;
        for _ in 0..=self.items.len() {
            let item = &self.items[current.0];
            if let Some(home) = item
                .as_node()
                .and_then(|n| n.root.as_ref())
                .and_then(|r| r.home)
            {
                return Some(home);
            }
            if item.scope == current {
                return None;
            }
            current = item.scope;
        }
        None
    }

    /// Home provider resolved for an item.
    #[must_use]
    pub fn home_provider(&self, id: ItemId) -> Option<&HomeProvider> {
        self.home_of(id).map(|h| &self.homes[h.0])
    }

    /// Root reported by the item's home.
    #[must_use]
    pub fn navigation_root(&self, id: ItemId) -> Option<ItemId> {
        self.home_provider(id).map(|h| h.navigation_root)
    }

    /// Change the URL prefix of a root's home (`root.Url = prefix`).
    ///
    /// Every item addressing through the same home observes the change.
    pub fn set_path_prefix(&mut self, root: ItemId, path_prefix: impl Into<String>) {
        if let Some(home) = self.home_of(root) {
            self.homes[home.0].path_prefix = path_prefix.into();
        }
    }

    /// Current URL prefix of the item's home.
    #[must_use]
    pub fn path_prefix(&self, id: ItemId) -> &str {
        self.home_provider(id).map_or("", |h| h.path_prefix.as_str())
    }

    /// Directory a root addresses its descendants relative to.
    #[must_use]
    pub fn scope_dir(&self, id: ItemId) -> String {
        match &self.items[id.0].kind {
            ItemKind::Node(node) => match node.kind {
                NodeKind::TableOfContents | NodeKind::Folder => node.path.clone(),
                NodeKind::VirtualFile(_) => parent_dir(&node.path).to_owned(),
                NodeKind::DocumentationSet | NodeKind::Site | NodeKind::Codex | NodeKind::Group => {
                    String::new()
                }
            },
            ItemKind::Page(page) => parent_dir(&page.path).to_owned(),
            ItemKind::Landing(landing) => parent_dir(&landing.path).to_owned(),
            ItemKind::CrossLink(_) => String::new(),
        }
    }

    /// Scope that children of `node` receive.
    #[must_use]
    pub fn child_scope(&self, node: ItemId) -> ItemId {
        let item = &self.items[node.0];
        let owns_home = item
            .as_node()
            .and_then(|n| n.root.as_ref())
            .is_some_and(|r| r.home.is_some());
        if owns_home { node } else { item.scope }
    }

    fn scoped_url(&self, scope: ItemId, path: &str) -> String {
        let (prefix, base) = self
            .home_provider(scope)
            .map_or(("", ""), |h| (h.path_prefix.as_str(), h.relative_to.as_str()));
        let relative = if base.is_empty() {
            path
        } else if path == base {
            ""
        } else {
            path.strip_prefix(base)
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(path)
        };
        join_url(prefix, &markdown_path_to_url_path(relative))
    }

    /// URL of an item, computed from the current home state.
    #[must_use]
    pub fn url(&self, id: ItemId) -> String {
        let item = &self.items[id.0];
        match &item.kind {
            ItemKind::Page(page) => self.scoped_url(item.scope, &page.path),
            ItemKind::Landing(landing) => self.scoped_url(item.scope, &landing.path),
            ItemKind::CrossLink(link) => link.url.clone(),
            ItemKind::Node(node) => match node.kind {
                NodeKind::VirtualFile(_) => self.scoped_url(item.scope, &node.path),
                NodeKind::Site | NodeKind::Codex | NodeKind::Group => self.scoped_url(id, ""),
                NodeKind::Folder | NodeKind::TableOfContents | NodeKind::DocumentationSet => {
                    match node.index {
                        Some(index) if index != id => self.url(index),
                        _ => self.scoped_url(id, &join_path(&node.path, "index.md")),
                    }
                }
            },
        }
    }

    /// Title shown in menus.
    #[must_use]
    pub fn navigation_title(&self, id: ItemId) -> String {
        let item = &self.items[id.0];
        if let Some(title) = &item.title_override {
            return title.clone();
        }
        match &item.kind {
            ItemKind::Page(page) => page.model.navigation_title.clone(),
            ItemKind::CrossLink(link) => link.title.clone(),
            ItemKind::Landing(landing) => landing.title.clone(),
            ItemKind::Node(node) => match &node.kind {
                NodeKind::VirtualFile(model) => model.navigation_title.clone(),
                _ => match (&node.title, node.index) {
                    (_, Some(index)) if index != id && !self.is_landing(index) => {
                        self.navigation_title(index)
                    }
                    (Some(title), _) => title.clone(),
                    (None, Some(index)) if index != id => self.navigation_title(index),
                    _ => String::new(),
                },
            },
        }
    }

    fn is_landing(&self, id: ItemId) -> bool {
        matches!(self.items[id.0].kind, ItemKind::Landing(_))
    }

    fn is_index_leaf(&self, id: ItemId) -> bool {
        match &self.items[id.0].kind {
            ItemKind::Page(page) => {
                is_index_file(&page.path) || page.model.navigation_title.eq_ignore_ascii_case("index")
            }
            _ => false,
        }
    }

    fn first_file(&self, children: &[ItemId]) -> Option<ItemId> {
        children.iter().find_map(|&child| {
            let item = &self.items[child.0];
            if item.is_file() {
                Some(child)
            } else {
                item.as_node().and_then(|n| self.first_file(&n.children))
            }
        })
    }

    /// Replace a node's children.
    ///
    /// Moves an index page to the front, sets every child's parent, and
    /// picks the node's index: a leading index or landing page, else the first file
    /// found depth-first, else a synthesized landing page inserted first.
    /// Virtual files are their own landing page and get no index.
    pub fn set_children(&mut self, node: ItemId, mut children: Vec<ItemId>) {
        if let Some(position) = children.iter().position(|&c| self.is_index_leaf(c))
            && position > 0
        {
            let index = children.remove(position);
            children.insert(0, index);
        }
        for &child in &children {
            self.items[child.0].parent = Some(node);
        }

        let is_virtual = matches!(
            self.items[node.0].as_node().map(|n| &n.kind),
            Some(NodeKind::VirtualFile(_))
        );
        let index = if is_virtual || children.is_empty() {
            None
        } else if self.is_index_leaf(children[0]) || self.is_landing(children[0]) {
            Some(children[0])
        } else if let Some(file) = self.first_file(&children) {
            Some(file)
        } else {
            let landing = self.add_landing(node);
            children.insert(0, landing);
            Some(landing)
        };

        if let Some(n) = self.items[node.0].as_node_mut() {
            n.children = children;
            n.index = index;
        }
    }

    /// Synthesize a landing page for `node`.
    ///
    /// The page sits at `index.md` of the node's directory and is titled
    /// after the node. It is not added to the node's children.
    pub fn add_landing(&mut self, node: ItemId) -> ItemId {
        let item = &self.items[node.0];
        let origin = Arc::clone(&item.origin);
        let (dir, title, key) = match item.as_node() {
            Some(n) => (
                self.scope_dir(node),
                n.title.clone().unwrap_or_else(|| title_from_filename(&n.path)),
                n.root
                    .as_ref()
                    .map_or_else(|| format!("{origin}://{}", n.path), |r| r.identifier.to_string()),
            ),
            None => (String::new(), String::new(), origin.to_string()),
        };
        let path = join_path(&dir, "index.md");
        let scope = self.child_scope(node);
        self.push(NavigationItem {
            id: short_id(&format!("{key}#landing")),
            kind: ItemKind::Landing(LandingLeaf { path, title }),
            parent: Some(node),
            scope,
            hidden: false,
            navigation_index: 0,
            title_override: None,
            origin,
        })
    }

    /// Move every item and home of `other` into this tree.
    ///
    /// Returned offsets translate ids of `other` into ids of `self`.
    pub fn absorb(&mut self, other: NavigationTree) -> Absorbed {
        let offsets = Absorbed {
            items: self.items.len(),
            homes: self.homes.len(),
        };
        self.items.extend(other.items.into_iter().map(|mut item| {
            item.parent = item.parent.map(|p| offsets.item(p));
            item.scope = offsets.item(item.scope);
            if let Some(node) = item.as_node_mut() {
                node.index = node.index.map(|i| offsets.item(i));
                for child in &mut node.children {
                    *child = offsets.item(*child);
                }
                if let Some(root) = node.root.as_mut() {
                    root.home = root.home.map(|h| offsets.home(h));
                }
            }
            item
        }));
        self.homes.extend(other.homes.into_iter().map(|mut home| {
            home.navigation_root = offsets.item(home.navigation_root);
            home
        }));
        offsets
    }

    /// Number of markdown-backed items below and including `id`.
    #[must_use]
    pub fn count_files(&self, id: ItemId) -> usize {
        let own = usize::from(self.items[id.0].is_file());
        own + self
            .children(id)
            .iter()
            .map(|&c| self.count_files(c))
            .sum::<usize>()
    }

    /// Export a subtree for serialization, skipping leading index children.
    #[must_use]
    pub fn to_nav_item(&self, id: ItemId) -> NavItem {
        let item = &self.items[id.0];
        NavItem {
            id: item.id.clone(),
            title: self.navigation_title(id),
            url: self.url(id),
            navigation_index: item.navigation_index,
            hidden: item.hidden,
            children: self
                .menu_children(id)
                .iter()
                .map(|&c| self.to_nav_item(c))
                .collect(),
        }
    }
}
