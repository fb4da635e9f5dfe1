//! Navigation menu rendering.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use stitch_nav::{ItemId, NavigationTree};

/// Renders navigation subtrees to nested `<ul>` lists.
///
/// Output is cached per `(root, max_depth)`. Concurrent page renders share
/// one writer: hits take the read lock only, misses are serialized so each
/// menu is rendered once.
///
/// A writer is bound to one tree. Ids from another tree hit stale entries.
#[derive(Debug, Default)]
pub struct NavigationHtmlWriter {
    cache: RwLock<HashMap<(ItemId, usize), Arc<str>>>,
    render_lock: Mutex<()>,
}

impl NavigationHtmlWriter {
    /// Create a writer with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Menu for `root`, `max_depth` levels deep. Hidden items are skipped.
    pub fn render(&self, tree: &NavigationTree, root: ItemId, max_depth: usize) -> Arc<str> {
        let key = (root, max_depth);
        if let Some(html) = self.cached(key) {
            return html;
        }

        let _guard = self.render_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(html) = self.cached(key) {
            return html;
        }

        let mut html = String::new();
        render_level(&mut html, tree, root, max_depth);
        let html: Arc<str> = Arc::from(html);
        tracing::debug!(root = root.index(), max_depth, bytes = html.len(), "Rendered navigation");

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&html));
        html
    }

    /// Number of cached menus.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drop every cached menu.
    pub fn clear(&self) {
        self.cache.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn cached(&self, key: (ItemId, usize)) -> Option<Arc<str>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }
}

fn render_level(html: &mut String, tree: &NavigationTree, node: ItemId, depth: usize) {
    if depth == 0 {
        return;
    }
    let visible: Vec<ItemId> = tree
        .menu_children(node)
        .iter()
        .copied()
        .filter(|&child| !tree.item(child).hidden)
        .collect();
    if visible.is_empty() {
        return;
    }

    html.push_str("<ul>\n");
    for child in visible {
        let _ = write!(
            html,
            "<li><a href=\"{}\">{}</a>",
            escape(&tree.url(child)),
            escape(&tree.navigation_title(child)),
        );
        if !tree.menu_children(child).is_empty() {
            html.push('\n');
            render_level(html, tree, child, depth - 1);
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use std::thread;

    use pretty_assertions::assert_eq;
    use stitch_nav::{
        DiagnosticsCollector, DocumentationSetNavigation, NoopCrossLinkResolver, SetOptions,
    };
    use stitch_storage::MockStorage;

    use super::*;

    const DOCSET: &str = r"
toc:
  - file: index.md
  - file: setup.md
    children:
      - file: install.md
  - hidden: internal.md
";

    fn docset() -> DocumentationSetNavigation {
        let storage = MockStorage::new()
            .with_file("docset.yml", DOCSET)
            .with_page("index.md", "Home")
            .with_page("setup.md", "Setup & <Config>")
            .with_page("install.md", "Install")
            .with_page("internal.md", "Internal");
        let diagnostics = DiagnosticsCollector::new(false);
        DocumentationSetNavigation::from_storage(
            "docs",
            &storage,
            &NoopCrossLinkResolver,
            &diagnostics,
            &SetOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("<x y=\"1\">"), "&lt;x y=&quot;1&quot;&gt;");
        assert_eq!(escape("it's"), "it&#x27;s");
    }

    #[test]
    fn test_render_nested_menu() {
        let set = docset();
        let writer = NavigationHtmlWriter::new();

        let html = writer.render(set.tree(), set.root(), 2);

        assert_eq!(
            &*html,
            "<ul>\n\
             <li><a href=\"/setup\">Setup &amp; &lt;Config&gt;</a>\n\
             <ul>\n\
             <li><a href=\"/install\">Install</a></li>\n\
             </ul>\n\
             </li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_render_skips_hidden() {
        let set = docset();
        let writer = NavigationHtmlWriter::new();

        let html = writer.render(set.tree(), set.root(), 3);

        assert!(!html.contains("Internal"));
    }

    #[test]
    fn test_render_respects_depth() {
        let set = docset();
        let writer = NavigationHtmlWriter::new();

        let html = writer.render(set.tree(), set.root(), 1);

        assert!(html.contains("/setup"));
        assert!(!html.contains("/install"));
        assert_eq!(&*writer.render(set.tree(), set.root(), 0), "");
    }

    #[test]
    fn test_render_cached_per_depth() {
        let set = docset();
        let writer = NavigationHtmlWriter::new();

        let first = writer.render(set.tree(), set.root(), 2);
        let second = writer.render(set.tree(), set.root(), 2);
        writer.render(set.tree(), set.root(), 1);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(writer.cached_len(), 2);

        writer.clear();
        assert_eq!(writer.cached_len(), 0);
    }

    #[test]
    fn test_concurrent_render_shares_result() {
        let set = docset();
        let writer = NavigationHtmlWriter::new();

        let results: Vec<Arc<str>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| writer.render(set.tree(), set.root(), 2)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(writer.cached_len(), 1);
        assert!(results.iter().all(|html| Arc::ptr_eq(html, &results[0])));
    }
}
