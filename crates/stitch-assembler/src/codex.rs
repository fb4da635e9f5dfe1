//! Codex portal navigation: independent sets side by side.
//!
//! Sets are attached one level deep, verbatim, either directly under the
//! codex root (`/r/{repo}`) or under a group (`/g/{group}/r/{repo}`).
//! Nothing is re-homed inside a set.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use stitch_config::CodexConfig;
use stitch_nav::{
    DiagnosticsCollector, DocumentationSetNavigation, ItemId, NavigationIndex, NavigationTree,
    NodeKind, Scope, SourceUri,
};

use crate::site::normalize_site_prefix;

/// Summary of one set shown on the codex landing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentationSetInfo {
    /// Repository name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// URL of the set's landing page.
    pub url: String,
    /// Group the set belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Markdown pages in the set.
    pub page_count: usize,
}

/// The composed codex.
#[derive(Debug)]
pub struct CodexNavigation {
    tree: NavigationTree,
    root: ItemId,
    groups: BTreeMap<String, ItemId>,
    sets: Vec<DocumentationSetInfo>,
    index: NavigationIndex,
}

/// `getting-started_guides` -> `Getting Started Guides`.
fn format_group_title(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

struct Group {
    node: ItemId,
    children: Vec<ItemId>,
}

impl CodexNavigation {
    /// Attach `sets` as listed in `config.sets`. Sets the config doesn't list are dropped.
    pub fn compose(
        config: &CodexConfig,
        sets: Vec<DocumentationSetNavigation>,
        diagnostics: &DiagnosticsCollector,
        context: &str,
    ) -> Self {
        let prefix = normalize_site_prefix(config.site_prefix.as_deref()).unwrap_or_default();
        let origin: Arc<str> = Arc::from("codex");

        let mut tree = NavigationTree::new();
        let root = tree.add_node(
            &origin,
            NodeKind::Codex,
            String::new(),
            Some(SourceUri::new("codex", "")),
            Scope::SelfScoped,
        );
        let home = tree.alloc_home(prefix.clone(), root, "");
        tree.set_home(root, home);
        tree.set_node_title(root, config.title.clone());
        let mut children = vec![tree.add_landing(root)];

        let mut available: BTreeMap<String, DocumentationSetNavigation> = sets
            .into_iter()
            .map(|set| (set.repository().to_owned(), set))
            .collect();
        let mut groups: BTreeMap<String, Group> = BTreeMap::new();
        let mut infos = Vec::new();

        for set_config in &config.sets {
            let Some(set) = available.remove(&set_config.name) else {
                diagnostics.emit_error(
                    context,
                    format!("Documentation set '{}' not found for codex", set_config.name),
                );
                continue;
            };

            let parts = set.into_parts();
            let offsets = tree.absorb(parts.tree);
            let set_root = offsets.item(parts.root);
            if let Some(display_name) = &set_config.display_name {
                tree.item_mut(set_root).title_override = Some(display_name.clone());
            }

            let repository = &set_config.name;
            match &set_config.group {
                Some(group_id) => {
                    let group = groups.entry(group_id.clone()).or_insert_with(|| {
                        let node = add_group(&mut tree, &origin, config, &prefix, group_id);
                        children.push(node);
                        let landing = tree.add_landing(node);
                        Group {
                            node,
                            children: vec![landing],
                        }
                    });
                    tree.rehome(set_root, format!("{prefix}/g/{group_id}/r/{repository}"), group.node);
                    group.children.push(set_root);
                }
                None => {
                    tree.rehome(set_root, format!("{prefix}/r/{repository}"), set_root);
                    children.push(set_root);
                }
            }

            infos.push(DocumentationSetInfo {
                name: repository.clone(),
                title: tree.navigation_title(set_root),
                url: tree.url(set_root),
                group: set_config.group.clone(),
                page_count: tree.count_files(set_root),
            });
        }

        for name in available.keys() {
            tracing::debug!(repository = %name, "Documentation set not listed in codex");
        }

        for group in groups.values() {
            tree.set_children(group.node, group.children.clone());
        }
        tree.set_children(root, children);
        let index = NavigationIndex::assign(&mut tree, root);

        tracing::info!(sets = infos.len(), groups = groups.len(), "Codex assembled");

        Self {
            tree,
            root,
            groups: groups.into_iter().map(|(id, g)| (id, g.node)).collect(),
            sets: infos,
            index,
        }
    }

    /// The arena.
    #[must_use]
    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    /// The codex root.
    #[must_use]
    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Codex landing URL.
    #[must_use]
    pub fn url(&self) -> String {
        self.tree.url(self.root)
    }

    /// Group nodes by id.
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<String, ItemId> {
        &self.groups
    }

    /// Attached sets in configuration order.
    #[must_use]
    pub fn documentation_sets(&self) -> &[DocumentationSetInfo] {
        &self.sets
    }

    /// Codex-wide ordering.
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

fn add_group(
    tree: &mut NavigationTree,
    origin: &Arc<str>,
    config: &CodexConfig,
    prefix: &str,
    group_id: &str,
) -> ItemId {
    let node = tree.add_node(
        origin,
        NodeKind::Group,
        String::new(),
        Some(SourceUri::new("codex", &format!("group/{group_id}"))),
        Scope::SelfScoped,
    );
    let home = tree.alloc_home(format!("{prefix}/g/{group_id}"), node, "");
    tree.set_home(node, home);
    let title = config
        .group(group_id)
        .map_or_else(|| format_group_title(group_id), |g| g.title.clone());
    tree.set_node_title(node, title);
    node
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stitch_config::{CodexGroupConfig, CodexSetConfig};
    use stitch_nav::{NoopCrossLinkResolver, SetOptions, Severity};
    use stitch_storage::MockStorage;

    use super::*;
    use crate::tests::assert_ordering_is_unique;

    fn set(repository: &str, title: &str) -> DocumentationSetNavigation {
        let storage = MockStorage::new()
            .with_file(
                "docset.yml",
                "toc:\n  - file: index.md\n  - folder: guides\n    children:\n      - file: start.md\n",
            )
            .with_page("index.md", title)
            .with_page("guides/start.md", "Start");
        let diagnostics = DiagnosticsCollector::new(false);
        DocumentationSetNavigation::from_storage(
            repository,
            &storage,
            &NoopCrossLinkResolver,
            &diagnostics,
            &SetOptions::default(),
        )
        .unwrap()
    }

    fn set_config(name: &str, group: Option<&str>) -> CodexSetConfig {
        CodexSetConfig {
            name: name.to_owned(),
            group: group.map(str::to_owned),
            display_name: None,
        }
    }

    fn config() -> CodexConfig {
        CodexConfig {
            title: "Engineering Docs".to_owned(),
            site_prefix: Some("internal/".to_owned()),
            sets: vec![
                set_config("handbook", None),
                set_config("billing", Some("platform-services")),
                set_config("search", Some("platform-services")),
            ],
            groups: Vec::new(),
        }
    }

    fn compose(config: &CodexConfig) -> (CodexNavigation, DiagnosticsCollector) {
        let diagnostics = DiagnosticsCollector::new(false);
        let sets = vec![set("handbook", "Handbook"), set("billing", "Billing"), set("search", "Search")];
        let codex = CodexNavigation::compose(config, sets, &diagnostics, "stitch.toml");
        assert_ordering_is_unique(codex.tree(), codex.navigation_index());
        (codex, diagnostics)
    }

    #[test]
    fn test_format_group_title() {
        assert_eq!(format_group_title("platform-services"), "Platform Services");
        assert_eq!(format_group_title("getting_started"), "Getting Started");
    }

    #[test]
    fn test_ungrouped_set_urls() {
        let (codex, diagnostics) = compose(&config());

        assert_eq!(diagnostics.errors(), 0);
        assert_eq!(codex.url(), "/internal");
        let start = codex.find_file("handbook", "guides/start.md").unwrap();
        assert_eq!(codex.tree().url(start), "/internal/r/handbook/guides/start");
    }

    #[test]
    fn test_grouped_set_urls_and_root() {
        let (codex, _) = compose(&config());
        let group = codex.groups()["platform-services"];
        let start = codex.find_file("billing", "guides/start.md").unwrap();

        assert_eq!(codex.tree().url(group), "/internal/g/platform-services");
        assert_eq!(codex.tree().url(start), "/internal/g/platform-services/r/billing/guides/start");
        assert_eq!(codex.tree().navigation_root(start), Some(group));
        assert_eq!(codex.tree().navigation_title(group), "Platform Services");
        assert_eq!(codex.tree().children(group).len(), 3);
    }

    #[test]
    fn test_ungrouped_navigation_root_is_set() {
        let (codex, _) = compose(&config());
        let start = codex.find_file("handbook", "guides/start.md").unwrap();
        let info = &codex.documentation_sets()[0];

        let root = codex.tree().navigation_root(start).unwrap();

        assert_eq!(codex.tree().identifier(root), Some(&SourceUri::new("handbook", "")));
        assert_eq!(info.url, "/internal/r/handbook");
    }

    #[test]
    fn test_codex_landing() {
        let (codex, _) = compose(&config());
        let landing = codex.tree().index_of(codex.root()).unwrap();

        assert_eq!(codex.tree().children(codex.root())[0], landing);
        assert_eq!(codex.tree().navigation_title(landing), "Engineering Docs");
        assert_eq!(codex.tree().url(landing), "/internal");
    }

    #[test]
    fn test_group_title_from_config_and_display_name() {
        let mut config = config();
        config.groups.push(CodexGroupConfig {
            id: "platform-services".to_owned(),
            title: "Platform".to_owned(),
        });
        config.sets[0].display_name = Some("Team Handbook".to_owned());

        let (codex, _) = compose(&config);
        let group = codex.groups()["platform-services"];

        assert_eq!(codex.tree().navigation_title(group), "Platform");
        assert_eq!(codex.documentation_sets()[0].title, "Team Handbook");
    }

    #[test]
    fn test_set_infos() {
        let (codex, _) = compose(&config());

        let infos = codex.documentation_sets();

        assert_eq!(infos.len(), 3);
        assert_eq!(infos[1].group.as_deref(), Some("platform-services"));
        assert_eq!(infos[1].page_count, 2);
        assert_eq!(infos[2].url, "/internal/g/platform-services/r/search");
    }

    #[test]
    fn test_missing_set_reported() {
        let mut config = config();
        config.sets.push(set_config("ghost", None));

        let (codex, diagnostics) = compose(&config);

        assert_eq!(
            diagnostics.messages(Severity::Error),
            vec!["Documentation set 'ghost' not found for codex"]
        );
        assert_eq!(codex.documentation_sets().len(), 3);
    }

    #[test]
    fn test_ordering_spans_all_sets() {
        let (codex, _) = compose(&config());

        let order = codex.navigation_index().by_order();
        let handbook = codex.find_file("handbook", "guides/start.md").unwrap();
        let search = codex.find_file("search", "guides/start.md").unwrap();

        assert_eq!(order[0], codex.root());
        assert_eq!(order.len(), codex.tree().len());
        assert!(codex.tree().item(handbook).navigation_index < codex.tree().item(search).navigation_index);
    }
}
