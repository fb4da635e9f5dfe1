//! URL namespace collision checks across repositories.
//!
//! Given the manifest
//!
//! ```yaml
//! toc:
//!   - toc: elasticsearch://reference
//!     path_prefix: reference/elasticsearch
//!   - toc: docs-content://reference/elasticsearch/clients
//!     path_prefix: reference/elasticsearch/clients
//! ```
//!
//! `elasticsearch` must not publish a `reference/clients` folder: its URL is
//! already claimed by `docs-content`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use stitch_nav::{DiagnosticsCollector, SourceUri, markdown_path_to_url_path};

use crate::links::RepositoryLinks;
use crate::uri_resolver::PublishEnvironmentUriResolver;

/// Links skipped as part of a phantom beyond this multiple of the phantom
/// count are reported as a manifest bug.
const PHANTOM_SKIP_FACTOR: usize = 3;

/// Outcome of one check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrefixCheckReport {
    /// Links examined.
    pub links: usize,
    /// URL folders claimed by two repositories.
    pub collisions: usize,
    /// Unmapped links skipped because they live in a phantom.
    pub skipped_phantoms: usize,
}

/// Validates published links against the manifest's URL namespaces.
#[derive(Debug)]
pub struct NavigationPrefixChecker {
    uri_resolver: Arc<PublishEnvironmentUriResolver>,
    repositories: BTreeSet<String>,
    phantoms: BTreeSet<SourceUri>,
}

impl NavigationPrefixChecker {
    /// Create a checker for `repositories`. Registries of other repositories are ignored.
    #[must_use]
    pub fn new(
        uri_resolver: Arc<PublishEnvironmentUriResolver>,
        repositories: impl IntoIterator<Item = String>,
        phantoms: BTreeSet<SourceUri>,
    ) -> Self {
        Self {
            uri_resolver,
            repositories: repositories.into_iter().collect(),
            phantoms,
        }
    }

    fn is_phantom(&self, uri: &SourceUri) -> bool {
        self.phantoms.iter().any(|phantom| uri.starts_with(phantom))
    }

    /// Check every registry. A collision is reported once per URL folder and
    /// repository, against the repository that claimed it second. The check
    /// never stops early.
    pub fn check(
        &self,
        registries: &BTreeMap<String, RepositoryLinks>,
        diagnostics: &DiagnosticsCollector,
    ) -> PrefixCheckReport {
        let mut report = PrefixCheckReport::default();
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut reported: HashSet<(String, &str)> = HashSet::new();
        let mut escalated = false;

        for (repository, registry) in registries {
            if !self.repositories.contains(repository) {
                continue;
            }
            tracing::info!(repository, links = registry.links.len(), "Validating");

            for relative_link in registry.links.keys() {
                report.links += 1;
                let uri = SourceUri::new(repository.as_str(), relative_link);
                let paths = self.uri_resolver.resolve_to_sub_paths(&uri, relative_link);

                if paths.is_empty() {
                    let in_phantom = uri.parent().is_some_and(|dir| self.phantoms.contains(&dir));
                    if in_phantom {
                        report.skipped_phantoms += 1;
                        if !escalated && report.skipped_phantoms > self.phantoms.len() * PHANTOM_SKIP_FACTOR {
                            escalated = true;
                            diagnostics.emit_error(
                                repository,
                                format!(
                                    "Too many items are being marked as part of a phantom, this looks like a bug ({})",
                                    report.skipped_phantoms
                                ),
                            );
                        }
                        continue;
                    }
                    diagnostics.emit_error(
                        repository,
                        format!("Can not validate '{uri}', it is not declared in navigation.yml nor part of a phantom"),
                    );
                    continue;
                }

                if self.is_phantom(&uri) {
                    continue;
                }

                for path in paths {
                    if self.phantoms.contains(&SourceUri::new(repository.as_str(), &path)) {
                        continue;
                    }
                    match seen.get(&path) {
                        Some(&owner) if owner == repository.as_str() => {}
                        Some(&owner) => {
                            if !reported.insert((path.clone(), repository.as_str())) {
                                continue;
                            }
                            report.collisions += 1;
                            let url = self
                                .uri_resolver
                                .resolve(&uri, &markdown_path_to_url_path(relative_link));
                            diagnostics.emit_error(
                                repository,
                                format!(
                                    "'{uri}' resolving to '{url}' conflicts with '{path}' defined by '{owner}'"
                                ),
                            );
                        }
                        None => {
                            seen.insert(path, repository.as_str());
                        }
                    }
                }
            }
        }

        tracing::info!(
            links = report.links,
            collisions = report.collisions,
            skipped_phantoms = report.skipped_phantoms,
            "Prefix check finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stitch_config::NavigationFile;
    use stitch_nav::Severity;

    use super::*;
    use crate::mapping::{NavigationTocMappings, phantom_sources};

    const MANIFEST: &str = r"
toc:
  - toc: repo-a://
    path_prefix: a
  - toc: repo-b://
    path_prefix: a/b
";

    fn checker(manifest: &str) -> NavigationPrefixChecker {
        let manifest = NavigationFile::from_yaml(manifest).unwrap();
        let diagnostics = DiagnosticsCollector::new(false);
        let mappings =
            NavigationTocMappings::from_manifest(&manifest, "docs-content", &diagnostics, "navigation.yml");
        NavigationPrefixChecker::new(
            Arc::new(PublishEnvironmentUriResolver::new(mappings, None)),
            ["repo-a".to_owned(), "repo-b".to_owned()],
            phantom_sources(&manifest, "docs-content"),
        )
    }

    fn registry(paths: &[&str]) -> RepositoryLinks {
        RepositoryLinks {
            links: paths.iter().map(|p| ((*p).to_owned(), Default::default())).collect(),
            ..Default::default()
        }
    }

    fn registries() -> BTreeMap<String, RepositoryLinks> {
        BTreeMap::from([
            ("repo-a".to_owned(), registry(&["index.md", "b/index.md"])),
            ("repo-b".to_owned(), registry(&["index.md", "setup.md"])),
        ])
    }

    #[test]
    fn test_collision_names_both_repositories() {
        let diagnostics = DiagnosticsCollector::new(false);

        let report = checker(MANIFEST).check(&registries(), &diagnostics);

        assert_eq!(report.collisions, 1);
        let errors = diagnostics.messages(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("repo-b://index.md"));
        assert!(errors[0].contains("'repo-a'"));
        assert!(errors[0].contains("a/b/"));
    }

    #[test]
    fn test_phantom_exempts_collision() {
        let manifest = format!("{MANIFEST}phantoms:\n  - toc: repo-a://b\n");
        let diagnostics = DiagnosticsCollector::new(false);

        let report = checker(&manifest).check(&registries(), &diagnostics);

        assert_eq!(report.collisions, 0);
        assert_eq!(diagnostics.errors(), 0);
    }

    #[test]
    fn test_same_repository_never_collides() {
        let diagnostics = DiagnosticsCollector::new(false);
        let registries = BTreeMap::from([(
            "repo-a".to_owned(),
            registry(&["guide/index.md", "guide/setup.md", "guide/setup/advanced.md"]),
        )]);

        let report = checker(MANIFEST).check(&registries, &diagnostics);

        assert_eq!(report.links, 3);
        assert_eq!(report.collisions, 0);
    }

    #[test]
    fn test_unmapped_link_reported() {
        let diagnostics = DiagnosticsCollector::new(false);
        let manifest = "toc:\n  - toc: repo-a://docs\n    path_prefix: a\n";
        let registries = BTreeMap::from([("repo-a".to_owned(), registry(&["other/page.md"]))]);

        checker(manifest).check(&registries, &diagnostics);

        assert_eq!(
            diagnostics.messages(Severity::Error),
            vec!["Can not validate 'repo-a://other/page.md', it is not declared in navigation.yml nor part of a phantom"]
        );
    }

    #[test]
    fn test_too_many_phantom_skips_escalated_once() {
        let diagnostics = DiagnosticsCollector::new(false);
        let manifest = "toc:\n  - toc: repo-a://docs\n    path_prefix: a\nphantoms:\n  - toc: repo-a://internal\n";
        let pages: Vec<String> = (0..6).map(|i| format!("internal/page-{i}.md")).collect();
        let paths: Vec<&str> = pages.iter().map(String::as_str).collect();
        let registries = BTreeMap::from([("repo-a".to_owned(), registry(&paths))]);

        let report = checker(manifest).check(&registries, &diagnostics);

        assert_eq!(report.skipped_phantoms, 6);
        assert_eq!(diagnostics.errors(), 1);
    }

    #[test]
    fn test_unknown_repositories_ignored() {
        let diagnostics = DiagnosticsCollector::new(false);
        let registries = BTreeMap::from([("repo-z".to_owned(), registry(&["index.md"]))]);

        let report = checker(MANIFEST).check(&registries, &diagnostics);

        assert_eq!(report, PrefixCheckReport::default());
    }
}
