//! Loading every repository checkout into documentation sets.
//!
//! Sets share nothing but the diagnostics collector, so they are built in
//! parallel on the rayon pool.

use std::time::Instant;

use rayon::prelude::*;
use stitch_config::AssemblerConfig;
use stitch_nav::{CrossLinkResolver, DiagnosticsCollector, DocumentationSetNavigation, SetOptions};
use stitch_storage::{FsStorage, Storage};

/// Documentation sets built from checkouts, in configuration order.
#[derive(Debug, Default)]
pub struct AssemblerSources {
    sets: Vec<DocumentationSetNavigation>,
}

fn build_one(
    repository: &str,
    storage: &dyn Storage,
    cross_links: &dyn CrossLinkResolver,
    diagnostics: &DiagnosticsCollector,
) -> Option<DocumentationSetNavigation> {
    let start = Instant::now();
    let options = SetOptions {
        path_prefix: None,
        assembler_build: true,
    };
    let set = DocumentationSetNavigation::from_storage(repository, storage, cross_links, diagnostics, &options);
    tracing::info!(
        repository,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        built = set.is_some(),
        "Built documentation set"
    );
    set
}

impl AssemblerSources {
    /// Build every configured repository's checkout.
    ///
    /// A missing checkout is a warning and the repository is skipped.
    pub fn load(
        config: &AssemblerConfig,
        cross_links: &dyn CrossLinkResolver,
        diagnostics: &DiagnosticsCollector,
    ) -> Self {
        let repositories = config.all_repositories();
        let sets = repositories
            .par_iter()
            .filter_map(|repository| {
                let source_dir = config.source_dir_for(repository);
                if !source_dir.is_dir() {
                    diagnostics.emit_warning(
                        source_dir.display().to_string(),
                        format!("Checkout of '{repository}' not found, skipping"),
                    );
                    return None;
                }
                let storage = FsStorage::new(source_dir);
                build_one(repository, &storage, cross_links, diagnostics)
            })
            .collect();
        Self { sets }
    }

    /// Build sets from storages that are already open.
    pub fn from_storages(
        storages: &[(&str, &dyn Storage)],
        cross_links: &dyn CrossLinkResolver,
        diagnostics: &DiagnosticsCollector,
    ) -> Self {
        let sets = storages
            .par_iter()
            .filter_map(|(repository, storage)| build_one(repository, *storage, cross_links, diagnostics))
            .collect();
        Self { sets }
    }

    /// Built sets.
    #[must_use]
    pub fn sets(&self) -> &[DocumentationSetNavigation] {
        &self.sets
    }

    /// Repositories that were built.
    #[must_use]
    pub fn repositories(&self) -> Vec<String> {
        self.sets.iter().map(|s| s.repository().to_owned()).collect()
    }

    /// Take the sets for composition.
    #[must_use]
    pub fn into_sets(self) -> Vec<DocumentationSetNavigation> {
        self.sets
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use stitch_nav::{NoopCrossLinkResolver, Severity};
    use stitch_storage::MockStorage;

    use super::*;

    #[test]
    fn test_from_storages_keeps_order() {
        let a = MockStorage::new()
            .with_file("docset.yml", "toc:\n  - file: index.md\n")
            .with_page("index.md", "A");
        let b = MockStorage::new()
            .with_file("docset.yml", "toc:\n  - file: index.md\n")
            .with_page("index.md", "B");
        let missing = MockStorage::new();
        let diagnostics = DiagnosticsCollector::new(false);

        let storages: [(&str, &dyn Storage); 3] = [("a", &a), ("missing", &missing), ("b", &b)];

        let sources = AssemblerSources::from_storages(
            &storages,
            &NoopCrossLinkResolver,
            &diagnostics,
        );

        assert_eq!(sources.repositories(), vec!["a", "b"]);
        assert_eq!(diagnostics.errors(), 1);
    }

    #[test]
    fn test_load_from_checkouts() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("checkouts/docs-content/docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("docset.yml"), "toc:\n  - file: index.md\n").unwrap();
        fs::write(docs.join("index.md"), "# Home\n").unwrap();

        let config = AssemblerConfig {
            checkouts_dir: dir.path().join("checkouts"),
            links_dir: PathBuf::from("links"),
            narrative_repository: "docs-content".to_owned(),
            repositories: vec!["kibana".to_owned()],
            ..AssemblerConfig::default()
        };
        let diagnostics = DiagnosticsCollector::new(false);

        let sources = AssemblerSources::load(&config, &NoopCrossLinkResolver, &diagnostics);

        assert_eq!(sources.repositories(), vec!["docs-content"]);
        assert_eq!(diagnostics.messages(Severity::Warning), vec!["Checkout of 'kibana' not found, skipping"]);
    }
}
