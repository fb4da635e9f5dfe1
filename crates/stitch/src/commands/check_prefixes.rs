//! `stitch check-prefixes` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use stitch_assembler::{
    NavigationPrefixChecker, NavigationTocMappings, PublishEnvironmentUriResolver,
    RepositoryLinks, load_registries, phantom_sources,
};
use stitch_config::{Config, NavigationFile};
use stitch_nav::DiagnosticsCollector;

use super::finish;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check-prefixes command.
#[derive(Args)]
pub(crate) struct CheckPrefixesArgs {
    /// Path to configuration file (default: auto-discover stitch.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Check this repository against a local links.json instead of its published one.
    #[arg(long, requires = "links_json")]
    repository: Option<String>,

    /// Local links.json of `--repository`.
    #[arg(long, requires = "repository")]
    links_json: Option<PathBuf>,
}

impl CheckPrefixesArgs {
    /// Execute the check-prefixes command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the manifest or a registry can't be
    /// loaded, or a collision was found.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let assembler = &config.assembler_resolved;
        let manifest_path = assembler.navigation_file.display().to_string();
        let manifest = NavigationFile::load(&assembler.navigation_file)?;
        let diagnostics = DiagnosticsCollector::new(false);

        let mappings = NavigationTocMappings::from_manifest(
            &manifest,
            &assembler.narrative_repository,
            &diagnostics,
            &manifest_path,
        );
        let uri_resolver = Arc::new(PublishEnvironmentUriResolver::new(
            mappings,
            assembler.environment_prefix.as_deref(),
        ));

        let repositories = assembler.all_repositories();
        let mut registries = load_registries(assembler)?;
        if let (Some(repository), Some(path)) = (self.repository, &self.links_json) {
            if !repositories.contains(&repository) {
                return Err(CliError::Validation(format!(
                    "Repository '{repository}' is not part of [assembler] repositories"
                )));
            }
            output.info(&format!("Using {} for '{repository}'", path.display()));
            registries.insert(repository, RepositoryLinks::load(path)?);
        }

        let checker = NavigationPrefixChecker::new(
            uri_resolver,
            repositories,
            phantom_sources(&manifest, &assembler.narrative_repository),
        );
        let report = checker.check(&registries, &diagnostics);

        finish(&output, &diagnostics)?;
        output.success(&format!(
            "Checked {} link(s) across {} repositories, no collisions",
            report.links,
            registries.len()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    fn workspace(dir: &Path) -> PathBuf {
        let manifest = "toc:\n  - toc: repo-a://\n    path_prefix: a\n";
        fs::write(dir.join("navigation.yml"), manifest).unwrap();
        let links = r#"{"links": {"index.md": {}, "setup.md": {}}}"#;
        fs::write(dir.join("links.json"), links).unwrap();
        let config = dir.join("stitch.toml");
        fs::write(&config, "[assembler]\nrepositories = [\"repo-a\"]\n").unwrap();
        config
    }

    #[test]
    fn test_local_links_for_configured_repository() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckPrefixesArgs {
            config: Some(workspace(dir.path())),
            repository: Some("repo-a".to_owned()),
            links_json: Some(dir.path().join("links.json")),
        };

        assert!(args.execute().is_ok());
    }

    #[test]
    fn test_local_links_for_unknown_repository_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckPrefixesArgs {
            config: Some(workspace(dir.path())),
            repository: Some("repo-z".to_owned()),
            links_json: Some(dir.path().join("links.json")),
        };

        let err = args.execute().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Repository 'repo-z' is not part of [assembler] repositories"
        );
    }
}
