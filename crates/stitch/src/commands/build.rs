//! `stitch build` command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use stitch_config::{CliSettings, Config};
use stitch_nav::{DiagnosticsCollector, DocumentationSetNavigation, NoopCrossLinkResolver, SetOptions};
use stitch_storage::FsStorage;

use super::{ExportArgs, finish};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover stitch.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Repository name used in identifiers (default: source directory's parent name).
    #[arg(short, long)]
    repository: Option<String>,

    /// URL prefix of every page (e.g. /v8.0).
    #[arg(long)]
    path_prefix: Option<String>,

    /// Promote warnings to errors.
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    export: ExportArgs,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, no docset file is found or
    /// any error diagnostic was emitted.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            strict: self.strict.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = config.build_resolved.source_dir;
        let repository = self
            .repository
            .unwrap_or_else(|| repository_name(&source_dir));

        output.info(&format!("Source: {}", source_dir.display()));

        let start = Instant::now();
        let storage = FsStorage::new(source_dir.clone());
        let diagnostics = DiagnosticsCollector::new(config.build_resolved.strict);
        let options = SetOptions {
            path_prefix: self.path_prefix,
            assembler_build: false,
        };
        let set = DocumentationSetNavigation::from_storage(
            &repository,
            &storage,
            &NoopCrossLinkResolver,
            &diagnostics,
            &options,
        );

        let Some(set) = set else {
            output.diagnostics(&diagnostics);
            return Err(CliError::Validation(format!(
                "No documentation set found in {}",
                source_dir.display()
            )));
        };

        tracing::info!(
            repository,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Build finished"
        );

        finish(&output, &diagnostics)?;
        self.export.write(set.tree(), set.root())?;

        output.success(&format!(
            "Built '{}': {} page(s) at {}",
            set.title(),
            set.navigation_index().file_count(),
            set.url()
        ));
        Ok(())
    }
}

/// `checkouts/kibana/docs` -> `kibana`; `guide` -> `guide`.
fn repository_name(source_dir: &std::path::Path) -> String {
    let name = |p: &std::path::Path| p.file_name().map(|n| n.to_string_lossy().into_owned());
    match name(source_dir) {
        Some(dir) if dir == "docs" => source_dir
            .parent()
            .and_then(name)
            .unwrap_or(dir),
        Some(dir) => dir,
        None => "docs".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_repository_name() {
        assert_eq!(repository_name(Path::new("/checkouts/kibana/docs")), "kibana");
        assert_eq!(repository_name(Path::new("/work/guide")), "guide");
        assert_eq!(repository_name(Path::new("docs")), "docs");
    }
}
