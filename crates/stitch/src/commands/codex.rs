//! `stitch codex` command implementation.

use std::path::PathBuf;

use clap::Args;
use stitch_assembler::CodexNavigation;
use stitch_config::{CliSettings, Config};
use stitch_nav::{DiagnosticsCollector, DocumentationSetNavigation, NoopCrossLinkResolver, SetOptions};
use stitch_storage::FsStorage;

use super::{ExportArgs, finish};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the codex command.
#[derive(Args)]
pub(crate) struct CodexArgs {
    /// Path to configuration file (default: auto-discover stitch.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Promote warnings to errors.
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    export: ExportArgs,
}

impl CodexArgs {
    /// Execute the codex command.
    ///
    /// Every `[[codex.sets]]` entry is built from its checkout as an
    /// isolated set, then attached under the codex root.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any error diagnostic was
    /// emitted.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            strict: self.strict.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let context = config
            .config_path
            .as_ref()
            .map_or_else(|| "stitch.toml".to_owned(), |p| p.display().to_string());
        let diagnostics = DiagnosticsCollector::new(config.build_resolved.strict);

        let sets: Vec<DocumentationSetNavigation> = config
            .codex
            .sets
            .iter()
            .filter_map(|set| {
                let source_dir = config.assembler_resolved.source_dir_for(&set.name);
                if !source_dir.is_dir() {
                    tracing::warn!(repository = %set.name, path = %source_dir.display(), "Checkout not found");
                    return None;
                }
                DocumentationSetNavigation::from_storage(
                    &set.name,
                    &FsStorage::new(source_dir),
                    &NoopCrossLinkResolver,
                    &diagnostics,
                    &SetOptions::default(),
                )
            })
            .collect();

        let codex = CodexNavigation::compose(&config.codex, sets, &diagnostics, &context);

        finish(&output, &diagnostics)?;
        self.export.write(codex.tree(), codex.root())?;

        for info in codex.documentation_sets() {
            output.info(&format!("{} ({} page(s)): {}", info.title, info.page_count, info.url));
        }
        output.success(&format!(
            "Codex '{}' composed with {} set(s) at {}",
            config.codex.title,
            codex.documentation_sets().len(),
            codex.url()
        ));
        Ok(())
    }
}
