//! `stitch assemble` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use stitch_assembler::{
    AssemblerSources, NavigationTocMappings, PublishEnvironmentUriResolver, SiteNavigation,
    SiteOptions, UriCrossLinkResolver, load_registries,
};
use stitch_config::{CliSettings, Config, NavigationFile};
use stitch_nav::DiagnosticsCollector;

use super::{ExportArgs, finish};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the assemble command.
#[derive(Args)]
pub(crate) struct AssembleArgs {
    /// Path to configuration file (default: auto-discover stitch.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prefix of every site URL (overrides config).
    #[arg(long, env = "STITCH_SITE_PREFIX")]
    site_prefix: Option<String>,

    /// Promote warnings to errors.
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    export: ExportArgs,
}

impl AssembleArgs {
    /// Execute the assemble command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the manifest or a link registry
    /// can't be loaded, or any error diagnostic was emitted.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            strict: self.strict.then_some(true),
            site_prefix: self.site_prefix,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let assembler = &config.assembler_resolved;
        let manifest_path = assembler.navigation_file.display().to_string();

        output.info(&format!("Manifest: {manifest_path}"));
        output.info(&format!("Checkouts: {}", assembler.checkouts_dir.display()));

        let start = Instant::now();
        let manifest = NavigationFile::load(&assembler.navigation_file)?;
        let diagnostics = DiagnosticsCollector::new(config.build_resolved.strict);

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
        let cross_links =
            UriCrossLinkResolver::new(Arc::clone(&uri_resolver), assembler.all_repositories())
                .with_registries(load_registries(assembler)?);

        let sources = AssemblerSources::load(assembler, &cross_links, &diagnostics);
        let options = SiteOptions {
            narrative_repository: assembler.narrative_repository.clone(),
            site_prefix: assembler.site_prefix.clone(),
            manifest_path,
        };
        let set_count = sources.sets().len();
        let site = SiteNavigation::compose(&manifest, sources.into_sets(), &options, &diagnostics);

        tracing::info!(
            sets = set_count,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Assemble finished"
        );

        finish(&output, &diagnostics)?;
        self.export.write(site.tree(), site.root())?;

        output.success(&format!(
            "Assembled {set_count} documentation set(s), {} page(s) at {}",
            site.navigation_index().file_count(),
            site.url()
        ));
        Ok(())
    }
}
