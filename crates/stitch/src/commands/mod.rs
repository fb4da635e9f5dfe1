//! CLI command implementations.

mod assemble;
mod build;
mod check_prefixes;
mod codex;

use std::path::PathBuf;

use clap::Args;
use console::Term;
use stitch_html::NavigationHtmlWriter;
use stitch_nav::{DiagnosticsCollector, ItemId, NavigationTree};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use assemble::AssembleArgs;
pub(crate) use build::BuildArgs;
pub(crate) use check_prefixes::CheckPrefixesArgs;
pub(crate) use codex::CodexArgs;

/// Where the built navigation is written.
#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Write the navigation tree as JSON to this file ("-" for stdout).
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the navigation menu as HTML to this file.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Menu levels rendered to HTML.
    #[arg(long, default_value_t = 3)]
    depth: usize,
}

impl ExportArgs {
    /// Write the subtree under `root` to every requested destination.
    pub(crate) fn write(&self, tree: &NavigationTree, root: ItemId) -> Result<(), CliError> {
        if let Some(path) = &self.json {
            let json = serde_json::to_string_pretty(&tree.to_nav_item(root))?;
            if path.as_os_str() == "-" {
                Term::stdout().write_line(&json)?;
            } else {
                std::fs::write(path, json)?;
                tracing::info!(path = %path.display(), "Wrote navigation JSON");
            }
        }
        if let Some(path) = &self.html {
            let writer = NavigationHtmlWriter::new();
            std::fs::write(path, writer.render(tree, root, self.depth).as_bytes())?;
            tracing::info!(path = %path.display(), depth = self.depth, "Wrote navigation HTML");
        }
        Ok(())
    }
}

/// Report diagnostics and fail the command if any error was collected.
pub(crate) fn finish(output: &Output, diagnostics: &DiagnosticsCollector) -> Result<(), CliError> {
    output.diagnostics(diagnostics);
    if diagnostics.has_errors() {
        return Err(CliError::Validation(format!(
            "Build failed with {} error(s)",
            diagnostics.errors()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use stitch_nav::{DocumentationSetNavigation, NoopCrossLinkResolver, SetOptions};
    use stitch_storage::FsStorage;

    use super::*;

    fn build_set(dir: &std::path::Path) -> DocumentationSetNavigation {
        fs::write(
            dir.join("docset.yml"),
            "toc:\n  - file: index.md\n  - file: setup.md\n",
        )
        .unwrap();
        fs::write(dir.join("index.md"), "# Home\n").unwrap();
        fs::write(dir.join("setup.md"), "# Setup\n").unwrap();
        let storage = FsStorage::new(dir.to_path_buf());
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
    fn test_export_writes_json_and_html() {
        let dir = tempfile::tempdir().unwrap();
        let set = build_set(dir.path());
        let export = ExportArgs {
            json: Some(dir.path().join("nav.json")),
            html: Some(dir.path().join("nav.html")),
            depth: 2,
        };

        export.write(set.tree(), set.root()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("nav.json")).unwrap()).unwrap();
        assert_eq!(json["url"], "/");
        assert_eq!(json["children"][0]["url"], "/setup");
        let html = fs::read_to_string(dir.path().join("nav.html")).unwrap();
        assert!(html.contains("<a href=\"/setup\">Setup</a>"));
    }

    #[test]
    fn test_export_nothing_requested() {
        let dir = tempfile::tempdir().unwrap();
        let set = build_set(dir.path());

        ExportArgs::default().write(set.tree(), set.root()).unwrap();

        assert!(!dir.path().join("nav.json").exists());
    }

    #[test]
    fn test_finish_fails_on_errors() {
        let output = Output::new();
        let diagnostics = DiagnosticsCollector::new(false);
        diagnostics.emit_warning("docset.yml", "Just a warning");

        assert!(finish(&output, &diagnostics).is_ok());

        diagnostics.emit_error("docset.yml", "Broken");
        let err = finish(&output, &diagnostics).unwrap_err();
        assert_eq!(err.to_string(), "Build failed with 1 error(s)");
    }
}
