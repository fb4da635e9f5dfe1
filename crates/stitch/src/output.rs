//! Colored terminal output utilities.

use console::{Style, Term};
use stitch_nav::{DiagnosticsCollector, Severity};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print every collected diagnostic, then a one-line summary.
    pub(crate) fn diagnostics(&self, diagnostics: &DiagnosticsCollector) {
        for diagnostic in diagnostics.diagnostics() {
            let line = format!("{}: {}: {}", diagnostic.severity, diagnostic.file, diagnostic.message);
            match diagnostic.severity {
                Severity::Error => self.error(&line),
                Severity::Warning => self.warning(&line),
                Severity::Hint => {
                    let _ = self.term.write_line(&self.dim.apply_to(line).to_string());
                }
            }
        }
        let summary = format!(
            "{} error(s), {} warning(s), {} hint(s)",
            diagnostics.errors(),
            diagnostics.warnings(),
            diagnostics.hints()
        );
        if diagnostics.has_errors() {
            self.error(&summary);
        } else if diagnostics.warnings() > 0 {
            self.warning(&summary);
        } else {
            self.info(&summary);
        }
    }
}
