//! Diagnostics emitted while building navigation.
//!
//! Nothing in navigation building returns an error for a bad entry. Problems
//! are reported here, the offending subtree is dropped, and the caller
//! decides afterwards whether the command fails.

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the build.
    Error,
    /// Reported; promoted to an error in strict mode.
    Warning,
    /// Suggestion only.
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Hint => "hint",
        };
        f.write_str(label)
    }
}

/// A single reported problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity after strict-mode promotion.
    pub severity: Severity,
    /// Configuration file or URI the problem belongs to.
    pub file: String,
    /// Human readable message.
    pub message: String,
}

/// Append-only diagnostics sink shared across parallel set builders.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    strict: bool,
    diagnostics: Mutex<Vec<Diagnostic>>,
    errors: AtomicUsize,
    warnings: AtomicUsize,
    hints: AtomicUsize,
}

impl DiagnosticsCollector {
    /// Create a collector. In strict mode warnings are recorded as errors.
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    /// Whether warnings are promoted to errors.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Report an error.
    pub fn emit_error(&self, file: impl Into<String>, message: impl Into<String>) {
        self.emit(Severity::Error, file.into(), message.into());
    }

    /// Report a warning.
    pub fn emit_warning(&self, file: impl Into<String>, message: impl Into<String>) {
        self.emit(Severity::Warning, file.into(), message.into());
    }

    /// Report a hint.
    pub fn emit_hint(&self, file: impl Into<String>, message: impl Into<String>) {
        self.emit(Severity::Hint, file.into(), message.into());
    }

    fn emit(&self, severity: Severity, file: String, message: String) {
        let severity = match severity {
            Severity::Warning if self.strict => Severity::Error,
            other => other,
        };

        match severity {
            Severity::Error => {
                tracing::error!(file = %file, "{message}");
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
            Severity::Warning => {
                tracing::warn!(file = %file, "{message}");
                self.warnings.fetch_add(1, Ordering::Relaxed);
            }
            Severity::Hint => {
                tracing::debug!(file = %file, "{message}");
                self.hints.fetch_add(1, Ordering::Relaxed);
            }
        }

        let diagnostic = Diagnostic {
            severity,
            file,
            message,
        };
        // A poisoned lock only means another emitter panicked mid-push.
        match self.diagnostics.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }

    /// Number of errors reported so far.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Number of warnings reported so far.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    /// Number of hints reported so far.
    #[must_use]
    pub fn hints(&self) -> usize {
        self.hints.load(Ordering::Relaxed)
    }

    /// True once any error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    /// Snapshot of every diagnostic in emission order.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.diagnostics.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages of every diagnostic with the given severity.
    #[must_use]
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message)
            .collect()
    }
}
