//! Assembler error types.

use std::path::PathBuf;

/// Failure that stops an assembler command before navigation is built.
///
/// Problems inside the navigation itself are diagnostics, not errors.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// Configuration or manifest could not be loaded.
    #[error(transparent)]
    Config(#[from] stitch_config::ConfigError),
    /// A file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A link registry is malformed.
    #[error("Invalid link registry {}: {source}", path.display())]
    Json {
        /// Registry file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}
