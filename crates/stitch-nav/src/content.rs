//! Seams to content loading: document creation and cross-link resolution.

use stitch_storage::{ContentModel, Storage, load_content};

use crate::diagnostics::DiagnosticsCollector;

/// Creates content models for markdown paths.
pub trait DocumentFactory: Send + Sync {
    /// Content model for `path`, or `None` if the file can't be used.
    fn try_create(&self, path: &str) -> Option<ContentModel>;
}

/// Reads content models through a [`Storage`].
pub struct StorageDocumentFactory<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StorageDocumentFactory<'a> {
    /// Create a factory reading from `storage`.
    #[must_use]
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }
}

impl DocumentFactory for StorageDocumentFactory<'_> {
    fn try_create(&self, path: &str) -> Option<ContentModel> {
        load_content(self.storage, path)
    }
}

/// Resolves `scheme://path` links into absolute URLs.
pub trait CrossLinkResolver: Send + Sync {
    /// Resolved URL, or `None` after reporting why the link can't resolve.
    fn try_resolve(&self, uri: &str, diagnostics: &DiagnosticsCollector, file: &str)
    -> Option<String>;
}

/// Resolver for isolated builds, where no other repository is known.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCrossLinkResolver;

impl CrossLinkResolver for NoopCrossLinkResolver {
    fn try_resolve(
        &self,
        uri: &str,
        diagnostics: &DiagnosticsCollector,
        file: &str,
    ) -> Option<String> {
        diagnostics.emit_error(file, format!("Cross-link '{uri}' could not be resolved"));
        None
    }
}
