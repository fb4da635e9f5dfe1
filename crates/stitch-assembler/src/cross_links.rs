//! Cross-link resolution for assembled builds.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use stitch_nav::{CrossLinkResolver, DiagnosticsCollector, SourceUri, markdown_path_to_url_path};

use crate::links::RepositoryLinks;
use crate::uri_resolver::PublishEnvironmentUriResolver;

/// Resolves `scheme://path.md` links through the manifest.
///
/// Only schemes of assembled repositories resolve. When a repository's link
/// registry is known, the target must also be published there.
#[derive(Debug)]
pub struct UriCrossLinkResolver {
    uri_resolver: Arc<PublishEnvironmentUriResolver>,
    repositories: BTreeSet<String>,
    registries: BTreeMap<String, RepositoryLinks>,
}

impl UriCrossLinkResolver {
    /// Create a resolver for `repositories`.
    #[must_use]
    pub fn new(
        uri_resolver: Arc<PublishEnvironmentUriResolver>,
        repositories: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            uri_resolver,
            repositories: repositories.into_iter().collect(),
            registries: BTreeMap::new(),
        }
    }

    /// Validate targets against published link registries.
    #[must_use]
    pub fn with_registries(mut self, registries: BTreeMap<String, RepositoryLinks>) -> Self {
        self.registries = registries;
        self
    }
}

impl CrossLinkResolver for UriCrossLinkResolver {
    fn try_resolve(&self, uri: &str, diagnostics: &DiagnosticsCollector, file: &str) -> Option<String> {
        let (link, fragment) = match uri.split_once('#') {
            Some((link, fragment)) => (link, Some(fragment)),
            None => (uri, None),
        };

        let source = match SourceUri::parse(link) {
            Ok(source) => source,
            Err(e) => {
                diagnostics.emit_error(file, format!("Cross-link '{uri}' is invalid: {e}"));
                return None;
            }
        };

        if !self.repositories.contains(source.scheme()) {
            diagnostics.emit_error(
                file,
                format!(
                    "Cross-link '{uri}' could not be resolved, '{}' is not an assembled repository",
                    source.scheme()
                ),
            );
            return None;
        }

        if let Some(registry) = self.registries.get(source.scheme()) {
            let published = match fragment {
                Some(fragment) => format!("{}#{fragment}", source.path()),
                None => source.path().to_owned(),
            };
            if !registry.contains(&published) {
                diagnostics.emit_error(
                    file,
                    format!(
                        "Cross-link '{uri}' could not be resolved, '{}' does not publish '{published}'",
                        source.scheme()
                    ),
                );
                return None;
            }
        }

        let url = self
            .uri_resolver
            .resolve(&source, &markdown_path_to_url_path(source.path()));
        Some(match fragment {
            Some(fragment) => format!("{url}#{fragment}"),
            None => url,
        })
    }
}
