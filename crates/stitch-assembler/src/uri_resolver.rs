//! Publishing URLs for repository paths.
//!
//! A path is published under the `path_prefix` of the most specific manifest
//! mapping whose source contains it, with the mapping's own source path
//! stripped. `elasticsearch://reference/query-dsl/bool.md` mapped through
//! `elasticsearch://reference -> docs/reference` becomes
//! `/docs/reference/query-dsl/bool`.

use stitch_nav::{SourceUri, markdown_path_to_url_path};

use crate::mapping::{NavigationTocMapping, NavigationTocMappings};

/// Resolves source URIs against the manifest and publish environment.
#[derive(Clone, Debug, Default)]
pub struct PublishEnvironmentUriResolver {
    mappings: NavigationTocMappings,
    environment_prefix: Option<String>,
}

fn join_segments(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let path = path.trim_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_owned(),
        (false, true) => prefix.to_owned(),
        (false, false) => format!("{prefix}/{path}"),
    }
}

/// Part of `path` below the mapping's source path.
fn remaining<'a>(mapping: &NavigationTocMapping, path: &'a str) -> &'a str {
    let source = mapping.source.path();
    let path = path.trim_matches('/');
    if source.is_empty() {
        return path;
    }
    if path == source {
        return "";
    }
    path.strip_prefix(source)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

impl PublishEnvironmentUriResolver {
    /// Create a resolver. `environment_prefix` is prepended to every URL.
    #[must_use]
    pub fn new(mappings: NavigationTocMappings, environment_prefix: Option<&str>) -> Self {
        Self {
            mappings,
            environment_prefix: environment_prefix
                .map(|p| p.trim_matches('/').to_owned())
                .filter(|p| !p.is_empty()),
        }
    }

    /// Mappings the resolver was built from.
    #[must_use]
    pub fn mappings(&self) -> &NavigationTocMappings {
        &self.mappings
    }

    /// Absolute URL path of `path`, a URL-formatted path inside `uri`'s repository.
    ///
    /// Without a mapping the path is published as-is.
    #[must_use]
    pub fn resolve(&self, uri: &SourceUri, path: &str) -> String {
        let published = match self.mappings.best_match(uri) {
            Some(mapping) => join_segments(&mapping.path_prefix, remaining(mapping, path)),
            None => path.trim_matches('/').to_owned(),
        };
        let published = match &self.environment_prefix {
            Some(prefix) => join_segments(prefix, &published),
            None => published,
        };
        format!("/{published}")
    }

    /// Every URL folder `relative_link` occupies, for collision checks.
    ///
    /// `reference/query-dsl/bool.md` under prefix `docs` claims `docs/`,
    /// `docs/reference/`, `docs/reference/query-dsl/` and
    /// `docs/reference/query-dsl/bool/`. Empty without a mapping.
    #[must_use]
    pub fn resolve_to_sub_paths(&self, uri: &SourceUri, relative_link: &str) -> Vec<String> {
        let Some(mapping) = self.mappings.best_match(uri) else {
            return Vec::new();
        };

        let url_path = markdown_path_to_url_path(remaining(mapping, relative_link));
        let mut paths = Vec::new();
        let mut accumulated = String::new();
        for token in url_path.split('/').filter(|t| !t.is_empty()) {
            accumulated = join_segments(&accumulated, token);
            paths.push(format!("{}/", join_segments(&mapping.path_prefix, &accumulated)));
        }
        paths.push(format!("{}/", mapping.path_prefix));
        paths
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stitch_config::NavigationFile;
    use stitch_nav::DiagnosticsCollector;

    use super::*;

    fn resolver(environment_prefix: Option<&str>) -> PublishEnvironmentUriResolver {
        let manifest = NavigationFile::from_yaml(
            r"
toc:
  - toc: elasticsearch://reference
    path_prefix: reference/elasticsearch
    children:
      - toc: elasticsearch://reference/query-dsl
        path_prefix: reference/query-languages
  - toc: kibana://
    path_prefix: kibana
",
        )
        .unwrap();
        let diagnostics = DiagnosticsCollector::new(false);
        let mappings =
            NavigationTocMappings::from_manifest(&manifest, "docs-content", &diagnostics, "navigation.yml");
        PublishEnvironmentUriResolver::new(mappings, environment_prefix)
    }

    fn uri(value: &str) -> SourceUri {
        SourceUri::parse(value).unwrap()
    }

    #[test]
    fn test_resolve_strips_source_path() {
        let resolver = resolver(None);

        assert_eq!(
            resolver.resolve(&uri("elasticsearch://reference/mapping.md"), "reference/mapping"),
            "/reference/elasticsearch/mapping"
        );
        assert_eq!(
            resolver.resolve(&uri("elasticsearch://reference/query-dsl/bool.md"), "reference/query-dsl/bool"),
            "/reference/query-languages/bool"
        );
        assert_eq!(
            resolver.resolve(&uri("kibana://api/saved-objects.md"), "api/saved-objects"),
            "/kibana/api/saved-objects"
        );
    }

    #[test]
    fn test_resolve_source_root() {
        let resolver = resolver(None);

        assert_eq!(
            resolver.resolve(&uri("elasticsearch://reference"), "reference"),
            "/reference/elasticsearch"
        );
    }

    #[test]
    fn test_resolve_with_environment_prefix() {
        let resolver = resolver(Some("/docs/"));

        assert_eq!(
            resolver.resolve(&uri("kibana://index.md"), ""),
            "/docs/kibana"
        );
    }

    #[test]
    fn test_resolve_without_mapping() {
        let resolver = resolver(Some("docs"));

        assert_eq!(
            resolver.resolve(&uri("beats://setup.md"), "setup"),
            "/docs/setup"
        );
    }

    #[test]
    fn test_sub_paths() {
        let resolver = resolver(None);

        let paths = resolver.resolve_to_sub_paths(
            &uri("elasticsearch://reference/query-dsl/bool/index.md"),
            "reference/query-dsl/bool/index.md",
        );

        assert_eq!(
            paths,
            vec!["reference/query-languages/bool/", "reference/query-languages/"]
        );
    }

    #[test]
    fn test_sub_paths_unmapped() {
        let resolver = resolver(None);

        assert!(
            resolver
                .resolve_to_sub_paths(&uri("beats://setup.md"), "setup.md")
                .is_empty()
        );
    }
}
