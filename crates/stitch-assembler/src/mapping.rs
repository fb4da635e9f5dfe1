//! Source URI to URL prefix mappings derived from `navigation.yml`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use stitch_config::{NavigationFile, TocReference};
use stitch_nav::{DiagnosticsCollector, SourceUri, UriError};

/// Where one declared table of contents is published.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationTocMapping {
    /// Declared source.
    pub source: SourceUri,
    /// URL path without leading or trailing slashes.
    pub path_prefix: String,
    /// Top-level manifest reference this mapping is nested under.
    pub top_level_source: SourceUri,
    /// Direct manifest parent (the source itself at the top level).
    pub parent_source: SourceUri,
}

/// Parse a manifest `toc` value. Bare paths belong to the narrative repository.
///
/// # Errors
///
/// Returns [`UriError`] if a scheme-qualified value is malformed.
pub fn parse_toc_source(toc: &str, narrative: &str) -> Result<SourceUri, UriError> {
    if toc.contains("://") {
        SourceUri::parse(toc)
    } else {
        Ok(SourceUri::new(narrative, toc))
    }
}

/// Every source the manifest references, at any depth.
pub fn declared_sources(manifest: &NavigationFile, narrative: &str) -> BTreeSet<SourceUri> {
    fn collect(refs: &[TocReference], narrative: &str, out: &mut BTreeSet<SourceUri>) {
        for toc_ref in refs {
            if let Ok(source) = parse_toc_source(&toc_ref.toc, narrative) {
                out.insert(source);
            }
            collect(&toc_ref.children, narrative, out);
        }
    }

    let mut sources = BTreeSet::new();
    collect(&manifest.toc, narrative, &mut sources);
    sources
}

/// Sources declared as phantoms.
pub fn phantom_sources(manifest: &NavigationFile, narrative: &str) -> BTreeSet<SourceUri> {
    manifest
        .phantoms
        .iter()
        .filter_map(|p| parse_toc_source(&p.toc, narrative).ok())
        .collect()
}

/// The manifest's mappings keyed by source.
#[derive(Clone, Debug, Default)]
pub struct NavigationTocMappings {
    mappings: BTreeMap<SourceUri, NavigationTocMapping>,
}

impl NavigationTocMappings {
    /// Derive mappings from a manifest.
    ///
    /// Malformed sources are reported and skipped. A missing `path_prefix`
    /// falls back to the source path, with an error outside the narrative
    /// repository. A source declared twice keeps its first declaration; the
    /// later one and its children are ignored, as the site composer leaves
    /// them out.
    pub fn from_manifest(
        manifest: &NavigationFile,
        narrative: &str,
        diagnostics: &DiagnosticsCollector,
        context: &str,
    ) -> Self {
        let mut mappings = Self::default();
        mappings.read(&manifest.toc, None, None, narrative, diagnostics, context);
        mappings
    }

    fn read(
        &mut self,
        refs: &[TocReference],
        top_level: Option<&SourceUri>,
        parent: Option<&SourceUri>,
        narrative: &str,
        diagnostics: &DiagnosticsCollector,
        context: &str,
    ) {
        for toc_ref in refs {
            let source = match parse_toc_source(&toc_ref.toc, narrative) {
                Ok(source) => source,
                Err(e) => {
                    diagnostics.emit_error(
                        context,
                        format!("Source toc entry is not a valid uri: {} ({e})", toc_ref.toc),
                    );
                    continue;
                }
            };

            if self.mappings.contains_key(&source) {
                continue;
            }

            let path_prefix = match &toc_ref.path_prefix {
                Some(prefix) => prefix.trim_matches('/').to_owned(),
                None => {
                    if source.scheme() != narrative {
                        diagnostics.emit_error(
                            context,
                            format!(
                                "Path prefix is not defined for: {source}, falling back to {} which may be incorrect",
                                source.path()
                            ),
                        );
                    }
                    source.path().to_owned()
                }
            };

            let top_level = top_level.unwrap_or(&source).clone();
            let parent_source = parent.unwrap_or(&source).clone();
            self.mappings.insert(
                source.clone(),
                NavigationTocMapping {
                    source: source.clone(),
                    path_prefix,
                    top_level_source: top_level.clone(),
                    parent_source,
                },
            );

            self.read(
                &toc_ref.children,
                Some(&top_level),
                Some(&source),
                narrative,
                diagnostics,
                context,
            );
        }
    }

    /// Mapping declared for exactly `source`.
    #[must_use]
    pub fn get(&self, source: &SourceUri) -> Option<&NavigationTocMapping> {
        self.mappings.get(source)
    }

    /// Most specific mapping whose source contains `uri`.
    #[must_use]
    pub fn best_match(&self, uri: &SourceUri) -> Option<&NavigationTocMapping> {
        self.mappings
            .values()
            .filter(|m| uri.starts_with(&m.source))
            .max_by_key(|m| m.source.path().len())
    }

    /// All mappings, ordered by source.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationTocMapping> {
        self.mappings.values()
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// True if the manifest declared nothing usable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
