//! Cross-repository navigation for stitch.
//!
//! Takes documentation sets built independently from each repository's
//! checkout and composes them into one site, following `navigation.yml`:
//!
//! - [`NavigationTocMappings`]: which source URI publishes under which URL prefix
//! - [`PublishEnvironmentUriResolver`]: source URIs to URLs
//! - [`SiteNavigation`]: the assembled site
//! - [`CodexNavigation`]: independent sets side by side, optionally grouped
//! - [`NavigationPrefixChecker`]: URL namespace collisions between repositories
//!
//! # Example
//!
//! ```ignore
//! use stitch_assembler::{AssemblerSources, SiteNavigation, SiteOptions};
//!
//! let sources = AssemblerSources::load(&config, &cross_links, &diagnostics);
//! let site = SiteNavigation::compose(&manifest, sources.into_sets(), &options, &diagnostics);
//! println!("{}", site.url());
//! ```

mod codex;
mod cross_links;
mod error;
mod links;
mod mapping;
mod prefix_checker;
mod site;
mod sources;
mod uri_resolver;

pub use codex::{CodexNavigation, DocumentationSetInfo};
pub use cross_links::UriCrossLinkResolver;
pub use error::AssembleError;
pub use links::{LinkEntry, RepositoryLinks, load_registries};
pub use mapping::{
    NavigationTocMapping, NavigationTocMappings, declared_sources, parse_toc_source,
    phantom_sources,
};
pub use prefix_checker::{NavigationPrefixChecker, PrefixCheckReport};
pub use site::{SiteNavigation, SiteOptions, normalize_site_prefix};
pub use sources::AssemblerSources;
pub use uri_resolver::PublishEnvironmentUriResolver;

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use stitch_nav::{NavigationIndex, NavigationTree};

    use super::*;

    /// Every ordered item is reachable once and stores its own position.
    pub(crate) fn assert_ordering_is_unique(tree: &NavigationTree, index: &NavigationIndex) {
        let order = index.by_order();
        let unique: BTreeSet<_> = order.iter().collect();
        assert_eq!(unique.len(), order.len(), "items ordered more than once");
        for (position, &id) in order.iter().enumerate() {
            assert_eq!(tree.item(id).navigation_index, position);
        }
    }

    static_assertions::assert_impl_all!(SiteNavigation: Send, Sync);
    static_assertions::assert_impl_all!(CodexNavigation: Send, Sync);
    static_assertions::assert_impl_all!(UriCrossLinkResolver: Send, Sync);
    static_assertions::assert_impl_all!(AssembleError: Send, Sync);
}
