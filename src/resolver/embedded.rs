//! Offline resolver for identifiers already written into citations.

use tracing::debug;

use crate::config::CitelinkConfig;
use crate::model::{Reference, UniqueCollection};

use super::{IdentifierKind, Individual, ReferenceResolver, ResolverPipeline};

/// Turns one kind of embedded identifier into its canonical URI.
///
/// Runs only when enabled; looks only at references carrying the identifier,
/// optionally skipping references that already have candidates.
#[derive(Debug, Clone)]
pub struct EmbeddedIdResolver {
    kind: IdentifierKind,
    base: String,
    enabled: bool,
    only_unresolved: bool,
}

impl EmbeddedIdResolver {
    /// An enabled resolver using the kind's default URI base.
    #[must_use]
    pub fn new(kind: IdentifierKind) -> Self {
        Self {
            kind,
            base: kind.default_base().to_string(),
            enabled: true,
            only_unresolved: false,
        }
    }

    /// Builds the resolver for `kind` from configuration.
    #[must_use]
    pub fn from_config(kind: IdentifierKind, config: &CitelinkConfig) -> Self {
        let settings = &config.resolvers;
        let base = match kind {
            IdentifierKind::Doi => settings.doi_base_url.clone(),
            _ => kind.default_base().to_string(),
        };
        Self {
            kind,
            base,
            enabled: config.is_enabled(kind.source()),
            only_unresolved: settings.only_unresolved,
        }
    }

    /// Enables or disables the resolver.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Skips references that already carry a candidate.
    #[must_use]
    pub fn only_unresolved(mut self, only_unresolved: bool) -> Self {
        self.only_unresolved = only_unresolved;
        self
    }

    /// The identifier kind this resolver handles.
    #[must_use]
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// Returns true if the resolver will run.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl ReferenceResolver for EmbeddedIdResolver {
    fn source(&self) -> &str {
        self.kind.source()
    }

    fn attempt(&self, references: &UniqueCollection<Reference>) -> bool {
        self.enabled && !references.is_empty()
    }

    fn filtered_references<'r>(
        &self,
        references: &'r UniqueCollection<Reference>,
    ) -> Vec<&'r Reference> {
        references
            .iter()
            .filter(|reference| !(self.only_unresolved && reference.has_candidates()))
            .filter(|reference| self.kind.find(reference).is_some())
            .collect()
    }

    fn uri_for_reference(&self, reference: &Reference) -> Option<String> {
        let id = self.kind.find(reference)?;
        debug!(kind = %self.kind, reference = %reference.id, id = %id, "embedded identifier");
        Some(self.kind.uri(&self.base, &id))
    }
}

/// Pipeline with one [`EmbeddedIdResolver`] per identifier kind.
///
/// Only kinds enabled in `config` are registered, in [`IdentifierKind::ALL`] order.
#[must_use]
pub fn build_default_pipeline(config: &CitelinkConfig) -> ResolverPipeline {
    let mut pipeline = ResolverPipeline::new();
    for kind in IdentifierKind::ALL
        .into_iter()
        .filter(|kind| config.is_enabled(kind.source()))
    {
        let resolver = EmbeddedIdResolver::from_config(kind, config);
        pipeline.register(Box::new(Individual::new(resolver)));
    }
    pipeline
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolver::UriResolver;

    fn refs() -> UniqueCollection<Reference> {
        let mut references = UniqueCollection::new();
        references
            .push(Reference::new("r1").with_text("Smith J. Nature. doi:10.1038/nature12373"))
            .unwrap();
        references
            .push(Reference::new("r2").with_text("Jones K. Unpublished notes."))
            .unwrap();
        let mut r3 = Reference::new("r3");
        r3.pmid = Some("23193287".to_string());
        references.push(r3).unwrap();
        references
    }

    #[test]
    fn test_filter_keeps_only_references_with_identifier() {
        let references = refs();
        let resolver = EmbeddedIdResolver::new(IdentifierKind::Doi);
        let ids: Vec<&str> = resolver
            .filtered_references(&references)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1"]);
    }

    #[test]
    fn test_uri_for_doi() {
        let references = refs();
        let resolver = EmbeddedIdResolver::new(IdentifierKind::Doi);
        assert_eq!(
            resolver.uri_for_reference(references.first().unwrap()).as_deref(),
            Some("https://doi.org/10.1038/nature12373")
        );
    }

    #[test]
    fn test_disabled_resolver_declines() {
        let mut references = refs();
        let strategy = Individual::new(EmbeddedIdResolver::new(IdentifierKind::Doi).enabled(false));
        let outcome = strategy.resolve(&mut references).unwrap();
        assert!(!outcome.attempted);
        assert!(!references.first().unwrap().has_candidates());
    }

    #[test]
    fn test_only_unresolved_skips_resolved() {
        let mut references = refs();
        Individual::new(EmbeddedIdResolver::new(IdentifierKind::Doi))
            .resolve(&mut references)
            .unwrap();
        let mut r1 = references.first().cloned().unwrap();
        r1.pmid = Some("1".to_string());
        references.modify(0, |r| {
            *r = r1;
            Ok(())
        })
        .unwrap();

        let resolver = EmbeddedIdResolver::new(IdentifierKind::PubMed).only_unresolved(true);
        let ids: Vec<&str> = resolver
            .filtered_references(&references)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r3"]);
    }

    #[test]
    fn test_custom_doi_base_from_config() {
        let mut config = CitelinkConfig::default();
        config.resolvers.doi_base_url = "https://dx.doi.org/".to_string();
        let resolver = EmbeddedIdResolver::from_config(IdentifierKind::Doi, &config);
        let references = refs();
        assert_eq!(
            resolver.uri_for_reference(references.first().unwrap()).as_deref(),
            Some("https://dx.doi.org/10.1038/nature12373")
        );
    }

    #[test]
    fn test_default_pipeline_resolves_embedded_ids() {
        let pipeline = build_default_pipeline(&CitelinkConfig::default());
        assert_eq!(pipeline.resolver_count(), IdentifierKind::ALL.len());

        let mut references = refs();
        pipeline.resolve(&mut references).unwrap();

        assert_eq!(references.get(0).unwrap().sources(), vec!["doi"]);
        assert!(!references.get(1).unwrap().has_candidates());
        let r3 = references.get(2).unwrap();
        assert_eq!(
            r3.candidate_uris.first().unwrap().uri,
            "https://www.ncbi.nlm.nih.gov/pubmed/23193287"
        );
    }

    #[test]
    fn test_pipeline_respects_enabled_list() {
        let mut config = CitelinkConfig::default();
        config.resolvers.enabled = vec!["pubmed".to_string()];
        let pipeline = build_default_pipeline(&config);
        assert_eq!(pipeline.names(), vec!["pubmed"]);

        let mut references = refs();
        pipeline.resolve(&mut references).unwrap();

        assert!(!references.get(0).unwrap().has_candidates());
        assert!(references.get(2).unwrap().has_candidates());
    }
}
