//! Registration-ordered resolver pipeline.
//!
//! The [`ResolverPipeline`] runs every registered strategy over a paper's
//! references. Candidates from earlier resolvers are visible to later ones.

use tracing::{debug, info};

use crate::model::{Paper, Reference, UniqueCollection};

use super::{ResolveError, ResolveOutcome, UriResolver};

/// An ordered list of resolution strategies.
pub struct ResolverPipeline {
    resolvers: Vec<Box<dyn UriResolver>>,
}

impl ResolverPipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Appends a strategy; strategies run in registration order.
    #[tracing::instrument(skip(self, resolver), fields(resolver_name))]
    pub fn register(&mut self, resolver: Box<dyn UriResolver>) {
        tracing::Span::current().record("resolver_name", resolver.name());
        debug!(name = resolver.name(), "Registering resolver");
        self.resolvers.push(resolver);
    }

    /// Returns the number of registered strategies.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns true if no strategies are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Names of registered strategies in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Runs every strategy over `references` in registration order.
    ///
    /// Candidates attached before a failure are kept.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first strategy error.
    #[tracing::instrument(skip_all, fields(references = references.len()))]
    pub fn resolve(
        &self,
        references: &mut UniqueCollection<Reference>,
    ) -> Result<Vec<ResolveOutcome>, ResolveError> {
        let mut outcomes = Vec::with_capacity(self.resolvers.len());
        for resolver in &self.resolvers {
            debug!(resolver = resolver.name(), "Running resolver");
            outcomes.push(resolver.resolve(references)?);
        }
        let attached: usize = outcomes.iter().map(|outcome| outcome.attached).sum();
        info!(resolvers = outcomes.len(), attached, "Resolution pipeline complete");
        Ok(outcomes)
    }

    /// Runs every strategy over the paper's reference collection.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first strategy error.
    pub fn resolve_paper(&self, paper: &mut Paper) -> Result<Vec<ResolveOutcome>, ResolveError> {
        self.resolve(&mut paper.references)
    }
}

impl Default for ResolverPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResolverPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverPipeline")
            .field("resolver_count", &self.resolvers.len())
            .field("resolvers", &self.names())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolver::{Individual, ReferenceResolver};

    struct Fixed {
        source: &'static str,
        uri: &'static str,
    }

    impl ReferenceResolver for Fixed {
        fn source(&self) -> &str {
            self.source
        }

        fn uri_for_reference(&self, _reference: &Reference) -> Option<String> {
            Some(self.uri.to_string())
        }
    }

    struct Failing;

    impl UriResolver for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn resolve(
            &self,
            _references: &mut UniqueCollection<Reference>,
        ) -> Result<ResolveOutcome, ResolveError> {
            Err(ResolveError::resolution_failed("failing", "backend down"))
        }
    }

    fn fixed(source: &'static str, uri: &'static str) -> Box<dyn UriResolver> {
        Box::new(Individual::new(Fixed { source, uri }))
    }

    fn paper() -> Paper {
        let mut paper = Paper::new();
        paper.references.push(Reference::new("r1")).unwrap();
        paper
    }

    #[test]
    fn test_new_pipeline_is_empty() {
        let pipeline = ResolverPipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.resolver_count(), 0);
    }

    #[test]
    fn test_runs_in_registration_order() {
        let mut pipeline = ResolverPipeline::default();
        pipeline.register(fixed("first", "https://example.org/1"));
        pipeline.register(fixed("second", "https://example.org/2"));
        let mut paper = paper();

        let outcomes = pipeline.resolve_paper(&mut paper).unwrap();

        let names: Vec<&str> = outcomes.iter().map(|o| o.resolver.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(
            paper.references.first().unwrap().sources(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_first_error_stops_pipeline() {
        let mut pipeline = ResolverPipeline::new();
        pipeline.register(fixed("first", "https://example.org/1"));
        pipeline.register(Box::new(Failing));
        pipeline.register(fixed("third", "https://example.org/3"));
        let mut paper = paper();

        let err = pipeline.resolve_paper(&mut paper).unwrap_err();

        assert!(matches!(err, ResolveError::ResolutionFailed { .. }));
        assert_eq!(paper.references.first().unwrap().sources(), vec!["first"]);
    }

    #[test]
    fn test_debug_lists_names() {
        let mut pipeline = ResolverPipeline::new();
        pipeline.register(fixed("first", "https://example.org/1"));
        let debug = format!("{pipeline:?}");
        assert!(debug.contains("resolver_count: 1"));
        assert!(debug.contains("first"));
    }
}
