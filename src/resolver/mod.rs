//! Resolution strategies that attach candidate URIs to references.
//!
//! A concrete resolver supplies a few small hooks; the strategy adapters own
//! the control flow: eligibility gating, filtering, batching and write-back.
//!
//! # Architecture
//!
//! - [`ReferenceResolver`] - hooks for resolvers that look up one reference at a time
//! - [`BatchReferenceResolver`] - hooks for resolvers that accept many references per request
//! - [`Individual`] / [`Grouped`] - strategy adapters driving those hooks
//! - [`UriResolver`] - object-safe strategy interface shared by both adapters
//! - [`ResolverPipeline`] - registration-ordered list of strategies run over a paper
//! - [`EmbeddedIdResolver`] - offline resolver for identifiers already present in citations
//!
//! # Example
//!
//! ```
//! use citelink_core::model::{Paper, Reference};
//! use citelink_core::resolver::{Individual, ReferenceResolver, ResolverPipeline};
//!
//! struct Echo;
//!
//! impl ReferenceResolver for Echo {
//!     fn source(&self) -> &str {
//!         "echo"
//!     }
//!
//!     fn uri_for_reference(&self, reference: &Reference) -> Option<String> {
//!         reference.url.clone()
//!     }
//! }
//!
//! let mut paper = Paper::new();
//! let mut reference = Reference::new("r1");
//! reference.url = Some("https://example.org/paper".to_string());
//! paper.references.push(reference)?;
//!
//! let mut pipeline = ResolverPipeline::new();
//! pipeline.register(Box::new(Individual::new(Echo)));
//! pipeline.resolve_paper(&mut paper)?;
//!
//! assert_eq!(paper.resolved_reference_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod embedded;
mod error;
mod grouped;
mod identifiers;
mod individual;
mod pipeline;

pub use embedded::{EmbeddedIdResolver, build_default_pipeline};
pub use error::ResolveError;
pub use grouped::Grouped;
pub use identifiers::{
    IdentifierKind, extract_arxiv_id, extract_doi, extract_github_repo, extract_isbn,
    extract_pmcid, extract_pmid,
};
pub use individual::Individual;
pub use pipeline::ResolverPipeline;

use crate::model::{Reference, UniqueCollection};

/// Hooks for a resolver that produces at most one candidate URI per reference.
///
/// Drive it with [`Individual`].
pub trait ReferenceResolver {
    /// Name recorded as the source of every candidate this resolver attaches.
    fn source(&self) -> &str;

    /// Returns false to decline the whole run without error.
    ///
    /// Defaults to running whenever there is at least one reference.
    fn attempt(&self, references: &UniqueCollection<Reference>) -> bool {
        !references.is_empty()
    }

    /// The references this resolver should look at, in collection order.
    ///
    /// Defaults to every reference.
    fn filtered_references<'r>(
        &self,
        references: &'r UniqueCollection<Reference>,
    ) -> Vec<&'r Reference> {
        references.iter().collect()
    }

    /// Candidate URI for one reference; `None` or an empty string attaches nothing.
    ///
    /// A value that is not an absolute URI is logged and skipped.
    fn uri_for_reference(&self, reference: &Reference) -> Option<String>;
}

/// Hooks for a resolver whose backend accepts several references per request.
///
/// Drive it with [`Grouped`].
pub trait BatchReferenceResolver {
    /// Maximum references per batch. Must be positive.
    const GROUP_SIZE: usize;

    /// Resolver name used in logs and errors.
    fn name(&self) -> &str;

    /// Returns false to decline the whole run without error.
    ///
    /// Defaults to running whenever there is at least one reference.
    fn attempt(&self, references: &UniqueCollection<Reference>) -> bool {
        !references.is_empty()
    }

    /// The references this resolver should look at, in collection order.
    ///
    /// Defaults to every reference.
    fn filtered_references<'r>(
        &self,
        references: &'r UniqueCollection<Reference>,
    ) -> Vec<&'r Reference> {
        references.iter().collect()
    }

    /// Resolves one batch by attaching candidates to its members.
    ///
    /// Members must be updated through [`UniqueCollection::modify`]; adding or
    /// removing members is rejected when the batch is written back.
    ///
    /// # Errors
    ///
    /// Any error aborts the run and is returned to the caller.
    fn resolve_references(
        &self,
        batch: &mut UniqueCollection<Reference>,
    ) -> Result<(), ResolveError>;
}

/// A runnable resolution strategy.
pub trait UriResolver {
    /// Resolver name used in logs and outcomes.
    fn name(&self) -> &str;

    /// Runs the strategy over `references`, attaching candidates in place.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, backend or collection error.
    fn resolve(
        &self,
        references: &mut UniqueCollection<Reference>,
    ) -> Result<ResolveOutcome, ResolveError>;
}

/// What one strategy run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// Resolver name.
    pub resolver: String,
    /// False when the eligibility gate declined the run.
    pub attempted: bool,
    /// References that passed the filter.
    pub examined: usize,
    /// Batches delegated (grouped strategies only).
    pub batches: usize,
    /// Candidate URIs attached.
    pub attached: usize,
}

impl ResolveOutcome {
    /// Outcome of a run declined by the eligibility gate.
    #[must_use]
    pub fn skipped(resolver: &str) -> Self {
        Self {
            resolver: resolver.to_string(),
            attempted: false,
            examined: 0,
            batches: 0,
            attached: 0,
        }
    }
}

/// Positions of `filtered` members within `references`, preserving order.
fn positions_of(references: &UniqueCollection<Reference>, filtered: &[&Reference]) -> Vec<usize> {
    filtered
        .iter()
        .filter_map(|reference| references.position(reference))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_outcome() {
        let outcome = ResolveOutcome::skipped("doi");
        assert_eq!(outcome.resolver, "doi");
        assert!(!outcome.attempted);
        assert_eq!(outcome.attached, 0);
    }

    #[test]
    fn test_positions_follow_filter_order() {
        let mut references = UniqueCollection::new();
        references.push(Reference::new("a")).unwrap();
        references.push(Reference::new("b")).unwrap();
        references.push(Reference::new("c")).unwrap();
        let filtered: Vec<&Reference> = references.iter().filter(|r| r.id != "b").collect();
        assert_eq!(positions_of(&references, &filtered), vec![0, 2]);
    }
}
