//! The citing paper: owner of the author, affiliation and reference collections.

use serde::Serialize;

use super::author::{Affiliation, Author};
use super::collection::UniqueCollection;
use super::reference::Reference;

/// A citing paper and everything extracted from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paper {
    /// Canonical URI of the paper, when known.
    pub uri: Option<String>,
    /// DOI of the paper.
    pub doi: Option<String>,
    /// Article title.
    pub title: Option<String>,
    /// Authors in byline order.
    pub authors: UniqueCollection<Author>,
    /// Affiliations in document order.
    pub affiliations: UniqueCollection<Affiliation>,
    /// References in reference-list order.
    pub references: UniqueCollection<Reference>,
}

impl Paper {
    /// Creates an empty paper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty paper identified by `doi`.
    #[must_use]
    pub fn with_doi(doi: impl Into<String>) -> Self {
        let doi = doi.into();
        Self {
            uri: Some(format!("https://doi.org/{doi}")),
            doi: Some(doi),
            ..Self::default()
        }
    }

    /// Number of references with at least one candidate URI.
    #[must_use]
    pub fn resolved_reference_count(&self) -> usize {
        self.references
            .iter()
            .filter(|reference| reference.has_candidates())
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_paper_collections_start_empty() {
        let paper = Paper::new();
        assert!(paper.authors.is_empty());
        assert!(paper.affiliations.is_empty());
        assert!(paper.references.is_empty());
    }

    #[test]
    fn test_with_doi_sets_uri() {
        let paper = Paper::with_doi("10.1371/journal.pone.0032408");
        assert_eq!(
            paper.uri.as_deref(),
            Some("https://doi.org/10.1371/journal.pone.0032408")
        );
    }

    #[test]
    fn test_resolved_reference_count() {
        let mut paper = Paper::new();
        paper.references.push(Reference::new("r1")).unwrap();
        let mut resolved = Reference::new("r2");
        resolved
            .add_candidate_uri("https://doi.org/10.1/x", "doi")
            .unwrap();
        paper.references.push(resolved).unwrap();
        assert_eq!(paper.resolved_reference_count(), 1);
    }
}
