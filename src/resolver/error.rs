//! Error types for resolution strategies.
//!
//! Structured errors following the What/Why/Fix pattern used across the crate.

use thiserror::Error;

use crate::model::CollectionError;

/// Errors that can occur while running a resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The resolver is misconfigured and cannot run at all.
    #[error("resolver '{resolver}' is misconfigured: {reason}\n  Suggestion: {suggestion}")]
    Configuration {
        /// The resolver that failed its configuration check
        resolver: String,
        /// What is wrong with the configuration
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// A concrete resolver failed to resolve a batch or reference.
    #[error("resolution failed in '{resolver}': {reason}\n  Suggestion: Check the resolver backend and try again")]
    ResolutionFailed {
        /// The resolver reporting the failure
        resolver: String,
        /// Why resolution failed
        reason: String,
    },

    /// Attaching a candidate or writing back a batch broke a collection contract.
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

impl ResolveError {
    /// Creates a `Configuration` error for a grouped resolver without a usable group size.
    #[must_use]
    pub fn missing_group_size(resolver: &str) -> Self {
        Self::Configuration {
            resolver: resolver.to_string(),
            reason: "GROUP_SIZE must be a positive number of references".to_string(),
            suggestion: "Declare `const GROUP_SIZE` greater than zero on the resolver".to_string(),
        }
    }

    /// Creates a `ResolutionFailed` error.
    #[must_use]
    pub fn resolution_failed(resolver: &str, reason: &str) -> Self {
        Self::ResolutionFailed {
            resolver: resolver.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_group_size_message() {
        let err = ResolveError::missing_group_size("crossref");
        let msg = err.to_string();
        assert!(msg.contains("crossref"), "should contain resolver");
        assert!(msg.contains("GROUP_SIZE"), "should mention group size");
        assert!(msg.contains("Suggestion"), "should have suggestion");
    }

    #[test]
    fn test_resolution_failed_message() {
        let err = ResolveError::resolution_failed("pubmed", "batch rejected");
        let msg = err.to_string();
        assert!(msg.contains("pubmed"));
        assert!(msg.contains("batch rejected"));
    }

    #[test]
    fn test_collection_error_converts() {
        let err: ResolveError = CollectionError::duplicate("CandidateUri", &"x").into();
        assert!(matches!(err, ResolveError::Collection(_)));
        assert!(err.to_string().contains("duplicate"));
    }
}
