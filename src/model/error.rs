//! Error types for entity construction and collection insertion.
//!
//! Messages follow the What/Why/Suggestion layout used across the crate.

use thiserror::Error;

/// Errors raised by [`UniqueCollection`](super::UniqueCollection) and entity constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// An attribute-equal member is already present.
    #[error(
        "duplicate {kind} rejected: {summary}\n  Suggestion: Check whether an earlier pass already recorded this {kind}"
    )]
    Duplicate {
        /// Entity kind held by the collection.
        kind: &'static str,
        /// Debug rendering of the rejected item.
        summary: String,
    },

    /// A value of the wrong type was supplied.
    #[error("type mismatch for {target}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The collection kind or `field` that received the value.
        target: String,
        /// What was expected.
        expected: String,
        /// What was supplied.
        found: String,
    },

    /// A named field that the entity does not declare.
    #[error("unknown field '{field}' for {kind}\n  Suggestion: Use one of the fields declared by {kind}")]
    UnknownField {
        /// Entity kind being constructed.
        kind: &'static str,
        /// The unrecognized field name.
        field: String,
    },

    /// More positional values than positional fields.
    #[error("{kind} accepts at most {expected} positional value(s), got {found}")]
    TooManyValues {
        /// Entity kind being constructed.
        kind: &'static str,
        /// Number of positional fields.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },

    /// A candidate URI that is not absolute.
    #[error("invalid candidate URI '{uri}': {reason}\n  Suggestion: Supply a fully-qualified URI with a scheme")]
    InvalidUri {
        /// The rejected URI.
        uri: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl CollectionError {
    /// Creates a `Duplicate` error for an item of `kind`.
    #[must_use]
    pub fn duplicate(kind: &'static str, item: &impl std::fmt::Debug) -> Self {
        Self::Duplicate {
            kind,
            summary: format!("{item:?}"),
        }
    }

    /// Creates a `TypeMismatch` for a whole instance offered to a collection.
    #[must_use]
    pub fn instance_mismatch(kind: &'static str, found: &str) -> Self {
        Self::TypeMismatch {
            target: format!("collection of {kind}"),
            expected: kind.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a `TypeMismatch` for a single field value.
    #[must_use]
    pub fn field_mismatch(field: &str, expected: &str, found: &str) -> Self {
        Self::TypeMismatch {
            target: format!("field '{field}'"),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an `UnknownField` error.
    #[must_use]
    pub fn unknown_field(kind: &'static str, field: &str) -> Self {
        Self::UnknownField {
            kind,
            field: field.to_string(),
        }
    }

    /// Creates an `InvalidUri` error.
    #[must_use]
    pub fn invalid_uri(uri: &str, reason: &str) -> Self {
        Self::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }
}
