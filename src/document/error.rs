//! Error types for document parsing, text spans and word positions.

use thiserror::Error;

use super::NodeId;

/// Errors that can occur while building a [`Document`](super::Document).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The markup could not be read.
    #[error("malformed markup at byte {position}: {reason}\n  Suggestion: Check that the document is well-formed XML")]
    Malformed {
        /// Reader position when the error was detected.
        position: u64,
        /// Reader error message.
        reason: String,
    },

    /// The input ended with elements still open.
    #[error("unexpected end of document: <{name}> was never closed")]
    Unclosed {
        /// Name of the innermost open element.
        name: String,
    },
}

impl DocumentError {
    /// Creates a `Malformed` error.
    #[must_use]
    pub fn malformed(position: u64, reason: impl Into<String>) -> Self {
        Self::Malformed {
            position,
            reason: reason.into(),
        }
    }
}

/// Errors from text-span extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// `text_between` was given nodes with different parents.
    #[error("nodes {first} and {last} do not share a parent\n  Suggestion: Pass sibling nodes to text_between")]
    SpanMismatch {
        /// First node of the span.
        first: NodeId,
        /// Last node of the span.
        last: NodeId,
    },
}

/// Errors from the forward-only [`WordCounter`](super::WordCounter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The target is not inside the counted container.
    #[error("node {target} is not inside container {container}")]
    NotInContainer {
        /// Counted container.
        container: NodeId,
        /// Requested node.
        target: NodeId,
    },

    /// The target is the container itself or one of its ancestors.
    #[error("node {target} encloses container {container}")]
    ContainerAncestor {
        /// Counted container.
        container: NodeId,
        /// Requested node.
        target: NodeId,
    },

    /// The target does not come strictly after the previous target.
    #[error(
        "node {target} does not follow previously counted node {previous}\n  Suggestion: Count positions in document order, each node once"
    )]
    OutOfOrder {
        /// Previously counted node.
        previous: NodeId,
        /// Requested node.
        target: NodeId,
    },

    /// `count_to` after `count_to_end`.
    #[error("word counter for container {container} is exhausted")]
    Exhausted {
        /// Counted container.
        container: NodeId,
    },
}
