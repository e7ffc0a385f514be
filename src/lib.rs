//! Citelink Core Library
//!
//! Building blocks for extracting citations from scholarly documents and
//! linking each reference to candidate URIs for the work it cites.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`model`] - Papers, references and authors kept in unique, insertion-ordered collections
//! - [`document`] - Parsed markup tree with document-order text and word-position utilities
//! - [`resolver`] - Individual and grouped resolution strategies, pipeline, embedded-id resolver
//! - [`config`] - TOML configuration for the resolver pipeline

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod document;
pub mod model;
pub mod resolver;

// Re-export commonly used types
pub use config::{CitelinkConfig, LoadedConfig, load_config, load_default_config};
pub use document::{Document, DocumentError, NodeId, PositionError, WordCounter};
pub use model::{CandidateUri, CollectionError, Entity, Paper, Reference, UniqueCollection};
pub use resolver::{
    BatchReferenceResolver, Grouped, Individual, ReferenceResolver, ResolveError, ResolveOutcome,
    ResolverPipeline, UriResolver, build_default_pipeline,
};
