//! Structured entities and the unique, insertion-ordered collection that stores them.
//!
//! # Architecture
//!
//! - [`Entity`] - value-semantics contract with a static accessor table
//! - [`UniqueCollection`] - ordered store rejecting attribute-equal duplicates
//! - [`Construct`] - explicit construction request resolved by [`UniqueCollection::add`]
//! - [`Paper`], [`Reference`], [`CandidateUri`], [`Author`], [`Affiliation`] - the entities
//!
//! # Example
//!
//! ```
//! use citelink_core::model::{FieldValue, Reference, UniqueCollection};
//!
//! let mut references = UniqueCollection::new();
//! references.push(Reference::new("r1").with_text("Smith J (2001) Title."))?;
//! assert!(references.push(Reference::new("r1").with_text("Smith J (2001) Title.")).is_err());
//!
//! let found = references.find_by(&[("id", FieldValue::from("r1"))]);
//! assert!(found.is_some());
//! # Ok::<(), citelink_core::model::CollectionError>(())
//! ```

mod author;
mod collection;
mod entity;
mod error;
mod paper;
mod reference;
mod value;

pub use author::{Affiliation, Author};
pub use collection::{Construct, UniqueCollection};
pub use entity::{Accessor, Entity};
pub use error::CollectionError;
pub use paper::Paper;
pub use reference::{CandidateUri, Reference};
pub use value::{FieldMap, FieldValue, fields};
