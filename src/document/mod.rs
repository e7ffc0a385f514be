//! Document-order text utilities over a parsed markup tree.
//!
//! The document parser locates references and citation markers; this module
//! supplies the positional backbone it works from.
//!
//! # Architecture
//!
//! - [`Document`] - immutable arena tree; [`NodeId`] order is document order
//! - [`text`], [`spaced_text`], [`text_before`], [`text_after`], [`text_between`] - span text
//! - [`depth_traverse`], [`breadth_traverse`], [`nearest`] - walks and ancestor lookup
//! - [`WordCounter`] - forward-only word offsets inside a container
//!
//! # Example
//!
//! ```
//! use citelink_core::document::{Document, text_before};
//!
//! let doc = Document::parse("<body> <a>A</a> <b>B</b> <c> C </c> </body>")?;
//! let body = doc.first_element("body").unwrap();
//! let c = doc.first_element("c").unwrap();
//! assert_eq!(text_before(&doc, body, c).as_deref(), Some("A B "));
//! # Ok::<(), citelink_core::document::DocumentError>(())
//! ```

mod error;
mod text;
mod traverse;
mod tree;
mod word_counter;

pub use error::{DocumentError, PositionError, TextError};
pub use text::{spaced_text, text, text_after, text_before, text_between};
pub use traverse::{breadth_traverse, depth_traverse, nearest};
pub use tree::{Document, NodeId, NodeKind};
pub use word_counter::WordCounter;
