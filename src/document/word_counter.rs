//! Forward-only word positions inside one container node.

use tracing::trace;

use super::error::PositionError;
use super::tree::{Document, NodeId};

/// Counts words (maximal runs of non-whitespace) in document order inside a
/// container, one forward pass for any number of position queries.
///
/// Each [`WordCounter::count_to`] target must come strictly after the previous
/// one. [`WordCounter::count_to_end`] finishes the pass; no further targets are
/// accepted afterwards.
///
/// # Example
///
/// ```
/// use citelink_core::document::{Document, WordCounter};
///
/// let doc = Document::parse("<p>one two <x/> three <y/> four</p>")?;
/// let mut counter = WordCounter::new(&doc, doc.first_element("p").unwrap());
/// assert_eq!(counter.count_to(doc.first_element("x").unwrap())?, 2);
/// assert_eq!(counter.count_to(doc.first_element("y").unwrap())?, 3);
/// assert_eq!(counter.count_to_end(), 4);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct WordCounter<'d> {
    doc: &'d Document,
    container: NodeId,
    next: usize,
    words: usize,
    in_word: bool,
    last_target: Option<NodeId>,
    exhausted: bool,
}

impl<'d> WordCounter<'d> {
    /// Binds a counter to `container`.
    #[must_use]
    pub fn new(doc: &'d Document, container: NodeId) -> Self {
        Self {
            doc,
            container,
            next: container.index() + 1,
            words: 0,
            in_word: false,
            last_target: None,
            exhausted: false,
        }
    }

    /// The node this counter is bound to.
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Number of words that start before `target` inside the container.
    ///
    /// # Errors
    ///
    /// - [`PositionError::Exhausted`] after [`WordCounter::count_to_end`]
    /// - [`PositionError::ContainerAncestor`] if `target` is the container or encloses it
    /// - [`PositionError::NotInContainer`] if `target` lies elsewhere
    /// - [`PositionError::OutOfOrder`] if `target` does not follow the previous target
    pub fn count_to(&mut self, target: NodeId) -> Result<usize, PositionError> {
        if self.exhausted {
            return Err(PositionError::Exhausted {
                container: self.container,
            });
        }
        if target == self.container || self.doc.is_descendant_of(self.container, target) {
            return Err(PositionError::ContainerAncestor {
                container: self.container,
                target,
            });
        }
        if !self.doc.is_descendant_of(target, self.container) {
            return Err(PositionError::NotInContainer {
                container: self.container,
                target,
            });
        }
        if let Some(previous) = self.last_target {
            if target <= previous {
                return Err(PositionError::OutOfOrder { previous, target });
            }
        }

        self.consume_until(target.index());
        self.last_target = Some(target);
        trace!(container = %self.container, %target, words = self.words, "counted to node");
        Ok(self.words)
    }

    /// Total words in the container. May be called repeatedly.
    pub fn count_to_end(&mut self) -> usize {
        if !self.exhausted {
            let end = self.doc.last_descendant(self.container).index() + 1;
            self.consume_until(end);
            self.exhausted = true;
        }
        self.words
    }

    fn consume_until(&mut self, stop: usize) {
        for index in self.next..stop {
            if let Some(text) = self.doc.own_text(NodeId(index)) {
                for ch in text.chars() {
                    let whitespace = ch.is_whitespace();
                    if !whitespace && !self.in_word {
                        self.words += 1;
                    }
                    self.in_word = !whitespace;
                }
            }
        }
        self.next = self.next.max(stop);
    }
}
