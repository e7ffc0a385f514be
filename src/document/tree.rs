//! Immutable arena tree built from XML markup.
//!
//! Nodes are allocated in document order, so comparing [`NodeId`]s compares
//! document positions and every subtree occupies a contiguous id range.

use std::fmt;
use std::ops::Range;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::error::DocumentError;

/// Handle to a node of one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in document order (the document root is 0).
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root above the top-level element.
    Document,
    /// An element with its attributes in source order.
    Element {
        /// Qualified tag name.
        name: String,
        /// `(name, unescaped value)` pairs.
        attributes: Vec<(String, String)>,
    },
    /// Character data, including whitespace-only runs.
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    last_descendant: NodeId,
}

/// A parsed document, shared read-only by the text utilities and word counters.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Parses XML markup into a tree.
    ///
    /// Comments, processing instructions and the doctype are dropped; CDATA
    /// sections become text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Malformed`] when the reader rejects the input and
    /// [`DocumentError::Unclosed`] when elements remain open at the end.
    ///
    /// # Example
    ///
    /// ```
    /// use citelink_core::document::Document;
    ///
    /// let doc = Document::parse("<body><p>Hello <b>world</b></p></body>")?;
    /// let p = doc.first_element("p").unwrap();
    /// assert_eq!(doc.text_content(p), "Hello world");
    /// # Ok::<(), citelink_core::document::DocumentError>(())
    /// ```
    #[tracing::instrument(skip(markup), fields(markup_len = markup.len()))]
    pub fn parse(markup: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(markup);
        let mut doc = Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                last_descendant: NodeId(0),
            }],
        };
        let mut open: Vec<NodeId> = vec![doc.root()];

        loop {
            let event = reader
                .read_event()
                .map_err(|e| DocumentError::malformed(reader_position(&reader), e.to_string()))?;
            let parent = open.last().copied().unwrap_or(NodeId(0));
            match event {
                Event::Start(start) => {
                    let kind = element_kind(&start, &reader)?;
                    let id = doc.append(parent, kind);
                    open.push(id);
                }
                Event::Empty(start) => {
                    let kind = element_kind(&start, &reader)?;
                    doc.append(parent, kind);
                }
                Event::End(_) => {
                    if open.len() > 1 {
                        if let Some(closed) = open.pop() {
                            doc.close(closed);
                        }
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| {
                        DocumentError::malformed(reader_position(&reader), e.to_string())
                    })?;
                    doc.append_text(parent, &text);
                }
                Event::CData(data) => {
                    let bytes = data.into_inner();
                    doc.append_text(parent, &String::from_utf8_lossy(&bytes));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if open.len() > 1 {
            let name = open
                .last()
                .and_then(|id| doc.name(*id))
                .unwrap_or_default()
                .to_string();
            return Err(DocumentError::Unclosed { name });
        }
        doc.close(doc.root());
        debug!(nodes = doc.nodes.len(), "document parsed");
        Ok(doc)
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            last_descendant: id,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        // A text last child is always the most recently allocated node of an open parent.
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return;
            }
        }
        self.append(parent, NodeKind::Text(text.to_string()));
    }

    fn close(&mut self, id: NodeId) {
        self.nodes[id.0].last_descendant = NodeId(self.nodes.len() - 1);
    }

    /// The document root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the document holds nothing but its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// The top-level element, if any.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|id| self.is_element(*id))
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    /// Returns true if `id` belongs to this document's id range.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// What `id` holds; `None` for an id from another document.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    /// Parent of `id`; `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true for element nodes.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element { .. }))
    }

    /// Returns true for text nodes.
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    /// Value of attribute `name` on an element.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Text held directly by a text node.
    #[must_use]
    pub fn own_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// `id` and all of its descendants, in document order.
    ///
    /// Empty for an id from another document.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + use<> {
        self.span(id, id.0).map(NodeId)
    }

    /// Strict descendants of `id`, in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + use<> {
        self.span(id, id.0 + 1).map(NodeId)
    }

    /// Last node (in document order) inside the subtree of `id`.
    ///
    /// An id from another document is returned unchanged.
    #[must_use]
    pub fn last_descendant(&self, id: NodeId) -> NodeId {
        self.node(id).map_or(id, |node| node.last_descendant)
    }

    // Foreign ids get an empty range.
    fn span(&self, id: NodeId, start: usize) -> Range<usize> {
        match self.node(id) {
            Some(node) => start..node.last_descendant.0 + 1,
            None => 0..0,
        }
    }

    /// Returns true if `node` lies strictly inside `ancestor`.
    ///
    /// Always false when either id belongs to another document.
    #[must_use]
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.contains(node)
            && self.contains(ancestor)
            && node > ancestor
            && node <= self.last_descendant(ancestor)
    }

    /// Ancestors of `id` from its parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |node| self.parent(*node))
    }

    /// Concatenated text of every text node in the subtree of `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.subtree(id)
            .filter_map(|node| self.own_text(node))
            .collect()
    }

    /// All elements named `name`, in document order.
    #[must_use]
    pub fn elements_named(&self, name: &str) -> Vec<NodeId> {
        self.subtree(self.root())
            .filter(|id| self.name(*id) == Some(name))
            .collect()
    }

    /// First element named `name` in document order.
    #[must_use]
    pub fn first_element(&self, name: &str) -> Option<NodeId> {
        self.find_element(self.root(), name)
    }

    /// First element named `name` inside the subtree of `scope`.
    #[must_use]
    pub fn find_element(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(scope)
            .find(|id| self.name(*id) == Some(name))
    }
}

fn reader_position(reader: &Reader<&[u8]>) -> u64 {
    u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX)
}

fn element_kind(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<NodeKind, DocumentError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|e| DocumentError::malformed(reader_position(reader), e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| DocumentError::malformed(reader_position(reader), e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(NodeKind::Element { name, attributes })
}
