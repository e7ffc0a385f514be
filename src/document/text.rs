//! Text extraction over document spans.

use tracing::trace;

use super::error::TextError;
use super::tree::{Document, NodeId};

/// Text of each node, trimmed, joined with newlines.
#[must_use]
pub fn text(doc: &Document, nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(|node| doc.text_content(*node).trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of the nodes with element boundaries treated as spaces and all
/// whitespace runs collapsed to one space.
#[must_use]
pub fn spaced_text(doc: &Document, nodes: &[NodeId]) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in nodes {
        for id in doc.subtree(*node) {
            if let Some(text) = doc.own_text(id) {
                words.extend(text.split_whitespace());
            }
        }
    }
    words.join(" ")
}

/// Text inside `container` that precedes `target`, with leading whitespace removed.
///
/// Returns `None` if `target` is not inside `container`.
#[must_use]
pub fn text_before(doc: &Document, container: NodeId, target: NodeId) -> Option<String> {
    if !doc.is_descendant_of(target, container) {
        trace!(%container, %target, "text_before target outside container");
        return None;
    }
    let before: String = doc
        .descendants(container)
        .take_while(|id| *id < target)
        .filter_map(|id| doc.own_text(id))
        .collect();
    Some(before.trim_start().to_string())
}

/// Text inside `container` that follows `target` (excluding the text of
/// `target` itself), with trailing whitespace removed.
///
/// Returns `None` if `target` is not inside `container`.
#[must_use]
pub fn text_after(doc: &Document, container: NodeId, target: NodeId) -> Option<String> {
    if !doc.is_descendant_of(target, container) {
        trace!(%container, %target, "text_after target outside container");
        return None;
    }
    let end_of_target = doc.last_descendant(target);
    let after: String = doc
        .descendants(container)
        .filter(|id| *id > end_of_target)
        .filter_map(|id| doc.own_text(id))
        .collect();
    Some(after.trim_end().to_string())
}

/// Text of the sibling run from `first` through `last`, inclusive.
///
/// - `first == None`, or a `first` from another document, yields `Ok(None)`.
/// - `last == None`, or a `last` that precedes `first`, runs to the end of the parent.
///
/// # Errors
///
/// Returns [`TextError::SpanMismatch`] if `first` and `last` have different parents.
pub fn text_between(
    doc: &Document,
    first: Option<NodeId>,
    last: Option<NodeId>,
) -> Result<Option<String>, TextError> {
    let Some(first) = first.filter(|first| doc.contains(*first)) else {
        return Ok(None);
    };
    let parent = doc.parent(first);
    if let Some(last) = last {
        if doc.parent(last) != parent {
            return Err(TextError::SpanMismatch { first, last });
        }
    }
    let Some(parent) = parent else {
        // The root has no siblings.
        return Ok(Some(doc.text_content(first)));
    };

    let siblings = doc.children(parent);
    let start = siblings.iter().position(|id| *id == first).unwrap_or(0);
    let end = last
        .and_then(|last| siblings.iter().position(|id| *id == last))
        .filter(|end| *end >= start)
        .unwrap_or(siblings.len() - 1);

    let between = siblings[start..=end]
        .iter()
        .map(|id| doc.text_content(*id))
        .collect();
    Ok(Some(between))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn span_doc() -> Document {
        Document::parse(
            "<root>\n  one\n  <before />\n  before\n  <body><a>A</a> <b>B</b> <c>C</c> <d>D</d> <e>E</e></body>\n  after\n  <after />\n  ninety-nine\n</root>",
        )
        .unwrap()
    }

    fn el(doc: &Document, name: &str) -> NodeId {
        doc.first_element(name).unwrap()
    }

    #[test]
    fn test_text_trims_and_joins() {
        let doc = Document::parse("<root>\nsomething\n<body>\n<a>text</a>\nmore\n</body>\nelse\n</root>")
            .unwrap();
        assert_eq!(text(&doc, &[el(&doc, "body")]), "text\nmore");
    }

    #[test]
    fn test_text_joins_multiple_nodes() {
        let doc = Document::parse("<r><a> x </a><a>y</a></r>").unwrap();
        assert_eq!(text(&doc, &doc.elements_named("a")), "x\ny");
    }

    #[test]
    fn test_spaced_text_separates_elements() {
        let doc = Document::parse("<root><node><first>First</first><last>Last</last></node></root>")
            .unwrap();
        assert_eq!(spaced_text(&doc, &[el(&doc, "node")]), "First Last");
    }

    #[test]
    fn test_spaced_text_normalizes_whitespace() {
        let doc =
            Document::parse("<root><node> <a>A</a>\n<a> B \n</a><a>C</a>\t<a>D</a>\n\t </node></root>")
                .unwrap();
        assert_eq!(spaced_text(&doc, &[el(&doc, "node")]), "A B C D");
    }

    #[test]
    fn test_text_between_first_missing() {
        let doc = span_doc();
        assert_eq!(text_between(&doc, None, Some(el(&doc, "b"))).unwrap(), None);
    }

    #[test]
    fn test_nodes_from_other_document_are_not_found() {
        let doc = span_doc();
        let tiny = Document::parse("<p>x</p>").unwrap();
        let foreign = el(&doc, "e");
        let p = el(&tiny, "p");

        assert_eq!(text_before(&tiny, p, foreign), None);
        assert_eq!(text_after(&tiny, p, foreign), None);
        assert_eq!(text_between(&tiny, Some(foreign), None).unwrap(), None);
        assert!(text_between(&tiny, Some(p), Some(foreign)).is_err());
    }

    #[test]
    fn test_text_between_same_node() {
        let doc = span_doc();
        let b = el(&doc, "b");
        assert_eq!(text_between(&doc, Some(b), Some(b)).unwrap().unwrap(), "B");
    }

    #[test]
    fn test_text_between_edges_of_parent() {
        let doc = span_doc();
        assert_eq!(
            text_between(&doc, Some(el(&doc, "a")), Some(el(&doc, "c")))
                .unwrap()
                .unwrap(),
            "A B C"
        );
        assert_eq!(
            text_between(&doc, Some(el(&doc, "c")), Some(el(&doc, "e")))
                .unwrap()
                .unwrap(),
            "C D E"
        );
    }

    #[test]
    fn test_text_between_open_end() {
        let doc = span_doc();
        assert_eq!(
            text_between(&doc, Some(el(&doc, "c")), None).unwrap().unwrap(),
            "C D E"
        );
    }

    #[test]
    fn test_text_between_root_alone() {
        let doc = Document::parse("<r>x</r>").unwrap();
        assert_eq!(
            text_between(&doc, Some(doc.root()), None).unwrap().unwrap(),
            "x"
        );
    }
}
