//! Tree walks and ancestor lookup.

use super::tree::{Document, NodeId};

/// Visits every node under `root` (inclusive) in post-order: each node's
/// children, in order, before the node itself.
pub fn depth_traverse<F>(doc: &Document, root: NodeId, mut visit: F)
where
    F: FnMut(NodeId),
{
    let mut stack = vec![(root, false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            visit(node);
            continue;
        }
        stack.push((node, true));
        for child in doc.children(node).iter().rev() {
            stack.push((*child, false));
        }
    }
}

/// Visits every node under `root` (inclusive) top-down: each node before its
/// children, siblings left to right. This is document order.
pub fn breadth_traverse<F>(doc: &Document, root: NodeId, visit: F)
where
    F: FnMut(NodeId),
{
    doc.subtree(root).for_each(visit);
}

/// Closest strict ancestor of `node` whose tag name is one of `names`.
#[must_use]
pub fn nearest(doc: &Document, node: NodeId, names: &[&str]) -> Option<NodeId> {
    doc.ancestors(node)
        .find(|ancestor| {
            doc.name(*ancestor)
                .is_some_and(|name| names.iter().any(|candidate| *candidate == name))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TREE: &str = "<root>\n  <a/>\n  <b>\n    <c><d/></c>\n  </b>\n  <e/>\n</root>";

    fn element_names(doc: &Document, order: &[NodeId]) -> Vec<String> {
        order
            .iter()
            .filter_map(|id| doc.name(*id))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_depth_first_is_post_order() {
        let doc = Document::parse(TREE).unwrap();
        let mut seen = Vec::new();
        depth_traverse(&doc, doc.root(), |id| seen.push(id));
        assert_eq!(element_names(&doc, &seen), ["a", "d", "c", "b", "e", "root"]);
        assert_eq!(seen.last(), Some(&doc.root()), "document node visited last");
    }

    #[test]
    fn test_breadth_first_from_root() {
        let doc = Document::parse(TREE).unwrap();
        let mut seen = Vec::new();
        breadth_traverse(&doc, doc.root(), |id| seen.push(id));
        assert_eq!(element_names(&doc, &seen), ["root", "a", "b", "c", "d", "e"]);
        assert_eq!(seen.first(), Some(&doc.root()), "document node visited first");
    }

    #[test]
    fn test_breadth_first_from_sub_node() {
        let doc = Document::parse(TREE).unwrap();
        let mut seen = Vec::new();
        breadth_traverse(&doc, doc.first_element("b").unwrap(), |id| seen.push(id));
        assert_eq!(element_names(&doc, &seen), ["b", "c", "d"]);
    }

    #[test]
    fn test_nearest_finds_closest_ancestor() {
        let doc = Document::parse(TREE).unwrap();
        let d = doc.first_element("d").unwrap();
        let b = doc.first_element("b").unwrap();
        assert_eq!(nearest(&doc, d, &["b", "root"]), Some(b));
    }

    #[test]
    fn test_nearest_none() {
        let doc = Document::parse(TREE).unwrap();
        let d = doc.first_element("d").unwrap();
        assert_eq!(nearest(&doc, d, &["x-b", "x-root"]), None);
    }

    #[test]
    fn test_nearest_skips_self() {
        let doc = Document::parse(TREE).unwrap();
        let c = doc.first_element("c").unwrap();
        assert_eq!(nearest(&doc, c, &["c"]), None);
    }
}
