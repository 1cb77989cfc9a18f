use std::cmp::Ordering;

use crate::tree::{Node, NodeKind};

/// Total order over sibling nodes
pub fn compare_nodes(a: &Node, b: &Node) -> Ordering {
    match (&a.kind, &b.kind) {
        (NodeKind::Group { .. }, NodeKind::Group { .. }) => a.title.cmp(&b.title),
        (NodeKind::Item { url: a_url }, NodeKind::Item { url: b_url }) => a_url.cmp(b_url),
        (NodeKind::Group { .. }, NodeKind::Item { .. }) => Ordering::Less,
        (NodeKind::Item { .. }, NodeKind::Group { .. }) => Ordering::Greater,
    }
}

/// Sort a sequence of nodes, returning the ordered copy.
pub fn sort_nodes(nodes: &[Node]) -> Vec<Node> {
    sort_owned(nodes.to_vec())
}

/// Sort owned nodes: order this level first, then descend into each group.
pub fn sort_owned(mut nodes: Vec<Node>) -> Vec<Node> {
    nodes.sort_by(compare_nodes);
    nodes
        .into_iter()
        .map(|node| match node.kind {
            NodeKind::Group { children } => Node {
                kind: NodeKind::Group {
                    children: sort_owned(children),
                },
                ..node
            },
            NodeKind::Item { .. } => node,
        })
        .collect()
}

/// Check whether every level of `nodes` is already in canonical order
pub fn is_sorted(nodes: &[Node]) -> bool {
    let level_sorted = nodes
        .windows(2)
        .all(|pair| compare_nodes(&pair[0], &pair[1]) != Ordering::Greater);
    level_sorted
        && nodes
            .iter()
            .all(|node| node.children().map(is_sorted).unwrap_or(true))
}
