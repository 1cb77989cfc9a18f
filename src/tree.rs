use serde::{Deserialize, Serialize};

/// An ordered collection of top-level nodes spanning all sources.
pub type Forest = Vec<Node>;

/// A single node in the aggregated tree: either a link or a folder of nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// `Group` is listed first so a JSON object carrying both `children` and `url`
/// reads as a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKind {
    Group { children: Vec<Node> },
    Item { url: String },
}

impl Node {
    /// Create a new link node
    pub fn item(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: NodeKind::Item { url: url.into() },
        }
    }

    /// Create a new folder node
    pub fn group(id: impl Into<String>, title: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: NodeKind::Group { children },
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn is_item(&self) -> bool {
        matches!(self.kind, NodeKind::Item { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Item { url } => Some(url),
            NodeKind::Group { .. } => None,
        }
    }

    /// Children of a group; `None` for items.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Group { children } => Some(children),
            NodeKind::Item { .. } => None,
        }
    }

    /// Number of items anywhere below (or at) this node
    pub fn item_count(&self) -> usize {
        match &self.kind {
            NodeKind::Item { .. } => 1,
            NodeKind::Group { children } => children.iter().map(Node::item_count).sum(),
        }
    }
}

/// Statistics about a forest
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ForestStats {
    pub total_nodes: usize,
    pub items: usize,
    pub groups: usize,
    pub empty_groups: usize,
    pub max_depth: usize,
}

pub fn forest_stats(forest: &[Node]) -> ForestStats {
    let mut stats = ForestStats::default();
    for node in forest {
        collect_stats(node, 0, &mut stats);
    }
    stats
}

fn collect_stats(node: &Node, depth: usize, stats: &mut ForestStats) {
    stats.total_nodes += 1;
    stats.max_depth = stats.max_depth.max(depth);

    match &node.kind {
        NodeKind::Item { .. } => stats.items += 1,
        NodeKind::Group { children } => {
            stats.groups += 1;
            if children.is_empty() {
                stats.empty_groups += 1;
            }
            for child in children {
                collect_stats(child, depth + 1, stats);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_forest() -> Forest {
        vec![
            Node::group(
                "1",
                "Bookmarks bar",
                vec![
                    Node::item("2", "Rust", "https://www.rust-lang.org"),
                    Node::group(
                        "3",
                        "Docs",
                        vec![Node::item("4", "std", "https://doc.rust-lang.org/std")],
                    ),
                ],
            ),
            Node::group("history", "History", vec![]),
        ]
    }

    #[test]
    fn test_node_creation() {
        let item = Node::item("7", "Rust", "https://www.rust-lang.org");
        assert!(item.is_item());
        assert!(!item.is_group());
        assert_eq!(item.url(), Some("https://www.rust-lang.org"));
        assert!(item.children().is_none());

        let group = Node::group("8", "Folder", vec![]);
        assert!(group.is_group());
        assert_eq!(group.url(), None);
        assert_eq!(group.children().map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_item_count() {
        let forest = sample_forest();
        assert_eq!(forest[0].item_count(), 2);
        assert_eq!(forest[1].item_count(), 0);
    }

    #[test]
    fn test_forest_stats() {
        let stats = forest_stats(&sample_forest());
        assert_eq!(stats.total_nodes, 5);
        assert_eq!(stats.items, 2);
        assert_eq!(stats.groups, 3);
        assert_eq!(stats.empty_groups, 1);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_json_shape() {
        let node = Node::group("1", "Folder", vec![Node::item("2", "Link", "http://a")]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1",
                "title": "Folder",
                "children": [{ "id": "2", "title": "Link", "url": "http://a" }]
            })
        );

        let parsed: Node = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_json_with_both_fields_reads_as_group() {
        let parsed: Node = serde_json::from_str(
            r#"{ "id": "9", "title": "Odd", "url": "http://odd", "children": [] }"#,
        )
        .unwrap();
        assert!(parsed.is_group());
    }
}
