use regex::{Regex, RegexBuilder};

use crate::tree::{Node, NodeKind};

/// Case-insensitive literal substring matcher for link titles
#[derive(Debug, Clone)]
pub enum TitleMatcher {
    Pattern(Regex),
    Literal(String),
}

impl TitleMatcher {
    /// Build a matcher for `query`. Every regex metacharacter is escaped
    /// before compilation, so user input is never read as a pattern.
    pub fn new(query: &str) -> Self {
        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => TitleMatcher::Pattern(regex),
            Err(e) => {
                // Only reachable through compile limits on very long queries.
                log::warn!("Falling back to literal title matching: {}", e);
                TitleMatcher::Literal(query.to_lowercase())
            }
        }
    }

    pub fn is_match(&self, title: &str) -> bool {
        match self {
            TitleMatcher::Pattern(regex) => regex.is_match(title),
            TitleMatcher::Literal(needle) => title.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Filter the forest down to matching links and their ancestor folders.
///
/// An empty query returns the forest unchanged.
pub fn filter_forest(forest: &[Node], query: &str) -> Vec<Node> {
    if query.is_empty() {
        return forest.to_vec();
    }

    let start = std::time::Instant::now();
    let matcher = TitleMatcher::new(query);
    let filtered: Vec<Node> = forest
        .iter()
        .filter_map(|node| filter_node(node, &matcher))
        .collect();

    log::debug!(
        "Filter {:?}: kept {} of {} top-level nodes in {:?}",
        query,
        filtered.len(),
        forest.len(),
        start.elapsed()
    );
    filtered
}

fn filter_node(node: &Node, matcher: &TitleMatcher) -> Option<Node> {
    match &node.kind {
        NodeKind::Item { .. } => matcher.is_match(&node.title).then(|| node.clone()),
        NodeKind::Group { children } => {
            let kept: Vec<Node> = children
                .iter()
                .filter_map(|child| filter_node(child, matcher))
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(Node::group(node.id.clone(), node.title.clone(), kept))
            }
        }
    }
}

/// All matching links in depth-first order, without their folders.
pub fn matching_items<'a>(forest: &'a [Node], query: &str) -> Vec<&'a Node> {
    let matcher = TitleMatcher::new(query);
    let mut results = Vec::new();
    collect_matches(forest, &matcher, &mut results);
    results
}

fn collect_matches<'a>(nodes: &'a [Node], matcher: &TitleMatcher, results: &mut Vec<&'a Node>) {
    for node in nodes {
        match &node.kind {
            NodeKind::Item { .. } => {
                if matcher.is_match(&node.title) {
                    results.push(node);
                }
            }
            NodeKind::Group { children } => collect_matches(children, matcher, results),
        }
    }
}
