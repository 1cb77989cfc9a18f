use serde::{Deserialize, Serialize};

use crate::config::DisplayConfig;
use crate::folder_state::FolderStateStore;
use crate::tree::{Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Group,
    Item,
}

/// One row of the render model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRow {
    pub depth: usize,
    pub kind: RowKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RenderRow {
    pub fn is_group(&self) -> bool {
        self.kind == RowKind::Group
    }
}

/// Flatten the forest in pre-order. Top-level nodes have depth 0.
pub fn render_model(forest: &[Node]) -> Vec<RenderRow> {
    let mut rows = Vec::new();
    for node in forest {
        collect_rows(node, 0, &mut rows);
    }
    rows
}

fn collect_rows(node: &Node, depth: usize, rows: &mut Vec<RenderRow>) {
    match &node.kind {
        NodeKind::Item { url } => rows.push(RenderRow {
            depth,
            kind: RowKind::Item,
            title: node.title.clone(),
            url: Some(url.clone()),
        }),
        NodeKind::Group { children } => {
            rows.push(RenderRow {
                depth,
                kind: RowKind::Group,
                title: node.title.clone(),
                url: None,
            });
            for child in children {
                collect_rows(child, depth + 1, rows);
            }
        }
    }
}

/// Resolve a row index of `render_model(forest)` back to its node.
pub fn node_at_row(forest: &[Node], row: usize) -> Option<&Node> {
    let mut remaining = row;
    find_at_row(forest, &mut remaining)
}

fn find_at_row<'a>(nodes: &'a [Node], remaining: &mut usize) -> Option<&'a Node> {
    for node in nodes {
        if *remaining == 0 {
            return Some(node);
        }
        *remaining -= 1;
        if let Some(children) = node.children() {
            if let Some(found) = find_at_row(children, remaining) {
                return Some(found);
            }
        }
    }
    None
}

/// Truncate to `max` characters, replacing the tail with `...`.
pub fn shorten(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut shortened: String = title.chars().take(keep).collect();
    shortened.push_str("...");
    shortened
}

/// Plain-text presenter: one line per visible row, indented by depth.
///
/// Each group line carries its row number so it can be addressed by
/// `toggle:<row>` and `open_all:<row>`.
pub fn render_text(rows: &[RenderRow], folders: &FolderStateStore, display: &DisplayConfig) -> String {
    let mut out = String::new();
    for index in folders.visible_rows(rows) {
        let row = &rows[index];
        let indent = "  ".repeat(row.depth);
        match row.kind {
            RowKind::Group => {
                let marker = if folders.is_collapsed(index) { '+' } else { '-' };
                out.push_str(&format!(
                    "{}{} {} [{}]\n",
                    indent,
                    marker,
                    shorten(&row.title, display.group_title_max),
                    index
                ));
            }
            RowKind::Item => {
                out.push_str(&format!(
                    "{}  {} <{}>\n",
                    indent,
                    shorten(&row.title, display.item_title_max),
                    row.url.as_deref().unwrap_or_default()
                ));
            }
        }
    }
    out
}

/// Plain-text flat list of links, used for search results without folders.
pub fn render_list(items: &[&Node], display: &DisplayConfig) -> String {
    items
        .iter()
        .map(|node| {
            format!(
                "{} <{}>\n",
                shorten(&node.title, display.list_title_max),
                node.url().unwrap_or_default()
            )
        })
        .collect()
}
