use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tree::Node;

/// A bookmark node as the platform reports it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawBookmarkNode>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDevice {
    pub device_name: String,
    #[serde(default)]
    pub windows: Vec<RawWindow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWindow {
    #[serde(default)]
    pub tabs: Vec<RawTab>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTab {
    #[serde(default)]
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    /// Milliseconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit_time: Option<i64>,
}

/// History search request; `start_time` is milliseconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub text: String,
    pub start_time: i64,
    pub max_results: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkSource: Send + Sync {
    /// Read-only snapshot of the bookmark tree, starting at the platform roots.
    async fn get_tree(&self) -> Result<Vec<RawBookmarkNode>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceTabSource: Send + Sync {
    async fn get_devices(&self) -> Result<Vec<RawDevice>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn search(&self, query: HistoryQuery) -> Result<Vec<RawHistoryEntry>>;
}

/// Normalize the platform bookmark tree into the bookmark region.
///
/// The platform returns untitled root containers; their children (e.g. the
/// bookmarks bar and other bookmarks) become the top-level groups. A root that
/// is itself a link is kept as-is.
pub fn normalize_bookmarks(roots: &[RawBookmarkNode]) -> Vec<Node> {
    let mut region = Vec::new();
    for root in roots {
        match &root.children {
            Some(children) => region.extend(children.iter().map(normalize_bookmark_node)),
            None => region.push(normalize_bookmark_node(root)),
        }
    }
    log::debug!("Normalized {} bookmark roots into {} top-level nodes", roots.len(), region.len());
    region
}

/// Convert one raw bookmark node, repairing nodes that are neither a clean
/// link nor a clean folder. `children` wins over `url`; a node with neither
/// becomes an empty folder.
pub fn normalize_bookmark_node(raw: &RawBookmarkNode) -> Node {
    match (&raw.url, &raw.children) {
        (url, Some(children)) => {
            if url.is_some() {
                log::debug!("Bookmark {} has both url and children, treating as folder", raw.id);
            }
            let children = children.iter().map(normalize_bookmark_node).collect();
            Node::group(raw.id.clone(), raw.title.clone(), children)
        }
        (Some(url), None) => Node::item(raw.id.clone(), raw.title.clone(), url.clone()),
        (None, None) => {
            log::debug!("Bookmark {} has neither url nor children, treating as empty folder", raw.id);
            Node::group(raw.id.clone(), raw.title.clone(), Vec::new())
        }
    }
}

/// One group per device holding the tabs of its first window only.
///
/// Any further windows of a device are intentionally ignored.
pub fn normalize_device_tabs(devices: &[RawDevice]) -> Vec<Node> {
    devices
        .iter()
        .map(|device| {
            let group_id = format!("device:{}", device.device_name);
            let children = device
                .windows
                .first()
                .map(|window| {
                    window
                        .tabs
                        .iter()
                        .enumerate()
                        .map(|(index, tab)| {
                            Node::item(format!("{}:{}", group_id, index), tab.title.clone(), tab.url.clone())
                        })
                        .collect()
                })
                .unwrap_or_default();

            if device.windows.len() > 1 {
                log::debug!(
                    "Device {:?}: keeping first of {} windows",
                    device.device_name,
                    device.windows.len()
                );
            }

            Node::group(group_id, device.device_name.clone(), children)
        })
        .collect()
}

/// Wrap the already-bounded history entries in a single synthetic group.
pub fn normalize_history(entries: &[RawHistoryEntry], title: &str) -> Node {
    let children = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let id = entry.id.clone().unwrap_or_else(|| format!("history:{}", index));
            Node::item(id, entry.title.clone().unwrap_or_default(), entry.url.clone())
        })
        .collect();
    Node::group("history", title, children)
}
