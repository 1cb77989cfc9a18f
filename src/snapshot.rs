use chrono::{DateTime, Utc};

use crate::source::{
    normalize_bookmarks, normalize_device_tabs, normalize_history, RawBookmarkNode, RawDevice,
    RawHistoryEntry,
};
use crate::sort::sort_owned;
use crate::tree::{forest_stats, Forest, ForestStats};

/// The canonical, sorted forest from one fetch. Owned by the caller and
/// shared read-only by every render derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub forest: Forest,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Normalize and sort the raw source data into the canonical forest.
    ///
    /// Each region is sorted on its own and the regions are concatenated in
    /// a fixed order: bookmarks, devices, history.
    pub fn assemble(
        bookmarks: &[RawBookmarkNode],
        devices: &[RawDevice],
        history: &[RawHistoryEntry],
        history_title: &str,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let mut forest = sort_owned(normalize_bookmarks(bookmarks));
        forest.extend(sort_owned(normalize_device_tabs(devices)));
        forest.extend(sort_owned(vec![normalize_history(history, history_title)]));

        let snapshot = Self { forest, fetched_at };
        let stats = snapshot.stats();
        log::debug!(
            "Snapshot assembled: {} nodes, {} groups ({} empty), {} items, depth {}",
            stats.total_nodes,
            stats.groups,
            stats.empty_groups,
            stats.items,
            stats.max_depth
        );
        snapshot
    }

    pub fn stats(&self) -> ForestStats {
        forest_stats(&self.forest)
    }
}
