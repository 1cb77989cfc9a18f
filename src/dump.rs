use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::async_task::Sources;
use crate::error::{AtlasError, Result};
use crate::source::{
    BookmarkSource, DeviceTabSource, HistoryQuery, HistorySource, RawBookmarkNode, RawDevice,
    RawHistoryEntry,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformDump {
    pub bookmarks: Vec<RawBookmarkNode>,
    pub devices: Vec<RawDevice>,
    pub history: Vec<RawHistoryEntry>,
    pub failing: Vec<String>,
}

impl PlatformDump {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let dump: PlatformDump = serde_json::from_str(&content)?;
        log::debug!(
            "Loaded dump {:?}: {} bookmark roots, {} devices, {} history entries",
            path.as_ref(),
            dump.bookmarks.len(),
            dump.devices.len(),
            dump.history.len()
        );
        Ok(dump)
    }

    fn is_failing(&self, source_name: &str) -> bool {
        self.failing.iter().any(|name| name == source_name)
    }

    /// Serve this dump through all three source traits
    pub fn into_sources(self) -> Sources {
        let source = DumpSource::new(self);
        Sources::new(source.clone(), source.clone(), source)
    }
}

#[derive(Debug, Clone)]
pub struct DumpSource {
    dump: Arc<PlatformDump>,
}

impl DumpSource {
    pub fn new(dump: PlatformDump) -> Self {
        Self { dump: Arc::new(dump) }
    }

    fn check(&self, source_name: &'static str) -> Result<()> {
        if self.dump.is_failing(source_name) {
            return Err(AtlasError::source_fetch(source_name, "marked as failing in dump"));
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkSource for DumpSource {
    async fn get_tree(&self) -> Result<Vec<RawBookmarkNode>> {
        self.check("bookmarks")?;
        Ok(self.dump.bookmarks.clone())
    }
}

#[async_trait]
impl DeviceTabSource for DumpSource {
    async fn get_devices(&self) -> Result<Vec<RawDevice>> {
        self.check("devices")?;
        Ok(self.dump.devices.clone())
    }
}

#[async_trait]
impl HistorySource for DumpSource {
    /// Entries without a visit time are always inside the window.
    async fn search(&self, query: HistoryQuery) -> Result<Vec<RawHistoryEntry>> {
        self.check("history")?;
        Ok(self
            .dump
            .history
            .iter()
            .filter(|entry| entry.last_visit_time.map_or(true, |t| t >= query.start_time))
            .take(query.max_results)
            .cloned()
            .collect())
    }
}
