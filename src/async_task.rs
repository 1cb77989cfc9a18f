use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::mpsc;

use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::snapshot::Snapshot;
use crate::source::{BookmarkSource, DeviceTabSource, HistorySource};

/// The three platform collaborators the pipeline reads from
#[derive(Clone)]
pub struct Sources {
    pub bookmarks: Arc<dyn BookmarkSource>,
    pub devices: Arc<dyn DeviceTabSource>,
    pub history: Arc<dyn HistorySource>,
}

impl Sources {
    pub fn new(
        bookmarks: impl BookmarkSource + 'static,
        devices: impl DeviceTabSource + 'static,
        history: impl HistorySource + 'static,
    ) -> Self {
        Self {
            bookmarks: Arc::new(bookmarks),
            devices: Arc::new(devices),
            history: Arc::new(history),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Refresh { request_id: u64 },
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    SnapshotLoaded { request_id: u64, snapshot: Snapshot },
}

/// Fetch all three sources concurrently and build the canonical snapshot.
///
/// A source that errors or times out contributes nothing; the others are
/// unaffected, so this never fails.
pub async fn load_snapshot(sources: &Sources, config: &AtlasConfig) -> Snapshot {
    let start = Instant::now();
    let now = Utc::now();
    let history_query = config.history.query_at(now);
    let timeout_ms = config.fetch_timeout_ms;

    let (bookmarks, devices, history) = tokio::join!(
        bounded("bookmarks", timeout_ms, sources.bookmarks.get_tree()),
        bounded("devices", timeout_ms, sources.devices.get_devices()),
        bounded("history", timeout_ms, sources.history.search(history_query)),
    );

    let bookmarks = or_empty("bookmarks", bookmarks);
    let devices = or_empty("devices", devices);
    let history = or_empty("history", history);

    log::info!(
        "Fetched {} bookmark roots, {} devices, {} history entries in {:?}",
        bookmarks.len(),
        devices.len(),
        history.len(),
        start.elapsed()
    );

    Snapshot::assemble(&bookmarks, &devices, &history, &config.history.title, now)
}

async fn bounded<T, F>(source_name: &'static str, timeout_ms: Option<u64>, fetch: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout_ms {
        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), fetch)
            .await
            .map_err(|_| AtlasError::SourceTimeout {
                source_name,
                timeout_ms: ms,
            })?,
        None => fetch.await,
    }
}

fn or_empty<T: Default>(source_name: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        log::warn!("Continuing without {}: {}", source_name, e);
        T::default()
    })
}

/// Serve refresh requests until either channel closes.
pub async fn run_worker(
    mut task_receiver: mpsc::Receiver<Task>,
    result_sender: mpsc::Sender<TaskResult>,
    sources: Sources,
    config: AtlasConfig,
) {
    while let Some(task) = task_receiver.recv().await {
        let result = match task {
            Task::Refresh { request_id } => {
                log::debug!("Worker: refresh #{}", request_id);
                let snapshot = load_snapshot(&sources, &config).await;
                TaskResult::SnapshotLoaded { request_id, snapshot }
            }
        };

        if result_sender.send(result).await.is_err() {
            // Receiver dropped, nobody is listening any more
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{
        MockBookmarkSource, MockDeviceTabSource, MockHistorySource, RawBookmarkNode, RawDevice,
        RawHistoryEntry, RawTab, RawWindow,
    };
    use async_trait::async_trait;

    fn bookmark_roots() -> Vec<RawBookmarkNode> {
        vec![RawBookmarkNode {
            id: "0".to_string(),
            children: Some(vec![RawBookmarkNode {
                id: "1".to_string(),
                title: "Bookmarks bar".to_string(),
                children: Some(vec![RawBookmarkNode {
                    id: "5".to_string(),
                    title: "Rust".to_string(),
                    url: Some("https://www.rust-lang.org".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            }]),
            ..Default::default()
        }]
    }

    fn devices() -> Vec<RawDevice> {
        vec![RawDevice {
            device_name: "Laptop".to_string(),
            windows: vec![RawWindow {
                tabs: vec![RawTab {
                    title: "Docs".to_string(),
                    url: "https://docs.rs".to_string(),
                }],
            }],
        }]
    }

    fn history() -> Vec<RawHistoryEntry> {
        vec![RawHistoryEntry {
            id: Some("h1".to_string()),
            title: Some("Crates".to_string()),
            url: "https://crates.io".to_string(),
            last_visit_time: None,
        }]
    }

    fn healthy_bookmarks() -> MockBookmarkSource {
        let mut mock = MockBookmarkSource::new();
        mock.expect_get_tree().returning(|| Ok(bookmark_roots()));
        mock
    }

    fn healthy_devices() -> MockDeviceTabSource {
        let mut mock = MockDeviceTabSource::new();
        mock.expect_get_devices().returning(|| Ok(devices()));
        mock
    }

    fn healthy_history() -> MockHistorySource {
        let mut mock = MockHistorySource::new();
        mock.expect_search().returning(|_| Ok(history()));
        mock
    }

    fn titles(snapshot: &Snapshot) -> Vec<&str> {
        snapshot.forest.iter().map(|n| n.title.as_str()).collect()
    }

    struct StalledDevices;

    #[async_trait]
    impl DeviceTabSource for StalledDevices {
        async fn get_devices(&self) -> Result<Vec<RawDevice>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(devices())
        }
    }

    #[tokio::test]
    async fn test_all_sources_present() {
        let sources = Sources::new(healthy_bookmarks(), healthy_devices(), healthy_history());
        let snapshot = load_snapshot(&sources, &AtlasConfig::default()).await;
        assert_eq!(titles(&snapshot), vec!["Bookmarks bar", "Laptop", "History"]);
    }

    #[tokio::test]
    async fn test_history_query_uses_config() {
        let mut history_source = MockHistorySource::new();
        history_source
            .expect_search()
            .withf(|query| query.text.is_empty() && query.max_results == 5)
            .times(1)
            .returning(|_| Ok(history()));

        let mut config = AtlasConfig::default();
        config.history.max_results = 5;

        let sources = Sources::new(healthy_bookmarks(), healthy_devices(), history_source);
        let snapshot = load_snapshot(&sources, &config).await;
        assert_eq!(snapshot.forest.last().map(|n| n.item_count()), Some(1));
    }

    #[tokio::test]
    async fn test_device_failure_degrades_to_no_device_region() {
        let mut failing = MockDeviceTabSource::new();
        failing
            .expect_get_devices()
            .returning(|| Err(AtlasError::source_fetch("devices", "sync disabled")));

        let sources = Sources::new(healthy_bookmarks(), failing, healthy_history());
        let snapshot = load_snapshot(&sources, &AtlasConfig::default()).await;
        assert_eq!(titles(&snapshot), vec!["Bookmarks bar", "History"]);
    }

    #[tokio::test]
    async fn test_every_source_failing_still_yields_history_group() {
        let mut bookmarks = MockBookmarkSource::new();
        bookmarks.expect_get_tree().returning(|| Err("denied".into()));
        let mut devices = MockDeviceTabSource::new();
        devices.expect_get_devices().returning(|| Err("denied".into()));
        let mut history = MockHistorySource::new();
        history.expect_search().returning(|_| Err("denied".into()));

        let snapshot = load_snapshot(&Sources::new(bookmarks, devices, history), &AtlasConfig::default()).await;
        assert_eq!(titles(&snapshot), vec!["History"]);
        assert_eq!(snapshot.stats().items, 0);
    }

    #[tokio::test]
    async fn test_stalled_source_times_out_alone() {
        let mut config = AtlasConfig::default();
        config.fetch_timeout_ms = Some(50);

        let sources = Sources::new(healthy_bookmarks(), StalledDevices, healthy_history());
        let started = Instant::now();
        let snapshot = load_snapshot(&sources, &config).await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(titles(&snapshot), vec!["Bookmarks bar", "History"]);
    }

    #[tokio::test]
    async fn test_worker_answers_refresh_requests() {
        let (task_sender, task_receiver) = mpsc::channel(4);
        let (result_sender, mut result_receiver) = mpsc::channel(4);
        let sources = Sources::new(healthy_bookmarks(), healthy_devices(), healthy_history());

        let handle = tokio::spawn(run_worker(task_receiver, result_sender, sources, AtlasConfig::default()));

        task_sender.send(Task::Refresh { request_id: 7 }).await.unwrap();
        let TaskResult::SnapshotLoaded { request_id, snapshot } = result_receiver.recv().await.unwrap();
        assert_eq!(request_id, 7);
        assert_eq!(snapshot.forest.len(), 3);

        drop(task_sender);
        tokio_test::assert_ok!(handle.await);
    }
}
