//! Event surface over one snapshot.
//!
//! The navigator derives a forest from the canonical snapshot for the current
//! query, flattens it into a render pass, and owns that pass's folder state.
//! Every re-render (new query or new snapshot) starts with all folders
//! expanded and bumps the render generation so callers can drop stale views.

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::error::{AtlasError, Result};
use crate::filter::filter_forest;
use crate::folder_state::FolderStateStore;
use crate::open_all::{open_all, OpenAllReport, UrlOpener};
use crate::render::{node_at_row, render_model, render_text, RenderRow, RowKind};
use crate::snapshot::Snapshot;
use crate::tree::{Forest, Node};

/// Events a UI binding layer can send to the navigator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorEvent {
    SearchInput(String),
    FolderToggle(usize),
    OpenAllClick(usize),
}

/// A row that is currently shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow {
    pub row: usize,
    pub depth: usize,
    pub kind: RowKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub is_collapsed: bool,
}

/// View model for rendering the navigator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigatorViewModel {
    pub rows: Vec<VisibleRow>,
    pub query: String,
    pub generation: u64,
    pub total_rows: usize,
}

#[derive(Debug)]
pub struct NavigatorState {
    snapshot: Snapshot,
    query: String,
    forest: Forest,
    rows: Vec<RenderRow>,
    folders: FolderStateStore,
    generation: u64,
}

impl NavigatorState {
    /// Create a navigator showing the whole snapshot
    pub fn new(snapshot: Snapshot) -> Self {
        let mut navigator = Self {
            snapshot,
            query: String::new(),
            forest: Vec::new(),
            rows: Vec::new(),
            folders: FolderStateStore::default(),
            generation: 0,
        };
        navigator.rerender();
        navigator
    }

    fn rerender(&mut self) {
        let start = std::time::Instant::now();
        self.forest = filter_forest(&self.snapshot.forest, &self.query);
        self.rows = render_model(&self.forest);
        self.folders = FolderStateStore::new(&self.rows);
        self.generation += 1;
        log::debug!(
            "Render #{}: {} rows for query {:?} in {:?}",
            self.generation,
            self.rows.len(),
            self.query,
            start.elapsed()
        );
    }

    /// Apply a new search query. Returns `false` when the query is unchanged,
    /// in which case the current render pass (and its folder state) is kept.
    pub fn on_search_input(&mut self, text: &str) -> bool {
        if text == self.query {
            return false;
        }
        self.query = text.to_string();
        self.rerender();
        true
    }

    /// Toggle the folder rendered at `row`; returns whether it is now collapsed.
    pub fn on_folder_toggle(&mut self, row: usize) -> Result<bool> {
        let collapsed = self.folders.toggle(row)?;
        log::debug!(
            "Folder at row {} {}; {} collapsed",
            row,
            if collapsed { "collapsed" } else { "expanded" },
            self.folders.collapsed_count()
        );
        Ok(collapsed)
    }

    /// Open every link under the folder rendered at `row`, in rendered order.
    pub fn on_open_all_click(&self, row: usize, opener: &mut dyn UrlOpener) -> Result<OpenAllReport> {
        let group = self.group_at(row)?;
        Ok(open_all(group, opener))
    }

    /// Dispatch an event; returns whether the visible state changed.
    pub fn handle_event(&mut self, event: NavigatorEvent, opener: &mut dyn UrlOpener) -> Result<bool> {
        match event {
            NavigatorEvent::SearchInput(text) => Ok(self.on_search_input(&text)),
            NavigatorEvent::FolderToggle(row) => {
                self.on_folder_toggle(row)?;
                Ok(true)
            }
            NavigatorEvent::OpenAllClick(row) => {
                self.on_open_all_click(row, opener)?;
                Ok(false)
            }
        }
    }

    /// Install a freshly fetched snapshot and re-render with the current query.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.rerender();
    }

    fn group_at(&self, row: usize) -> Result<&Node> {
        if !self.folders.is_group_row(row) {
            return Err(AtlasError::NoSuchGroup(row));
        }
        node_at_row(&self.forest, row).ok_or(AtlasError::NoSuchGroup(row))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The forest currently rendered (filtered when a query is active)
    pub fn forest(&self) -> &[Node] {
        &self.forest
    }

    pub fn rows(&self) -> &[RenderRow] {
        &self.rows
    }

    pub fn folders(&self) -> &FolderStateStore {
        &self.folders
    }

    pub fn view_model(&self) -> NavigatorViewModel {
        let rows = self
            .folders
            .visible_rows(&self.rows)
            .into_iter()
            .map(|index| {
                let row = &self.rows[index];
                VisibleRow {
                    row: index,
                    depth: row.depth,
                    kind: row.kind,
                    title: row.title.clone(),
                    url: row.url.clone(),
                    is_collapsed: self.folders.is_collapsed(index),
                }
            })
            .collect();

        NavigatorViewModel {
            rows,
            query: self.query.clone(),
            generation: self.generation,
            total_rows: self.rows.len(),
        }
    }

    pub fn render_text(&self, display: &DisplayConfig) -> String {
        render_text(&self.rows, &self.folders, display)
    }
}
