use crate::error::{AtlasError, Result};
use crate::tree::{Node, NodeKind};

/// Side-effect seam for opening a URL (new tab, browser launch, ...)
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenAllReport {
    pub issued: usize,
    pub failed: usize,
}

/// Collect every link url under `node`, depth-first in child order.
pub fn collect_urls(node: &Node) -> Vec<&str> {
    let mut urls = Vec::new();
    push_urls(node, &mut urls);
    urls
}

fn push_urls<'a>(node: &'a Node, urls: &mut Vec<&'a str>) {
    match &node.kind {
        NodeKind::Item { url } => urls.push(url),
        NodeKind::Group { children } => {
            for child in children {
                push_urls(child, urls);
            }
        }
    }
}

/// Issue one open call per link under `group`. A failing call is logged and
/// counted; the remaining links are still opened.
pub fn open_all(group: &Node, opener: &mut dyn UrlOpener) -> OpenAllReport {
    let urls = collect_urls(group);
    log::info!("Opening {} links under {:?}", urls.len(), group.title);

    let mut report = OpenAllReport::default();
    for url in urls {
        report.issued += 1;
        if let Err(e) = opener.open(url) {
            log::warn!("Open failed: {}", e);
            report.failed += 1;
        }
    }
    report
}

/// Records every url instead of opening it
#[derive(Debug, Default, Clone)]
pub struct RecordingOpener {
    pub opened: Vec<String>,
}

impl UrlOpener for RecordingOpener {
    fn open(&mut self, url: &str) -> Result<()> {
        self.opened.push(url.to_string());
        Ok(())
    }
}

/// Writes one `open <url>` line per call to stdout
#[derive(Debug, Default)]
pub struct StdoutOpener;

impl UrlOpener for StdoutOpener {
    fn open(&mut self, url: &str) -> Result<()> {
        use std::io::Write;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "open {}", url).map_err(|e| AtlasError::OpenFailed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
