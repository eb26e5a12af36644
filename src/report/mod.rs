// src/report/mod.rs
// =============================================================================
// This module turns CMS plugin records into link reports.
//
// Every plugin type that can hold a link gets its own "checker": it knows
// which fields of that plugin carry the link, picks the one that is filled
// in, runs it through the LinkManager and wraps the verdict in a LinkReport.
//
// Submodules:
// - record: The plugin records handed to us by the CMS
// - resolve: Turning internal page references into absolute URLs
// - link_plugin: Checker for the classic link plugin
// - text_plugin: Checker for rich-text plugins (one report per <a href>)
// - file_plugin: Checker for file download plugins
// - pool: The plugin type -> checker registry
// =============================================================================

mod file_plugin;
mod link_plugin;
mod pool;
mod record;
mod resolve;
mod text_plugin;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::checker::LinkManager;

pub use file_plugin::FilePluginChecker;
pub use link_plugin::LinkPluginChecker;
pub use pool::{CheckerFactory, CheckerPool};
pub use record::{FileRef, OwnerRef, PlaceholderRef, PluginRecord};
pub use resolve::{SiteResolver, UrlResolver};
pub use text_plugin::{extract_anchors, TextPluginChecker};

/// Label used when a link has no text of its own.
pub const NO_LABEL: &str = "Link without label";
/// Shown instead of a URL when a link plugin has no target.
pub const NO_URL: &str = "Invalid link (no URL)";
/// Like [`NO_URL`], for plugins that still have nested plugins inside.
pub const NO_URL_WITH_CHILDREN: &str = "Invalid link (no URL) but with children plugins";

/// The verdict for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub valid: bool,
    /// Human-readable label (link name or [`NO_LABEL`])
    pub text: String,
    /// The checked URL, a placeholder like [`NO_URL`], or empty when an
    /// internal page could not be resolved
    pub url: String,
}

impl LinkReport {
    pub fn new(valid: bool, text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            valid,
            text: text.into(),
            url: url.into(),
        }
    }
}

/// What a checker returns: one report, or several for plugins that can hold
/// more than one link.
///
/// Both shapes iterate the same way, so callers can simply write
/// `for report in outcome { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Single(LinkReport),
    Many(Vec<LinkReport>),
}

impl CheckOutcome {
    pub fn len(&self) -> usize {
        match self {
            CheckOutcome::Single(_) => 1,
            CheckOutcome::Many(reports) => reports.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<LinkReport> for CheckOutcome {
    fn from(report: LinkReport) -> Self {
        CheckOutcome::Single(report)
    }
}

impl From<Vec<LinkReport>> for CheckOutcome {
    fn from(reports: Vec<LinkReport>) -> Self {
        CheckOutcome::Many(reports)
    }
}

impl IntoIterator for CheckOutcome {
    type Item = LinkReport;
    type IntoIter = std::vec::IntoIter<LinkReport>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            CheckOutcome::Single(report) => vec![report].into_iter(),
            CheckOutcome::Many(reports) => reports.into_iter(),
        }
    }
}

/// Errors a checker can return. Link problems are never errors (they are
/// reports with `valid: false`); these are problems with the record itself.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("plugin {id} ({plugin_type}) has malformed data: {source}")]
    MalformedRecord {
        id: u64,
        plugin_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything a checker needs from the outside world.
#[derive(Clone)]
pub struct CheckerContext {
    pub manager: LinkManager,
    pub resolver: Arc<dyn UrlResolver>,
}

/// Extracts and validates the link(s) of one plugin type.
#[async_trait]
pub trait LinkChecker: Send + Sync {
    async fn check_link(
        &self,
        record: &PluginRecord,
        verify_exists: bool,
    ) -> Result<CheckOutcome, CheckError>;
}

// The record's own name, or the "no label" placeholder
fn label_or_default(name: &str) -> String {
    if name.is_empty() {
        NO_LABEL.to_string()
    } else {
        name.to_string()
    }
}
