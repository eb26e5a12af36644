// src/scan/runner.rs
// =============================================================================
// Runs a link check over every plugin in a site dump.
//
// How it works:
// 1. Pick the plugins worth checking:
//    - on a published page, or on no page at all (e.g. a news article)
//    - not in a "ghost" placeholder (a slot the page's template dropped)
//    - only on the page given with --only-page, if set
// 2. Look up the checker for each plugin type (cached per type/scheme/host)
// 3. Check the plugins concurrently, a bounded number at a time
// 4. Collect every invalid link into a BadLink entry with its page context
//
// Rust concepts:
// - Streams: buffer_unordered runs several checks at once
// - HashMap/BTreeSet: the checker cache and the sorted unknown types
// - Borrowing: the jobs borrow records from the dump instead of copying
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::dump::SiteDump;
use crate::checker::{http_client, LinkManager, ManagerConfig};
use crate::report::{CheckerContext, CheckerPool, LinkChecker, LinkReport, PluginRecord, UrlResolver};

// Log a progress line every this many plugins
const PROGRESS_EVERY: usize = 1000;

/// Settings for one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub manager: ManagerConfig,
    /// Make HEAD/GET requests for web links
    pub verify_exists: bool,
    /// Only check the page with this reverse id
    pub only_page: Option<String>,
    /// How many plugins are checked at the same time
    pub concurrency: usize,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            manager: ManagerConfig::default(),
            verify_exists: false,
            only_page: None,
            concurrency: 8,
            timeout: Duration::from_secs(10),
        }
    }
}

/// One broken link, with enough context to find and fix it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadLink {
    pub plugin_type: String,
    pub plugin_id: u64,
    /// Title of the page (or other object) holding the plugin
    pub page: String,
    pub page_url: String,
    pub slot: String,
    pub label: String,
    pub url: String,
}

/// Everything a scan found.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub bad_links: Vec<BadLink>,
    /// Links checked, valid or not
    pub count_all_links: usize,
    /// Plugins handed to a checker
    pub checked_plugins: usize,
    /// Plugin types with no registered checker
    pub unknown_plugin_types: Vec<String>,
    /// Plugins whose data could not be read
    pub malformed_plugins: Vec<u64>,
}

impl ScanReport {
    pub fn has_broken_links(&self) -> bool {
        !self.bad_links.is_empty()
    }
}

// Checkers are cached per (plugin type, scheme, host)
type CheckerKey = (String, String, String);

/// Checks all plugins of a site dump with the checkers of a pool.
#[derive(Debug, Clone)]
pub struct Scanner {
    pool: CheckerPool,
}

impl Scanner {
    pub fn new(pool: CheckerPool) -> Self {
        Self { pool }
    }

    pub async fn scan(&self, dump: &SiteDump, options: &ScanOptions) -> Result<ScanReport> {
        let client = http_client(options.timeout).context("failed to build HTTP client")?;
        let resolver: Arc<dyn UrlResolver> = Arc::new(dump.resolver()?);
        let ctx = CheckerContext {
            manager: LinkManager::new(&options.manager, client),
            resolver: Arc::clone(&resolver),
        };

        let plugins = select_plugins(dump, options.only_page.as_deref());
        info!("will check {} plugins", plugins.len());

        // Build every checker up front; the cache is read-only from here on
        let mut checkers: HashMap<CheckerKey, Arc<dyn LinkChecker>> = HashMap::new();
        let mut unknown = BTreeSet::new();
        let mut jobs = Vec::with_capacity(plugins.len());

        for record in plugins {
            let key = (
                record.plugin_type.clone(),
                ctx.manager.scheme().to_string(),
                ctx.manager.netloc().to_string(),
            );
            let checker = match checkers.get(&key) {
                Some(checker) => Some(Arc::clone(checker)),
                None => {
                    let built = self.pool.get_link_checker(&record.plugin_type, ctx.clone());
                    if let Some(checker) = &built {
                        checkers.insert(key, Arc::clone(checker));
                    }
                    built
                }
            };

            match checker {
                Some(checker) => jobs.push((record, checker)),
                None => {
                    unknown.insert(record.plugin_type.clone());
                }
            }
        }

        let verify_exists = options.verify_exists;
        let mut results = stream::iter(jobs)
            .map(|(record, checker)| async move {
                let result = checker.check_link(record, verify_exists).await;
                (record, result)
            })
            .buffer_unordered(options.concurrency.max(1));

        let mut report = ScanReport::default();

        while let Some((record, result)) = results.next().await {
            report.checked_plugins += 1;
            if report.checked_plugins % PROGRESS_EVERY == 0 {
                info!("checked {} plugins...", report.checked_plugins);
            }

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(%error, "skipping plugin");
                    report.malformed_plugins.push(record.id);
                    continue;
                }
            };

            // One plugin can yield several links
            for link in outcome {
                report.count_all_links += 1;
                if link.valid {
                    continue;
                }
                if let Some(bad) = bad_link(dump, resolver.as_ref(), record, link) {
                    info!(
                        url = %bad.url,
                        page_url = %bad.page_url,
                        plugin_id = bad.plugin_id,
                        slot = %bad.slot,
                        "broken link"
                    );
                    report.bad_links.push(bad);
                }
            }
        }

        // Results arrive in completion order; sort for a stable report
        report.bad_links.sort_by(|a, b| (a.plugin_id, &a.url).cmp(&(b.plugin_id, &b.url)));
        report.malformed_plugins.sort_unstable();
        report.unknown_plugin_types = unknown.into_iter().collect();

        Ok(report)
    }
}

// Picks the plugins that should be checked
fn select_plugins<'a>(dump: &'a SiteDump, only_page: Option<&str>) -> Vec<&'a PluginRecord> {
    let mut missing_templates = HashSet::new();

    dump.plugins
        .iter()
        .filter(|record| {
            let placeholder = &record.placeholder;

            let Some(page_id) = placeholder.page_id else {
                // Placeholders outside the page tree have no page to filter on
                return only_page.is_none();
            };

            let Some(page) = dump.page(page_id) else {
                debug!(plugin = record.id, page_id, "plugin refers to an unknown page");
                return false;
            };

            if !page.published {
                return false;
            }

            if let Some(reverse_id) = only_page {
                if page.reverse_id.as_deref() != Some(reverse_id) {
                    return false;
                }
            }

            match &page.template_slots {
                // Ghost placeholder: the template no longer declares this slot
                Some(slots) => slots.contains(&placeholder.slot),
                None => {
                    if missing_templates.insert(page.id) {
                        warn!(page = %page.title, "page template could not be found");
                    }
                    true
                }
            }
        })
        .collect()
}

// Adds page context to an invalid link. Returns None for plugins in orphaned
// placeholders (no page and no owner), which are not reported.
fn bad_link(
    dump: &SiteDump,
    resolver: &dyn UrlResolver,
    record: &PluginRecord,
    link: LinkReport,
) -> Option<BadLink> {
    let placeholder = &record.placeholder;

    let (page, page_url) = match (placeholder.page_id.and_then(|id| dump.page(id)), &placeholder.owner) {
        (Some(page), _) => (
            page.title.clone(),
            resolver.page_url(page.id, &record.language).unwrap_or_default(),
        ),
        (None, Some(owner)) => (owner.title.clone(), owner.url.clone()),
        (None, None) => return None,
    };

    Some(BadLink {
        plugin_type: record.plugin_type.clone(),
        plugin_id: record.id,
        page,
        page_url,
        slot: placeholder
            .slot_name
            .clone()
            .unwrap_or_else(|| placeholder.slot.clone()),
        label: link.text,
        url: link.url,
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `let ... else`?
//    - `let Some(x) = y else { return ...; };` unwraps or leaves early
//    - It keeps the happy path unindented
//
// 2. Why build the checkers before starting the stream?
//    - The concurrent checks then only *read* shared data
//    - No locks are needed around the cache
//
// 3. What is `resolver.as_ref()`?
//    - Turns `&Arc<dyn UrlResolver>` into `&dyn UrlResolver`
// -----------------------------------------------------------------------------
