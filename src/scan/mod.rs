// src/scan/mod.rs
// =============================================================================
// This module drives a whole link check over a CMS site.
//
// Features:
// - Reads the site dump exported from the CMS (pages + plugin records)
// - Skips drafts, ghost placeholders and orphaned plugins
// - Checks plugins concurrently with the registered checkers
// - Collects broken links with their page context
// =============================================================================

mod dump;
mod runner;

// Re-export the main scanning types
pub use dump::{Page, Site, SiteDump};
pub use runner::{BadLink, ScanOptions, ScanReport, Scanner};
