// src/lib.rs
// =============================================================================
// cms-link-checker: finds broken links in CMS plugins.
//
// Modules:
// - checker: The URL validation engine (router + per-scheme validators)
// - report: Per-plugin-type checkers that turn records into LinkReports
// - scan: Runs the checkers over a whole site dump
// - logging: tracing setup for the binary
//
// Quick example:
//
//     let client = checker::http_client(Duration::from_secs(10))?;
//     let manager = checker::LinkManager::new(&checker::ManagerConfig::default(), client);
//     assert!(manager.validate_url("https://www.rust-lang.org/", false).await);
// =============================================================================

pub mod checker;
pub mod logging;
pub mod report;
pub mod scan;

pub use checker::{LinkManager, ManagerConfig};
pub use report::{CheckOutcome, LinkChecker, LinkReport};
pub use scan::{ScanOptions, ScanReport, Scanner, SiteDump};
