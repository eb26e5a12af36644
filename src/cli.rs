// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use cms_link_checker::checker::{DEFAULT_LANGUAGE, DEFAULT_NETLOC, DEFAULT_SCHEME};
use cms_link_checker::ManagerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "cms-link-checker",
    version,
    about = "Finds broken links in CMS link, text and file plugins",
    long_about = "cms-link-checker validates the links stored in CMS plugins (web URLs, e-mail \
                  addresses, phone numbers and Bitcoin addresses) and reports the broken ones. \
                  Exit code 0 means no broken links, 1 means broken links were found."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every link plugin in a site dump
    ///
    /// Example: cms-link-checker check site.json --host www.example.com --verify-exists
    Check {
        /// JSON site dump exported from the CMS
        dump: PathBuf,

        #[command(flatten)]
        defaults: LinkDefaults,

        /// Check that each link's target exists (makes HTTP HEAD requests)
        #[arg(long)]
        verify_exists: bool,

        /// Check only the page with this reverse id
        #[arg(long = "only-page-with-reverse-id", alias = "only-page")]
        only_page: Option<String>,

        /// How many plugins to check at the same time
        #[arg(long, default_value_t = 8)]
        concurrency: usize,

        /// HTTP timeout per request, in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate a single URL, e-mail (mailto:), phone (tel:) or Bitcoin link
    ///
    /// Example: cms-link-checker validate tel:+41-44-668-1800
    Validate {
        /// The link to check
        url: String,

        #[command(flatten)]
        defaults: LinkDefaults,

        /// Check that the target exists (makes HTTP HEAD requests)
        #[arg(long)]
        verify_exists: bool,
    },
}

/// Defaults applied to incomplete links.
#[derive(Args, Debug, Clone)]
pub struct LinkDefaults {
    /// Default scheme for scheme-less URLs
    #[arg(long, default_value = DEFAULT_SCHEME)]
    pub scheme: String,

    /// Default [host:port] for relative URLs
    #[arg(long, default_value = DEFAULT_NETLOC)]
    pub host: String,

    /// Site language code; picks the region for national phone numbers
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,
}

impl From<LinkDefaults> for ManagerConfig {
    fn from(defaults: LinkDefaults) -> Self {
        ManagerConfig {
            scheme: defaults.scheme,
            netloc: defaults.host,
            language: defaults.language,
        }
    }
}
