// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the appropriate subcommand handler
// 3. Collect results and print them
// 4. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use cli::{Cli, Commands};
use cms_link_checker::checker::{http_client, LinkManager};
use cms_link_checker::logging::init_logging;
use cms_link_checker::report::CheckerPool;
use cms_link_checker::scan::{BadLink, ScanOptions, ScanReport, Scanner, SiteDump};
use cms_link_checker::ManagerConfig;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err   = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            dump,
            defaults,
            verify_exists,
            only_page,
            concurrency,
            timeout,
            json,
        } => {
            let options = ScanOptions {
                manager: defaults.into(),
                verify_exists,
                only_page,
                concurrency,
                timeout: Duration::from_secs(timeout),
            };
            handle_check(&dump, &options, json).await
        }
        Commands::Validate {
            url,
            defaults,
            verify_exists,
        } => handle_validate(&url, &defaults.into(), verify_exists).await,
    }
}

// Handles the 'check' subcommand
async fn handle_check(path: &std::path::Path, options: &ScanOptions, json: bool) -> Result<i32> {
    let dump = SiteDump::load(path)?;

    if !json {
        println!("🔍 Checking links of {}", dump.site.domain);
        if options.verify_exists {
            println!("🌐 Verifying that link targets exist (HTTP HEAD requests)");
        }
    }

    let scanner = Scanner::new(CheckerPool::with_defaults());
    let report = scanner.scan(&dump, options).await?;

    print_results(&report, json)?;

    if report.has_broken_links() {
        Ok(1) // Exit code 1 = broken links found
    } else {
        Ok(0) // Exit code 0 = all good
    }
}

// Handles the 'validate' subcommand
async fn handle_validate(url: &str, config: &ManagerConfig, verify_exists: bool) -> Result<i32> {
    let client = http_client(Duration::from_secs(10))?;
    let manager = LinkManager::new(config, client);

    if manager.validate_url(url, verify_exists).await {
        println!("✅ {} is valid", url);
        Ok(0)
    } else {
        println!("❌ {} is broken", url);
        Ok(1)
    }
}

// Prints the results either as a table or JSON
fn print_results(report: &ScanReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(report: &ScanReport) {
    if !report.bad_links.is_empty() {
        println!();
        println!("{:<50} {:<30} {:<10} {:<30}", "URL", "PAGE", "PLUGIN", "LABEL");
        println!("{}", "=".repeat(123));

        for bad in &report.bad_links {
            println!(
                "{:<50} {:<30} {:<10} {:<30}",
                truncate(&bad.url, 50),
                truncate(&page_display(bad), 30),
                bad.plugin_id,
                truncate(&bad.label, 30)
            );
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   📋 Links checked: {}", report.count_all_links);
    println!("   ❌ Broken: {}", report.bad_links.len());

    if !report.unknown_plugin_types.is_empty() {
        println!(
            "   ⚠️  Plugin types without a checker: {}",
            report.unknown_plugin_types.join(", ")
        );
    }
    if !report.malformed_plugins.is_empty() {
        let ids: Vec<_> = report.malformed_plugins.iter().map(u64::to_string).collect();
        println!("   ⚠️  Unreadable plugins: {}", ids.join(", "));
    }
}

fn page_display(bad: &BadLink) -> String {
    if bad.page_url.is_empty() {
        bad.page.clone()
    } else {
        format!("{} ({})", bad.page, bad.page_url)
    }
}

// Shortens long cells, respecting UTF-8 character boundaries
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
