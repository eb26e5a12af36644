// src/report/text_plugin.rs
// =============================================================================
// Checker for rich-text plugins.
//
// A text plugin's body is an HTML fragment that can contain any number of
// links, so this checker returns one report per <a href> it finds.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Rust concepts:
// - Iterators: For processing collections
// - Closures: Anonymous functions (|x| ...)
// - Send: the parsed HTML is not Send, so we finish with it before awaiting
// =============================================================================

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;

use super::{
    label_or_default, CheckError, CheckOutcome, LinkChecker, LinkReport, PluginRecord, NO_URL,
};
use crate::checker::LinkManager;

// All <a> tags that have an href attribute
static ANCHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector must parse"));

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextFields {
    body: Option<String>,
}

/// Extracts `(href, text)` pairs for every link in an HTML fragment.
///
/// The text has its whitespace collapsed; hrefs are returned as written,
/// relative ones included, since the router knows the site's host.
///
/// Example:
///   html = "<p>See <a href='/docs'>the  docs</a></p>"
///   result = [("/docs", "the docs")]
pub fn extract_anchors(html: &str) -> Vec<(String, String)> {
    let fragment = Html::parse_fragment(html);

    fragment
        .select(&ANCHORS)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let text = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            Some((href.trim().to_string(), text))
        })
        .collect()
}

pub struct TextPluginChecker {
    manager: LinkManager,
}

impl TextPluginChecker {
    pub fn new(manager: LinkManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl LinkChecker for TextPluginChecker {
    async fn check_link(
        &self,
        record: &PluginRecord,
        verify_exists: bool,
    ) -> Result<CheckOutcome, CheckError> {
        let fields: TextFields = record.fields()?;
        let anchors = extract_anchors(fields.body.as_deref().unwrap_or_default());

        let mut reports = Vec::with_capacity(anchors.len());
        for (href, text) in anchors {
            let valid = self.manager.validate_url(&href, verify_exists).await;
            let url = if href.is_empty() { NO_URL.to_string() } else { href };
            reports.push(LinkReport::new(valid, label_or_default(&text), url));
        }

        Ok(CheckOutcome::Many(reports))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why parse_fragment and not parse_document?
//    - A text plugin body is a piece of HTML, not a full page
//    - parse_fragment doesn't invent <html>/<body> wrappers around it
//
// 2. What does `?` do inside filter_map?
//    - The closure returns Option, so `attr("href")?` returns None early
//    - filter_map then skips that element
//
// 3. Why collect the anchors before the loop?
//    - `Html` can't be sent between threads, and async_trait futures must be
//      Send, so the HTML is parsed and dropped before the first .await
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{http_client, ManagerConfig};
    use crate::report::NO_LABEL;
    use serde_json::json;
    use std::time::Duration;

    fn record(body: &str) -> PluginRecord {
        PluginRecord {
            id: 5,
            plugin_type: "TextPlugin".to_string(),
            language: "en".to_string(),
            placeholder: Default::default(),
            data: json!({ "body": body }),
        }
    }

    fn checker() -> TextPluginChecker {
        let client = http_client(Duration::from_secs(5)).unwrap();
        TextPluginChecker::new(LinkManager::new(&ManagerConfig::default(), client))
    }

    #[test]
    fn test_extract_anchors() {
        let html = r#"
            <p>Read <a href="https://www.rust-lang.org">the
               Rust   site</a> or <a href="/docs"><b>docs</b></a>.</p>
            <a name="top">no href</a>
        "#;
        let anchors = extract_anchors(html);
        assert_eq!(
            anchors,
            vec![
                ("https://www.rust-lang.org".to_string(), "the Rust site".to_string()),
                ("/docs".to_string(), "docs".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_one_report_per_link() {
        let body = r#"<a href="https://example.com/">Example</a>
                      <a href="mailto:nobody">Mail</a>
                      <a href="">   </a>"#;
        let outcome = checker().check_link(&record(body), false).await.unwrap();
        let reports: Vec<_> = outcome.into_iter().collect();

        assert_eq!(
            reports,
            vec![
                LinkReport::new(true, "Example", "https://example.com/"),
                LinkReport::new(false, "Mail", "mailto:nobody"),
                LinkReport::new(false, NO_LABEL, NO_URL),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_links_no_reports() {
        let outcome = checker().check_link(&record("<p>Plain text</p>"), false).await.unwrap();
        assert!(outcome.is_empty());
    }
}
