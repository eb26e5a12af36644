// src/report/resolve.rs
// =============================================================================
// Resolves internal page references to absolute URLs.
//
// The CMS knows each page's path per language ("/en/about/"); joining it
// onto the site's base URL gives the link a reader would follow.
// =============================================================================

use std::collections::HashMap;
use url::Url;

/// Looks up the public URL of a CMS page.
pub trait UrlResolver: Send + Sync {
    /// Absolute URL of `page_id` in `language`, or `None` when the page has
    /// no route in that language.
    fn page_url(&self, page_id: u64, language: &str) -> Option<String>;
}

/// Resolver backed by a table of page paths.
#[derive(Debug, Clone)]
pub struct SiteResolver {
    base: Url,
    // page id -> language -> path
    paths: HashMap<u64, HashMap<String, String>>,
}

impl SiteResolver {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            paths: HashMap::new(),
        }
    }

    /// Resolver for `https://{domain}/`.
    pub fn for_domain(domain: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(&format!("https://{}/", domain))?))
    }

    pub fn add_page(&mut self, page_id: u64, paths: HashMap<String, String>) {
        self.paths.insert(page_id, paths);
    }
}

impl UrlResolver for SiteResolver {
    fn page_url(&self, page_id: u64, language: &str) -> Option<String> {
        let path = self.paths.get(&page_id)?.get(language)?;
        self.base.join(path).ok().map(|url| url.to_string())
    }
}
