// src/scan/dump.rs
// =============================================================================
// The site dump: a JSON export of a CMS site that the scanner reads.
//
// {
//   "site":    { "domain": "www.example.com" },
//   "pages":   [ { "id": 1, "title": "Home", "published": true,
//                  "template_slots": ["content"], "urls": { "en": "/en/" } } ],
//   "plugins": [ { "id": 10, "plugin_type": "LinkPlugin", "language": "en",
//                  "placeholder": { "slot": "content", "page_id": 1 },
//                  "data": { "name": "Docs", "external_link": "https://..." } } ]
// }
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::report::{PluginRecord, SiteResolver};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDump {
    pub site: Site,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub plugins: Vec<PluginRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// Public host name, e.g. "www.example.com"
    pub domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    pub title: String,
    /// Stable identifier used with `--only-page`
    #[serde(default)]
    pub reverse_id: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    /// Slots declared by the page's template; `None` when the template
    /// could not be found
    #[serde(default)]
    pub template_slots: Option<Vec<String>>,
    /// language -> path
    #[serde(default)]
    pub urls: HashMap<String, String>,
}

impl SiteDump {
    /// Reads a dump from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read site dump {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("invalid site dump {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn page(&self, id: u64) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == id)
    }

    /// Builds a resolver that maps this dump's pages onto
    /// `https://{site domain}`.
    pub fn resolver(&self) -> Result<SiteResolver> {
        let mut resolver = SiteResolver::for_domain(&self.site.domain)
            .with_context(|| format!("invalid site domain '{}'", self.site.domain))?;
        for page in &self.pages {
            resolver.add_page(page.id, page.urls.clone());
        }
        Ok(resolver)
    }
}

fn default_published() -> bool {
    true
}
