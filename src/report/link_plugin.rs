// src/report/link_plugin.rs
// =============================================================================
// Checker for the classic link plugin.
//
// A link plugin has several alternative target fields. Exactly one is meant
// to be filled in, and the first filled one wins, in this order:
//
//   1. internal_link  - a page of this site (by id)
//   2. external_link  - any URL
//   3. mailto         - an e-mail address
//   4. phone          - a phone number
//   5. file_link      - an uploaded file
//
// Later fields are ignored even if they are also filled in.
// =============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::{
    label_or_default, CheckError, CheckOutcome, CheckerContext, FileRef, LinkChecker, LinkReport,
    PluginRecord, UrlResolver, NO_URL, NO_URL_WITH_CHILDREN,
};
use crate::checker::LinkManager;

// The link plugin's fields; missing, null and "" all count as not filled in
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LinkFields {
    name: Option<String>,
    internal_link: Option<u64>,
    external_link: Option<String>,
    mailto: Option<String>,
    phone: Option<String>,
    file_link: Option<FileRef>,
    /// Number of plugins nested inside this one
    children: usize,
}

pub struct LinkPluginChecker {
    manager: LinkManager,
    resolver: Arc<dyn UrlResolver>,
}

impl LinkPluginChecker {
    pub fn new(ctx: CheckerContext) -> Self {
        Self {
            manager: ctx.manager,
            resolver: ctx.resolver,
        }
    }
}

#[async_trait]
impl LinkChecker for LinkPluginChecker {
    async fn check_link(
        &self,
        record: &PluginRecord,
        verify_exists: bool,
    ) -> Result<CheckOutcome, CheckError> {
        let fields: LinkFields = record.fields()?;

        let (valid, url) = if let Some(page_id) = fields.internal_link {
            // Internal pages are trusted; a page without a route in this
            // language is reported with an empty URL
            let url = self.resolver.page_url(page_id, &record.language);
            if url.is_none() {
                debug!(plugin = record.id, page_id, "internal link has no route");
            }
            (true, url.unwrap_or_default())
        } else if let Some(external_link) = filled(fields.external_link) {
            let valid = self.manager.validate_url(&external_link, verify_exists).await;
            (valid, external_link)
        } else if let Some(mailto) = filled(fields.mailto) {
            let valid = self.manager.validate_mailto(&mailto, verify_exists);
            (valid, mailto)
        } else if let Some(phone) = filled(fields.phone) {
            let valid = self.manager.validate_tel(&phone, verify_exists);
            (valid, phone)
        } else if let Some(file) = fields.file_link.filter(|file| !file.url.is_empty()) {
            let valid = self.manager.validate_url(&file.url, verify_exists).await;
            (valid, file.url)
        } else if fields.children > 0 {
            (false, NO_URL_WITH_CHILDREN.to_string())
        } else {
            (false, NO_URL.to_string())
        };

        let text = label_or_default(fields.name.as_deref().unwrap_or_default());
        Ok(LinkReport::new(valid, text, url).into())
    }
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
