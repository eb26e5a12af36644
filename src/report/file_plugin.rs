// src/report/file_plugin.rs
// =============================================================================
// Checker for file download plugins: the attached file's URL is checked like
// any other web link (relative media URLs get the site's host).
// =============================================================================

use async_trait::async_trait;
use serde::Deserialize;

use super::{
    label_or_default, CheckError, CheckOutcome, FileRef, LinkChecker, LinkReport, PluginRecord,
    NO_URL,
};
use crate::checker::LinkManager;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileFields {
    title: Option<String>,
    file: Option<FileRef>,
}

pub struct FilePluginChecker {
    manager: LinkManager,
}

impl FilePluginChecker {
    pub fn new(manager: LinkManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl LinkChecker for FilePluginChecker {
    async fn check_link(
        &self,
        record: &PluginRecord,
        verify_exists: bool,
    ) -> Result<CheckOutcome, CheckError> {
        let fields: FileFields = record.fields()?;

        // Title first, then the file's own name
        let label = match (&fields.title, &fields.file) {
            (Some(title), _) if !title.is_empty() => title.clone(),
            (_, Some(file)) => file.name.clone(),
            _ => String::new(),
        };

        let report = match fields.file.filter(|file| !file.url.is_empty()) {
            Some(file) => {
                let valid = self.manager.validate_url(&file.url, verify_exists).await;
                LinkReport::new(valid, label_or_default(&label), file.url)
            }
            None => LinkReport::new(false, label_or_default(&label), NO_URL),
        };

        Ok(report.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{http_client, ManagerConfig};
    use crate::report::NO_LABEL;
    use serde_json::json;
    use std::time::Duration;

    async fn check(data: serde_json::Value) -> LinkReport {
        let client = http_client(Duration::from_secs(5)).unwrap();
        let checker = FilePluginChecker::new(LinkManager::new(&ManagerConfig::default(), client));
        let record = PluginRecord {
            id: 3,
            plugin_type: "FilePlugin".to_string(),
            language: "en".to_string(),
            placeholder: Default::default(),
            data,
        };
        checker
            .check_link(&record, false)
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[tokio::test]
    async fn test_file_url_checked() {
        let report = check(json!({"title": "Menu", "file": {"url": "/media/menu.pdf", "name": "menu.pdf"}})).await;
        assert_eq!(report, LinkReport::new(true, "Menu", "/media/menu.pdf"));
    }

    #[tokio::test]
    async fn test_label_falls_back_to_file_name() {
        let report = check(json!({"file": {"url": "/media/menu.pdf", "name": "menu.pdf"}})).await;
        assert_eq!(report.text, "menu.pdf");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let report = check(json!({"title": ""})).await;
        assert_eq!(report, LinkReport::new(false, NO_LABEL, NO_URL));
    }
}
