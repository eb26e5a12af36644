// src/report/record.rs
// =============================================================================
// The plugin records the CMS hands us.
//
// The common part (id, type, language, where it sits) is typed; the
// plugin-specific fields stay raw JSON in `data` until the checker for that
// plugin type reads them with `fields::<T>()`. That keeps new plugin types
// pluggable without touching this struct.
// =============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::CheckError;

/// One plugin instance that may carry link fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginRecord {
    pub id: u64,
    /// Plugin type name, e.g. "LinkPlugin"
    pub plugin_type: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub placeholder: PlaceholderRef,
    /// Plugin-specific fields
    #[serde(default)]
    pub data: serde_json::Value,
}

impl PluginRecord {
    /// Reads the plugin-specific fields into a typed struct.
    /// A record without `data` reads like an empty object.
    pub fn fields<T: DeserializeOwned>(&self) -> Result<T, CheckError> {
        let data = match &self.data {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            data => data.clone(),
        };
        serde_json::from_value(data).map_err(|source| CheckError::MalformedRecord {
            id: self.id,
            plugin_type: self.plugin_type.clone(),
            source,
        })
    }
}

/// Where a plugin lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceholderRef {
    /// Template slot name, e.g. "content"
    pub slot: String,
    /// Human-friendly slot name from the placeholder configuration
    #[serde(default)]
    pub slot_name: Option<String>,
    /// The page holding the placeholder, if any
    #[serde(default)]
    pub page_id: Option<u64>,
    /// For placeholders outside the page tree (e.g. on a news article)
    #[serde(default)]
    pub owner: Option<OwnerRef>,
}

/// Non-page object owning a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub title: String,
    pub url: String,
}

/// An uploaded file attached to a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Public URL of the file, usually relative ("/media/...")
    pub url: String,
    #[serde(default)]
    pub name: String,
}

fn default_language() -> String {
    crate::checker::DEFAULT_LANGUAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let record: PluginRecord = serde_json::from_str(
            r#"{"id": 7, "plugin_type": "LinkPlugin", "placeholder": {"slot": "content"}}"#,
        )
        .unwrap();
        assert_eq!(record.language, "en");
        assert_eq!(record.placeholder.page_id, None);
        assert!(record.data.is_null());
    }

    #[test]
    fn test_fields_reads_data() {
        let record: PluginRecord = serde_json::from_str(
            r#"{"id": 1, "plugin_type": "X", "placeholder": {"slot": "s"}, "data": {"name": "Home"}}"#,
        )
        .unwrap();
        let named: Named = record.fields().unwrap();
        assert_eq!(named.name, "Home");
    }

    #[test]
    fn test_fields_reports_malformed_data() {
        let record: PluginRecord = serde_json::from_str(
            r#"{"id": 9, "plugin_type": "X", "placeholder": {"slot": "s"}, "data": {"name": 42}}"#,
        )
        .unwrap();
        let err = record.fields::<Named>().unwrap_err();
        assert!(matches!(err, CheckError::MalformedRecord { id: 9, .. }));
        assert!(err.to_string().contains("plugin 9 (X)"));
    }

    #[test]
    fn test_fields_of_missing_data() {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct Optional {
            name: Option<String>,
        }

        let record: PluginRecord =
            serde_json::from_str(r#"{"id": 3, "plugin_type": "X", "placeholder": {"slot": "s"}}"#)
                .unwrap();
        assert_eq!(record.fields::<Optional>().unwrap().name, None);
    }
}
