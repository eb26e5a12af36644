// src/report/pool.rs
// =============================================================================
// The plugin type -> checker registry.
//
// Checkers are registered as factories because each one is built around a
// LinkManager, and the manager depends on the run's scheme/host settings.
// Supporting a new plugin type means registering one more factory; nothing
// else changes.
// =============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{
    CheckerContext, FilePluginChecker, LinkChecker, LinkPluginChecker, TextPluginChecker,
};

/// Builds a checker for one plugin type.
pub type CheckerFactory = Arc<dyn Fn(CheckerContext) -> Arc<dyn LinkChecker> + Send + Sync>;

#[derive(Clone, Default)]
pub struct CheckerPool {
    factories: HashMap<String, CheckerFactory>,
}

impl CheckerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool with the built-in checkers for "LinkPlugin", "TextPlugin" and
    /// "FilePlugin".
    pub fn with_defaults() -> Self {
        let mut pool = Self::new();
        pool.register("LinkPlugin", |ctx| Arc::new(LinkPluginChecker::new(ctx)));
        pool.register("TextPlugin", |ctx| Arc::new(TextPluginChecker::new(ctx.manager)));
        pool.register("FilePlugin", |ctx| Arc::new(FilePluginChecker::new(ctx.manager)));
        pool
    }

    /// Registers (or replaces) the checker factory for `plugin_type`.
    pub fn register<F>(&mut self, plugin_type: &str, factory: F)
    where
        F: Fn(CheckerContext) -> Arc<dyn LinkChecker> + Send + Sync + 'static,
    {
        self.factories
            .insert(plugin_type.to_string(), Arc::new(factory));
    }

    /// Builds the checker for `plugin_type`, or `None` if no checker is
    /// registered for it.
    pub fn get_link_checker(
        &self,
        plugin_type: &str,
        ctx: CheckerContext,
    ) -> Option<Arc<dyn LinkChecker>> {
        self.factories.get(plugin_type).map(|factory| factory(ctx))
    }

    pub fn contains(&self, plugin_type: &str) -> bool {
        self.factories.contains_key(plugin_type)
    }

    /// Registered plugin types, sorted.
    pub fn plugin_types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for CheckerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckerPool")
            .field("plugin_types", &self.plugin_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{http_client, LinkManager, ManagerConfig};
    use crate::report::{CheckError, CheckOutcome, LinkReport, PluginRecord, SiteResolver};
    use async_trait::async_trait;
    use std::time::Duration;

    struct AlwaysBroken;

    #[async_trait]
    impl LinkChecker for AlwaysBroken {
        async fn check_link(
            &self,
            _record: &PluginRecord,
            _verify_exists: bool,
        ) -> Result<CheckOutcome, CheckError> {
            Ok(LinkReport::new(false, "x", "y").into())
        }
    }

    fn context() -> CheckerContext {
        let client = http_client(Duration::from_secs(5)).unwrap();
        CheckerContext {
            manager: LinkManager::new(&ManagerConfig::default(), client),
            resolver: Arc::new(SiteResolver::for_domain("example.com").unwrap()),
        }
    }

    #[test]
    fn test_defaults_registered() {
        let pool = CheckerPool::with_defaults();
        assert_eq!(pool.plugin_types(), vec!["FilePlugin", "LinkPlugin", "TextPlugin"]);
        assert!(pool.get_link_checker("LinkPlugin", context()).is_some());
    }

    #[test]
    fn test_unknown_type_is_none() {
        let pool = CheckerPool::with_defaults();
        assert!(pool.get_link_checker("PicturePlugin", context()).is_none());
        assert!(!pool.contains("PicturePlugin"));
    }

    #[tokio::test]
    async fn test_register_custom_checker() {
        let mut pool = CheckerPool::new();
        pool.register("BrokenPlugin", |_ctx| Arc::new(AlwaysBroken));

        let checker = pool.get_link_checker("BrokenPlugin", context()).unwrap();
        let record: PluginRecord = serde_json::from_str(
            r#"{"id": 1, "plugin_type": "BrokenPlugin", "placeholder": {"slot": "s"}}"#,
        )
        .unwrap();
        let reports: Vec<_> = checker.check_link(&record, false).await.unwrap().into_iter().collect();
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].valid);
    }
}
