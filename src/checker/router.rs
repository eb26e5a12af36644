// src/checker/router.rs
// =============================================================================
// The link validation router: the main entry point for checking a URL.
//
// How a link is checked:
// 1. Empty input is invalid, full stop
// 2. The link is split into its six parts (see parts.rs)
// 3. A missing scheme is replaced with the configured default ("http")
// 4. Web schemes (http, https, ftp, ftps) go to the web validator
// 5. Any other scheme is looked up in the scheme registry
// 6. Unknown schemes count as broken; each one is warned about once
//
// New schemes are added by registering a validator under its name; the
// dispatch code below never changes.
//
// Rust concepts:
// - Traits + trait objects (Arc<dyn SchemeValidator>): pluggable validators
// - HashMap: the scheme name -> validator registry
// - Arc: cheap shared ownership of the read-only registry
// =============================================================================

use async_trait::async_trait;
use phonenumber::country;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::warn;

use super::bitcoin::{validate_bitcoin, BitcoinValidator};
use super::mail::{validate_mailto, MailtoValidator};
use super::parts::UrlParts;
use super::tel::{region_for_language, validate_tel, TelValidator};
use super::web::{WebValidator, WEB_SCHEMES};

/// Default scheme for links typed without one.
pub const DEFAULT_SCHEME: &str = "http";
/// Default host for links without a host of their own.
pub const DEFAULT_NETLOC: &str = "localhost:8000";
/// Default site language, used to pick the phone-number region.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A validation strategy for one URL scheme.
///
/// Implementations turn every expected failure (bad syntax, unreachable
/// host) into `false`; they never error or panic.
#[async_trait]
pub trait SchemeValidator: Send + Sync {
    async fn validate(&self, parts: &UrlParts, verify_exists: bool) -> bool;
}

/// Maps scheme names to their validators.
///
/// Filled at startup and read-only afterwards, so one registry can be shared
/// between many routers.
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    validators: HashMap<String, Arc<dyn SchemeValidator>>,
}

impl SchemeRegistry {
    /// An empty registry: only web schemes will validate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `mailto`, `tel` and `bitcoin` validators.
    pub fn with_defaults(region: Option<country::Id>) -> Self {
        let mut registry = Self::new();
        registry.register("mailto", MailtoValidator);
        registry.register("tel", TelValidator::new(region));
        registry.register("bitcoin", BitcoinValidator);
        registry
    }

    /// Registers (or replaces) the validator for `scheme`.
    pub fn register(&mut self, scheme: &str, validator: impl SchemeValidator + 'static) {
        self.validators
            .insert(scheme.to_ascii_lowercase(), Arc::new(validator));
    }

    pub fn get(&self, scheme: &str) -> Option<Arc<dyn SchemeValidator>> {
        self.validators.get(scheme).cloned()
    }

    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }
}

impl fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut schemes: Vec<_> = self.schemes().collect();
        schemes.sort_unstable();
        f.debug_struct("SchemeRegistry")
            .field("schemes", &schemes)
            .finish()
    }
}

/// Settings a router is built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManagerConfig {
    /// Scheme used when a link has none
    pub scheme: String,
    /// host[:port] used when a link has no host
    pub netloc: String,
    /// Site language code, e.g. "en" or "de-ch"
    pub language: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            netloc: DEFAULT_NETLOC.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Routes links to the validator for their scheme.
///
/// A `LinkManager` is immutable once built; clone it (cheap) to share it
/// between tasks. Clones also share the record of schemes already warned
/// about.
#[derive(Debug, Clone)]
pub struct LinkManager {
    scheme: String,
    netloc: String,
    region: Option<country::Id>,
    web: WebValidator,
    registry: Arc<SchemeRegistry>,
    warned_schemes: Arc<Mutex<HashSet<String>>>,
}

impl LinkManager {
    /// Builds a router with the built-in scheme validators.
    pub fn new(config: &ManagerConfig, client: Client) -> Self {
        let region = region_for_language(&config.language);
        let registry = SchemeRegistry::with_defaults(region);
        Self::with_registry(config, client, Arc::new(registry))
    }

    /// Builds a router that dispatches through a custom registry.
    pub fn with_registry(config: &ManagerConfig, client: Client, registry: Arc<SchemeRegistry>) -> Self {
        Self {
            scheme: config.scheme.clone(),
            netloc: config.netloc.clone(),
            region: region_for_language(&config.language),
            web: WebValidator::new(config.netloc.clone(), client),
            registry,
            warned_schemes: Arc::default(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn netloc(&self) -> &str {
        &self.netloc
    }

    /// Validates any link. This is the primary entry point.
    ///
    /// Returns false for empty input, bad syntax, unknown schemes and (with
    /// `verify_exists`) unreachable targets.
    pub async fn validate_url(&self, url: &str, verify_exists: bool) -> bool {
        if url.is_empty() {
            // Never treated as a link to the site root
            return false;
        }

        let mut parts = UrlParts::parse(url);

        if parts.scheme.is_empty() {
            // "/about/" -> "http:///about/"; the web validator adds the host
            parts.scheme = self.scheme.clone();
        }

        if WEB_SCHEMES.contains(&parts.scheme.as_str()) {
            return self.web.validate(&parts, verify_exists).await;
        }

        let validator = match self.registry.get(&parts.scheme) {
            Some(validator) if parts.scheme != "url" => validator,
            _ => {
                if self.first_warning_for(&parts.scheme) {
                    warn!(scheme = %parts.scheme, url, "validator not found for scheme");
                }
                return false;
            }
        };

        validator.validate(&parts, verify_exists).await
    }

    // True the first time `scheme` is seen
    fn first_warning_for(&self, scheme: &str) -> bool {
        match self.warned_schemes.lock() {
            Ok(mut warned) => warned.insert(scheme.to_string()),
            Err(_) => true,
        }
    }

    /// Validates a bare e-mail address (no "mailto:" prefix).
    pub fn validate_mailto(&self, email: &str, verify_exists: bool) -> bool {
        validate_mailto(email, verify_exists)
    }

    /// Validates a bare phone number in the site's region.
    pub fn validate_tel(&self, number: &str, verify_exists: bool) -> bool {
        validate_tel(number, self.region, verify_exists)
    }

    /// Validates a bare Bitcoin address.
    pub fn validate_bitcoin(&self, address: &str, verify_exists: bool) -> bool {
        validate_bitcoin(address, verify_exists)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn SchemeValidator>?
//    - `dyn SchemeValidator` means "any type that implements the trait"
//    - Different validators are different types, so the map stores them
//      behind a pointer; Arc lets several routers share one validator
//
// 2. Why #[async_trait]?
//    - Trait methods can't be `async fn` when used as trait objects
//    - The macro rewrites them to return a boxed future
//
// 3. Why `Some(validator) if parts.scheme != "url"`?
//    - "url" is a placeholder scheme name; even if someone registers it,
//      it must never validate
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::test_server::{self, Reply};
    use crate::checker::web::http_client;
    use std::time::Duration;

    fn manager() -> LinkManager {
        let client = http_client(Duration::from_secs(5)).unwrap();
        LinkManager::new(&ManagerConfig::default(), client)
    }

    // Accepts anything, to test registration
    struct AcceptAll;

    #[async_trait]
    impl SchemeValidator for AcceptAll {
        async fn validate(&self, _parts: &UrlParts, _verify_exists: bool) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_empty_url_is_invalid() {
        let manager = manager();
        assert!(!manager.validate_url("", false).await);
        assert!(!manager.validate_url("", true).await);
    }

    #[tokio::test]
    async fn test_valid_web_urls() {
        let manager = manager();
        for url in [
            "http://example.com",
            "https://www.rust-lang.org/tools/install",
            "ftp://ftp.example.org/pub/file.tar.gz",
            "ftps://ftp.example.org/",
            "/media/uploads/report.pdf",
        ] {
            assert!(manager.validate_url(url, false).await, "{url} should be valid");
        }
    }

    #[tokio::test]
    async fn test_missing_host_equals_default_host() {
        let manager = manager();
        assert_eq!(
            manager.validate_url("http:/about/", false).await,
            manager.validate_url("http://localhost:8000/about/", false).await
        );
    }

    #[tokio::test]
    async fn test_hostlike_text_without_scheme_is_a_path() {
        // "example.com/path" has no "//", so "example.com" is a path segment
        // and the link points at http://localhost:8000/example.com/path
        let parts = UrlParts::parse("example.com/path");
        assert_eq!(parts.netloc, "");
        assert_eq!(parts.path, "example.com/path");

        assert!(manager().validate_url("example.com/path", false).await);
    }

    #[tokio::test]
    async fn test_default_scheme_is_configurable() {
        let client = http_client(Duration::from_secs(5)).unwrap();
        let config = ManagerConfig {
            scheme: "mailto".to_string(),
            ..ManagerConfig::default()
        };
        let manager = LinkManager::new(&config, client);
        assert!(manager.validate_url("joe@example.com", false).await);
    }

    #[tokio::test]
    async fn test_dispatch_to_registered_schemes() {
        let manager = manager();
        assert!(manager.validate_url("mailto:joe@example.com", false).await);
        assert!(!manager.validate_url("mailto:joe", false).await);
        assert!(manager.validate_url("tel:+1-201-555-0123", false).await);
        assert!(manager.validate_url("bitcoin:1BoatSLRHtKNngkdXEeobR76b53LETtpyT", false).await);
        assert!(!manager.validate_url("bitcoin:1BoatSLRHtKNngkdXEeobR76b53LETtpyX", false).await);
    }

    #[tokio::test]
    async fn test_unknown_scheme_fails_closed() {
        let manager = manager();
        assert!(!manager.validate_url("unknown-scheme://x", false).await);
        assert!(!manager.validate_url("javascript:alert(1)", false).await);
        assert!(!manager.validate_url("url:anything", false).await);
    }

    #[tokio::test]
    async fn test_unknown_scheme_warned_once() {
        let manager = manager();
        let shared = manager.clone();

        assert!(!manager.validate_url("javascript:void(0)", false).await);
        assert!(!shared.validate_url("javascript:void(0)", false).await);

        // Both calls failed closed, but only the first one warned
        assert!(!manager.first_warning_for("javascript"));
        assert!(manager.first_warning_for("gopher"));
    }

    #[test]
    fn test_accessors_reflect_config() {
        let client = http_client(Duration::from_secs(5)).unwrap();
        let config = ManagerConfig {
            scheme: "https".to_string(),
            netloc: "www.example.com".to_string(),
            language: "de".to_string(),
        };
        let manager = LinkManager::new(&config, client);
        assert_eq!(manager.scheme(), "https");
        assert_eq!(manager.netloc(), "www.example.com");
    }

    #[tokio::test]
    async fn test_custom_scheme_registration() {
        let client = http_client(Duration::from_secs(5)).unwrap();
        let mut registry = SchemeRegistry::with_defaults(None);
        registry.register("sms", AcceptAll);
        registry.register("url", AcceptAll);

        let manager = LinkManager::with_registry(&ManagerConfig::default(), client, Arc::new(registry));
        assert!(manager.validate_url("sms:+15555550123", false).await);
        // The placeholder scheme never validates
        assert!(!manager.validate_url("url:anything", false).await);
    }

    #[tokio::test]
    async fn test_direct_entry_points() {
        let manager = manager();
        assert!(manager.validate_mailto("joe@example.com", false));
        assert!(manager.validate_tel("+44 121 234 5678", true));
        assert!(manager.validate_bitcoin("1BoatSLRHtKNngkdXEeobR76b53LETtpyT", false));
    }

    #[tokio::test]
    async fn test_verify_exists_goes_through_router() {
        let base = test_server::start(Reply::status(500), Reply::status(200)).await;
        assert!(manager().validate_url(&base, true).await);

        let base = test_server::start(Reply::status(404), Reply::status(404)).await;
        assert!(!manager().validate_url(&base, true).await);
    }
}
