// src/checker/mod.rs
// =============================================================================
// This module contains all link validation logic.
//
// Submodules:
// - parts: Splits a link into scheme/netloc/path/params/query/fragment
// - router: Picks a validator by scheme (the main entry point)
// - web: http/https/ftp/ftps syntax + HEAD/GET existence checks
// - mail: e-mail address syntax
// - tel: phone numbers via libphonenumber
// - bitcoin: base-58 address checksums
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod bitcoin;
mod mail;
mod parts;
mod router;
mod tel;
mod web;

#[cfg(test)]
pub(crate) mod test_server;

// Re-export public items from submodules
// This lets users write `checker::LinkManager` instead of
// `checker::router::LinkManager`
pub use bitcoin::{validate_bitcoin, BitcoinValidator};
pub use mail::{validate_mailto, MailtoValidator};
pub use parts::UrlParts;
pub use router::{
    LinkManager, ManagerConfig, SchemeRegistry, SchemeValidator, DEFAULT_LANGUAGE,
    DEFAULT_NETLOC, DEFAULT_SCHEME,
};
pub use tel::{region_for_language, validate_tel, TelValidator};
pub use web::{http_client, is_valid_web_url, WebValidator, WEB_SCHEMES};
