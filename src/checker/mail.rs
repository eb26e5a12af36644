// src/checker/mail.rs
// =============================================================================
// Syntax validation for e-mail addresses (mailto: links and plain addresses).
//
// An address is split at its LAST '@':
// - the user part must be a dot-atom (joe.bloggs+tag) or a quoted string
// - the domain must be a host name with a top-level domain, an address
//   literal like [127.0.0.1], or "localhost"
//
// There is no way to verify that a mailbox exists without sending mail, so
// `verify_exists` is accepted and ignored.
// =============================================================================

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

use super::parts::UrlParts;
use super::router::SchemeValidator;

// RFC 3696 limit for a full address
const MAX_EMAIL_LENGTH: usize = 320;

const DOMAIN_ALLOWLIST: &[&str] = &["localhost"];

static USER_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        // dot-atom
        r"(?i)^[-!#$%&'*+/=?^_`{}|~0-9a-z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*\z",
        // quoted-string
        r#"|^"(?:[\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*"\z"#,
    ))
    .expect("user part regex must compile")
});

static DOMAIN_PART: Lazy<Regex> = Lazy::new(|| {
    let ul = r"\x{00a1}-\x{d7ff}\x{e000}-\x{ffff}";
    let pattern = format!(
        r"(?i)^(?:[a-z{ul}0-9](?:[a-z{ul}0-9-]{{0,61}}[a-z{ul}0-9])?\.)+[a-z{ul}0-9-]{{1,62}}[a-z{ul}0-9]\z"
    );
    Regex::new(&pattern).expect("domain part regex must compile")
});

static LITERAL_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[([a-f0-9:.]+)\]\z").expect("literal regex must compile"));

/// Returns true if `email` is a syntactically valid e-mail address.
///
/// `verify_exists` has no effect: mailboxes are never probed.
pub fn validate_mailto(email: &str, _verify_exists: bool) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }

    let Some((user, domain)) = email.rsplit_once('@') else {
        return false;
    };

    if !USER_PART.is_match(user) {
        return false;
    }

    if DOMAIN_ALLOWLIST.contains(&domain) {
        return true;
    }

    is_valid_domain(domain)
}

fn is_valid_domain(domain: &str) -> bool {
    if DOMAIN_PART.is_match(domain) {
        return true;
    }

    // Address literals such as [192.0.2.1] or [::1]
    LITERAL_PART
        .captures(domain)
        .and_then(|caps| caps.get(1))
        .is_some_and(|ip| ip.as_str().parse::<IpAddr>().is_ok())
}

/// Validator registered for the `mailto` scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct MailtoValidator;

#[async_trait]
impl SchemeValidator for MailtoValidator {
    async fn validate(&self, parts: &UrlParts, verify_exists: bool) -> bool {
        // mailto:joe@example.com?subject=... -> "joe@example.com"
        validate_mailto(&parts.path, verify_exists)
    }
}
