// src/checker/parts.rs
// =============================================================================
// Splits a raw link string into its six named parts:
//
//   scheme://netloc/path;params?query#fragment
//
// The rules follow the classic "urlparse" behaviour rather than the WHATWG
// URL standard used by the `url` crate. The difference matters for links
// typed into a CMS by hand: "example.com/path" has no "//", so the whole
// string is a *path*, not a host. `Url::parse` would reject it outright.
//
// Rust concepts:
// - Plain structs with owned Strings: each validation owns its own parts
// - impl Display: reassembling the parts with `to_string()`
// =============================================================================

use std::fmt;

/// Schemes whose last path segment may carry `;params`.
const USES_PARAMS: &[&str] = &[
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip",
    "sips", "mms", "sftp", "tel",
];

/// Schemes that are written with a `//netloc` part.
const USES_NETLOC: &[&str] = &[
    "", "ftp", "http", "gopher", "nntp", "telnet", "imap", "wais", "file", "mms", "https",
    "shttp", "snews", "prospero", "rtsp", "rtspu", "rsync", "svn", "svn+ssh", "sftp", "nfs",
    "git", "git+ssh", "ws", "wss",
];

/// The six components of a parsed link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    /// host[:port], possibly with `user:pass@` in front
    pub netloc: String,
    pub path: String,
    pub params: String,
    pub query: String,
    pub fragment: String,
}

impl UrlParts {
    /// Parses `raw` into its six parts. Never fails: anything that does not
    /// look like a scheme or a netloc simply ends up in the path.
    ///
    /// Examples:
    ///   "https://example.com/a;b?c=1#d" -> scheme "https", netloc "example.com",
    ///                                      path "/a", params "b", query "c=1", fragment "d"
    ///   "example.com/path"              -> scheme "", netloc "", path "example.com/path"
    ///   "mailto:joe@example.com"        -> scheme "mailto", path "joe@example.com"
    pub fn parse(raw: &str) -> Self {
        // Browsers ignore leading control characters/spaces and embedded
        // tabs/newlines, so we do the same
        let cleaned: String = raw
            .trim_start_matches(|c: char| c <= ' ')
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();

        let (scheme, rest) = split_scheme(&cleaned);

        let (netloc, rest) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find(['/', '?', '#']).unwrap_or(after.len());
                (after[..end].to_string(), &after[end..])
            }
            None => (String::new(), rest),
        };

        let (rest, fragment) = match rest.split_once('#') {
            Some((before, fragment)) => (before, fragment.to_string()),
            None => (rest, String::new()),
        };

        let (path, query) = match rest.split_once('?') {
            Some((before, query)) => (before, query.to_string()),
            None => (rest, String::new()),
        };

        let (path, params) = if USES_PARAMS.contains(&scheme.as_str()) && path.contains(';') {
            split_params(path)
        } else {
            (path.to_string(), String::new())
        };

        UrlParts {
            scheme,
            netloc,
            path,
            params,
            query,
            fragment,
        }
    }
}

// Reassembles the parts into a URI-reference string
impl fmt::Display for UrlParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut path = self.path.clone();
        if !self.params.is_empty() {
            path = format!("{};{}", path, self.params);
        }

        let writes_netloc = !self.netloc.is_empty()
            || (!self.scheme.is_empty()
                && USES_NETLOC.contains(&self.scheme.as_str())
                && !path.starts_with("//"));

        if writes_netloc {
            if !path.is_empty() && !path.starts_with('/') {
                path.insert(0, '/');
            }
            path = format!("//{}{}", self.netloc, path);
        }

        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        write!(f, "{}", path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

// Returns (lower-cased scheme, remainder). The scheme is empty when the
// text before the first ':' isn't a legal scheme name.
fn split_scheme(url: &str) -> (String, &str) {
    if let Some(colon) = url.find(':') {
        let candidate = &url[..colon];
        let starts_with_letter = candidate
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        let legal = candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

        if starts_with_letter && legal {
            return (candidate.to_ascii_lowercase(), &url[colon + 1..]);
        }
    }
    (String::new(), url)
}

// Splits ";params" off the last path segment
fn split_params(path: &str) -> (String, String) {
    let search_from = path.rfind('/').unwrap_or(0);
    match path[search_from..].find(';') {
        Some(offset) => {
            let i = search_from + offset;
            (path[..i].to_string(), path[i + 1..].to_string())
        }
        None => (path.to_string(), String::new()),
    }
}
