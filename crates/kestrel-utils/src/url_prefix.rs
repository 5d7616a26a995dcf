//! URL prefix resolution for address bar text
//!
//! 1. Fully qualified URL → returned unchanged
//! 2. Host-like text → default scheme prepended
//! 3. Anything else → search engine URL

use std::net::IpAddr;
use url::form_urlencoded;
use url::Url;

/// Schemes accepted as-is even without `//`
const KNOWN_SCHEMES: &[&str] = &[
    "http",
    "https",
    "file",
    "ftp",
    "ws",
    "wss",
    "about",
    "data",
    "blob",
    "view-source",
    "javascript",
    "mailto",
];

pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://duckduckgo.com/?q=%s";
pub const DEFAULT_SCHEME: &str = "https://";
pub const BLANK_PAGE: &str = "about:blank";

/// How a piece of input was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Empty input
    Blank,
    /// Already a complete URL
    Qualified(String),
    /// Host-like input with the default scheme added
    Prefixed(String),
    /// Free text turned into a search URL
    Search(String),
}

impl Resolution {
    pub fn into_url(self) -> String {
        match self {
            Resolution::Blank => BLANK_PAGE.to_string(),
            Resolution::Qualified(url) | Resolution::Prefixed(url) | Resolution::Search(url) => url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UrlPrefixResolver {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
    /// Scheme prepended to host-like input, including `://`
    default_scheme: String,
}

impl UrlPrefixResolver {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
            default_scheme: DEFAULT_SCHEME.to_string(),
        }
    }

    pub fn with_search_engine(template: String) -> Self {
        Self {
            search_template: template,
            ..Self::new()
        }
    }

    pub fn with_default_scheme(mut self, scheme: String) -> Self {
        self.default_scheme = scheme;
        self
    }

    /// Resolve raw input into a fully qualified URL
    pub fn resolve(&self, input: &str) -> String {
        self.classify(input).into_url()
    }

    /// Resolve input, keeping track of which rule applied
    pub fn classify(&self, input: &str) -> Resolution {
        let input = input.trim();

        if input.is_empty() {
            return Resolution::Blank;
        }

        if is_fully_qualified(input) {
            return Resolution::Qualified(input.to_string());
        }

        if let Some(url) = self.try_prefix(input) {
            return Resolution::Prefixed(url);
        }

        Resolution::Search(self.build_search_url(input))
    }

    fn try_prefix(&self, input: &str) -> Option<String> {
        if !looks_like_host(input) {
            return None;
        }

        let (host, rest) = split_host_and_rest(input);
        let prefixed = if is_ipv6_host(host) && !host.starts_with('[') {
            format!("{}[{}]{}", self.default_scheme, host, rest)
        } else {
            format!("{}{}{}", self.default_scheme, host, rest)
        };

        Url::parse(&prefixed).ok().map(|_| prefixed)
    }

    fn build_search_url(&self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.search_template.replace("%s", &encoded)
    }
}

impl Default for UrlPrefixResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve with the default search engine and scheme
pub fn url_with_prefix(input: &str) -> String {
    UrlPrefixResolver::new().resolve(input)
}

/// True when `input` already carries a scheme and parses as a URL
pub fn is_fully_qualified(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };

    let scheme = scheme.to_ascii_lowercase();
    let known = KNOWN_SCHEMES.contains(&scheme.as_str());
    let hierarchical = rest.starts_with("//")
        && !scheme.is_empty()
        && scheme.chars().all(|c| c.is_ascii_alphabetic() || c == '+' || c == '-' || c == '.');

    (known || hierarchical) && Url::parse(input).is_ok()
}

fn looks_like_host(input: &str) -> bool {
    if input.contains(char::is_whitespace) {
        return false;
    }

    let (host, _) = split_host_and_rest(input);

    // Userinfo is never typed as an address
    if host.contains('@') {
        return false;
    }

    if host == "localhost" || host.starts_with("localhost:") || parse_ip_host(host).is_some() {
        return true;
    }

    let host = host.split(':').next().unwrap_or(host);
    let mut labels = host.split('.');
    let Some(tld) = labels.next_back() else {
        return false;
    };

    // Need at least one label before the TLD
    if labels.next().is_none() {
        return false;
    }

    (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_ipv6_host(host: &str) -> bool {
    matches!(parse_ip_host(host), Some(IpAddr::V6(_)))
}

fn parse_ip_host(host: &str) -> Option<IpAddr> {
    let host = host.trim();
    if host.is_empty() {
        return None;
    }

    let host = if let Some(bracketed) = host.strip_prefix('[') {
        bracketed.split(']').next().unwrap_or(bracketed)
    } else if host.matches(':').count() == 1 {
        host.split(':').next().unwrap_or(host)
    } else {
        host
    };

    host.parse().ok()
}

fn split_host_and_rest(input: &str) -> (&str, &str) {
    let cut = input
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(input.len());

    input.split_at(cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &[(&str, &str)] = &[
        ("https://example.com", "https://example.com"),
        ("http://example.com/a?b=c", "http://example.com/a?b=c"),
        ("example.com", "https://example.com"),
        ("www.example.co.uk/path", "https://www.example.co.uk/path"),
        ("localhost:8080", "https://localhost:8080"),
        ("localhost", "https://localhost"),
        ("192.168.0.1", "https://192.168.0.1"),
        ("10.0.0.1:3000/x", "https://10.0.0.1:3000/x"),
        ("::1", "https://[::1]"),
        ("[::1]:8080", "https://[::1]:8080"),
        ("2001:db8::1/path", "https://[2001:db8::1]/path"),
        ("about:blank", "about:blank"),
        ("file:///tmp/index.html", "file:///tmp/index.html"),
        ("", "about:blank"),
        ("   ", "about:blank"),
        ("  example.com  ", "https://example.com"),
    ];

    #[test]
    fn test_resolution_table() {
        let resolver = UrlPrefixResolver::new();
        for (input, expected) in CASES {
            assert_eq!(resolver.resolve(input), *expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_search_fallback() {
        let resolver = UrlPrefixResolver::new();

        let url = resolver.resolve("rust programming");
        assert_eq!(url, "https://duckduckgo.com/?q=rust+programming");

        match resolver.classify("what is a tab?") {
            Resolution::Search(url) => assert!(url.contains("what+is+a+tab%3F")),
            other => panic!("Expected Search, got {:?}", other),
        }

        // No TLD-like suffix
        assert!(matches!(resolver.classify("kestrel"), Resolution::Search(_)));
        assert!(matches!(resolver.classify("v1.2"), Resolution::Search(_)));
    }

    #[test]
    fn test_email_address_is_searched() {
        let resolver = UrlPrefixResolver::new();

        assert_eq!(
            resolver.resolve("user@example.com"),
            "https://duckduckgo.com/?q=user%40example.com"
        );
        assert!(matches!(
            resolver.classify("user@example.com/inbox"),
            Resolution::Search(_)
        ));
        assert_eq!(
            resolver.resolve("mailto:user@example.com"),
            "mailto:user@example.com"
        );
    }

    #[test]
    fn test_custom_engine_and_scheme() {
        let resolver = UrlPrefixResolver::with_search_engine(
            "https://www.google.com/search?q=%s".to_string(),
        )
        .with_default_scheme("http://".to_string());

        assert_eq!(resolver.resolve("example.org"), "http://example.org");
        assert_eq!(
            resolver.resolve("hello world"),
            "https://www.google.com/search?q=hello+world"
        );
    }

    #[test]
    fn test_resolving_twice_is_idempotent() {
        let resolver = UrlPrefixResolver::new();
        let inputs = [
            "example.com",
            "rust programming",
            "::1",
            "localhost:8080/a#b",
            "",
            "HTTPS://Example.com",
            "custom+scheme://thing",
            "a b c.com",
        ];

        for input in inputs {
            let once = resolver.resolve(input);
            assert_eq!(resolver.resolve(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_fully_qualified_detection() {
        assert!(is_fully_qualified("https://example.com"));
        assert!(is_fully_qualified("mailto:someone@example.com"));
        assert!(is_fully_qualified("chrome-extension://abc/page"));
        assert!(!is_fully_qualified("localhost:8080"));
        assert!(!is_fully_qualified("example.com"));
        assert!(!is_fully_qualified("http://"));
    }

    #[test]
    fn test_free_function_uses_defaults() {
        assert_eq!(url_with_prefix("example.com"), "https://example.com");
    }
}
