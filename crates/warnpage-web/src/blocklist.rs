#![forbid(unsafe_code)]

//! Blocklist matching and redirect construction.
//!
//! A list is plain text with one rule per line:
//!
//! | Line                  | Rule                                        |
//! |-----------------------|---------------------------------------------|
//! | `\|\|example.com^`    | host is `example.com` or any subdomain      |
//! | `\|https://host/`     | host is exactly `host`                      |
//! | `example.com`         | host is exactly `example.com`               |
//! | `\|https://host/path` | URL starts with `https://host/path`         |
//! | `! comment`, `[hdr]`  | skipped                                     |
//!
//! Anything else is skipped. Fetching and refreshing the list is the
//! host's job; this module only answers "where should this navigation go".
//!
//! URLs are parsed with the WHATWG rules browsers use, so a host spelled
//! with backslashes, percent-escapes or embedded tabs still matches.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

/// Interstitial page used when none is configured.
pub const DEFAULT_INTERSTITIAL_PAGE: &str = "interstitial.html";

const MAX_RULES: usize = 50_000;
const MAX_LINE_LEN: usize = 1024;

/// Characters left unescaped in a query parameter value.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One parsed blocklist rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Host equals the domain or is a subdomain of it.
    DomainSuffix(String),
    /// Host equals the domain.
    DomainExact(String),
    /// The full URL starts with this text.
    UrlPrefix(String),
}

impl Rule {
    /// Parse one line. Returns `None` for comments and unsupported syntax.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.len() > MAX_LINE_LEN {
            return None;
        }
        if line.starts_with('!') || line.starts_with('[') {
            return None;
        }
        if let Some(target) = line.strip_prefix("||") {
            let (domain, rest) = split_domain(target)?;
            return (rest.is_empty() || rest == "^")
                .then(|| Self::DomainSuffix(domain.to_ascii_lowercase()));
        }
        if let Some(body) = line.strip_prefix('|') {
            if let Some(domain) = exact_from_url(body) {
                return Some(Self::DomainExact(domain.to_ascii_lowercase()));
            }
            return (!body.is_empty()).then(|| Self::UrlPrefix(body.to_string()));
        }
        is_simple_domain(line).then(|| Self::DomainExact(line.to_ascii_lowercase()))
    }

    /// Whether this rule blocks `url`, whose lowercased host is `host`.
    #[must_use]
    pub fn matches(&self, url: &str, host: Option<&str>) -> bool {
        match (self, host) {
            (Self::DomainSuffix(domain), Some(host)) => {
                host == domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|head| head.ends_with('.'))
            }
            (Self::DomainExact(domain), Some(host)) => host == domain,
            (Self::UrlPrefix(prefix), _) => url.starts_with(prefix.as_str()),
            (_, None) => false,
        }
    }
}

/// A parsed blocklist bound to the interstitial page it redirects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockList {
    rules: Vec<Rule>,
    interstitial_page: String,
}

impl BlockList {
    /// Parse a list, skipping lines that are not rules.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut rules = Vec::new();
        let mut skipped = 0usize;
        for line in text.lines() {
            if rules.len() >= MAX_RULES {
                tracing::warn!(limit = MAX_RULES, "blocklist truncated");
                break;
            }
            match Rule::parse(line) {
                Some(rule) => rules.push(rule),
                None => skipped += 1,
            }
        }
        tracing::debug!(rules = rules.len(), skipped, "blocklist parsed");
        Self {
            rules,
            interstitial_page: DEFAULT_INTERSTITIAL_PAGE.to_string(),
        }
    }

    #[must_use]
    pub fn with_interstitial_page(mut self, page: impl Into<String>) -> Self {
        self.interstitial_page = page.into();
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule that blocks `url`.
    ///
    /// Host rules compare against the parsed host; prefix rules against the
    /// serialized URL, or the raw text when it does not parse.
    #[must_use]
    pub fn matching_rule(&self, url: &str) -> Option<&Rule> {
        let parsed = Url::parse(url).ok();
        let host = parsed.as_ref().and_then(parsed_host);
        let normalized = parsed.as_ref().map_or(url, Url::as_str);
        self.rules
            .iter()
            .find(|rule| rule.matches(normalized, host.as_deref()))
    }

    /// Redirect target for `url`, or `None` if navigation may continue.
    ///
    /// The interstitial page itself is never redirected.
    #[must_use]
    pub fn check(&self, url: &str) -> Option<String> {
        if url.starts_with(self.interstitial_page.as_str()) {
            return None;
        }
        let rule = self.matching_rule(url)?;
        tracing::info!(?rule, "navigation blocked");
        Some(format!(
            "{}?url={}",
            self.interstitial_page,
            encode_component(url)
        ))
    }
}

// ---------------------------------------------------------------------------
// URL helpers
// ---------------------------------------------------------------------------

/// Lowercased host of an absolute URL, without userinfo, port or a
/// trailing dot. `None` for relative URLs and host-less schemes.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok().as_ref().and_then(parsed_host)
}

fn parsed_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_end_matches('.');
    (!host.is_empty()).then(|| host.to_ascii_lowercase())
}

/// Percent-encode `s` for use as a query parameter value.
///
/// Leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` as is and encodes every other
/// UTF-8 byte as `%XX`.
#[must_use]
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, QUERY_VALUE).to_string()
}

fn exact_from_url(body: &str) -> Option<&str> {
    let url = body
        .strip_prefix("http://")
        .or_else(|| body.strip_prefix("https://"))?;
    let (domain, rest) = split_domain(url)?;
    matches!(rest, "" | "^" | "/").then_some(domain)
}

fn split_domain(target: &str) -> Option<(&str, &str)> {
    let end = target
        .find(|c: char| !is_domain_char(c))
        .unwrap_or(target.len());
    let (domain, rest) = target.split_at(end);
    if !is_simple_domain(domain) || rest.starts_with(':') {
        return None;
    }
    Some((domain, rest))
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.'
}

fn is_simple_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.contains('.')
        && domain.split('.').all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
