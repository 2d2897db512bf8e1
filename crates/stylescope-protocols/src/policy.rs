//! URL restriction policy.
//!
//! Decides which page addresses the extension may act upon. Matching is
//! substring/prefix based against a fixed, ordered pattern list; the first
//! matching pattern determines the restriction category.

use serde::{Deserialize, Serialize};

/// Why a page address is (or is not) restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestrictionCategory {
    BrowserInternal,
    ExtensionStore,
    LocalFile,
    DataUrl,
    Other,
    /// Empty or missing address.
    Unknown,
    /// Not restricted.
    None,
}

impl RestrictionCategory {
    /// Kebab-case name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrowserInternal => "browser-internal",
            Self::ExtensionStore => "extension-store",
            Self::LocalFile => "local-file",
            Self::DataUrl => "data-url",
            Self::Other => "other",
            Self::Unknown => "unknown",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for RestrictionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known address pattern.
#[derive(Debug, Clone, Copy)]
pub struct UrlPattern {
    pub pattern: &'static str,
    pub description: &'static str,
    pub category: RestrictionCategory,
}

/// Addresses the extension cannot access, in match order.
pub const BLOCKED_PATTERNS: &[UrlPattern] = &[
    UrlPattern {
        pattern: "chrome://",
        description: "Chrome internal pages",
        category: RestrictionCategory::BrowserInternal,
    },
    UrlPattern {
        pattern: "chrome-extension://",
        description: "Chrome extension pages",
        category: RestrictionCategory::BrowserInternal,
    },
    UrlPattern {
        pattern: "edge://",
        description: "Edge internal pages",
        category: RestrictionCategory::BrowserInternal,
    },
    UrlPattern {
        pattern: "about:",
        description: "Browser about pages",
        category: RestrictionCategory::BrowserInternal,
    },
    UrlPattern {
        pattern: "moz-extension://",
        description: "Firefox extension pages",
        category: RestrictionCategory::BrowserInternal,
    },
    UrlPattern {
        pattern: "chrome.google.com/webstore",
        description: "Chrome Web Store",
        category: RestrictionCategory::ExtensionStore,
    },
    UrlPattern {
        pattern: "chromewebstore.google.com",
        description: "Chrome Web Store (alternative)",
        category: RestrictionCategory::ExtensionStore,
    },
    UrlPattern {
        pattern: "addons.mozilla.org",
        description: "Firefox Add-ons Store",
        category: RestrictionCategory::ExtensionStore,
    },
    UrlPattern {
        pattern: "microsoftedge.microsoft.com/addons",
        description: "Edge Add-ons Store",
        category: RestrictionCategory::ExtensionStore,
    },
    UrlPattern {
        pattern: "file://",
        description: "Local file system",
        category: RestrictionCategory::LocalFile,
    },
    UrlPattern {
        pattern: "data:",
        description: "Data URLs",
        category: RestrictionCategory::DataUrl,
    },
    UrlPattern {
        pattern: "blob:",
        description: "Blob URLs",
        category: RestrictionCategory::DataUrl,
    },
];

/// Schemes positively recognised as normal web pages.
pub const ALLOWED_PREFIXES: &[&str] = &["http://", "https://"];

/// Result of classifying a page address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionVerdict {
    pub is_restricted: bool,
    pub category: RestrictionCategory,
    pub message: String,
}

fn matching_pattern(url: &str) -> Option<&'static UrlPattern> {
    BLOCKED_PATTERNS
        .iter()
        .find(|p| url.contains(p.pattern) || url.starts_with(p.pattern))
}

/// Classify a page address.
pub fn classify(url: &str) -> RestrictionVerdict {
    let category = restriction_category(url);
    RestrictionVerdict {
        is_restricted: is_restricted(url),
        category,
        message: message_for(category).to_string(),
    }
}

/// True when the address is empty or matches a blocked pattern.
pub fn is_restricted(url: &str) -> bool {
    url.is_empty() || matching_pattern(url).is_some()
}

/// True when the address starts with an allowed scheme.
pub fn is_allowed(url: &str) -> bool {
    !url.is_empty() && ALLOWED_PREFIXES.iter().any(|p| url.starts_with(p))
}

/// Whether the extension may run on this address.
///
/// Absence of a restriction is not enough; the address must also be a
/// recognised web page.
pub fn can_execute(url: &str) -> bool {
    !is_restricted(url) && is_allowed(url)
}

/// Restriction category for an address.
pub fn restriction_category(url: &str) -> RestrictionCategory {
    if url.is_empty() {
        return RestrictionCategory::Unknown;
    }
    matching_pattern(url)
        .map(|p| p.category)
        .unwrap_or(RestrictionCategory::None)
}

/// User-facing message explaining why an address cannot be inspected.
pub fn restriction_message(url: &str) -> String {
    message_for(restriction_category(url)).to_string()
}

fn message_for(category: RestrictionCategory) -> &'static str {
    match category {
        RestrictionCategory::BrowserInternal => {
            "Cannot access browser internal pages. Please navigate to a regular website to use this extension."
        }
        RestrictionCategory::ExtensionStore => {
            "Cannot access extension store pages. Please navigate to a regular website to use this extension."
        }
        RestrictionCategory::LocalFile => {
            "Cannot access local files. Please navigate to a website to use this extension."
        }
        RestrictionCategory::DataUrl => {
            "Cannot access data URLs or blob URLs. Please navigate to a regular website to use this extension."
        }
        _ => "Cannot access this page. Please navigate to a regular website to use this extension.",
    }
}

/// Page classification shown by the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    BrowserInternal,
    ExtensionStore,
    LocalFile,
    DataUrl,
    SecureWeb,
    Web,
    Unknown,
}

/// Classify an address for display purposes.
pub fn page_kind(url: &str) -> PageKind {
    match restriction_category(url) {
        RestrictionCategory::BrowserInternal => PageKind::BrowserInternal,
        RestrictionCategory::ExtensionStore => PageKind::ExtensionStore,
        RestrictionCategory::LocalFile => PageKind::LocalFile,
        RestrictionCategory::DataUrl => PageKind::DataUrl,
        RestrictionCategory::Unknown | RestrictionCategory::Other => PageKind::Unknown,
        RestrictionCategory::None if url.starts_with("https://") => PageKind::SecureWeb,
        RestrictionCategory::None if url.starts_with("http://") => PageKind::Web,
        RestrictionCategory::None => PageKind::Unknown,
    }
}

/// Whether the address points at a local development server.
pub fn is_local_dev(url: &str) -> bool {
    url.starts_with("localhost") || url.starts_with("127.0.0.1") || url.contains("://localhost")
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
