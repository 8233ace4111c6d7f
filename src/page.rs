//! Normalized page snapshot consumed by every check.
//!
//! A `WebsiteData` value is built once per audit by the extractor and then only ever shared
//! by reference, so all checks see the same data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Security headers tracked by the security check (lowercase names)
pub const TRACKED_SECURITY_HEADERS: [&str; 6] = [
    "strict-transport-security",
    "content-security-policy",
    "x-frame-options",
    "x-content-type-options",
    "referrer-policy",
    "permissions-policy",
];

/// Snapshot of one fetched page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteData {
    pub url: String,
    pub status_code: u16,
    /// URLs that redirected before reaching `url`, in order
    pub redirect_chain: Vec<String>,
    pub meta_tags: MetaTags,
    pub headings: Headings,
    pub images: Vec<ImageInfo>,
    pub links: Vec<LinkInfo>,
    /// Links whose check returned status >= 400 or failed
    pub broken_links: Vec<LinkInfo>,
    pub structured_data: Vec<StructuredDataEntry>,
    pub security: SecurityInfo,
    pub performance: PerformanceInfo,
    /// HTML size in bytes
    pub content_length: usize,
    pub word_count: usize,
    /// Visible text length as a percentage of HTML length (0-100)
    pub text_to_html_ratio: f64,
    /// Ranked by descending count
    pub keywords: Vec<KeywordInfo>,
    pub has_sitemap: bool,
    pub has_robots_txt: bool,
    pub css_files: Vec<String>,
    pub js_files: Vec<String>,
}

impl WebsiteData {
    /// Most frequent keyword, shared by every keyword-presence check
    pub fn primary_keyword(&self) -> Option<&KeywordInfo> {
        self.keywords.first()
    }

    /// Return a new snapshot with link statuses applied and `broken_links` recomputed.
    pub fn with_link_statuses(mut self, report: &LinkCheckReport) -> Self {
        for link in &mut self.links {
            if let Some(result) = report.results.iter().find(|r| r.href == link.href) {
                link.status = result.status;
                link.error = result.error.clone();
            }
        }
        self.broken_links = self
            .links
            .iter()
            .filter(|l| l.is_broken())
            .cloned()
            .collect();
        self
    }
}

/// Meta information from the document head
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaTags {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub viewport: Option<String>,
    pub robots: Option<String>,
    pub canonical: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_url: Option<String>,
    pub og_type: Option<String>,
    pub twitter_card: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub theme_color: Option<String>,
}

/// Heading texts by level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl Headings {
    /// Headings at `level` (1-6); empty for any other level
    pub fn level(&self, level: u8) -> &[String] {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            6 => &self.h6,
            _ => &[],
        }
    }

    pub fn level_mut(&mut self, level: u8) -> Option<&mut Vec<String>> {
        match level {
            1 => Some(&mut self.h1),
            2 => Some(&mut self.h2),
            3 => Some(&mut self.h3),
            4 => Some(&mut self.h4),
            5 => Some(&mut self.h5),
            6 => Some(&mut self.h6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageInfo {
    pub src: String,
    pub alt: Option<String>,
    /// Whether the alt attribute is present at all
    pub has_alt: bool,
    pub width: Option<String>,
    pub height: Option<String>,
    pub lazy_loaded: bool,
    /// Format guessed from the file extension or data URI (jpg, png, webp...)
    pub format: Option<String>,
}

impl ImageInfo {
    pub fn has_empty_alt(&self) -> bool {
        self.has_alt && self.alt.as_deref().map_or(true, |a| a.trim().is_empty())
    }

    pub fn has_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkInfo {
    pub href: String,
    pub text: String,
    pub is_internal: bool,
    pub has_text: bool,
    pub nofollow: bool,
    pub target: Option<String>,
    /// HTTP status from the link check, when the link was checked
    pub status: Option<u16>,
    /// Transport error from the link check
    pub error: Option<String>,
}

impl LinkInfo {
    pub fn is_broken(&self) -> bool {
        self.error.is_some() || self.status.is_some_and(|s| s >= 400)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredDataEntry {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityInfo {
    #[serde(rename = "hasSSL")]
    pub has_ssl: bool,
    pub has_mixed_content: bool,
    /// Header name (lowercase) to value; `None` when the header is absent
    pub security_headers: BTreeMap<String, Option<String>>,
}

impl SecurityInfo {
    /// Tracked security headers the response did not send
    pub fn missing_headers(&self) -> Vec<&'static str> {
        TRACKED_SECURITY_HEADERS
            .into_iter()
            .filter(|name| {
                self.security_headers
                    .get(*name)
                    .and_then(|v| v.as_deref())
                    .is_none()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceInfo {
    /// Time until the full body was received
    #[serde(rename = "loadTime")]
    pub load_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_byte_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordInfo {
    pub word: String,
    pub count: usize,
    /// Share of all page tokens, as a percentage
    pub density: f64,
}

/// Outcome of checking a single link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub href: String,
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// Link statuses gathered by the fetch layer. Links that were never resolved are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCheckReport {
    pub results: Vec<LinkStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str) -> LinkInfo {
        LinkInfo {
            href: href.to_string(),
            text: "x".to_string(),
            has_text: true,
            ..LinkInfo::default()
        }
    }

    #[test]
    fn test_link_statuses_mark_broken_links() {
        let data = WebsiteData {
            links: vec![
                link("https://a.test/ok"),
                link("https://a.test/gone"),
                link("https://a.test/down"),
                link("https://a.test/unchecked"),
            ],
            ..WebsiteData::default()
        };
        let report = LinkCheckReport {
            results: vec![
                LinkStatus {
                    href: "https://a.test/ok".to_string(),
                    status: Some(200),
                    error: None,
                },
                LinkStatus {
                    href: "https://a.test/gone".to_string(),
                    status: Some(404),
                    error: None,
                },
                LinkStatus {
                    href: "https://a.test/down".to_string(),
                    status: None,
                    error: Some("connection refused".to_string()),
                },
            ],
        };

        let data = data.with_link_statuses(&report);
        let broken: Vec<&str> = data.broken_links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(broken, vec!["https://a.test/gone", "https://a.test/down"]);
        assert_eq!(data.links[0].status, Some(200));
        assert_eq!(data.links[3].status, None);
    }

    #[test]
    fn test_missing_headers_counts_absent_values() {
        let mut security = SecurityInfo::default();
        assert_eq!(security.missing_headers().len(), 6);

        security.security_headers.insert(
            "x-frame-options".to_string(),
            Some("DENY".to_string()),
        );
        security
            .security_headers
            .insert("content-security-policy".to_string(), None);
        let missing = security.missing_headers();
        assert_eq!(missing.len(), 5);
        assert!(!missing.contains(&"x-frame-options"));
        assert!(missing.contains(&"content-security-policy"));
    }

    #[test]
    fn test_empty_alt_requires_attribute() {
        let missing = ImageInfo {
            src: "a.png".to_string(),
            ..ImageInfo::default()
        };
        assert!(!missing.has_empty_alt());

        let empty = ImageInfo {
            src: "b.png".to_string(),
            has_alt: true,
            alt: Some("  ".to_string()),
            ..ImageInfo::default()
        };
        assert!(empty.has_empty_alt());
    }

    #[test]
    fn test_website_data_json_is_camel_case() {
        let data = WebsiteData {
            url: "https://example.com/".to_string(),
            security: SecurityInfo {
                has_ssl: true,
                ..SecurityInfo::default()
            },
            ..WebsiteData::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["security"]["hasSSL"], true);
        assert!(json.get("redirectChain").is_some());
        assert!(json["performance"].get("loadTime").is_some());

        let partial: WebsiteData =
            serde_json::from_str(r#"{"url":"https://x.test/","wordCount":12}"#).unwrap();
        assert_eq!(partial.word_count, 12);
        assert!(partial.images.is_empty());
    }
}
