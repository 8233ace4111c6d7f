//! seoaudit: Single-page SEO auditor
//!
//! This library turns a fetched page into a normalized [`page::WebsiteData`] snapshot, runs a
//! fixed catalog of independent checks against it and scores the resulting issues.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod page;
pub mod reporter;
pub mod watcher;

pub use error::AuditError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The result of auditing one page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Audited page URL
    pub url: String,
    /// Overall score (0-100)
    pub score: u8,
    /// Number of issues with severity `good`
    pub passed_checks: usize,
    /// Number of issues with severity `warning`
    pub warning_checks: usize,
    /// Number of issues with severity `error`
    pub error_checks: usize,
    /// Per-category scores, in the order categories first appear in `issues`
    pub category_scores: Vec<CategoryScore>,
    /// All issues in catalog order
    pub issues: Vec<Issue>,
    /// When the audit finished
    pub timestamp: DateTime<Utc>,
    /// Time spent running the checks, in milliseconds
    pub scan_duration: u64,
    /// Page title, if the page has one
    pub page_title: Option<String>,
    /// Checks that faulted and contributed no issues
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_checks: Vec<String>,
}

impl AuditResult {
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score)
    }

    /// Issues that need attention (warnings and errors)
    pub fn problems(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity != Severity::Good)
    }
}

/// Score for one category of issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub name: Category,
    /// Weighted score of the category's issues (0-100)
    pub score: u8,
    /// Number of warning and error issues in the category
    pub issue_count: usize,
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// A single classified finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Check that produced this issue
    pub check: CheckId,
    /// Short headline
    pub title: String,
    /// Human-readable explanation
    pub description: String,
    pub severity: Severity,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
    /// How to fix it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Offending elements (image sources, link targets, heading texts...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<String>>,
    /// Further reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_links: Option<Vec<ResourceLink>>,
}

impl Issue {
    pub fn new(
        check: CheckId,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            check,
            title: title.into(),
            description: description.into(),
            severity,
            category,
            impact: None,
            recommendation: None,
            elements: None,
            resource_links: None,
        }
    }

    pub fn good(
        check: CheckId,
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(check, category, Severity::Good, title, description)
    }

    pub fn warning(
        check: CheckId,
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(check, category, Severity::Warning, title, description)
    }

    pub fn error(
        check: CheckId,
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(check, category, Severity::Error, title, description)
    }

    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = Some(elements.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_resource(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.resource_links
            .get_or_insert_with(Vec::new)
            .push(ResourceLink {
                title: title.into(),
                url: url.into(),
            });
        self
    }
}

/// Documentation link attached to an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
}

/// Severity levels for issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Warning,
    Error,
}

impl Severity {
    /// Contribution of one issue to a score (good counts fully, warning half, error nothing)
    pub fn weight(self) -> u32 {
        match self {
            Severity::Good => 100,
            Severity::Warning => 50,
            Severity::Error => 0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Good => write!(f, "good"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Business impact of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::High => write!(f, "high"),
            Impact::Medium => write!(f, "medium"),
            Impact::Low => write!(f, "low"),
        }
    }
}

/// Scoring category. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Meta Tags")]
    MetaTags,
    #[serde(rename = "Headings")]
    Headings,
    #[serde(rename = "Images")]
    Images,
    #[serde(rename = "Links")]
    Links,
    #[serde(rename = "Content")]
    Content,
    #[serde(rename = "Mobile")]
    Mobile,
    #[serde(rename = "Performance")]
    Performance,
    #[serde(rename = "Security")]
    Security,
    #[serde(rename = "Structured Data")]
    StructuredData,
    #[serde(rename = "Social Media")]
    SocialMedia,
    #[serde(rename = "URL Structure")]
    UrlStructure,
    #[serde(rename = "Technical SEO")]
    Technical,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::MetaTags => "Meta Tags",
            Category::Headings => "Headings",
            Category::Images => "Images",
            Category::Links => "Links",
            Category::Content => "Content",
            Category::Mobile => "Mobile",
            Category::Performance => "Performance",
            Category::Security => "Security",
            Category::StructuredData => "Structured Data",
            Category::SocialMedia => "Social Media",
            Category::UrlStructure => "URL Structure",
            Category::Technical => "Technical SEO",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Checks in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckId {
    TitleTag,
    MetaDescription,
    Headings,
    Images,
    Links,
    ContentQuality,
    Mobile,
    Performance,
    Security,
    StructuredData,
    SocialMedia,
    UrlStructure,
    TechnicalSeo,
}

impl CheckId {
    pub const ALL: [CheckId; 13] = [
        CheckId::TitleTag,
        CheckId::MetaDescription,
        CheckId::Headings,
        CheckId::Images,
        CheckId::Links,
        CheckId::ContentQuality,
        CheckId::Mobile,
        CheckId::Performance,
        CheckId::Security,
        CheckId::StructuredData,
        CheckId::SocialMedia,
        CheckId::UrlStructure,
        CheckId::TechnicalSeo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckId::TitleTag => "title-tag",
            CheckId::MetaDescription => "meta-description",
            CheckId::Headings => "headings",
            CheckId::Images => "images",
            CheckId::Links => "links",
            CheckId::ContentQuality => "content-quality",
            CheckId::Mobile => "mobile",
            CheckId::Performance => "performance",
            CheckId::Security => "security",
            CheckId::StructuredData => "structured-data",
            CheckId::SocialMedia => "social-media",
            CheckId::UrlStructure => "url-structure",
            CheckId::TechnicalSeo => "technical-seo",
        }
    }
}

impl std::fmt::Display for CheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckId {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AuditError::UnknownCheck(s.to_string()))
    }
}

/// Public API: audit a single HTML (or `WebsiteData` JSON) file. Used by programmatic consumers.
///
/// * `path` - path to the page file
/// * `page_url` - URL the page is judged against (default: the file's `file://` URL)
/// * `work_dir` - directory for config lookup
/// * `config_path` - optional path to .seoauditrc.json; if None, searches from work_dir
pub fn audit_file(
    path: &std::path::Path,
    page_url: Option<&str>,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<AuditResult> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let engine =
        crate::analyzer::AuditEngine::new().with_parallel_checks(config.parallel.unwrap_or(false));
    engine.audit_file(path, page_url, Some(&config))
}

/// Public API: audit in-memory HTML as if it had been served from `url`.
pub fn audit_html(html: &str, url: &str) -> Result<AuditResult, AuditError> {
    let raw = extractor::RawPage::from_html(url, html)?;
    let engine = analyzer::AuditEngine::new();
    Ok(engine.audit_page(&raw, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_from_score() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::MetaTags).unwrap();
        assert_eq!(json, "\"Meta Tags\"");
        let back: Category = serde_json::from_str("\"Technical SEO\"").unwrap();
        assert_eq!(back, Category::Technical);
    }

    #[test]
    fn test_check_id_round_trips_through_str() {
        for id in CheckId::ALL {
            assert_eq!(id.as_str().parse::<CheckId>().unwrap(), id);
        }
        assert!("not-a-check".parse::<CheckId>().is_err());
    }

    #[test]
    fn test_issue_builder_skips_empty_optionals() {
        let issue = Issue::warning(
            CheckId::Images,
            Category::Images,
            "Images with empty alt text",
            "2 images",
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["check"], "images");
        assert!(json.get("impact").is_none());
        assert!(json.get("elements").is_none());

        let issue = issue
            .with_impact(Impact::Low)
            .with_elements(["a.png"])
            .with_resource("Docs", "https://example.com");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["impact"], "low");
        assert_eq!(json["elements"][0], "a.png");
        assert_eq!(json["resourceLinks"][0]["url"], "https://example.com");
    }
}
