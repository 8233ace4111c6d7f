//! SEO checks
//!
//! Each check evaluates one dimension of a page and always emits one primary issue
//! classifying it, followed by any secondary findings. Checks never see each other's output.

pub mod content;
pub mod headings;
pub mod images;
pub mod links;
pub mod meta_description;
pub mod mobile;
pub mod performance;
pub mod security;
pub mod social;
pub mod structured_data;
pub mod technical;
pub mod title;
pub mod url_structure;

pub use content::ContentQualityCheck;
pub use headings::HeadingsCheck;
pub use images::ImagesCheck;
pub use links::LinksCheck;
pub use meta_description::MetaDescriptionCheck;
pub use mobile::MobileCheck;
pub use performance::PerformanceCheck;
pub use security::SecurityCheck;
pub use social::SocialMediaCheck;
pub use structured_data::StructuredDataCheck;
pub use technical::TechnicalSeoCheck;
pub use title::TitleTagCheck;
pub use url_structure::UrlStructureCheck;

use crate::page::{KeywordInfo, WebsiteData};
use crate::{CheckId, Issue};

/// Input shared by every check in one audit
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub data: &'a WebsiteData,
    /// Raw page source, when the audit started from HTML
    pub html: Option<&'a str>,
}

impl<'a> CheckContext<'a> {
    pub fn new(data: &'a WebsiteData, html: Option<&'a str>) -> Self {
        Self { data, html }
    }

    pub fn primary_keyword(&self) -> Option<&'a KeywordInfo> {
        self.data.primary_keyword()
    }
}

/// Trait for SEO checks
pub trait SeoCheck: Sync {
    fn id(&self) -> CheckId;

    /// Evaluate the page and return issues in emission order
    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue>;
}

/// The check catalog, in the order results are reported
pub static CATALOG: &[&dyn SeoCheck] = &[
    &TitleTagCheck,
    &MetaDescriptionCheck,
    &HeadingsCheck,
    &ImagesCheck,
    &LinksCheck,
    &ContentQualityCheck,
    &MobileCheck,
    &PerformanceCheck,
    &SecurityCheck,
    &StructuredDataCheck,
    &SocialMediaCheck,
    &UrlStructureCheck,
    &TechnicalSeoCheck,
];

/// Look up a check by id
pub fn check(id: CheckId) -> Option<&'static dyn SeoCheck> {
    CATALOG.iter().copied().find(|c| c.id() == id)
}

/// Case-insensitive containment used by the keyword-presence checks
pub(crate) fn mentions_keyword(text: &str, keyword: &KeywordInfo) -> bool {
    text.to_lowercase().contains(&keyword.word)
}

/// A tag value, treating blank strings from snapshots the same as a missing tag
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::page::{KeywordInfo, WebsiteData};
    use crate::{Issue, Severity};

    pub fn keyword(word: &str, count: usize, density: f64) -> KeywordInfo {
        KeywordInfo {
            word: word.to_string(),
            count,
            density,
        }
    }

    pub fn page() -> WebsiteData {
        WebsiteData {
            url: "https://example.com/".to_string(),
            status_code: 200,
            ..WebsiteData::default()
        }
    }

    pub fn titled<'a>(issues: &'a [Issue], title: &str) -> Vec<&'a Issue> {
        issues.iter().filter(|i| i.title == title).collect()
    }

    pub fn count(issues: &[Issue], severity: Severity) -> usize {
        issues.iter().filter(|i| i.severity == severity).count()
    }
}
