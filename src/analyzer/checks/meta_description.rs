//! Meta description presence, length and keyword usage

use super::{mentions_keyword, present, CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

const MIN_LENGTH: usize = 50;
const MAX_LENGTH: usize = 160;

const SNIPPET_DOCS: &str = "https://developers.google.com/search/docs/appearance/snippet";

pub struct MetaDescriptionCheck;

impl SeoCheck for MetaDescriptionCheck {
    fn id(&self) -> CheckId {
        CheckId::MetaDescription
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::MetaTags;

        let Some(description) = present(&ctx.data.meta_tags.description) else {
            return vec![Issue::error(
                id,
                category,
                "Missing meta description",
                "The page has no meta description, so search engines will pick a snippet themselves.",
            )
            .with_impact(Impact::High)
            .with_recommendation("Add a <meta name=\"description\"> of 50-160 characters.")
            .with_resource("Controlling snippets", SNIPPET_DOCS)];
        };

        let mut issues = Vec::new();
        let length = description.chars().count();

        issues.push(if length < MIN_LENGTH {
            Issue::warning(
                id,
                category,
                "Meta description too short",
                format!(
                    "The meta description is {length} characters; at least {MIN_LENGTH} are recommended."
                ),
            )
            .with_impact(Impact::Medium)
            .with_recommendation("Summarize the page in one or two full sentences.")
        } else if length > MAX_LENGTH {
            Issue::warning(
                id,
                category,
                "Meta description too long",
                format!(
                    "The meta description is {length} characters and may be cut off after {MAX_LENGTH}."
                ),
            )
            .with_impact(Impact::Low)
            .with_recommendation("Trim the description to 160 characters or fewer.")
        } else {
            Issue::good(
                id,
                category,
                "Meta description length is optimal",
                format!("The meta description is {length} characters long."),
            )
        });

        if let Some(keyword) = ctx.primary_keyword() {
            if mentions_keyword(description, keyword) {
                issues.push(Issue::good(
                    id,
                    category,
                    "Meta description contains primary keyword",
                    format!("The meta description mentions \"{}\".", keyword.word),
                ));
            } else {
                issues.push(
                    Issue::warning(
                        id,
                        category,
                        "Meta description missing primary keyword",
                        format!(
                            "The most frequent keyword \"{}\" does not appear in the meta description.",
                            keyword.word
                        ),
                    )
                    .with_impact(Impact::Low)
                    .with_recommendation("Mention the page's main topic in the description."),
                );
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::checks::test_support::{keyword, page, titled};
    use crate::Severity;

    fn run_with(description: Option<String>) -> Vec<Issue> {
        let mut data = page();
        data.meta_tags.description = description;
        MetaDescriptionCheck.run(&CheckContext::new(&data, None))
    }

    #[test]
    fn test_missing_description() {
        let issues = run_with(None);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].impact, Some(Impact::High));
    }

    #[test]
    fn test_long_description_warns_once() {
        let issues = run_with(Some("d".repeat(200)));
        let long = titled(&issues, "Meta description too long");
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].severity, Severity::Warning);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_length_boundaries() {
        assert_eq!(run_with(Some("d".repeat(49)))[0].title, "Meta description too short");
        assert_eq!(run_with(Some("d".repeat(50)))[0].severity, Severity::Good);
        assert_eq!(run_with(Some("d".repeat(160)))[0].severity, Severity::Good);
    }

    #[test]
    fn test_keyword_presence() {
        let mut data = page();
        data.meta_tags.description =
            Some("Small-batch coffee roasted every week and shipped fresh to you.".to_string());
        data.keywords = vec![keyword("coffee", 4, 1.5)];
        let issues = MetaDescriptionCheck.run(&CheckContext::new(&data, None));
        assert_eq!(
            titled(&issues, "Meta description contains primary keyword").len(),
            1
        );

        data.keywords = vec![keyword("espresso", 4, 1.5)];
        let issues = MetaDescriptionCheck.run(&CheckContext::new(&data, None));
        assert_eq!(
            titled(&issues, "Meta description missing primary keyword").len(),
            1
        );
    }

    #[test]
    fn test_blank_description_counts_as_missing() {
        let issues = run_with(Some(String::new()));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Missing meta description");
        assert_eq!(run_with(Some(" \n".to_string()))[0].severity, Severity::Error);
    }
}
