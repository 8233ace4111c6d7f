//! Title tag presence, length and keyword usage

use super::{mentions_keyword, present, CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

const MIN_LENGTH: usize = 10;
const MAX_LENGTH: usize = 60;

const TITLE_DOCS: &str =
    "https://developers.google.com/search/docs/appearance/title-link";

pub struct TitleTagCheck;

impl SeoCheck for TitleTagCheck {
    fn id(&self) -> CheckId {
        CheckId::TitleTag
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::MetaTags;

        let Some(title) = present(&ctx.data.meta_tags.title) else {
            return vec![Issue::error(
                id,
                category,
                "Missing page title",
                "The page has no <title> element. Search engines use it as the headline of the result.",
            )
            .with_impact(Impact::High)
            .with_recommendation("Add a unique, descriptive <title> of 10-60 characters.")
            .with_resource("Influencing title links", TITLE_DOCS)];
        };

        let mut issues = Vec::new();
        let length = title.chars().count();

        if length < MIN_LENGTH {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Title too short",
                    format!("The title is {length} characters; at least {MIN_LENGTH} are recommended."),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Expand the title to describe the page content.")
                .with_elements([title]),
            );
        } else if length > MAX_LENGTH {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Title too long",
                    format!(
                        "The title is {length} characters and may be truncated after {MAX_LENGTH}."
                    ),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Shorten the title and put the important words first.")
                .with_elements([title]),
            );
        } else {
            issues.push(Issue::good(
                id,
                category,
                "Title length is optimal",
                format!("The title is {length} characters long."),
            ));
        }

        if let Some(keyword) = ctx.primary_keyword() {
            if mentions_keyword(title, keyword) {
                issues.push(Issue::good(
                    id,
                    category,
                    "Title contains primary keyword",
                    format!("The title mentions \"{}\".", keyword.word),
                ));
            } else {
                issues.push(
                    Issue::warning(
                        id,
                        category,
                        "Title missing primary keyword",
                        format!(
                            "The most frequent keyword \"{}\" does not appear in the title.",
                            keyword.word
                        ),
                    )
                    .with_impact(Impact::Medium)
                    .with_recommendation("Work the page's main topic into the title."),
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

    fn run_with(title: Option<&str>, keywords: Vec<crate::page::KeywordInfo>) -> Vec<Issue> {
        let mut data = page();
        data.meta_tags.title = title.map(String::from);
        data.keywords = keywords;
        TitleTagCheck.run(&CheckContext::new(&data, None))
    }

    #[test]
    fn test_missing_title_is_a_single_high_impact_error() {
        let issues = run_with(None, vec![keyword("coffee", 5, 2.0)]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Missing page title");
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].impact, Some(Impact::High));
        assert_eq!(issues[0].category, Category::MetaTags);
    }

    #[test]
    fn test_length_boundaries() {
        assert_eq!(titled(&run_with(Some("Too short"), vec![]), "Title too short").len(), 1);
        assert_eq!(
            run_with(Some("Ten chars!"), vec![])[0].severity,
            Severity::Good
        );
        let sixty = "x".repeat(60);
        assert_eq!(run_with(Some(&sixty), vec![])[0].severity, Severity::Good);
        let long = "x".repeat(61);
        assert_eq!(titled(&run_with(Some(&long), vec![]), "Title too long").len(), 1);
    }

    #[test]
    fn test_keyword_check_only_with_keywords() {
        let issues = run_with(Some("Fresh Coffee Roasters"), vec![]);
        assert_eq!(issues.len(), 1);

        let issues = run_with(Some("Fresh Coffee Roasters"), vec![keyword("coffee", 5, 2.0)]);
        assert_eq!(titled(&issues, "Title contains primary keyword").len(), 1);

        let issues = run_with(Some("Fresh Tea Roasters"), vec![keyword("coffee", 5, 2.0)]);
        let missing = titled(&issues, "Title missing primary keyword");
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::Warning);
    }

    #[test]
    fn test_blank_title_counts_as_missing() {
        let issues = run_with(Some("   "), vec![]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Missing page title");
        assert_eq!(run_with(Some(""), vec![])[0].severity, Severity::Error);
    }
}
