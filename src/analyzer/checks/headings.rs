//! H1 usage, heading hierarchy and keyword-in-H1

use super::{mentions_keyword, CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

/// (level, required parent level) pairs checked for skipped levels
const HIERARCHY_RULES: [(u8, u8); 2] = [(3, 2), (4, 3)];

pub struct HeadingsCheck;

impl SeoCheck for HeadingsCheck {
    fn id(&self) -> CheckId {
        CheckId::Headings
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::Headings;
        let headings = &ctx.data.headings;
        let mut issues = Vec::new();

        match headings.h1.len() {
            0 => issues.push(
                Issue::error(
                    id,
                    category,
                    "Missing H1 heading",
                    "The page has no <h1>. The main heading tells readers and crawlers what the page is about.",
                )
                .with_impact(Impact::High)
                .with_recommendation("Add exactly one <h1> describing the page topic."),
            ),
            1 => issues.push(Issue::good(
                id,
                category,
                "Single H1 heading",
                "The page has exactly one <h1>.",
            )),
            n => issues.push(
                Issue::warning(
                    id,
                    category,
                    "Multiple H1 headings",
                    format!("The page has {n} <h1> elements."),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Keep one <h1> and demote the others to <h2>.")
                .with_elements(headings.h1.iter().cloned()),
            ),
        }

        let skipped: Vec<String> = HIERARCHY_RULES
            .iter()
            .filter(|(level, parent)| {
                !headings.level(*level).is_empty() && headings.level(*parent).is_empty()
            })
            .map(|(level, parent)| format!("h{level} used without h{parent}"))
            .collect();
        if !skipped.is_empty() {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Heading hierarchy skips levels",
                    "Heading levels should nest without gaps.",
                )
                .with_impact(Impact::Low)
                .with_recommendation("Use heading levels in order (h1, h2, h3...).")
                .with_elements(skipped),
            );
        }

        if let (Some(h1), Some(keyword)) = (headings.h1.first(), ctx.primary_keyword()) {
            if mentions_keyword(h1, keyword) {
                issues.push(Issue::good(
                    id,
                    category,
                    "H1 contains primary keyword",
                    format!("The main heading mentions \"{}\".", keyword.word),
                ));
            } else {
                issues.push(
                    Issue::warning(
                        id,
                        category,
                        "H1 missing primary keyword",
                        format!(
                            "The most frequent keyword \"{}\" does not appear in the main heading.",
                            keyword.word
                        ),
                    )
                    .with_impact(Impact::Low),
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
    use crate::page::Headings;
    use crate::Severity;

    fn headings(h1: &[&str], h2: &[&str], h3: &[&str], h4: &[&str]) -> Headings {
        let own = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        Headings {
            h1: own(h1),
            h2: own(h2),
            h3: own(h3),
            h4: own(h4),
            ..Headings::default()
        }
    }

    fn run_with(h: Headings) -> Vec<Issue> {
        let mut data = page();
        data.headings = h;
        HeadingsCheck.run(&CheckContext::new(&data, None))
    }

    #[test]
    fn test_single_h1_with_full_hierarchy() {
        let issues = run_with(headings(&["Main"], &["A"], &["B"], &["C"]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Good);
        assert_eq!(issues[0].title, "Single H1 heading");
    }

    #[test]
    fn test_missing_h1() {
        let issues = run_with(Headings::default());
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_multiple_h1_lists_texts() {
        let issues = run_with(headings(&["One", "Two"], &[], &[], &[]));
        assert_eq!(issues[0].title, "Multiple H1 headings");
        assert_eq!(
            issues[0].elements,
            Some(vec!["One".to_string(), "Two".to_string()])
        );
    }

    #[test]
    fn test_hierarchy_skip_detected() {
        let issues = run_with(headings(&["Main"], &[], &["Orphan"], &[]));
        let skip = titled(&issues, "Heading hierarchy skips levels");
        assert_eq!(skip.len(), 1);
        assert_eq!(
            skip[0].elements,
            Some(vec!["h3 used without h2".to_string()])
        );

        let issues = run_with(headings(&["Main"], &["A"], &[], &["Deep"]));
        let skip = titled(&issues, "Heading hierarchy skips levels");
        assert_eq!(
            skip[0].elements,
            Some(vec!["h4 used without h3".to_string()])
        );
    }

    #[test]
    fn test_keyword_in_h1() {
        let mut data = page();
        data.headings = headings(&["Roasting Coffee at Home"], &[], &[], &[]);
        data.keywords = vec![keyword("coffee", 3, 1.0)];
        let issues = HeadingsCheck.run(&CheckContext::new(&data, None));
        assert_eq!(titled(&issues, "H1 contains primary keyword").len(), 1);

        data.headings = Headings::default();
        let issues = HeadingsCheck.run(&CheckContext::new(&data, None));
        assert!(titled(&issues, "H1 missing primary keyword").is_empty());
    }
}
