//! Anchor text, broken links and internal/external link balance

use super::{CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

const MAX_EXTERNAL_LINKS: usize = 50;
const MIN_INTERNAL_LINKS: usize = 3;
/// Pages shorter than this are not expected to link internally
const INTERNAL_LINKS_MIN_CONTENT: usize = 1000;

pub struct LinksCheck;

impl SeoCheck for LinksCheck {
    fn id(&self) -> CheckId {
        CheckId::Links
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::Links;
        let data = ctx.data;
        let mut issues = Vec::new();

        if data.broken_links.is_empty() {
            issues.push(Issue::good(
                id,
                category,
                "No broken links detected",
                "None of the checked links failed.",
            ));
        } else {
            issues.push(
                Issue::error(
                    id,
                    category,
                    "Broken links found",
                    format!(
                        "{} links returned an error status or could not be reached.",
                        data.broken_links.len()
                    ),
                )
                .with_impact(Impact::High)
                .with_recommendation("Fix or remove links that no longer resolve.")
                .with_elements(
                    data.broken_links
                        .iter()
                        .map(|l| format!("{} ({})", l.href, l.text)),
                ),
            );
        }

        let without_text: Vec<&str> = data
            .links
            .iter()
            .filter(|l| !l.has_text)
            .map(|l| l.href.as_str())
            .collect();
        if !without_text.is_empty() {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Links without anchor text",
                    format!("{} links have no descriptive text.", without_text.len()),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Give every link text (or an aria-label) describing its target.")
                .with_elements(without_text),
            );
        }

        let external = data.links.iter().filter(|l| !l.is_internal).count();
        if external > MAX_EXTERNAL_LINKS {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Too many external links",
                    format!("The page links to {external} external URLs."),
                )
                .with_impact(Impact::Low)
                .with_recommendation("Keep external links to the most relevant resources."),
            );
        }

        let internal = data.links.len() - external;
        if internal >= MIN_INTERNAL_LINKS {
            issues.push(Issue::good(
                id,
                category,
                "Good internal linking",
                format!("The page has {internal} internal links."),
            ));
        } else if data.content_length > INTERNAL_LINKS_MIN_CONTENT {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Few internal links",
                    format!("The page has only {internal} internal links."),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Link to related pages on the same site."),
            );
        }

        issues
    }
}
