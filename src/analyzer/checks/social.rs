//! Open Graph and Twitter Card tags

use super::{CheckContext, SeoCheck};
use crate::page::MetaTags;
use crate::{Category, CheckId, Impact, Issue};

/// Tags that make an Open Graph preview complete
const OPEN_GRAPH_REQUIRED: &[&str] = &["og:title", "og:description", "og:image"];

/// Open Graph tags that don't affect completeness but show the protocol is in use
const OPEN_GRAPH_OPTIONAL: &[&str] = &["og:url", "og:type"];

const TWITTER_REQUIRED: &[&str] = &[
    "twitter:card",
    "twitter:title",
    "twitter:description",
    "twitter:image",
];

struct Protocol {
    name: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
    docs: (&'static str, &'static str),
}

const PROTOCOLS: [Protocol; 2] = [
    Protocol {
        name: "Open Graph",
        required: OPEN_GRAPH_REQUIRED,
        optional: OPEN_GRAPH_OPTIONAL,
        docs: ("The Open Graph protocol", "https://ogp.me/"),
    },
    Protocol {
        name: "Twitter Card",
        required: TWITTER_REQUIRED,
        optional: &[],
        docs: (
            "Twitter Cards markup",
            "https://developer.x.com/en/docs/x-for-websites/cards/overview/markup",
        ),
    },
];

fn tag<'a>(tags: &'a MetaTags, name: &str) -> Option<&'a String> {
    match name {
        "og:title" => tags.og_title.as_ref(),
        "og:description" => tags.og_description.as_ref(),
        "og:image" => tags.og_image.as_ref(),
        "og:url" => tags.og_url.as_ref(),
        "og:type" => tags.og_type.as_ref(),
        "twitter:card" => tags.twitter_card.as_ref(),
        "twitter:title" => tags.twitter_title.as_ref(),
        "twitter:description" => tags.twitter_description.as_ref(),
        "twitter:image" => tags.twitter_image.as_ref(),
        _ => None,
    }
}

pub struct SocialMediaCheck;

impl SocialMediaCheck {
    fn evaluate(id: CheckId, tags: &MetaTags, protocol: &Protocol) -> Issue {
        let category = Category::SocialMedia;
        let missing: Vec<&str> = protocol
            .required
            .iter()
            .copied()
            .filter(|name| tag(tags, name).is_none())
            .collect();
        let any_present = protocol
            .required
            .iter()
            .chain(protocol.optional)
            .any(|name| tag(tags, name).is_some());

        if !any_present {
            Issue::warning(
                id,
                category,
                format!("Missing {} tags", protocol.name),
                format!("The page has no {} tags, so shared links get no preview.", protocol.name),
            )
            .with_impact(Impact::Medium)
            .with_recommendation(format!(
                "Add {} tags for title, description and image.",
                protocol.name
            ))
            .with_resource(protocol.docs.0, protocol.docs.1)
        } else if !missing.is_empty() {
            Issue::warning(
                id,
                category,
                format!("Incomplete {} tags", protocol.name),
                format!("{} of the key {} tags are missing.", missing.len(), protocol.name),
            )
            .with_impact(Impact::Low)
            .with_recommendation("Add the missing tags.")
            .with_elements(missing)
            .with_resource(protocol.docs.0, protocol.docs.1)
        } else {
            Issue::good(
                id,
                category,
                format!("{} tags complete", protocol.name),
                format!("All key {} tags are present.", protocol.name),
            )
        }
    }
}

impl SeoCheck for SocialMediaCheck {
    fn id(&self) -> CheckId {
        CheckId::SocialMedia
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        PROTOCOLS
            .iter()
            .map(|protocol| Self::evaluate(self.id(), &ctx.data.meta_tags, protocol))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::checks::test_support::page;
    use crate::Severity;

    fn run_with(tags: MetaTags) -> Vec<Issue> {
        let mut data = page();
        data.meta_tags = tags;
        SocialMediaCheck.run(&CheckContext::new(&data, None))
    }

    #[test]
    fn test_no_tags() {
        let issues = run_with(MetaTags::default());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].title, "Missing Open Graph tags");
        assert_eq!(issues[1].title, "Missing Twitter Card tags");
    }

    #[test]
    fn test_partial_open_graph_lists_missing() {
        let issues = run_with(MetaTags {
            og_title: Some("T".to_string()),
            ..MetaTags::default()
        });
        assert_eq!(issues[0].title, "Incomplete Open Graph tags");
        assert_eq!(
            issues[0].elements,
            Some(vec!["og:description".to_string(), "og:image".to_string()])
        );
    }

    #[test]
    fn test_og_url_alone_counts_as_partial() {
        let issues = run_with(MetaTags {
            og_url: Some("https://example.com/".to_string()),
            ..MetaTags::default()
        });
        assert_eq!(issues[0].title, "Incomplete Open Graph tags");
        assert_eq!(issues[0].elements.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_complete_tags() {
        let s = |v: &str| Some(v.to_string());
        let issues = run_with(MetaTags {
            og_title: s("T"),
            og_description: s("D"),
            og_image: s("https://example.com/i.png"),
            twitter_card: s("summary_large_image"),
            twitter_title: s("T"),
            twitter_description: s("D"),
            twitter_image: s("https://example.com/i.png"),
            ..MetaTags::default()
        });
        assert!(issues.iter().all(|i| i.severity == Severity::Good));
    }
}
