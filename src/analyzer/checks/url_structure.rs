//! URL length, query parameters and canonical consistency

use super::{present, CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};
use url::Url;

const MAX_PATH_LENGTH: usize = 100;
const MAX_QUERY_PARAMS: usize = 2;

const CANONICAL_DOCS: &str =
    "https://developers.google.com/search/docs/crawling-indexing/consolidate-duplicate-urls";

/// Comparable form of a URL: fragment dropped, trailing slash trimmed except at the root
fn normalize(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(mut url) => {
            url.set_fragment(None);
            let mut s = url.to_string();
            if url.path() != "/" && url.query().is_none() && s.ends_with('/') {
                s.pop();
            }
            s
        }
        Err(_) => raw.trim().trim_end_matches('/').to_string(),
    }
}

pub struct UrlStructureCheck;

impl SeoCheck for UrlStructureCheck {
    fn id(&self) -> CheckId {
        CheckId::UrlStructure
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::UrlStructure;
        let data = ctx.data;
        let mut issues = Vec::new();

        match present(&data.meta_tags.canonical) {
            None => issues.push(
                Issue::warning(
                    id,
                    category,
                    "Missing canonical URL",
                    "The page does not declare a canonical URL.",
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Add <link rel=\"canonical\"> pointing at the preferred URL.")
                .with_resource("Canonical URLs", CANONICAL_DOCS),
            ),
            Some(canonical) => {
                let target = normalize(canonical);
                if target == normalize(&data.url) {
                    issues.push(Issue::good(
                        id,
                        category,
                        "Canonical URL matches page",
                        format!("Canonical: {canonical}"),
                    ));
                } else if data.redirect_chain.iter().any(|u| normalize(u) == target) {
                    issues.push(Issue::good(
                        id,
                        category,
                        "Canonical URL matches redirect source",
                        format!("Canonical {canonical} is part of the redirect chain."),
                    ));
                } else {
                    issues.push(
                        Issue::warning(
                            id,
                            category,
                            "Canonical URL mismatch",
                            "The canonical URL points to a different page.",
                        )
                        .with_impact(Impact::Medium)
                        .with_recommendation(
                            "Make sure the canonical points at this page unless it is a deliberate duplicate.",
                        )
                        .with_elements([canonical.to_string(), data.url.clone()])
                        .with_resource("Canonical URLs", CANONICAL_DOCS),
                    );
                }
            }
        }

        if let Ok(url) = Url::parse(&data.url) {
            let path_length = url.path().chars().count();
            if path_length > MAX_PATH_LENGTH {
                issues.push(
                    Issue::warning(
                        id,
                        category,
                        "URL path too long",
                        format!("The path is {path_length} characters long."),
                    )
                    .with_impact(Impact::Low)
                    .with_recommendation("Use short, descriptive URL paths."),
                );
            }

            let params = url.query_pairs().count();
            if params > MAX_QUERY_PARAMS {
                issues.push(
                    Issue::warning(
                        id,
                        category,
                        "Too many query parameters",
                        format!("The URL has {params} query parameters."),
                    )
                    .with_impact(Impact::Low)
                    .with_recommendation("Prefer clean paths over query strings for indexable pages.")
                    .with_elements(url.query_pairs().map(|(k, _)| k.into_owned())),
                );
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::checks::test_support::{page, titled};
    use crate::Severity;

    fn run_with(url: &str, canonical: Option<&str>, chain: &[&str]) -> Vec<Issue> {
        let mut data = page();
        data.url = url.to_string();
        data.meta_tags.canonical = canonical.map(String::from);
        data.redirect_chain = chain.iter().map(|s| s.to_string()).collect();
        UrlStructureCheck.run(&CheckContext::new(&data, None))
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("https://a.test/x/#top"), "https://a.test/x");
        assert_eq!(normalize("https://a.test"), "https://a.test/");
        assert_eq!(normalize("https://a.test/"), "https://a.test/");
    }

    #[test]
    fn test_missing_canonical() {
        let issues = run_with("https://a.test/", None, &[]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Missing canonical URL");
    }

    #[test]
    fn test_matching_canonical_ignores_trailing_slash() {
        let issues = run_with("https://a.test/blog/", Some("https://a.test/blog"), &[]);
        assert_eq!(issues[0].severity, Severity::Good);
    }

    #[test]
    fn test_canonical_in_redirect_chain() {
        let issues = run_with(
            "https://www.a.test/",
            Some("https://a.test/"),
            &["https://a.test/"],
        );
        assert_eq!(issues[0].severity, Severity::Good);
    }

    #[test]
    fn test_canonical_mismatch() {
        let issues = run_with("https://a.test/page", Some("https://a.test/other"), &[]);
        assert_eq!(issues[0].title, "Canonical URL mismatch");
    }

    #[test]
    fn test_long_path_and_query() {
        let long = format!("https://a.test/{}?a=1&b=2&c=3", "p".repeat(120));
        let issues = run_with(&long, Some(long.as_str()), &[]);
        assert_eq!(titled(&issues, "URL path too long").len(), 1);
        let query = titled(&issues, "Too many query parameters");
        assert_eq!(
            query[0].elements,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );

        let issues = run_with("https://a.test/x?a=1&b=2", Some("https://a.test/x?a=1&b=2"), &[]);
        assert!(titled(&issues, "Too many query parameters").is_empty());
    }

    #[test]
    fn test_blank_canonical_counts_as_missing() {
        let issues = run_with("https://a.test/", Some(""), &[]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Missing canonical URL");
    }
}
