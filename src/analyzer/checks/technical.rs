//! Indexability and crawl signals: robots meta, sitemap, robots.txt, redirects, language

use super::{present, CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};
use regex::Regex;
use std::sync::OnceLock;

fn meta_refresh_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?refresh"#).expect("static regex")
    })
}

pub struct TechnicalSeoCheck;

impl TechnicalSeoCheck {
    fn robots_meta(id: CheckId, robots: Option<&str>) -> Issue {
        let category = Category::Technical;
        let Some(robots) = robots else {
            return Issue::warning(
                id,
                category,
                "Missing robots meta tag",
                "The page does not state its indexing preferences.",
            )
            .with_impact(Impact::Low)
            .with_recommendation("Add <meta name=\"robots\" content=\"index, follow\">.");
        };

        let blocks_indexing = robots
            .split(',')
            .map(|d| d.trim().to_ascii_lowercase())
            .any(|d| d == "noindex" || d == "none");
        if blocks_indexing {
            Issue::error(
                id,
                category,
                "Page blocked from indexing",
                format!("The robots meta tag is \"{robots}\"."),
            )
            .with_impact(Impact::High)
            .with_recommendation("Remove noindex unless the page should stay out of search results.")
            .with_resource(
                "Robots meta tag",
                "https://developers.google.com/search/docs/crawling-indexing/robots-meta-tag",
            )
        } else {
            Issue::good(
                id,
                category,
                "Page is indexable",
                format!("The robots meta tag is \"{robots}\"."),
            )
        }
    }
}

impl SeoCheck for TechnicalSeoCheck {
    fn id(&self) -> CheckId {
        CheckId::TechnicalSeo
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::Technical;
        let data = ctx.data;
        let mut issues = vec![Self::robots_meta(id, present(&data.meta_tags.robots))];

        issues.push(if data.has_sitemap {
            Issue::good(id, category, "Sitemap found", "The site publishes sitemap.xml.")
        } else {
            Issue::warning(
                id,
                category,
                "Missing sitemap",
                "No sitemap.xml was found for the site.",
            )
            .with_impact(Impact::Medium)
            .with_recommendation("Publish a sitemap.xml and reference it from robots.txt.")
            .with_resource(
                "Sitemaps overview",
                "https://developers.google.com/search/docs/crawling-indexing/sitemaps/overview",
            )
        });

        issues.push(if data.has_robots_txt {
            Issue::good(id, category, "robots.txt found", "The site publishes robots.txt.")
        } else {
            Issue::warning(
                id,
                category,
                "Missing robots.txt",
                "No robots.txt was found for the site.",
            )
            .with_impact(Impact::Low)
            .with_recommendation("Add a robots.txt at the site root.")
        });

        if !data.redirect_chain.is_empty() {
            let chain = data
                .redirect_chain
                .iter()
                .cloned()
                .chain(std::iter::once(data.url.clone()));
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Redirect chain detected",
                    format!(
                        "The page was reached through {} redirects.",
                        data.redirect_chain.len()
                    ),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Link directly to the final URL.")
                .with_elements(chain),
            );
        }

        issues.push(match present(&data.meta_tags.language) {
            Some(lang) => Issue::good(
                id,
                category,
                "Language declared",
                format!("The page declares lang=\"{lang}\"."),
            ),
            None => Issue::warning(
                id,
                category,
                "Missing language declaration",
                "The <html> element has no lang attribute.",
            )
            .with_impact(Impact::Low)
            .with_recommendation("Add lang to the <html> element, e.g. <html lang=\"en\">."),
        });

        // 0 means the status is unknown (local files)
        if data.status_code >= 400 {
            issues.push(
                Issue::error(
                    id,
                    category,
                    "Error status code",
                    format!("The page responded with HTTP {}.", data.status_code),
                )
                .with_impact(Impact::High)
                .with_recommendation("Serve the page with a 200 status."),
            );
        }

        if ctx.html.is_some_and(|html| meta_refresh_pattern().is_match(html)) {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Meta refresh redirect",
                    "The page redirects with a meta refresh tag.",
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Use a server-side 301 redirect instead."),
            );
        }

        issues
    }
}
