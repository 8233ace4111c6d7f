//! HTTPS, mixed content and security headers

use super::{CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

/// Missing tracked headers tolerated before warning
const MAX_MISSING_HEADERS: usize = 3;

pub struct SecurityCheck;

impl SeoCheck for SecurityCheck {
    fn id(&self) -> CheckId {
        CheckId::Security
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::Security;
        let security = &ctx.data.security;
        let mut issues = Vec::new();

        if security.has_ssl {
            issues.push(Issue::good(
                id,
                category,
                "HTTPS enabled",
                "The page is served over a secure connection.",
            ));
            if security.has_mixed_content {
                issues.push(
                    Issue::warning(
                        id,
                        category,
                        "Mixed content detected",
                        "The secure page loads resources over plain HTTP.",
                    )
                    .with_impact(Impact::High)
                    .with_recommendation("Load every subresource over HTTPS.")
                    .with_resource(
                        "Mixed content",
                        "https://developer.mozilla.org/en-US/docs/Web/Security/Mixed_content",
                    ),
                );
            }
        } else {
            issues.push(
                Issue::error(
                    id,
                    category,
                    "No HTTPS",
                    "The page is not served over HTTPS. Browsers flag it as not secure.",
                )
                .with_impact(Impact::High)
                .with_recommendation("Serve the site over HTTPS and redirect HTTP traffic.")
                .with_resource(
                    "HTTPS as a ranking signal",
                    "https://developers.google.com/search/docs/crawling-indexing/https",
                ),
            );
        }

        let missing = security.missing_headers();
        if missing.len() > MAX_MISSING_HEADERS {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Missing security headers",
                    format!("{} recommended security headers are not set.", missing.len()),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Configure the server to send the listed headers.")
                .with_elements(missing),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::checks::test_support::{page, titled};
    use crate::page::TRACKED_SECURITY_HEADERS;
    use crate::Severity;

    #[test]
    fn test_no_ssl_is_error_without_good_ssl_issue() {
        let data = page();
        let issues = SecurityCheck.run(&CheckContext::new(&data, None));
        let errors: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, Category::Security);
        assert!(titled(&issues, "HTTPS enabled").is_empty());
    }

    #[test]
    fn test_mixed_content_on_ssl() {
        let mut data = page();
        data.security.has_ssl = true;
        data.security.has_mixed_content = true;
        let issues = SecurityCheck.run(&CheckContext::new(&data, None));
        assert_eq!(titled(&issues, "HTTPS enabled").len(), 1);
        assert_eq!(titled(&issues, "Mixed content detected").len(), 1);
    }

    #[test]
    fn test_missing_headers_threshold() {
        let mut data = page();
        data.security.has_ssl = true;
        let issues = SecurityCheck.run(&CheckContext::new(&data, None));
        let missing = titled(&issues, "Missing security headers");
        assert_eq!(missing[0].elements.as_ref().map(Vec::len), Some(6));

        for name in TRACKED_SECURITY_HEADERS.iter().take(3) {
            data.security
                .security_headers
                .insert(name.to_string(), Some("set".to_string()));
        }
        let issues = SecurityCheck.run(&CheckContext::new(&data, None));
        assert!(titled(&issues, "Missing security headers").is_empty());
    }
}
