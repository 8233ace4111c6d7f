//! Load time and asset counts

use super::{CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

const SLOW_LOAD_MS: u64 = 3000;
const MODERATE_LOAD_MS: u64 = 1500;
const MAX_CSS_FILES: usize = 10;
const MAX_JS_FILES: usize = 15;

pub struct PerformanceCheck;

impl SeoCheck for PerformanceCheck {
    fn id(&self) -> CheckId {
        CheckId::Performance
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::Performance;
        let data = ctx.data;
        let load = data.performance.load_time_ms;
        let mut issues = Vec::new();

        issues.push(if load > SLOW_LOAD_MS {
            Issue::error(
                id,
                category,
                "Slow page load",
                format!("The page took {load} ms to load."),
            )
            .with_impact(Impact::High)
            .with_recommendation("Compress assets, enable caching and reduce server response time.")
            .with_resource("Core Web Vitals", "https://web.dev/articles/vitals")
        } else if load > MODERATE_LOAD_MS {
            Issue::warning(
                id,
                category,
                "Page load could be faster",
                format!("The page took {load} ms to load."),
            )
            .with_impact(Impact::Medium)
            .with_recommendation("Aim for a load time under 1.5 seconds.")
        } else {
            Issue::good(
                id,
                category,
                "Fast page load",
                format!("The page loaded in {load} ms."),
            )
        });

        let css = data.css_files.len();
        if css > MAX_CSS_FILES {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Too many CSS files",
                    format!("The page loads {css} stylesheets."),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Bundle stylesheets to reduce requests.")
                .with_elements(data.css_files.iter().cloned()),
            );
        }

        let js = data.js_files.len();
        if js > MAX_JS_FILES {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Too many JavaScript files",
                    format!("The page loads {js} scripts."),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Bundle or defer scripts that are not needed up front.")
                .with_elements(data.js_files.iter().cloned()),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::checks::test_support::{page, titled};
    use crate::Severity;

    fn run_with_load(ms: u64) -> Vec<Issue> {
        let mut data = page();
        data.performance.load_time_ms = ms;
        PerformanceCheck.run(&CheckContext::new(&data, None))
    }

    #[test]
    fn test_load_time_tiers() {
        assert_eq!(run_with_load(3001)[0].severity, Severity::Error);
        assert_eq!(run_with_load(3000)[0].severity, Severity::Warning);
        assert_eq!(run_with_load(1501)[0].severity, Severity::Warning);
        assert_eq!(run_with_load(1500)[0].severity, Severity::Good);
        assert_eq!(run_with_load(0)[0].severity, Severity::Good);
    }

    #[test]
    fn test_asset_counts() {
        let mut data = page();
        data.css_files = (0..11).map(|i| format!("/{i}.css")).collect();
        data.js_files = (0..15).map(|i| format!("/{i}.js")).collect();
        let issues = PerformanceCheck.run(&CheckContext::new(&data, None));
        assert_eq!(titled(&issues, "Too many CSS files").len(), 1);
        assert!(titled(&issues, "Too many JavaScript files").is_empty());

        data.js_files.push("/extra.js".to_string());
        let issues = PerformanceCheck.run(&CheckContext::new(&data, None));
        assert_eq!(titled(&issues, "Too many JavaScript files").len(), 1);
    }
}
