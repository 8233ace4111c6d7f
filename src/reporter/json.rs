//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::{AuditResult, Grade};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single audit result as JSON
    pub fn report(&self, result: &AuditResult) -> String {
        self.render(result, "{}")
    }

    /// Report multiple results as JSON array
    pub fn report_many(&self, results: &[AuditResult]) -> String {
        self.render(results, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(&self, results: &[AuditResult], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results,
            summary: JsonSummary {
                pages_audited: stats.pages_audited,
                average_score: stats.average_score,
                average_grade: Grade::from_score(stats.average_score).to_string(),
                total_issues: stats.total_issues,
                total_errors: stats.total_errors,
            },
        };
        self.render(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [AuditResult],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    pages_audited: usize,
    average_score: u8,
    average_grade: String,
    total_issues: usize,
    total_errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, CategoryScore, CheckId, Issue, Severity};
    use chrono::Utc;

    fn make_result(url: &str, score: u8) -> AuditResult {
        AuditResult {
            url: url.to_string(),
            score,
            passed_checks: 1,
            warning_checks: 1,
            error_checks: 0,
            category_scores: vec![CategoryScore {
                name: Category::MetaTags,
                score: 75,
                issue_count: 1,
            }],
            issues: vec![
                Issue::good(CheckId::TitleTag, Category::MetaTags, "Title length is optimal", "ok"),
                Issue::warning(
                    CheckId::MetaDescription,
                    Category::MetaTags,
                    "Meta description too short",
                    "short",
                ),
            ],
            timestamp: Utc::now(),
            scan_duration: 3,
            page_title: Some("Title".to_string()),
            failed_checks: vec![],
        }
    }

    #[test]
    fn test_json_single_result_has_expected_keys() {
        let reporter = JsonReporter::new();
        let json = reporter.report(&make_result("https://a.test/", 75));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in [
            "url",
            "score",
            "passedChecks",
            "warningChecks",
            "errorChecks",
            "categoryScores",
            "issues",
            "timestamp",
            "scanDuration",
            "pageTitle",
        ] {
            assert!(parsed.get(key).is_some(), "missing key {key}");
        }
        assert!(parsed.get("failedChecks").is_none());
        assert_eq!(parsed["categoryScores"][0]["name"], "Meta Tags");
        assert_eq!(parsed["categoryScores"][0]["issueCount"], 1);
        assert_eq!(parsed["issues"][1]["severity"], "warning");
    }

    #[test]
    fn test_json_pretty_output() {
        let reporter = JsonReporter::new().pretty();
        let json = reporter.report(&make_result("https://a.test/", 75));
        assert!(json.contains('\n'), "pretty JSON should have newlines");
        assert!(json.contains("  "), "pretty JSON should have indentation");
    }

    #[test]
    fn test_json_report_many() {
        let reporter = JsonReporter::new();
        let json = reporter.report_many(&[
            make_result("https://a.test/", 90),
            make_result("https://b.test/", 70),
        ]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let arr = parsed.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1]["url"], "https://b.test/");
    }

    #[test]
    fn test_json_report_with_summary() {
        let stats = AggregateStats {
            pages_audited: 2,
            average_score: 80,
            total_issues: 2,
            total_errors: 0,
        };
        let reporter = JsonReporter::new();
        let json = reporter.report_with_summary(
            &[
                make_result("https://a.test/", 90),
                make_result("https://b.test/", 70),
            ],
            &stats,
        );
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let summary = &parsed["summary"];
        assert_eq!(summary["pagesAudited"], 2);
        assert_eq!(summary["averageScore"], 80);
        assert_eq!(summary["averageGrade"], "B");
        assert_eq!(parsed["results"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_round_trip_keeps_issues() {
        let result = make_result("https://a.test/", 75);
        let json = JsonReporter::new().report(&result);
        let back: AuditResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.issues, result.issues);
        assert_eq!(back.issues[0].severity, Severity::Good);
    }
}
