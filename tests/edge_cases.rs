//! Edge case tests: degenerate pages must not panic.

use proptest::prelude::*;
use seoaudit::analyzer::AuditEngine;
use seoaudit::page::WebsiteData;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn audit_path(path: &Path) -> Result<seoaudit::AuditResult, anyhow::Error> {
    AuditEngine::new().audit_file(path, Some("https://example.com/"), None)
}

fn page_file(suffix: &str, body: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(body).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn empty_file_no_panic() {
    let file = page_file(".html", b"");
    let r = audit_path(file.path()).unwrap();
    assert_eq!(r.page_title, None);
    assert!(!r.issues.is_empty());
    assert!(r.failed_checks.is_empty());
}

#[test]
fn plain_text_no_panic() {
    let file = page_file(".html", b"hello world");
    let r = audit_path(file.path()).unwrap();
    assert!(r.issues.iter().any(|i| i.title == "Thin content"));
}

#[test]
fn broken_markup_handled_gracefully() {
    let file = page_file(
        ".html",
        b"<html><head><title>Unclosed<body><h1>Heading<p>text <a href='/x'>link",
    );
    let r = audit_path(file.path()).unwrap();
    assert_eq!(r.passed_checks + r.warning_checks + r.error_checks, r.issues.len());
}

#[test]
fn invalid_json_ld_is_reported_not_fatal() {
    let file = page_file(
        ".html",
        br#"<html><head><script type="application/ld+json">{ not json</script></head></html>"#,
    );
    let r = audit_path(file.path()).unwrap();
    assert!(r.issues.iter().any(|i| i.title == "Invalid structured data"));
}

#[test]
fn non_utf8_file_is_an_error() {
    let file = page_file(".html", &[0xff, 0xfe, 0x00, 0x3c]);
    let err = audit_path(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read"));
}

#[test]
fn empty_snapshot_json_uses_defaults() {
    let file = page_file(".json", b"{}");
    let r = AuditEngine::new().audit_file(file.path(), None, None).unwrap();
    assert!(r.issues.iter().any(|i| i.title == "Missing page title"));
    assert!(r.issues.iter().any(|i| i.title == "No HTTPS"));
}

#[test]
fn default_snapshot_audits_without_panicking() {
    let r = AuditEngine::new().audit(&WebsiteData::default(), None);
    assert!(r.score <= 100);
    assert!(r.failed_checks.is_empty());
}

#[test]
fn huge_heading_and_link_counts() {
    let mut html = String::from("<html><body>");
    for i in 0..500 {
        html.push_str(&format!("<h1>Heading {i}</h1><a href='https://other{i}.test/'>out</a>"));
    }
    html.push_str("</body></html>");
    let r = seoaudit::audit_html(&html, "https://example.com/").unwrap();
    assert!(r.issues.iter().any(|i| i.title == "Multiple H1 headings"));
    assert!(r.issues.iter().any(|i| i.title == "Too many external links"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_markup_never_panics(body in "[<>a-z0-9 =\"'/#:.-]{0,400}") {
        let r = seoaudit::audit_html(&body, "https://example.com/").unwrap();
        prop_assert!(r.failed_checks.is_empty());
        prop_assert!(r.score <= 100);
        prop_assert_eq!(r.passed_checks + r.warning_checks + r.error_checks, r.issues.len());
    }

    #[test]
    fn arbitrary_text_in_body_never_panics(text in "\\PC{0,300}") {
        let html = format!("<html><body><h1>{text}</h1><p>{text}</p></body></html>");
        let r = seoaudit::audit_html(&html, "https://example.com/").unwrap();
        prop_assert!(r.failed_checks.is_empty());
    }
}
