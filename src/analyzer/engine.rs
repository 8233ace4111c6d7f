//! Audit engine - runs the check catalog and aggregates results

use crate::config::{Config, EffectiveConfig};
use crate::extractor::{PageExtractor, RawPage};
use crate::page::WebsiteData;
use crate::{AuditResult, CheckId, Issue};
use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use std::any::Any;
use std::collections::HashSet;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::checks::{CheckContext, SeoCheck, CATALOG};
use super::ScoreCalculator;

/// A page file to audit, optionally judged against a public URL
#[derive(Debug, Clone)]
pub struct PageFile {
    pub path: PathBuf,
    pub url: Option<String>,
}

impl PageFile {
    pub fn new(path: impl Into<PathBuf>, url: Option<String>) -> Self {
        Self {
            path: path.into(),
            url,
        }
    }
}

/// Main audit engine that runs every enabled check
pub struct AuditEngine {
    /// Run checks on the rayon pool
    parallel_checks: bool,
    /// Checks switched off for every audit
    disabled: HashSet<CheckId>,
}

impl AuditEngine {
    /// Create a new audit engine with every check enabled
    pub fn new() -> Self {
        Self {
            parallel_checks: false,
            disabled: HashSet::new(),
        }
    }

    /// Run the checks of one audit in parallel
    pub fn with_parallel_checks(mut self, parallel: bool) -> Self {
        self.parallel_checks = parallel;
        self
    }

    /// Skip the given checks in every audit
    pub fn with_disabled_checks(mut self, checks: impl IntoIterator<Item = CheckId>) -> Self {
        self.disabled.extend(checks);
        self
    }

    fn enabled_checks(&self, effective: Option<&EffectiveConfig>) -> Vec<&'static dyn SeoCheck> {
        CATALOG
            .iter()
            .copied()
            .filter(|check| !self.disabled.contains(&check.id()))
            .filter(|check| effective.map_or(true, |e| e.is_enabled(check.id())))
            .collect()
    }

    /// Run one check, turning a panic into an error message
    fn run_check(check: &dyn SeoCheck, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, String> {
        panic::catch_unwind(AssertUnwindSafe(|| check.run(ctx))).map_err(panic_message)
    }

    /// Audit a page snapshot. `html` is the raw source when available.
    pub fn audit(&self, data: &WebsiteData, html: Option<&str>) -> AuditResult {
        self.audit_with(data, html, None)
    }

    fn audit_with(
        &self,
        data: &WebsiteData,
        html: Option<&str>,
        effective: Option<&EffectiveConfig>,
    ) -> AuditResult {
        let checks = self.enabled_checks(effective);
        self.audit_checks(&checks, data, html)
    }

    fn audit_checks(
        &self,
        checks: &[&dyn SeoCheck],
        data: &WebsiteData,
        html: Option<&str>,
    ) -> AuditResult {
        let started = Instant::now();
        let ctx = CheckContext::new(data, html);

        // Both paths yield results in catalog order
        let outcomes: Vec<(CheckId, Result<Vec<Issue>, String>)> = if self.parallel_checks {
            checks
                .par_iter()
                .map(|check| (check.id(), Self::run_check(*check, &ctx)))
                .collect()
        } else {
            checks
                .iter()
                .map(|check| (check.id(), Self::run_check(*check, &ctx)))
                .collect()
        };

        let mut issues = Vec::new();
        let mut failed_checks = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(found) => {
                    tracing::debug!(check = %id, issues = found.len(), "check finished");
                    issues.extend(found);
                }
                Err(message) => {
                    tracing::warn!(check = %id, error = %message, "check failed; skipping its results");
                    failed_checks.push(id.to_string());
                }
            }
        }

        let counts = ScoreCalculator::counts(&issues);
        let score = ScoreCalculator::score(&issues);
        let category_scores = ScoreCalculator::category_scores(&issues);

        AuditResult {
            url: data.url.clone(),
            score,
            passed_checks: counts.passed,
            warning_checks: counts.warnings,
            error_checks: counts.errors,
            category_scores,
            issues,
            timestamp: Utc::now(),
            scan_duration: started.elapsed().as_millis() as u64,
            page_title: data.meta_tags.title.clone(),
            failed_checks,
        }
    }

    /// Extract and audit a raw page; overrides are matched against the page URL
    pub fn audit_page(&self, raw: &RawPage, config: Option<&Config>) -> AuditResult {
        let effective = config.map(|c| c.effective_for_page(&raw.url));
        self.audit_raw(raw, effective.as_ref())
    }

    /// Audit an already extracted snapshot; overrides are matched against its URL
    pub fn audit_snapshot(
        &self,
        data: &WebsiteData,
        html: Option<&str>,
        config: Option<&Config>,
    ) -> AuditResult {
        let effective = config.map(|c| c.effective_for_page(&data.url));
        self.audit_with(data, html, effective.as_ref())
    }

    fn audit_raw(&self, raw: &RawPage, effective: Option<&EffectiveConfig>) -> AuditResult {
        let data = PageExtractor::extract(raw);
        tracing::debug!(
            url = %data.url,
            words = data.word_count,
            links = data.links.len(),
            images = data.images.len(),
            "page extracted"
        );
        self.audit_with(&data, Some(&raw.html), effective)
    }

    /// Audit an HTML file, or a `WebsiteData` snapshot stored as `.json`.
    /// Overrides are matched against the file path.
    pub fn audit_file(
        &self,
        path: &Path,
        page_url: Option<&str>,
        config: Option<&Config>,
    ) -> Result<AuditResult> {
        let effective = config.map(|c| c.effective_for_page(&path.to_string_lossy()));

        let is_snapshot = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_snapshot {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read page data: {}", path.display()))?;
            let mut data: WebsiteData = serde_json::from_str(&content).map_err(|e| {
                crate::AuditError::InvalidData {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?;
            if let Some(url) = page_url {
                data.url = url.to_string();
            }
            return Ok(self.audit_with(&data, None, effective.as_ref()));
        }

        let raw = RawPage::from_file(path, page_url)
            .with_context(|| format!("Failed to load page: {}", path.display()))?;
        Ok(self.audit_raw(&raw, effective.as_ref()))
    }

    /// Audit multiple page files sequentially
    pub fn audit_many(&self, pages: &[PageFile], config: Option<&Config>) -> Vec<Result<AuditResult>> {
        pages
            .iter()
            .map(|p| self.audit_file(&p.path, p.url.as_deref(), config))
            .collect()
    }

    /// Audit multiple page files in parallel using rayon
    pub fn audit_parallel(
        &self,
        pages: &[PageFile],
        config: Option<&Config>,
    ) -> Vec<Result<AuditResult>> {
        pages
            .par_iter()
            .map(|p| self.audit_file(&p.path, p.url.as_deref(), config))
            .collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[AuditResult]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total_score: u32 = results.iter().map(|r| r.score as u32).sum();
        let average_score = (total_score / results.len() as u32) as u8;

        AggregateStats {
            pages_audited: results.len(),
            average_score,
            total_issues: results.iter().map(|r| r.problems().count()).sum(),
            total_errors: results.iter().map(|r| r.error_checks).sum(),
        }
    }
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "check panicked".to_string()
    }
}

/// Aggregate statistics from multiple page audits
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateStats {
    pub pages_audited: usize,
    /// Average score across all pages
    pub average_score: u8,
    /// Warnings and errors across all pages
    pub total_issues: usize,
    pub total_errors: usize,
}
