//! Config schema and deserialization

use crate::CheckId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// Check toggle (on, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    On,
    /// Disable the check entirely
    Off,
}

/// Fetcher overrides. Unset fields fall back to [`FetchSettings::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_timeout_secs: Option<u64>,
    /// Maximum number of links checked per page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_links: Option<usize>,
    /// Worker threads used for link checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    /// Overall budget for the link-checking phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Whether broken-link checking runs at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_links: Option<bool>,
}

impl FetchConfig {
    /// Fill unset fields from `base`
    fn merge_from(&mut self, base: FetchConfig) {
        self.timeout_secs = self.timeout_secs.or(base.timeout_secs);
        self.link_timeout_secs = self.link_timeout_secs.or(base.link_timeout_secs);
        self.max_links = self.max_links.or(base.max_links);
        self.workers = self.workers.or(base.workers);
        self.deadline_secs = self.deadline_secs.or(base.deadline_secs);
        if self.user_agent.is_none() {
            self.user_agent = base.user_agent;
        }
        self.check_links = self.check_links.or(base.check_links);
    }

    pub fn settings(&self) -> FetchSettings {
        let defaults = FetchSettings::default();
        FetchSettings {
            page_timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.page_timeout),
            link_timeout: self
                .link_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.link_timeout),
            max_links: self.max_links.unwrap_or(defaults.max_links),
            workers: self.workers.unwrap_or(defaults.workers).max(1),
            deadline: self
                .deadline_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.deadline),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            check_links: self.check_links.unwrap_or(defaults.check_links),
        }
    }
}

/// Resolved fetcher settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub page_timeout: Duration,
    pub link_timeout: Duration,
    pub max_links: usize,
    pub workers: usize,
    pub deadline: Duration,
    pub user_agent: String,
    pub check_links: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(10),
            link_timeout: Duration::from_secs(5),
            max_links: 10,
            workers: 4,
            deadline: Duration::from_secs(30),
            user_agent: format!("seoaudit/{}", env!("CARGO_PKG_VERSION")),
            check_links: true,
        }
    }
}

/// Per-page override configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOverride {
    /// Glob patterns matched against the page file path or URL
    pub pages: Vec<String>,

    /// Optional threshold override for matched pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Optional check toggles for matched pages
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checks: BTreeMap<String, CheckMode>,
}

/// Root config structure for .seoauditrc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum score threshold (exit 1 if below). Default: 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Per-check toggles. Key is the check id in kebab-case.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checks: BTreeMap<String, CheckMode>,

    /// Glob patterns for files/directories to exclude when auditing a directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Fetcher settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Run checks on the rayon thread pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    /// Per-page overrides, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<PageOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>, cli_parallel: bool) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if cli_parallel {
            self.parallel = Some(true);
        }
        self
    }

    pub fn check_mode(&self, check_id: &str) -> Option<CheckMode> {
        self.checks.get(check_id).copied()
    }

    /// Check ids named in the config (top level or overrides) that are not in the catalog
    pub fn unknown_checks(&self) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .checks
            .keys()
            .chain(self.overrides.iter().flat_map(|o| o.checks.keys()))
            .filter(|name| name.parse::<CheckId>().is_err())
            .cloned()
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }

    /// Effective config for one page (file path or URL), applying overrides
    pub fn effective_for_page(&self, page: &str) -> EffectiveConfig {
        let mut threshold = self.threshold;
        let mut checks = self.checks.clone();

        for page_override in &self.overrides {
            if Self::matches_override(page, &page_override.pages) {
                if let Some(t) = page_override.threshold {
                    threshold = Some(t);
                }
                for (check, mode) in &page_override.checks {
                    checks.insert(check.clone(), *mode);
                }
            }
        }

        let disabled_checks = checks
            .iter()
            .filter(|(_, mode)| **mode == CheckMode::Off)
            .filter_map(|(name, _)| name.parse::<CheckId>().ok())
            .collect();

        EffectiveConfig {
            threshold,
            disabled_checks,
        }
    }

    fn matches_override(page: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher().is_match(page),
            Err(_) => false,
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.parallel.is_none() {
            self.parallel = base.parallel;
        }

        for (check, mode) in base.checks {
            self.checks.entry(check).or_insert(mode);
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        self.fetch.merge_from(base.fetch);

        // Base overrides apply first so this config's overrides win
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }
}

/// Effective configuration for a specific page (after applying overrides)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub threshold: Option<u8>,
    pub disabled_checks: HashSet<CheckId>,
}

impl EffectiveConfig {
    pub fn is_enabled(&self, check: CheckId) -> bool {
        !self.disabled_checks.contains(&check)
    }
}
