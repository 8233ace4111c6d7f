//! Bounded broken-link checking

use super::build_client;
use crate::config::FetchSettings;
use crate::page::{LinkCheckReport, LinkInfo, LinkStatus};
use rayon::prelude::*;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Unique http(s) hrefs to check, in page order, capped at `max`
fn link_candidates(links: &[LinkInfo], max: usize) -> Vec<&str> {
    let mut seen = HashSet::new();
    links
        .iter()
        .map(|l| l.href.as_str())
        .filter(|href| href.starts_with("http://") || href.starts_with("https://"))
        .filter(|href| seen.insert(*href))
        .take(max)
        .collect()
}

/// Check up to `settings.max_links` links on a pool of `settings.workers` threads.
///
/// Links still pending when `cancel` is set or the deadline passes are left out of the
/// report, so they keep no status.
pub fn check_links(
    links: &[LinkInfo],
    settings: &FetchSettings,
    cancel: &AtomicBool,
) -> LinkCheckReport {
    let candidates = link_candidates(links, settings.max_links);
    if candidates.is_empty() || cancel.load(Ordering::Relaxed) {
        return LinkCheckReport::default();
    }

    let client = match build_client(&settings.user_agent, settings.link_timeout) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "link checking skipped");
            return LinkCheckReport::default();
        }
    };
    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(settings.workers.max(1))
        .build()
    {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "link checking skipped");
            return LinkCheckReport::default();
        }
    };

    let deadline = Instant::now() + settings.deadline;
    let statuses: Vec<Option<LinkStatus>> = pool.install(|| {
        candidates
            .par_iter()
            .map(|href| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                let remaining = deadline.checked_duration_since(Instant::now())?;
                if remaining.is_zero() {
                    return None;
                }
                Some(check_one(&client, href, settings.link_timeout.min(remaining)))
            })
            .collect()
    });

    let skipped = statuses.iter().filter(|s| s.is_none()).count();
    if skipped > 0 {
        tracing::warn!(skipped, "links left unchecked (cancelled or deadline reached)");
    }

    LinkCheckReport {
        results: statuses.into_iter().flatten().collect(),
    }
}

/// HEAD the link, retrying with GET when the server refuses HEAD
fn check_one(client: &Client, href: &str, timeout: Duration) -> LinkStatus {
    let head = client.head(href).timeout(timeout).send();
    let result = match head {
        Ok(r) if matches!(
            r.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) =>
        {
            client.get(href).timeout(timeout).send()
        }
        other => other,
    };

    match result {
        Ok(response) => LinkStatus {
            href: href.to_string(),
            status: Some(response.status().as_u16()),
            error: None,
        },
        Err(e) => {
            tracing::debug!(href, error = %e, "link check failed");
            LinkStatus {
                href: href.to_string(),
                status: None,
                error: Some(e.to_string()),
            }
        }
    }
}
