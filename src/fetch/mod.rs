//! HTTP fetching for live pages
//!
//! Requires the `fetch` feature:
//! ```toml
//! seoaudit = { version = "0.3", features = ["fetch"] }
//! ```

pub mod links;

pub use links::check_links;

use crate::config::FetchSettings;
use crate::extractor::RawPage;
use crate::AuditError;
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

/// Redirect hops followed before giving up
pub const MAX_REDIRECTS: usize = 10;

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, AuditError> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(Policy::none())
        .build()
        .map_err(|e| AuditError::network(e.to_string()))
}

/// Fetch `url`, following redirects by hand so the chain can be reported.
pub fn fetch_page(url: &str, settings: &FetchSettings) -> Result<RawPage, AuditError> {
    let mut current = Url::parse(url).map_err(|e| AuditError::InvalidUrl(format!("{url}: {e}")))?;
    if !matches!(current.scheme(), "http" | "https") {
        return Err(AuditError::InvalidUrl(format!(
            "{url}: only http and https pages can be fetched"
        )));
    }

    let client = build_client(&settings.user_agent, settings.page_timeout)?;
    let mut redirect_chain = Vec::new();
    let start = Instant::now();

    let response = loop {
        tracing::debug!(url = %current, "fetching page");
        let response = client
            .get(current.as_str())
            .send()
            .map_err(|e| AuditError::network(format!("{current}: {e}")))?;

        if !response.status().is_redirection() {
            break response;
        }
        let Some(next) = redirect_target(&current, response.headers().get(LOCATION)) else {
            break response;
        };
        if redirect_chain.len() >= MAX_REDIRECTS {
            return Err(AuditError::network(format!(
                "{url}: more than {MAX_REDIRECTS} redirects"
            )));
        }
        redirect_chain.push(current.to_string());
        current = next;
    };

    let ttfb_ms = start.elapsed().as_millis() as u64;
    let status_code = response.status().as_u16();
    let headers: HashMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect();
    let html = response
        .text()
        .map_err(|e| AuditError::network(format!("{current}: {e}")))?;
    let load_time_ms = start.elapsed().as_millis() as u64;

    let side_client = build_client(&settings.user_agent, settings.link_timeout)?;
    let has_robots_txt = origin_has(&side_client, &current, "/robots.txt");
    let has_sitemap = origin_has(&side_client, &current, "/sitemap.xml");

    Ok(RawPage {
        url: current.to_string(),
        status_code,
        html,
        headers,
        redirect_chain,
        load_time_ms,
        ttfb_ms: Some(ttfb_ms),
        has_sitemap,
        has_robots_txt,
    })
}

fn redirect_target(current: &Url, location: Option<&reqwest::header::HeaderValue>) -> Option<Url> {
    let location = location?.to_str().ok()?;
    current.join(location).ok()
}

/// Whether `path` on the page's origin answers with a success status
fn origin_has(client: &Client, page: &Url, path: &str) -> bool {
    let Ok(target) = page.join(path) else {
        return false;
    };
    match client.get(target.as_str()).send() {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            tracing::debug!(url = %target, error = %e, "origin file request failed");
            false
        }
    }
}
