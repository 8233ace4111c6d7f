//! Page data extraction - raw HTML and response metadata to `WebsiteData`

pub mod keywords;
pub mod structured_data;

pub use keywords::extract_keywords;
pub use structured_data::extract_structured_data;

use crate::page::{
    Headings, ImageInfo, LinkInfo, MetaTags, PerformanceInfo, SecurityInfo, WebsiteData,
    TRACKED_SECURITY_HEADERS,
};
use crate::AuditError;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

/// Elements whose text is never shown to readers
const HIDDEN_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// A fetched (or locally loaded) page before extraction
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    pub url: String,
    pub status_code: u16,
    pub html: String,
    /// Response headers with lowercase names
    pub headers: HashMap<String, String>,
    pub redirect_chain: Vec<String>,
    pub load_time_ms: u64,
    pub ttfb_ms: Option<u64>,
    pub has_sitemap: bool,
    pub has_robots_txt: bool,
}

impl RawPage {
    /// Page served from `url` with a 200 response and no headers
    pub fn from_html(url: &str, html: &str) -> Result<Self, AuditError> {
        let url = Url::parse(url).map_err(|e| AuditError::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self {
            url: url.to_string(),
            status_code: 200,
            html: html.to_string(),
            ..Self::default()
        })
    }

    /// Load a page from disk. `robots.txt` and `sitemap.xml` next to the file count as present.
    pub fn from_file(path: &Path, page_url: Option<&str>) -> Result<Self, AuditError> {
        let html = fs::read_to_string(path).map_err(|source| AuditError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let url = match page_url {
            Some(u) => u.to_string(),
            None => {
                let absolute = path.canonicalize().map_err(|source| AuditError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Url::from_file_path(&absolute)
                    .map_err(|_| AuditError::InvalidUrl(absolute.display().to_string()))?
                    .to_string()
            }
        };

        let mut page = Self::from_html(&url, &html)?;
        if let Some(dir) = path.parent() {
            page.has_robots_txt = dir.join("robots.txt").is_file();
            page.has_sitemap = dir.join("sitemap.xml").is_file();
        }
        Ok(page)
    }
}

/// Builds `WebsiteData` from a `RawPage`
pub struct PageExtractor;

impl PageExtractor {
    pub fn extract(raw: &RawPage) -> WebsiteData {
        let document = Html::parse_document(&raw.html);
        let base = Url::parse(&raw.url).ok();

        let text = visible_text(&document);
        let word_count = text.split_whitespace().count();
        let content_length = raw.html.len();
        let text_to_html_ratio = if content_length == 0 {
            0.0
        } else {
            (text.len() as f64 / content_length as f64 * 100.0).min(100.0)
        };

        let has_ssl = base.as_ref().is_some_and(|u| u.scheme() == "https");
        let security_headers = TRACKED_SECURITY_HEADERS
            .into_iter()
            .map(|name| (name.to_string(), raw.headers.get(name).cloned()))
            .collect();

        let broken_links = Vec::new();
        let links = extract_links(&document, base.as_ref());

        WebsiteData {
            url: raw.url.clone(),
            status_code: raw.status_code,
            redirect_chain: raw.redirect_chain.clone(),
            meta_tags: extract_meta_tags(&document, base.as_ref()),
            headings: extract_headings(&document),
            images: extract_images(&document, base.as_ref()),
            links,
            broken_links,
            structured_data: extract_structured_data(&document),
            security: SecurityInfo {
                has_ssl,
                has_mixed_content: has_ssl && has_mixed_content(&document),
                security_headers,
            },
            performance: PerformanceInfo {
                load_time_ms: raw.load_time_ms,
                time_to_first_byte_ms: raw.ttfb_ms,
                page_size_bytes: Some(content_length),
            },
            content_length,
            word_count,
            text_to_html_ratio,
            keywords: extract_keywords(&text),
            has_sitemap: raw.has_sitemap,
            has_robots_txt: raw.has_robots_txt,
            css_files: collect_attr(&document, stylesheet_selector(), "href", base.as_ref()),
            js_files: collect_attr(&document, script_src_selector(), "src", base.as_ref()),
        }
    }
}

fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector"))
}

fn stylesheet_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    selector(&SELECTOR, "link[rel~='stylesheet'][href]")
}

fn script_src_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    selector(&SELECTOR, "script[src]")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

/// Body text with script/style content removed, whitespace collapsed
fn visible_text(document: &Html) -> String {
    static BODY: OnceLock<Selector> = OnceLock::new();
    let Some(body) = document.select(selector(&BODY, "body")).next() else {
        return String::new();
    };

    let mut out = String::new();
    for node in body.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|a| {
                matches!(a.value(), Node::Element(el) if HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    collapse_whitespace(&out)
}

fn extract_meta_tags(document: &Html, base: Option<&Url>) -> MetaTags {
    static TITLE: OnceLock<Selector> = OnceLock::new();
    static META: OnceLock<Selector> = OnceLock::new();
    static CANONICAL: OnceLock<Selector> = OnceLock::new();
    static HTML_LANG: OnceLock<Selector> = OnceLock::new();

    let mut tags = MetaTags {
        title: document
            .select(selector(&TITLE, "title"))
            .next()
            .and_then(|el| non_empty(&element_text(el))),
        canonical: document
            .select(selector(&CANONICAL, "link[rel~='canonical'][href]"))
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(non_empty)
            .map(|href| resolve(base, &href)),
        language: document
            .select(selector(&HTML_LANG, "html[lang]"))
            .next()
            .and_then(|el| el.value().attr("lang"))
            .and_then(non_empty),
        ..MetaTags::default()
    };

    for el in document.select(selector(&META, "meta")) {
        let attrs = el.value();
        let Some(content) = attrs.attr("content").and_then(non_empty) else {
            continue;
        };

        if let Some(equiv) = attrs.attr("http-equiv") {
            if equiv.eq_ignore_ascii_case("content-language") && tags.language.is_none() {
                tags.language = Some(content);
            }
            continue;
        }

        let key = attrs
            .attr("name")
            .or_else(|| attrs.attr("property"))
            .map(|k| k.trim().to_ascii_lowercase());
        let Some(key) = key else {
            continue;
        };

        let slot = match key.as_str() {
            "description" => &mut tags.description,
            "keywords" => &mut tags.keywords,
            "viewport" => &mut tags.viewport,
            "robots" => &mut tags.robots,
            "author" => &mut tags.author,
            "theme-color" => &mut tags.theme_color,
            "og:title" => &mut tags.og_title,
            "og:description" => &mut tags.og_description,
            "og:image" => &mut tags.og_image,
            "og:url" => &mut tags.og_url,
            "og:type" => &mut tags.og_type,
            "twitter:card" => &mut tags.twitter_card,
            "twitter:title" => &mut tags.twitter_title,
            "twitter:description" => &mut tags.twitter_description,
            "twitter:image" => &mut tags.twitter_image,
            _ => continue,
        };
        // First occurrence wins
        if slot.is_none() {
            *slot = Some(content);
        }
    }

    tags
}

fn extract_headings(document: &Html) -> Headings {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    let mut headings = Headings::default();

    for el in document.select(selector(&SELECTOR, "h1, h2, h3, h4, h5, h6")) {
        let Some(level) = el
            .value()
            .name()
            .trim_start_matches('h')
            .parse::<u8>()
            .ok()
        else {
            continue;
        };
        let text = element_text(el);
        if text.is_empty() {
            continue;
        }
        if let Some(bucket) = headings.level_mut(level) {
            bucket.push(text);
        }
    }

    headings
}

fn image_format(src: &str) -> Option<String> {
    if let Some(rest) = src.strip_prefix("data:image/") {
        let subtype = rest.split([';', ',']).next()?;
        return Some(subtype.trim_end_matches("+xml").to_ascii_lowercase());
    }
    let path = src.split(['?', '#']).next()?;
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "webp" | "avif" | "svg" | "bmp" | "ico" => Some(ext),
        _ => None,
    }
}

fn extract_images(document: &Html, base: Option<&Url>) -> Vec<ImageInfo> {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();

    document
        .select(selector(&SELECTOR, "img"))
        .map(|el| {
            let attrs = el.value();
            let raw_src = attrs
                .attr("src")
                .or_else(|| attrs.attr("data-src"))
                .unwrap_or("")
                .trim();
            let src = if raw_src.is_empty() || raw_src.starts_with("data:") {
                raw_src.to_string()
            } else {
                resolve(base, raw_src)
            };
            let alt = attrs.attr("alt").map(|a| a.trim().to_string());
            let lazy_loaded = attrs
                .attr("loading")
                .is_some_and(|l| l.eq_ignore_ascii_case("lazy"))
                || attrs.attr("data-src").is_some()
                || attrs.attr("data-lazy-src").is_some();

            ImageInfo {
                format: image_format(raw_src),
                has_alt: alt.is_some(),
                alt,
                width: attrs.attr("width").and_then(non_empty),
                height: attrs.attr("height").and_then(non_empty),
                lazy_loaded,
                src,
            }
        })
        .collect()
}

fn extract_links(document: &Html, base: Option<&Url>) -> Vec<LinkInfo> {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    static IMG_SELECTOR: OnceLock<Selector> = OnceLock::new();
    let img_selector = selector(&IMG_SELECTOR, "img");

    let base_host = base.and_then(|u| u.host_str()).map(|h| h.to_string());
    let base_port = base.and_then(|u| u.port_or_known_default());

    let mut links = Vec::new();
    for el in document.select(selector(&SELECTOR, "a[href]")) {
        let attrs = el.value();
        let href = attrs.attr("href").unwrap_or("").trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
        {
            continue;
        }

        // Accessible text: content, then aria-label/title, then image alt
        let mut text = element_text(el);
        if text.is_empty() {
            if let Some(label) = attrs.attr("aria-label").or_else(|| attrs.attr("title")) {
                text = label.trim().to_string();
            }
        }
        if text.is_empty() {
            text = el
                .select(img_selector)
                .filter_map(|img| img.value().attr("alt"))
                .map(str::trim)
                .find(|alt| !alt.is_empty())
                .unwrap_or("")
                .to_string();
        }

        let resolved = resolve(base, href);
        let is_internal = match Url::parse(&resolved) {
            Ok(u) => {
                u.host_str().map(|h| h.to_string()) == base_host
                    && u.port_or_known_default() == base_port
            }
            Err(_) => false,
        };
        let nofollow = attrs
            .attr("rel")
            .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("nofollow")));

        links.push(LinkInfo {
            href: resolved,
            has_text: !text.is_empty(),
            text,
            is_internal,
            nofollow,
            target: attrs.attr("target").map(|t| t.to_string()),
            status: None,
            error: None,
        });
    }
    links
}

/// Insecure http:// subresources on the page
fn has_mixed_content(document: &Html) -> bool {
    static SRC: OnceLock<Selector> = OnceLock::new();
    let insecure = |v: &str| v.trim().to_ascii_lowercase().starts_with("http://");

    let src_elements = document.select(selector(
        &SRC,
        "img[src], script[src], iframe[src], audio[src], video[src], source[src], embed[src]",
    ));
    for el in src_elements {
        if el.value().attr("src").is_some_and(insecure) {
            return true;
        }
    }

    document
        .select(stylesheet_selector())
        .any(|el| el.value().attr("href").is_some_and(insecure))
}

fn collect_attr(
    document: &Html,
    selector: &Selector,
    attr: &str,
    base: Option<&Url>,
) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr(attr))
        .filter_map(non_empty)
        .map(|v| resolve(base, &v))
        .collect()
}
