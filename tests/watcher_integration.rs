//! Integration tests for the watcher public API.
//! Exercises is_page_file and that watch() can be created for a temp directory.

use seoaudit::watcher::{is_page_file, PageWatcher};
use std::path::Path;

#[test]
fn watcher_accepts_html_pages() {
    assert!(is_page_file(Path::new("index.html")));
    assert!(is_page_file(Path::new("about.htm")));
    assert!(is_page_file(Path::new("blog/post.html")));
}

#[test]
fn watcher_rejects_other_files() {
    assert!(!is_page_file(Path::new("style.css")));
    assert!(!is_page_file(Path::new("sitemap.xml")));
    assert!(!is_page_file(Path::new("page.html.bak")));
}

#[test]
fn watcher_rejects_node_modules() {
    assert!(!is_page_file(Path::new("node_modules/docs/index.html")));
}

#[test]
fn watcher_watch_temp_dir_succeeds() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = PageWatcher::watch(dir.path());
    assert!(
        result.is_ok(),
        "watch on temp dir should succeed: {:?}",
        result.err()
    );
}
