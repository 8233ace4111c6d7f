//! seoaudit: SEO Audit CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use seoaudit::analyzer::{AuditEngine, PageFile};
use seoaudit::config::{
    build_ignore_set, is_ignored, load_config, starter_config, Config, CONFIG_FILENAME,
};
use seoaudit::reporter::{ConsoleReporter, JsonReporter};
use seoaudit::watcher::{is_page_file, PageWatcher};
use seoaudit::AuditResult;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SEOAUDIT_LOG";

/// seoaudit: SEO auditor for HTML pages
#[derive(Parser, Debug)]
#[command(name = "seoaudit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// HTML file, directory of HTML files, or http(s) URL to audit
    path: Option<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (passed checks, docs links, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .seoauditrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// URL the page is judged against (for a directory: base URL of the site root)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Watch for file changes and re-audit
    #[arg(long)]
    watch: bool,

    /// Run checks and page audits in parallel
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Skip broken-link checking when fetching a URL
    #[arg(long)]
    no_link_check: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .seoauditrc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "seoaudit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(Commands::Init { threshold, dir }) = &args.command {
        return run_init(*threshold, dir.as_deref());
    }

    let Some(target) = args.path.clone() else {
        anyhow::bail!("a PATH or URL to audit is required");
    };

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    if is_remote(&target) {
        return run_remote(&args, &target);
    }

    let path = PathBuf::from(&target);
    if args.watch {
        return run_watch(&args, &path);
    }

    let work_dir = work_dir_for(&path);
    let config = load_config(&work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.parallel);
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let pages = collect_pages(&path, ignore_set.as_ref(), args.url.as_deref())?;
    if pages.is_empty() {
        eprintln!("{}: No HTML files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let engine = engine_for(&config);
    let use_parallel = config.parallel.unwrap_or(false) || pages.len() > 10;
    let outcomes = if use_parallel {
        engine.audit_parallel(&pages, Some(&config))
    } else {
        engine.audit_many(&pages, Some(&config))
    };

    let mut results = Vec::new();
    let mut had_errors = false;
    for (page, outcome) in pages.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                had_errors = true;
                if !args.quiet {
                    eprintln!(
                        "{}: Failed to audit {}: {:#}",
                        "Error".red(),
                        page.path.display(),
                        e
                    );
                }
            }
        }
    }

    if results.is_empty() {
        eprintln!("{}: All pages failed to audit", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let page_threshold = match pages.as_slice() {
        [single] => config
            .effective_for_page(&single.path.to_string_lossy())
            .threshold,
        _ => None,
    };
    let code = finish(&args, &config, &results, page_threshold);
    if had_errors && code == 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::from(code))
}

fn is_remote(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

fn work_dir_for(path: &Path) -> PathBuf {
    if path.is_file() {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    } else {
        path.to_path_buf()
    }
}

fn engine_for(config: &Config) -> AuditEngine {
    AuditEngine::new().with_parallel_checks(config.parallel.unwrap_or(false))
}

/// Print results and return the exit code: 1 when the score is below the threshold
fn finish(
    args: &Args,
    config: &Config,
    results: &[AuditResult],
    page_threshold: Option<u8>,
) -> u8 {
    let stats = AuditEngine::aggregate_stats(results);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(results, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for result in results {
            reporter.report_quiet(result);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(results, &stats);
        }
    }

    // CLI flag wins over per-page overrides and the config file
    let threshold = args.threshold.or(page_threshold).or(config.threshold);
    if let Some(threshold) = threshold {
        let score = if results.len() == 1 {
            results[0].score
        } else {
            stats.average_score
        };

        if score < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Score {} is below threshold {}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            return 1;
        }
    }

    0
}

#[cfg(feature = "fetch")]
fn run_remote(args: &Args, url: &str) -> Result<ExitCode> {
    use seoaudit::extractor::PageExtractor;
    use std::sync::atomic::AtomicBool;

    if args.watch {
        anyhow::bail!("--watch only works with local files");
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.parallel);
    let settings = config.fetch.settings();

    let raw = seoaudit::fetch::fetch_page(url, &settings)
        .with_context(|| format!("Failed to fetch {url}"))?;
    let mut data = PageExtractor::extract(&raw);

    if settings.check_links && !args.no_link_check {
        let cancel = AtomicBool::new(false);
        let report = seoaudit::fetch::check_links(&data.links, &settings, &cancel);
        data = data.with_link_statuses(&report);
    }

    let result = engine_for(&config).audit_snapshot(&data, Some(&raw.html), Some(&config));
    let page_threshold = config.effective_for_page(&data.url).threshold;
    Ok(ExitCode::from(finish(args, &config, &[result], page_threshold)))
}

#[cfg(not(feature = "fetch"))]
fn run_remote(_args: &Args, url: &str) -> Result<ExitCode> {
    anyhow::bail!(
        "cannot fetch {url}: this build has no network support. Rebuild with: cargo build --features fetch"
    )
}

fn run_init(threshold: Option<u8>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(70);
    let json = serde_json::to_string_pretty(&starter_config(threshold_value))
        .context("Failed to serialize starter config")?;

    std::fs::write(&config_path, format!("{json}\n"))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path) -> Result<ExitCode> {
    let work_dir = work_dir_for(path);
    let config = load_config(&work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.parallel);
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let engine = engine_for(&config);
    let single_file = path.is_file().then(|| path.canonicalize().ok()).flatten();

    let watcher = PageWatcher::watch(path).context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let changed = watcher.next_changes();
        let pages: Vec<PathBuf> = changed
            .into_iter()
            .filter(|p| {
                ignore_set
                    .as_ref()
                    .map(|set| !is_ignored(p, set))
                    .unwrap_or(true)
            })
            // Watching one file still sees events for its siblings
            .filter(|p| match &single_file {
                Some(target) => p.canonicalize().ok().as_ref() == Some(target),
                None => true,
            })
            .collect();

        for page in pages {
            let page_url = page_url_for(args.url.as_deref(), path, &page);
            match engine.audit_file(&page, page_url.as_deref(), Some(&config)) {
                Ok(result) => {
                    if args.json {
                        println!("{}", JsonReporter::new().report(&result));
                    } else if args.quiet {
                        ConsoleReporter::new().report_quiet(&result);
                    } else {
                        let mut reporter = ConsoleReporter::new();
                        if args.verbose {
                            reporter = reporter.verbose();
                        }
                        reporter.report(&result);
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}: {:#}", "Error".red(), page.display(), e);
                }
            }
        }
    }
}

/// Page URL for `page` when auditing `root`. For a directory, `base` is the site root URL.
fn page_url_for(base: Option<&str>, root: &Path, page: &Path) -> Option<String> {
    let base = base?;
    if !root.is_dir() {
        return Some(base.to_string());
    }
    let relative = page.strip_prefix(root).unwrap_or(page);
    let relative: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let joined = format!("{}/{}", base.trim_end_matches('/'), relative.join("/"));
    Some(joined)
}

fn collect_pages(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    base_url: Option<&str>,
) -> Result<Vec<PageFile>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![PageFile::new(path, base_url.map(str::to_string))]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|p| p.is_file() && is_page_file(p))
        .filter(|p| ignore_set.map_or(true, |set| !is_ignored(p, set)))
        .collect();

    // Sort for consistent output
    files.sort();

    Ok(files
        .into_iter()
        .map(|file| {
            let url = page_url_for(base_url, path, &file);
            PageFile::new(file, url)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
        let args = Args::try_parse_from(["seoaudit"]).unwrap();
        assert!(args.path.is_none());
        assert!(args.command.is_none());
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/"));
        assert!(is_remote("http://localhost:8080/page"));
        assert!(!is_remote("site/index.html"));
        assert!(!is_remote("httpdocs/index.html"));
    }

    #[test]
    fn test_page_url_for_directory_pages() {
        let dir = tempfile::TempDir::new().unwrap();
        let page = dir.path().join("blog").join("post.html");
        assert_eq!(
            page_url_for(Some("https://example.com/"), dir.path(), &page).as_deref(),
            Some("https://example.com/blog/post.html")
        );
        assert_eq!(page_url_for(None, dir.path(), &page), None);
    }

    #[test]
    fn test_collect_pages_sorted_and_filtered() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("drafts")).unwrap();
        for name in ["b.html", "a.htm", "style.css", "drafts/wip.html"] {
            std::fs::write(dir.path().join(name), "<html></html>").unwrap();
        }
        let set = build_ignore_set(&["**/drafts/**".to_string()]).unwrap();

        let pages = collect_pages(dir.path(), Some(&set), None).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.htm", "b.html"]);
    }

    #[test]
    fn test_collect_pages_missing_path() {
        assert!(collect_pages(Path::new("/definitely/not/here"), None, None).is_err());
    }
}
