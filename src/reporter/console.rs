//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::{AuditResult, Grade, Issue, Severity};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output (passed checks, recommendations and docs links)
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single audit result
    pub fn report(&self, result: &AuditResult) {
        self.print_header(result);
        self.print_score(result);
        self.print_categories(result);

        if result.problems().next().is_some() || self.verbose {
            self.print_issues(result);
        }

        self.print_recommendations(result);
        println!();
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[AuditResult], stats: &AggregateStats) {
        for result in results {
            self.report(result);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, result: &AuditResult) {
        println!(
            "{}: {} ({})",
            result.url,
            result.score,
            self.colorize_grade(result.grade())
        );
    }

    fn print_header(&self, result: &AuditResult) {
        println!();
        println!("{}", format!("🔍 SEO Audit: {}", result.url).bold());
        if let Some(ref title) = result.page_title {
            println!("   Title: {}", title);
        }
        println!(
            "   Passed: {} | Warnings: {} | Errors: {} | {} ms",
            result.passed_checks, result.warning_checks, result.error_checks, result.scan_duration
        );
        if !result.failed_checks.is_empty() {
            println!(
                "   {} checks failed to run: {}",
                "⚠".yellow(),
                result.failed_checks.join(", ")
            );
        }
        println!();
    }

    fn print_score(&self, result: &AuditResult) {
        let grade = result.grade();
        let score_bar = self.create_score_bar(result.score);

        println!(
            "   Score: {} {}",
            score_bar,
            self.colorize_grade(grade).bold()
        );
        println!("   {}", ScoreCalculator::grade_description(grade).dimmed());
        println!();
    }

    fn print_categories(&self, result: &AuditResult) {
        if result.category_scores.is_empty() {
            return;
        }
        println!("   {}", "Categories:".bold());

        for category in &result.category_scores {
            let bar = self.create_mini_bar(category.score);
            let score_str = format!("{:>3}/100", category.score);
            let colored_score = if category.score >= 80 {
                score_str.green()
            } else if category.score >= 60 {
                score_str.yellow()
            } else {
                score_str.red()
            };
            let issues = match category.issue_count {
                0 => String::new(),
                1 => " (1 issue)".to_string(),
                n => format!(" ({n} issues)"),
            };
            println!(
                "   {} {} {}{}",
                bar,
                colored_score,
                category.name,
                issues.dimmed()
            );
        }
        println!();
    }

    fn print_issues(&self, result: &AuditResult) {
        println!("   {}", "Issues Found:".bold());

        let by_severity =
            |severity: Severity| result.issues.iter().filter(move |i| i.severity == severity);

        for issue in by_severity(Severity::Error) {
            self.print_issue(issue);
        }
        for issue in by_severity(Severity::Warning) {
            self.print_issue(issue);
        }

        if self.verbose {
            for issue in by_severity(Severity::Good) {
                self.print_issue(issue);
            }
        } else if result.passed_checks > 0 {
            println!(
                "   {} {} passed checks (use --verbose to show)",
                "✓".green(),
                result.passed_checks
            );
        }

        println!();
    }

    fn print_issue(&self, issue: &Issue) {
        let icon = match issue.severity {
            Severity::Error => "✗".red(),
            Severity::Warning => "⚠".yellow(),
            Severity::Good => "✓".green(),
        };

        let impact = issue
            .impact
            .map(|i| format!(" ({i} impact)"))
            .unwrap_or_default();
        println!(
            "   {} [{}] {}{}",
            icon,
            issue.category.to_string().dimmed(),
            issue.title,
            impact.dimmed()
        );

        if issue.severity == Severity::Good {
            return;
        }

        println!("       {}", issue.description.dimmed());

        if let Some(ref elements) = issue.elements {
            const MAX_SHOWN: usize = 5;
            for element in elements.iter().take(MAX_SHOWN) {
                println!("       {} {}", "•".dimmed(), element);
            }
            if elements.len() > MAX_SHOWN {
                println!(
                    "       {}",
                    format!("… and {} more", elements.len() - MAX_SHOWN).dimmed()
                );
            }
        }

        if let Some(ref recommendation) = issue.recommendation {
            println!("       {} {}", "→".dimmed(), recommendation.italic());
        }

        if self.verbose {
            for link in issue.resource_links.iter().flatten() {
                println!("       {} {}: {}", "↗".dimmed(), link.title, link.url.underline());
            }
        }
    }

    fn print_recommendations(&self, result: &AuditResult) {
        if result.score >= 90 {
            return;
        }
        println!("   {}", "Recommendations:".bold());
        for rec in ScoreCalculator::recommendations(&result.category_scores)
            .iter()
            .take(3)
        {
            println!("   {} {}", "→".cyan(), rec);
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Pages audited: {}",
            stats.pages_audited.to_string().bold()
        );
        println!(
            "   Average score: {} ({})",
            stats.average_score.to_string().bold(),
            self.colorize_grade(Grade::from_score(stats.average_score))
        );
        println!("   Total issues:  {}", stats.total_issues);
        println!("   Total errors:  {}", stats.total_errors);
        println!();
    }

    fn colorize_grade(&self, grade: Grade) -> colored::ColoredString {
        let s = grade.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match grade {
            Grade::A => s.green().bold(),
            Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), score);

        if self.use_colors {
            if score >= 80 {
                bar.green().to_string()
            } else if score >= 60 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u8) -> String {
        let filled = (score.min(100) as usize * 10) / 100;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(10 - filled))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
