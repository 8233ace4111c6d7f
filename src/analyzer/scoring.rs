//! Score calculation for audits

use crate::{Category, CategoryScore, Grade, Issue, Severity};

/// Issue counts by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.passed + self.warnings + self.errors
    }
}

/// Calculator for audit scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    pub fn counts<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for issue in issues {
            match issue.severity {
                Severity::Good => counts.passed += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Error => counts.errors += 1,
            }
        }
        counts
    }

    /// Weighted average of the issues: good counts 100, warning 50, error 0.
    /// Rounds half up. No issues scores 0.
    pub fn score<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> u8 {
        let mut total: u64 = 0;
        let mut weighted: u64 = 0;
        for issue in issues {
            total += 1;
            weighted += u64::from(issue.severity.weight());
        }
        if total == 0 {
            return 0;
        }
        // round(weighted / total) in integer arithmetic
        ((2 * weighted + total) / (2 * total)).min(100) as u8
    }

    /// Per-category scores in the order each category first appears in `issues`
    pub fn category_scores(issues: &[Issue]) -> Vec<CategoryScore> {
        let mut order: Vec<Category> = Vec::new();
        for issue in issues {
            if !order.contains(&issue.category) {
                order.push(issue.category);
            }
        }

        order
            .into_iter()
            .map(|category| {
                let in_category = || issues.iter().filter(move |i| i.category == category);
                CategoryScore {
                    name: category,
                    score: Self::score(in_category()),
                    issue_count: in_category()
                        .filter(|i| i.severity != Severity::Good)
                        .count(),
                }
            })
            .collect()
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::A => "Excellent - the page follows nearly every SEO best practice",
            Grade::B => "Good - solid foundations with a few gaps",
            Grade::C => "Fair - several issues are holding the page back",
            Grade::D => "Poor - significant SEO problems",
            Grade::F => "Failing - the page needs major work",
        }
    }

    /// Recommendations for the weakest categories, lowest score first
    pub fn recommendations(category_scores: &[CategoryScore]) -> Vec<String> {
        let mut weak: Vec<&CategoryScore> =
            category_scores.iter().filter(|c| c.score < 70).collect();
        weak.sort_by_key(|c| c.score);

        let mut recs: Vec<String> = weak
            .into_iter()
            .map(|c| {
                let advice = match c.name {
                    Category::MetaTags => "Write a unique title and meta description for the page",
                    Category::Headings => "Give the page one descriptive H1 and nest headings in order",
                    Category::Images => "Add alt text and explicit dimensions to images",
                    Category::Links => "Fix broken links and give every link descriptive text",
                    Category::Content => "Add substantial, original text focused on one topic",
                    Category::Mobile => "Configure a responsive viewport",
                    Category::Performance => "Reduce load time and the number of blocking assets",
                    Category::Security => "Serve the page over HTTPS with security headers",
                    Category::StructuredData => "Add valid schema.org JSON-LD",
                    Category::SocialMedia => "Add Open Graph and Twitter Card tags",
                    Category::UrlStructure => "Declare a canonical URL and keep URLs short",
                    Category::Technical => "Publish robots.txt and a sitemap, and declare the language",
                };
                format!("{} ({}: {}/100)", advice, c.name, c.score)
            })
            .collect();

        if recs.is_empty() {
            recs.push("The page is in good shape! Keep content fresh and re-audit after changes.".to_string());
        }

        recs
    }
}
