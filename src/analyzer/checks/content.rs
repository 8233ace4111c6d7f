//! Word count, keyword density and text-to-HTML ratio

use super::{CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

const THIN_CONTENT_WORDS: usize = 300;
const COMPREHENSIVE_WORDS: usize = 1000;

const STUFFING_DENSITY: f64 = 5.0;
const LOW_DENSITY: f64 = 0.5;
const OPTIMAL_DENSITY_MAX: f64 = 3.0;

const LOW_TEXT_RATIO: f64 = 10.0;
const GOOD_TEXT_RATIO: f64 = 25.0;

pub struct ContentQualityCheck;

impl SeoCheck for ContentQualityCheck {
    fn id(&self) -> CheckId {
        CheckId::ContentQuality
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::Content;
        let data = ctx.data;
        let words = data.word_count;
        let mut issues = Vec::new();

        issues.push(if words < THIN_CONTENT_WORDS {
            Issue::warning(
                id,
                category,
                "Thin content",
                format!("The page has {words} words; pages under {THIN_CONTENT_WORDS} rarely rank well."),
            )
            .with_impact(Impact::High)
            .with_recommendation("Expand the page with useful, original text.")
        } else if words < COMPREHENSIVE_WORDS {
            Issue::good(
                id,
                category,
                "Adequate content length",
                format!("The page has {words} words."),
            )
        } else {
            Issue::good(
                id,
                category,
                "Comprehensive content",
                format!("The page has {words} words."),
            )
        });

        if let Some(keyword) = ctx.primary_keyword() {
            let density = keyword.density;
            if density > STUFFING_DENSITY {
                issues.push(
                    Issue::warning(
                        id,
                        category,
                        "Keyword stuffing detected",
                        format!(
                            "\"{}\" makes up {density:.1}% of the text.",
                            keyword.word
                        ),
                    )
                    .with_impact(Impact::Medium)
                    .with_recommendation("Write naturally and use synonyms instead of repeating one word."),
                );
            } else if density < LOW_DENSITY && words > THIN_CONTENT_WORDS {
                issues.push(
                    Issue::warning(
                        id,
                        category,
                        "Low keyword density",
                        format!(
                            "The primary keyword \"{}\" makes up only {density:.2}% of the text.",
                            keyword.word
                        ),
                    )
                    .with_impact(Impact::Low)
                    .with_recommendation("Make the page's main topic clearer in the copy."),
                );
            } else if (LOW_DENSITY..=OPTIMAL_DENSITY_MAX).contains(&density) {
                issues.push(Issue::good(
                    id,
                    category,
                    "Optimal keyword density",
                    format!("\"{}\" makes up {density:.1}% of the text.", keyword.word),
                ));
            }
        }

        let ratio = data.text_to_html_ratio;
        if ratio < LOW_TEXT_RATIO {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Low text-to-HTML ratio",
                    format!("Visible text is {ratio:.1}% of the HTML."),
                )
                .with_impact(Impact::Low)
                .with_recommendation("Reduce markup bloat or add more text content."),
            );
        } else if ratio >= GOOD_TEXT_RATIO {
            issues.push(Issue::good(
                id,
                category,
                "Good text-to-HTML ratio",
                format!("Visible text is {ratio:.1}% of the HTML."),
            ));
        }

        issues
    }
}
