//! Schema.org markup presence and validity

use super::{CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

const STRUCTURED_DATA_DOCS: &str =
    "https://developers.google.com/search/docs/appearance/structured-data/intro-structured-data";

pub struct StructuredDataCheck;

impl SeoCheck for StructuredDataCheck {
    fn id(&self) -> CheckId {
        CheckId::StructuredData
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::StructuredData;
        let entries = &ctx.data.structured_data;

        if entries.is_empty() {
            return vec![Issue::warning(
                id,
                category,
                "No structured data",
                "The page has no JSON-LD or microdata markup.",
            )
            .with_impact(Impact::Medium)
            .with_recommendation("Describe the page with schema.org JSON-LD to enable rich results.")
            .with_resource("Structured data", STRUCTURED_DATA_DOCS)];
        }

        let invalid: Vec<String> = entries
            .iter()
            .filter(|e| !e.valid)
            .map(|e| {
                if e.errors.is_empty() {
                    e.schema_type.clone()
                } else {
                    format!("{}: {}", e.schema_type, e.errors.join(", "))
                }
            })
            .collect();

        if invalid.is_empty() {
            let types: Vec<&str> = entries.iter().map(|e| e.schema_type.as_str()).collect();
            vec![Issue::good(
                id,
                category,
                "Structured data found",
                format!("Found {} valid schema entries.", entries.len()),
            )
            .with_elements(types)]
        } else {
            vec![Issue::warning(
                id,
                category,
                "Invalid structured data",
                format!("{} of {} schema entries are invalid.", invalid.len(), entries.len()),
            )
            .with_impact(Impact::Medium)
            .with_recommendation("Fix the listed entries; invalid markup is ignored by search engines.")
            .with_elements(invalid)
            .with_resource("Structured data", STRUCTURED_DATA_DOCS)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::checks::test_support::page;
    use crate::page::StructuredDataEntry;
    use crate::Severity;

    fn entry(schema_type: &str, valid: bool) -> StructuredDataEntry {
        StructuredDataEntry {
            schema_type: schema_type.to_string(),
            valid,
            errors: if valid {
                Vec::new()
            } else {
                vec!["Missing @context".to_string()]
            },
        }
    }

    fn run_with(entries: Vec<StructuredDataEntry>) -> Vec<Issue> {
        let mut data = page();
        data.structured_data = entries;
        StructuredDataCheck.run(&CheckContext::new(&data, None))
    }

    #[test]
    fn test_none() {
        let issues = run_with(vec![]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_invalid_entries_listed() {
        let issues = run_with(vec![entry("Article", true), entry("Product", false)]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Invalid structured data");
        assert_eq!(
            issues[0].elements,
            Some(vec!["Product: Missing @context".to_string()])
        );
    }

    #[test]
    fn test_all_valid() {
        let issues = run_with(vec![entry("Article", true)]);
        assert_eq!(issues[0].severity, Severity::Good);
    }
}
