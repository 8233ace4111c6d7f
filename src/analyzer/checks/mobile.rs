//! Viewport configuration

use super::{present, CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

const VIEWPORT_DOCS: &str =
    "https://developer.mozilla.org/en-US/docs/Web/HTML/Viewport_meta_tag";

pub struct MobileCheck;

impl SeoCheck for MobileCheck {
    fn id(&self) -> CheckId {
        CheckId::Mobile
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let category = Category::Mobile;

        let Some(viewport) = present(&ctx.data.meta_tags.viewport) else {
            return vec![Issue::error(
                id,
                category,
                "Missing viewport meta tag",
                "Without a viewport tag mobile browsers render the page at desktop width.",
            )
            .with_impact(Impact::High)
            .with_recommendation(
                "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.",
            )
            .with_resource("Viewport meta tag", VIEWPORT_DOCS)];
        };

        let mut issues = vec![Issue::good(
            id,
            category,
            "Viewport configured",
            format!("Viewport: {viewport}"),
        )];

        let settings: Vec<(String, String)> = viewport
            .split([',', ';'])
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                Some((
                    key.trim().to_ascii_lowercase(),
                    value.trim().to_ascii_lowercase(),
                ))
            })
            .collect();
        let setting = |name: &str| {
            settings
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        if setting("width") != Some("device-width") {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Viewport not set to device width",
                    "The viewport does not use width=device-width.",
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Use width=device-width so the layout follows the screen."),
            );
        }

        let no_scaling = matches!(setting("user-scalable"), Some("no") | Some("0"));
        let max_scale_one = setting("maximum-scale")
            .and_then(|v| v.parse::<f64>().ok())
            .is_some_and(|v| v <= 1.0);
        if no_scaling || max_scale_one {
            issues.push(
                Issue::warning(
                    id,
                    category,
                    "Zooming disabled",
                    "The viewport prevents users from zooming.",
                )
                .with_impact(Impact::Low)
                .with_recommendation("Remove user-scalable=no and maximum-scale limits."),
            );
        }

        issues
    }
}
