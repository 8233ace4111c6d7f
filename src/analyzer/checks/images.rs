//! Image alt text, dimensions and lazy loading

use super::{CheckContext, SeoCheck};
use crate::{Category, CheckId, Impact, Issue};

/// Eager images tolerated before lazy loading is suggested
const MAX_EAGER_IMAGES: usize = 3;

const ALT_DOCS: &str = "https://developer.mozilla.org/en-US/docs/Web/HTML/Element/img#alt";
const LAZY_DOCS: &str = "https://developer.mozilla.org/en-US/docs/Web/Performance/Lazy_loading";

pub struct ImagesCheck;

impl SeoCheck for ImagesCheck {
    fn id(&self) -> CheckId {
        CheckId::Images
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let id = self.id();
        let images = &ctx.data.images;

        if images.is_empty() {
            return vec![Issue::good(
                id,
                Category::Images,
                "No images to check",
                "The page contains no <img> elements.",
            )];
        }

        let mut issues = Vec::new();

        let missing_alt: Vec<&str> = images
            .iter()
            .filter(|img| !img.has_alt)
            .map(|img| img.src.as_str())
            .collect();
        if missing_alt.is_empty() {
            issues.push(Issue::good(
                id,
                Category::Images,
                "All images have alt text",
                format!("All {} images declare an alt attribute.", images.len()),
            ));
        } else {
            issues.push(
                Issue::error(
                    id,
                    Category::Images,
                    "Images missing alt text",
                    format!(
                        "{} of {} images have no alt attribute.",
                        missing_alt.len(),
                        images.len()
                    ),
                )
                .with_impact(Impact::High)
                .with_recommendation("Describe each image in its alt attribute.")
                .with_elements(missing_alt)
                .with_resource("The img alt attribute", ALT_DOCS),
            );
        }

        let empty_alt: Vec<&str> = images
            .iter()
            .filter(|img| img.has_empty_alt())
            .map(|img| img.src.as_str())
            .collect();
        if !empty_alt.is_empty() {
            issues.push(
                Issue::warning(
                    id,
                    Category::Images,
                    "Images with empty alt text",
                    format!("{} images have an empty alt attribute.", empty_alt.len()),
                )
                .with_impact(Impact::Low)
                .with_recommendation(
                    "Keep alt=\"\" only for decorative images; describe the others.",
                )
                .with_elements(empty_alt),
            );
        }

        let missing_dimensions = images.iter().filter(|img| !img.has_dimensions()).count();
        if missing_dimensions * 2 > images.len() {
            issues.push(
                Issue::warning(
                    id,
                    Category::Images,
                    "Images missing dimensions",
                    format!(
                        "{missing_dimensions} of {} images have no width/height attributes, which causes layout shift.",
                        images.len()
                    ),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Set width and height on every image."),
            );
        }

        let eager: Vec<&str> = images
            .iter()
            .filter(|img| !img.lazy_loaded)
            .map(|img| img.src.as_str())
            .collect();
        if eager.len() > MAX_EAGER_IMAGES {
            issues.push(
                Issue::warning(
                    id,
                    Category::Performance,
                    "Images not lazy loaded",
                    format!("{} images load eagerly.", eager.len()),
                )
                .with_impact(Impact::Medium)
                .with_recommendation("Add loading=\"lazy\" to images below the fold.")
                .with_elements(eager)
                .with_resource("Lazy loading", LAZY_DOCS),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::checks::test_support::{page, titled};
    use crate::page::ImageInfo;
    use crate::Severity;

    fn image(src: &str, alt: Option<&str>) -> ImageInfo {
        ImageInfo {
            src: src.to_string(),
            has_alt: alt.is_some(),
            alt: alt.map(String::from),
            width: Some("100".to_string()),
            height: Some("100".to_string()),
            lazy_loaded: true,
            format: None,
        }
    }

    fn run_with(images: Vec<ImageInfo>) -> Vec<Issue> {
        let mut data = page();
        data.images = images;
        ImagesCheck.run(&CheckContext::new(&data, None))
    }

    #[test]
    fn test_missing_alt_lists_only_offending_src() {
        let issues = run_with(vec![image("a.png", None), image("b.png", Some("B"))]);
        let missing = titled(&issues, "Images missing alt text");
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::Error);
        assert_eq!(missing[0].elements, Some(vec!["a.png".to_string()]));
    }

    #[test]
    fn test_all_alt_present() {
        let issues = run_with(vec![image("a.png", Some("A"))]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "All images have alt text");
    }

    #[test]
    fn test_no_images() {
        let issues = run_with(vec![]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Good);
    }

    #[test]
    fn test_empty_alt_warns() {
        let issues = run_with(vec![image("deco.png", Some(""))]);
        assert_eq!(titled(&issues, "All images have alt text").len(), 1);
        assert_eq!(titled(&issues, "Images with empty alt text").len(), 1);
    }

    #[test]
    fn test_dimensions_majority_rule() {
        let mut no_size = image("a.png", Some("A"));
        no_size.width = None;
        let sized = image("b.png", Some("B"));

        let issues = run_with(vec![no_size.clone(), sized.clone()]);
        assert!(titled(&issues, "Images missing dimensions").is_empty());

        let issues = run_with(vec![no_size.clone(), no_size, sized]);
        assert_eq!(titled(&issues, "Images missing dimensions").len(), 1);
    }

    #[test]
    fn test_lazy_loading_warning_is_performance() {
        let eager = |src: &str| ImageInfo {
            lazy_loaded: false,
            ..image(src, Some("x"))
        };
        let issues = run_with(vec![eager("1"), eager("2"), eager("3")]);
        assert!(titled(&issues, "Images not lazy loaded").is_empty());

        let issues = run_with(vec![eager("1"), eager("2"), eager("3"), eager("4")]);
        let lazy = titled(&issues, "Images not lazy loaded");
        assert_eq!(lazy.len(), 1);
        assert_eq!(lazy[0].category, Category::Performance);
    }
}
