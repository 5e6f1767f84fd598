//! Section-label normalization
//!
//! A section can be requested as free text in a merge comment
//! (`+Bug Fix`) or come from an existing issue label (`bug-fixes`). Both
//! paths end at the same canonical slug and changelog section through the
//! category table.

use gh_bot_config::Category;

/// Lower-case a label and turn spaces into hyphens
pub fn hyphenize(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}

/// Map free text to a canonical slug
///
/// The text is hyphenized, then matched against each category prefix in
/// table order. Unknown labels are returned hyphenized but otherwise
/// unchanged.
pub fn normalize_label(categories: &[Category], raw: &str) -> String {
    let label = hyphenize(raw);
    categories
        .iter()
        .find(|category| label.starts_with(category.prefix.as_str()))
        .map(|category| category.slug.clone())
        .unwrap_or(label)
}

/// Changelog section for a slug, or the slug itself if unknown
pub fn section_for_slug(categories: &[Category], slug: &str) -> String {
    categories
        .iter()
        .find(|category| category.slug == slug)
        .map(|category| category.section.clone())
        .unwrap_or_else(|| slug.to_string())
}

/// GitHub labels for a changelog section (empty if unknown)
pub fn labels_for_section<'a>(categories: &'a [Category], section: &str) -> &'a [String] {
    categories
        .iter()
        .find(|category| category.section == section)
        .map(|category| category.labels.as_slice())
        .unwrap_or(&[])
}

/// First label that is a known category slug
pub fn select_section_label<'a, I>(categories: &[Category], labels: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .find(|label| categories.iter().any(|category| category.slug == *label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_bot_config::default_categories;

    #[test]
    fn test_normalize_label_matches_prefix() {
        let categories = default_categories();
        assert_eq!(normalize_label(&categories, "Bug Fix"), "bug-fixes");
        assert_eq!(normalize_label(&categories, "bug"), "bug-fixes");
        assert_eq!(normalize_label(&categories, "fix"), "fix");
        assert_eq!(normalize_label(&categories, "Major"), "major-enhancements");
        assert_eq!(normalize_label(&categories, "dev fixes"), "development-fixes");
        assert_eq!(normalize_label(&categories, "documentation"), "documentation");
        assert_eq!(normalize_label(&categories, "site"), "site-enhancements");
    }

    #[test]
    fn test_normalize_label_passes_unknown_through() {
        let categories = default_categories();
        assert_eq!(normalize_label(&categories, "Security Fixes"), "security-fixes");
        assert_eq!(normalize_label(&categories, ""), "");
    }

    #[test]
    fn test_section_for_slug() {
        let categories = default_categories();
        assert_eq!(section_for_slug(&categories, "bug-fixes"), "Bug Fixes");
        assert_eq!(section_for_slug(&categories, "fix"), "Bug Fixes");
        assert_eq!(section_for_slug(&categories, "forward-ports"), "Forward Ports");
        assert_eq!(section_for_slug(&categories, "security-fixes"), "security-fixes");
    }

    #[test]
    fn test_normalization_is_total() {
        let categories = default_categories();
        for raw in ["", " ", "+", "ünïcödé", "  Bug   Fix  ", "none", "HEAD"] {
            let slug = normalize_label(&categories, raw);
            let _ = section_for_slug(&categories, &slug);
        }
    }

    #[test]
    fn test_labels_for_section() {
        let categories = default_categories();
        assert_eq!(labels_for_section(&categories, "Bug Fixes"), ["bug", "fix"]);
        assert_eq!(
            labels_for_section(&categories, "Development Fixes"),
            ["internal", "fix"]
        );
        assert!(labels_for_section(&categories, "none").is_empty());
        assert!(labels_for_section(&categories, "bug-fixes").is_empty());
    }

    #[test]
    fn test_select_section_label() {
        let categories = default_categories();
        assert_eq!(
            select_section_label(&categories, ["pending-feedback", "bug-fixes", "documentation"]),
            Some("bug-fixes")
        );
        assert_eq!(select_section_label(&categories, ["bug", "enhancement"]), None);
        assert_eq!(select_section_label(&categories, []), None);
    }
}
