//! Changelog categories
//!
//! A category ties a label prefix typed by a maintainer (`+bug`) to a
//! canonical slug (`bug-fixes`), the changelog section the change is
//! filed under (`Bug Fixes`) and the GitHub labels applied to the PR.

use serde::{Deserialize, Serialize};

/// One row of the category table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Prefix matched against the hyphenated label (e.g. "bug")
    pub prefix: String,

    /// Canonical slug (e.g. "bug-fixes")
    pub slug: String,

    /// Changelog section name (e.g. "Bug Fixes")
    pub section: String,

    /// GitHub labels applied to the issue or pull request
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Category {
    pub fn new(prefix: &str, slug: &str, section: &str, labels: &[&str]) -> Self {
        Self {
            prefix: prefix.to_string(),
            slug: slug.to_string(),
            section: section.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// The built-in category table
///
/// Order matters: lookups take the first matching row, so `bug` has to
/// come before `fix`.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("major", "major-enhancements", "Major Enhancements", &["feature"]),
        Category::new("minor", "minor-enhancements", "Minor Enhancements", &["enhancement"]),
        Category::new("bug", "bug-fixes", "Bug Fixes", &["bug", "fix"]),
        Category::new("fix", "fix", "Bug Fixes", &["bug", "fix"]),
        Category::new("dev", "development-fixes", "Development Fixes", &["internal", "fix"]),
        Category::new("doc", "documentation", "Documentation", &["documentation"]),
        Category::new("port", "forward-ports", "Forward Ports", &["forward-port"]),
        Category::new("site", "site-enhancements", "Site Enhancements", &["documentation"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slugs_are_unique() {
        let categories = default_categories();
        let mut slugs: Vec<&str> = categories.iter().map(|c| c.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), categories.len());
    }

    #[test]
    fn test_bug_precedes_fix() {
        let categories = default_categories();
        let bug = categories.iter().position(|c| c.prefix == "bug");
        let fix = categories.iter().position(|c| c.prefix == "fix");
        assert!(bug < fix);
    }
}
