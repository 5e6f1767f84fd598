//! Merge-reference writer
//!
//! Inserts the line describing a merged pull request into the unreleased
//! (`HEAD`) version. Insertion is idempotent on the reference, so a
//! webhook delivered twice for the same merge produces a single line.

use crate::parser::parse;
use crate::types::{ChangeLine, Changelog, HEAD, Target};

/// Section label meaning "the version's direct history, no subsection"
pub const NO_SECTION: &str = "none";

/// Escape characters that are unsafe in HTML (`<`, `>` and `&`)
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Insert a change line into `HEAD`
///
/// `section` is a display section name such as `"Bug Fixes"`, or
/// [`NO_SECTION`] to target the version's direct history. The summary is
/// HTML-escaped before storage. Returns `false` when the target already
/// holds a line with the same reference.
pub fn insert_merge_line(
    changelog: &mut Changelog,
    section: &str,
    summary: &str,
    reference: &str,
) -> bool {
    let target = if section == NO_SECTION {
        Target::History
    } else {
        Target::Subsection(section)
    };

    changelog.append_line(
        HEAD,
        target,
        ChangeLine::with_reference(escape_html(summary), reference),
    )
}

/// Parse changelog text, insert a merge line and render the result
///
/// # Example
///
/// ```
/// let text = changelog::add_merge_reference("", "Development Fixes", "Some great change", "#1");
/// assert_eq!(text, "## HEAD\n\n### Development Fixes\n\n  * Some great change (#1)\n");
/// ```
pub fn add_merge_reference(text: &str, section: &str, summary: &str, reference: &str) -> String {
    let mut changelog = parse(text);
    insert_merge_line(&mut changelog, section, summary, reference);
    changelog.to_string()
}
