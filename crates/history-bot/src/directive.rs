//! Merge directive parsing
//!
//! A maintainer asks the bot to merge with a comment such as
//! `@jekyllbot: merge +Bug Fix`, `@jekyllbot: :shipit:` or
//! `@jekyllbot: :ship: +dev`.

use regex::Regex;
use std::sync::OnceLock;

fn merge_directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"@[a-zA-Z_-]+: (?:merge|:shipit:|:ship:)(?: \+([a-zA-Z_ -]+))?").unwrap()
    })
}

/// A parsed merge request comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeDirective {
    /// Free-text section label after the `+`, if any (e.g. "Bug Fix")
    pub label: Option<String>,
}

/// Find the first merge directive in a comment body
pub fn parse_merge_directive(body: &str) -> Option<MergeDirective> {
    let captures = merge_directive_regex().captures(body)?;
    let label = captures
        .get(1)
        .map(|m| m.as_str().trim())
        .filter(|label| !label.is_empty())
        .map(str::to_string);

    Some(MergeDirective { label })
}
