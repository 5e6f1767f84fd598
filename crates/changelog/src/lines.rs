//! Line classification
//!
//! Recognizes the three line forms of a changelog. The forms are tested
//! in priority order: version heading, subsection heading, change line.

use regex::Regex;
use std::sync::OnceLock;

/// A classified line of changelog text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// `## 1.2.3 / 2015-04-23` or `## HEAD`
    ///
    /// Everything after ` / ` is kept verbatim as the date.
    Version { id: &'a str, date: Option<&'a str> },
    /// `### Bug Fixes`
    Subsection { name: &'a str },
    /// `  * Summary (#123)`
    Change {
        summary: &'a str,
        reference: Option<&'a str>,
    },
    /// Empty or whitespace only
    Blank,
    /// Anything else, treated as a soft-wrapped continuation
    Text(&'a str),
}

fn version_regex() -> &'static Regex {
    static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();
    VERSION_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"^##\s+((?i:HEAD)|v?\d+\.\d+(?:\.\d+)?(?:\.pre\.(?:beta|rc)\d+)?)",
            r"(?:\s+/\s+(.*\S))?\s*$",
        ))
        .unwrap()
    })
}

fn subsection_regex() -> &'static Regex {
    static SUBSECTION_REGEX: OnceLock<Regex> = OnceLock::new();
    SUBSECTION_REGEX.get_or_init(|| Regex::new(r"^###\s+(.*\S)\s*$").unwrap())
}

fn change_regex() -> &'static Regex {
    static CHANGE_REGEX: OnceLock<Regex> = OnceLock::new();
    CHANGE_REGEX.get_or_init(|| Regex::new(r"^\s*\*\s+(.*\S)\s*$").unwrap())
}

fn reference_regex() -> &'static Regex {
    static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    REFERENCE_REGEX.get_or_init(|| Regex::new(r"^(.+?) \((#\d+|@\w+)\)$").unwrap())
}

/// Classify a single line of changelog text
pub(crate) fn classify(line: &str) -> Line<'_> {
    if let Some(captures) = version_regex().captures(line) {
        if let Some(id) = captures.get(1) {
            return Line::Version {
                id: id.as_str(),
                date: captures.get(2).map(|m| m.as_str()),
            };
        }
    }

    if let Some(name) = subsection_regex()
        .captures(line)
        .and_then(|captures| captures.get(1))
    {
        let name = name.as_str().trim();
        if !name.is_empty() {
            return Line::Subsection { name };
        }
    }

    if let Some(text) = change_regex()
        .captures(line)
        .and_then(|captures| captures.get(1))
    {
        let (summary, reference) = split_reference(text.as_str());
        return Line::Change { summary, reference };
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        Line::Blank
    } else {
        Line::Text(trimmed)
    }
}

/// Split a trailing ` (#123)` or ` (@user)` reference off a summary
pub(crate) fn split_reference(text: &str) -> (&str, Option<&str>) {
    match reference_regex().captures(text) {
        Some(captures) => match (captures.get(1), captures.get(2)) {
            (Some(summary), Some(reference)) => (summary.as_str(), Some(reference.as_str())),
            _ => (text, None),
        },
        None => (text, None),
    }
}
