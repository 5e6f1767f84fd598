//! Line-oriented changelog parser
//!
//! The parser never fails: hand-edited Markdown drifts, so any non-blank
//! line that is not a heading or change line is folded into the most
//! recent change line as a soft-wrap continuation. [`parse_strict`] runs
//! the same state machine and additionally reports every deviation from
//! the canonical format.

use crate::error::StrictError;
use crate::lines::{Line, classify, split_reference};
use crate::types::{ChangeLine, Changelog, HEAD, LinePosition, Version};
use log::debug;

/// Parse changelog text, tolerating any formatting drift
///
/// Empty input yields an empty changelog.
///
/// # Example
///
/// ```
/// let changelog = changelog::parse("## HEAD\n\n  * Fix a bug (#12)\n");
/// assert_eq!(changelog.versions().len(), 1);
/// assert_eq!(changelog.versions()[0].history()[0].summary, "Fix a bug");
/// ```
pub fn parse(text: &str) -> Changelog {
    let mut parser = Parser::new();
    for (index, line) in text.lines().enumerate() {
        parser.feed(index + 1, line);
    }
    parser.changelog
}

/// Parse changelog text, rejecting anything that is not canonical
///
/// Returns the same document as [`parse`] when the text holds no
/// violations, otherwise every violation found, in line order.
pub fn parse_strict(text: &str) -> Result<Changelog, Vec<StrictError>> {
    let mut parser = Parser::new();
    for (index, line) in text.lines().enumerate() {
        parser.feed(index + 1, line);
    }

    if parser.violations.is_empty() {
        Ok(parser.changelog)
    } else {
        Err(parser.violations)
    }
}

/// Parser state: which version and subsection new lines attach to, and
/// which line receives continuation text.
struct Parser {
    changelog: Changelog,
    version: Option<usize>,
    subsection: Option<usize>,
    last_line: Option<LinePosition>,
    violations: Vec<StrictError>,
}

impl Parser {
    fn new() -> Self {
        Self {
            changelog: Changelog::new(),
            version: None,
            subsection: None,
            last_line: None,
            violations: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, raw: &str) {
        match classify(raw) {
            Line::Version { id, date } => self.enter_version(line_no, id, date),
            Line::Subsection { name } => self.enter_subsection(line_no, name),
            Line::Change { summary, reference } => self.add_change(line_no, summary, reference),
            Line::Text(text) => self.continue_line(line_no, text),
            Line::Blank => {}
        }
    }

    fn enter_version(&mut self, line_no: usize, id: &str, date: Option<&str>) {
        let id = if id.eq_ignore_ascii_case(HEAD) { HEAD } else { id };

        let late_head = id == HEAD
            && !self.changelog.is_empty()
            && self.changelog.version_position(HEAD).is_none();
        if late_head {
            self.violations.push(StrictError::HeadNotFirst { line: line_no });
        }

        let mut version = Version::new(id);
        if let Some(date) = date {
            version = version.with_date(date);
        }

        let (index, existed) = self.changelog.push_version(version);
        if existed {
            self.violations.push(StrictError::DuplicateVersion {
                line: line_no,
                version: id.to_string(),
            });
        }

        // A HEAD found late is moved to the front, shifting every index
        if id == HEAD && !existed {
            if let Some(position) = self.last_line.as_mut() {
                position.version += 1;
            }
        }

        self.version = Some(index);
        self.subsection = None;
    }

    fn enter_subsection(&mut self, line_no: usize, name: &str) {
        let Some(version) = self.version else {
            debug!("Ignoring subsection '{}' before the first version", name);
            self.violations
                .push(StrictError::BeforeFirstVersion { line: line_no });
            return;
        };

        self.subsection = Some(self.changelog.push_subsection(version, name));
    }

    fn add_change(&mut self, line_no: usize, summary: &str, reference: Option<&str>) {
        let Some(version) = self.version else {
            debug!("Ignoring change line before the first version: {}", summary);
            self.violations
                .push(StrictError::BeforeFirstVersion { line: line_no });
            return;
        };

        let line = match reference {
            Some(reference) => ChangeLine::with_reference(summary, reference),
            None => ChangeLine::new(summary),
        };

        let (position, duplicate) = self
            .changelog
            .push_parsed_line(version, self.subsection, line);
        if duplicate {
            self.violations.push(StrictError::DuplicateReference {
                line: line_no,
                reference: reference.unwrap_or_default().to_string(),
            });
        }
        self.last_line = Some(position);
    }

    fn continue_line(&mut self, line_no: usize, text: &str) {
        self.violations.push(StrictError::Unrecognized {
            line: line_no,
            text: text.to_string(),
        });

        let Some(line) = self
            .last_line
            .and_then(|position| self.changelog.line_mut(position))
        else {
            debug!("Ignoring text outside of any change line: {}", text);
            return;
        };

        line.summary.push(' ');
        line.summary.push_str(text);

        // A wrapped line may carry its reference on the continuation
        if line.reference.is_none() {
            let split = match split_reference(&line.summary) {
                (summary, Some(reference)) => Some(ChangeLine::with_reference(summary, reference)),
                _ => None,
            };
            if let Some(split) = split {
                *line = split;
            }
        }
    }
}
