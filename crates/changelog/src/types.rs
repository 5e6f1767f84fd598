//! Document model for a changelog
//!
//! A [`Changelog`] owns its versions, each [`Version`] owns its direct
//! history and its subsections. All mutation goes through the accessors
//! on [`Changelog`] so the following invariants always hold:
//!
//! - at most one `HEAD` version exists, and it is the first one
//! - subsection names are unique within a version
//! - appending a line whose reference already exists in the target is a no-op

/// Identifier of the unreleased version bucket
pub const HEAD: &str = "HEAD";

/// Root of the document: every version, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    versions: Vec<Version>,
}

/// A released version or the `HEAD` bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    id: String,
    date: Option<String>,
    history: Vec<ChangeLine>,
    subsections: Vec<Subsection>,
}

/// A named group of changes inside a version (e.g. "Bug Fixes")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    name: String,
    lines: Vec<ChangeLine>,
}

/// A single change entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLine {
    /// What the change entails
    pub summary: String,

    /// `#123` for an issue or pull request, `@user` for a mention
    pub reference: Option<String>,
}

/// Where inside a version a line is appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// The version's direct history, outside any subsection
    History,
    /// The subsection with the given name
    Subsection(&'a str),
}

/// Position of a line inside a changelog, used by the parser to extend
/// the most recent line with continuation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LinePosition {
    pub version: usize,
    pub subsection: Option<usize>,
    pub line: usize,
}

impl ChangeLine {
    /// Create a line without a reference
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            reference: None,
        }
    }

    /// Create a line with a reference
    pub fn with_reference(summary: impl Into<String>, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        Self {
            summary: summary.into(),
            reference: (!reference.is_empty()).then_some(reference),
        }
    }
}

impl Subsection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lines: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[ChangeLine] {
        &self.lines
    }
}

impl Version {
    /// Create an empty version with the given identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: None,
            history: Vec::new(),
            subsections: Vec::new(),
        }
    }

    /// Set the release date (`YYYY-MM-DD`)
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn is_head(&self) -> bool {
        self.id == HEAD
    }

    /// Lines attached directly to the version, outside any subsection
    pub fn history(&self) -> &[ChangeLine] {
        &self.history
    }

    pub fn subsections(&self) -> &[Subsection] {
        &self.subsections
    }

    pub fn subsection(&self, name: &str) -> Option<&Subsection> {
        self.subsections.iter().find(|s| s.name == name)
    }

    /// True if the version has neither lines nor subsections
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.subsections.is_empty()
    }

    fn subsection_index_or_create(&mut self, name: &str) -> usize {
        match self.subsections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.subsections.push(Subsection::new(name));
                self.subsections.len() - 1
            }
        }
    }

    fn lines_mut(&mut self, target: Target<'_>) -> &mut Vec<ChangeLine> {
        match target {
            Target::History => &mut self.history,
            Target::Subsection(name) => {
                let index = self.subsection_index_or_create(name);
                &mut self.subsections[index].lines
            }
        }
    }
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All versions, most recent first
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn version(&self, id: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Fetch a version, creating it as the newest entry when missing
    ///
    /// A new `HEAD` always becomes the first version; any other new
    /// version is placed directly after `HEAD` (or first if there is none).
    pub fn get_or_create_version(&mut self, id: &str) -> &mut Version {
        let index = self.version_index_or_create(id);
        &mut self.versions[index]
    }

    /// Fetch a subsection of a version, creating both when missing
    ///
    /// New subsections are appended after the existing ones.
    pub fn get_or_create_subsection(&mut self, version_id: &str, name: &str) -> &mut Subsection {
        let version = self.get_or_create_version(version_id);
        let index = version.subsection_index_or_create(name);
        &mut version.subsections[index]
    }

    /// Append a line to a version's history or one of its subsections
    ///
    /// Returns `false` without touching the document when the target
    /// already holds a line with the same reference.
    pub fn append_line(&mut self, version_id: &str, target: Target<'_>, line: ChangeLine) -> bool {
        let lines = self.get_or_create_version(version_id).lines_mut(target);

        if let Some(reference) = &line.reference {
            if lines
                .iter()
                .any(|existing| existing.reference.as_ref() == Some(reference))
            {
                return false;
            }
        }

        lines.push(line);
        true
    }

    fn version_index_or_create(&mut self, id: &str) -> usize {
        if let Some(index) = self.versions.iter().position(|v| v.id == id) {
            return index;
        }

        let index = if id == HEAD || !self.versions.first().is_some_and(Version::is_head) {
            0
        } else {
            1
        };
        self.versions.insert(index, Version::new(id));
        index
    }

    // === Parser support ===
    //
    // The parser reproduces the file as written, so it appends versions in
    // file order and keeps duplicate references a human put there.

    /// Append a parsed version heading, or select an existing one with the
    /// same id. Returns the version index and whether it already existed.
    pub(crate) fn push_version(&mut self, version: Version) -> (usize, bool) {
        if let Some(index) = self.versions.iter().position(|v| v.id == version.id) {
            return (index, true);
        }

        if version.is_head() {
            self.versions.insert(0, version);
            (0, false)
        } else {
            self.versions.push(version);
            (self.versions.len() - 1, false)
        }
    }

    pub(crate) fn version_position(&self, id: &str) -> Option<usize> {
        self.versions.iter().position(|v| v.id == id)
    }

    pub(crate) fn push_subsection(&mut self, version: usize, name: &str) -> usize {
        self.versions[version].subsection_index_or_create(name)
    }

    /// Push a parsed line without the reference check. Returns its position
    /// and whether its reference was already present in the same target.
    pub(crate) fn push_parsed_line(
        &mut self,
        version: usize,
        subsection: Option<usize>,
        line: ChangeLine,
    ) -> (LinePosition, bool) {
        let target = &mut self.versions[version];
        let lines = match subsection {
            Some(index) => &mut target.subsections[index].lines,
            None => &mut target.history,
        };

        let duplicate = line.reference.as_ref().is_some_and(|reference| {
            lines
                .iter()
                .any(|existing| existing.reference.as_ref() == Some(reference))
        });

        lines.push(line);
        let position = LinePosition {
            version,
            subsection,
            line: lines.len() - 1,
        };
        (position, duplicate)
    }

    pub(crate) fn line_mut(&mut self, position: LinePosition) -> Option<&mut ChangeLine> {
        let version = self.versions.get_mut(position.version)?;
        let lines = match position.subsection {
            Some(index) => &mut version.subsections.get_mut(index)?.lines,
            None => &mut version.history,
        };
        lines.get_mut(position.line)
    }
}
