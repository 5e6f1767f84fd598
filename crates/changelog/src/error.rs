use thiserror::Error;

/// A deviation from the canonical changelog format, reported by
/// [`parse_strict`](crate::parse_strict). Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrictError {
    #[error("line {line}: unrecognized content '{text}'")]
    Unrecognized { line: usize, text: String },

    #[error("line {line}: content before the first version heading")]
    BeforeFirstVersion { line: usize },

    #[error("line {line}: version '{version}' is declared more than once")]
    DuplicateVersion { line: usize, version: String },

    #[error("line {line}: HEAD must be the first version")]
    HeadNotFirst { line: usize },

    #[error("line {line}: reference '{reference}' already appears in this section")]
    DuplicateReference { line: usize, reference: String },
}

impl StrictError {
    /// The 1-based line the violation was found on
    pub fn line(&self) -> usize {
        match self {
            StrictError::Unrecognized { line, .. }
            | StrictError::BeforeFirstVersion { line }
            | StrictError::DuplicateVersion { line, .. }
            | StrictError::HeadNotFirst { line }
            | StrictError::DuplicateReference { line, .. } => *line,
        }
    }
}
