//! History.markdown changelog engine
//!
//! A library for reading, editing and writing the changelog format used
//! by `History.markdown` files:
//!
//! ```text
//! ## HEAD
//!
//! ### Bug Fixes
//!
//!   * Fix a crash on empty input (#123)
//!
//! ## 1.0.0 / 2015-04-23
//!
//!   * First release (@someone)
//! ```
//!
//! Parsing is lenient and never fails ([`parse`]); [`parse_strict`] is
//! available for validation tooling. Rendering is the `Display`
//! implementation of [`Changelog`], and `render(parse(text)) == text` for
//! any canonical text.
//!
//! # Example
//!
//! ```
//! use changelog::{insert_merge_line, parse, HEAD};
//!
//! let mut history = parse("## HEAD\n\n### Bug Fixes\n\n  * Fix a crash (#1)\n");
//! insert_merge_line(&mut history, "Bug Fixes", "Handle <empty> input", "#2");
//! insert_merge_line(&mut history, "Bug Fixes", "Handle <empty> input", "#2");
//!
//! assert_eq!(
//!     history.to_string(),
//!     "## HEAD\n\n### Bug Fixes\n\n  * Fix a crash (#1)\n  * Handle &lt;empty&gt; input (#2)\n"
//! );
//! assert_eq!(history.version(HEAD).unwrap().subsections().len(), 1);
//! ```

mod error;
mod lines;
mod parser;
mod render;
mod types;
mod writer;

pub use error::StrictError;
pub use parser::{parse, parse_strict};
pub use types::*;
pub use writer::{NO_SECTION, add_merge_reference, escape_html, insert_merge_line};
