//! Markdown rendering
//!
//! The `Display` output of a [`Changelog`] is the canonical file format:
//! versions separated by a blank line, change lines indented by two
//! spaces, and exactly one trailing newline.

use crate::types::{ChangeLine, Changelog, Subsection, Version};
use std::fmt::{self, Display, Formatter, Write};

impl Display for ChangeLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.reference {
            Some(reference) => write!(f, "  * {} ({})", self.summary, reference),
            None => write!(f, "  * {}", self.summary),
        }
    }
}

impl Display for Subsection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "### {}", self.name())?;
        if !self.lines().is_empty() {
            f.write_str("\n\n")?;
            write_joined(f, self.lines(), "\n")?;
        }
        Ok(())
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "## {}", self.id())?;
        if let Some(date) = self.date() {
            write!(f, " / {}", date)?;
        }
        if !self.history().is_empty() {
            f.write_str("\n\n")?;
            write_joined(f, self.history(), "\n")?;
        }
        if !self.subsections().is_empty() {
            f.write_str("\n\n")?;
            write_joined(f, self.subsections(), "\n\n")?;
        }
        Ok(())
    }
}

impl Display for Changelog {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_joined(f, self.versions(), "\n\n")?;
        f.write_char('\n')
    }
}

impl Version {
    /// The rendered version without its `##` heading, as used for a
    /// release body. Empty if the version has no content.
    pub fn body(&self) -> String {
        let rendered = self.to_string();
        match rendered.split_once("\n\n") {
            Some((_heading, body)) => body.to_string(),
            None => String::new(),
        }
    }
}

fn write_joined<T: Display>(f: &mut Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::types::{ChangeLine, Changelog, HEAD, Target, Version};
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = include_str!("../testdata/History.markdown");

    #[test]
    fn test_render_change_line() {
        assert_eq!(ChangeLine::new("Plain").to_string(), "  * Plain");
        assert_eq!(
            ChangeLine::with_reference("Fixed", "#12").to_string(),
            "  * Fixed (#12)"
        );
    }

    #[test]
    fn test_render_empty_changelog() {
        assert_eq!(Changelog::new().to_string(), "\n");
    }

    #[test]
    fn test_render_version_with_date_and_subsections() {
        let mut changelog = Changelog::new();
        changelog.append_line("1.0.0", Target::History, ChangeLine::new("Direct"));
        changelog.append_line(
            "1.0.0",
            Target::Subsection("Bug Fixes"),
            ChangeLine::with_reference("Fix", "#3"),
        );
        changelog.get_or_create_subsection("1.0.0", "Documentation");

        assert_eq!(
            changelog.to_string(),
            "## 1.0.0\n\n  * Direct\n\n### Bug Fixes\n\n  * Fix (#3)\n\n### Documentation\n"
        );
        assert_eq!(
            Version::new("2.0.0").with_date("2016-01-01").to_string(),
            "## 2.0.0 / 2016-01-01"
        );
    }

    #[test]
    fn test_version_body_drops_heading() {
        let changelog = parse("## HEAD\n\n### Bug Fixes\n\n  * Fix (#1)\n");
        assert_eq!(
            changelog.version(HEAD).unwrap().body(),
            "### Bug Fixes\n\n  * Fix (#1)"
        );
        assert_eq!(Version::new("1.0.0").body(), "");
    }

    #[test]
    fn test_round_trip_fixture_is_byte_identical() {
        assert_eq!(parse(FIXTURE).to_string(), FIXTURE);
    }

    #[test]
    fn test_round_trip_reparse_is_equal() {
        let document = parse(FIXTURE);
        assert_eq!(parse(&document.to_string()), document);
    }

    #[test]
    fn test_render_is_idempotent_for_drifted_input() {
        let drifted = concat!(
            "# Changelog\n\n## head\n* Crammed line (#5)\n  that wraps\n",
            "### Bug Fixes\n  * Fix\n\n\n\n",
            "## 1.0.0 / 2015-01-01\n  * Done (@someone)   \n",
        );
        let once = parse(drifted).to_string();
        let twice = parse(&once).to_string();
        assert_eq!(once, twice);
        assert_eq!(
            once,
            concat!(
                "## HEAD\n\n  * Crammed line that wraps (#5)\n\n",
                "### Bug Fixes\n\n  * Fix\n\n",
                "## 1.0.0 / 2015-01-01\n\n  * Done (@someone)\n",
            )
        );
    }

    #[test]
    fn test_round_trip_keeps_free_form_headings() {
        let text = concat!(
            "## HEAD\n\n### security-fixes\n\n  * Harden it (#2)\n\n",
            "## 1.0.0 / 2015-01-01 (yanked)\n\n### Fixes (Windows)\n\n  * A (#1)\n\n",
            "## 0.9.0 / May 2015\n\n  * Early (@parkr)\n",
        );
        assert_eq!(parse(text).to_string(), text);
    }
}
