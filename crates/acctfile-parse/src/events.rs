//! Event types for the accounts parser.

use std::fmt;

use crate::{AccountId, Value};

/// Events emitted by the parser.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A `>>label` line after a `=` ruler. The name is lowercased.
    TopSection {
        /// Line of the label.
        line: usize,
        /// Section name.
        name: String,
    },
    /// A `>label` line after a `-` ruler. The name is lowercased.
    SubSection {
        /// Line of the label.
        line: usize,
        /// Sub-section name.
        name: String,
    },

    /// An unindented `name:` heading opened a new entry.
    EntryStart {
        /// Line of the heading.
        line: usize,
        /// Heading text without its trailing colon.
        name: String,
    },
    /// The current entry is complete.
    EntryEnd,

    /// An `{account N}` marker.
    Account {
        /// Line of the marker.
        line: usize,
        /// The account selected by the marker.
        id: AccountId,
    },
    /// A `[name]` marker (or a legacy `name:` section label).
    Section {
        /// Line of the marker.
        line: usize,
        /// Lowercased section name.
        name: String,
    },
    /// A line holding only `**flag**`.
    Flag {
        /// Line of the marker.
        line: usize,
        /// Flag text.
        flag: String,
    },
    /// A key/value line.
    Values {
        /// Line of the key/value pair.
        line: usize,
        /// The raw line, for diagnostics raised downstream.
        raw: String,
        /// Inline section from the one-line `[section]\tkey:\tvalue` form.
        section: Option<String>,
        /// The key, without its colon.
        key: String,
        /// Parsed values, in declaration order.
        values: Vec<Value>,
    },

    /// A format violation. Parsing continues after it.
    Error(FormatError),

    /// End of input. No events follow.
    DocumentEnd,
}

/// Kinds of format violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A `=` ruler was not followed by a `>>label` line.
    ExpectedTopLabel,
    /// A `-` ruler was not followed by a `>label` line.
    ExpectedSubLabel,
    /// An unindented line that is not a valid `name:` heading.
    MalformedEntryHeader,
    /// A key/value line that does not fit the syntax in use.
    MalformedKeyValue,
    /// Unpaired or empty `**` markup in a value.
    UnbalancedFlagMarkup,
    /// A key was declared twice for the same account and section.
    DuplicateKey,
    /// The input ended without a single `>>label` heading.
    NoTopLevelSectionFound,
    /// An indented line that is neither a marker nor a key/value pair.
    UnrecognizedLine,
}

impl ParseErrorKind {
    /// Short human-readable description.
    pub fn message(self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedTopLabel => {
                "expected \">>\" section label after \"=====\" line"
            }
            ParseErrorKind::ExpectedSubLabel => {
                "expected \">\" subsection label after \"-----\" line"
            }
            ParseErrorKind::MalformedEntryHeader => "line is like an entry header, but malformed",
            ParseErrorKind::MalformedKeyValue => "malformed key/value line",
            ParseErrorKind::UnbalancedFlagMarkup => "unbalanced **flag** markup",
            ParseErrorKind::DuplicateKey => "duplicate key, section, or account",
            ParseErrorKind::NoTopLevelSectionFound => "found no top-level section headings",
            ParseErrorKind::UnrecognizedLine => "unrecognized line",
        }
    }

    /// A hint on how to fix the line, if there is a useful one.
    pub fn help(self) -> Option<&'static str> {
        match self {
            ParseErrorKind::ExpectedTopLabel => {
                Some("a ruler of '=' must be followed by a line like `>>Online`")
            }
            ParseErrorKind::ExpectedSubLabel => {
                Some("a ruler of '-' must be followed by a line like `>Accounts`")
            }
            ParseErrorKind::MalformedEntryHeader => {
                Some("entry headings are unindented and end with ':'")
            }
            ParseErrorKind::MalformedKeyValue => {
                Some("write `key:`, a tab (a space in legacy files), then the values")
            }
            ParseErrorKind::UnbalancedFlagMarkup => {
                Some("flags look like `value **flag**`; write `\\;` for a literal semicolon")
            }
            ParseErrorKind::DuplicateKey => {
                Some("add an `{account N}` or `[section]` marker, or merge the values")
            }
            ParseErrorKind::NoTopLevelSectionFound | ParseErrorKind::UnrecognizedLine => None,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A format violation with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// 1-based line number. `None` for whole-file problems.
    pub line: Option<usize>,
    /// The offending line as read.
    pub raw: Option<String>,
}

impl FormatError {
    /// Create an error pointing at a line.
    pub fn at_line(kind: ParseErrorKind, line: usize, raw: impl Into<String>) -> Self {
        Self {
            kind,
            line: Some(line),
            raw: Some(raw.into()),
        }
    }

    /// Create an error about the input as a whole.
    pub fn whole_input(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            line: None,
            raw: None,
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        if let Some(raw) = &self.raw {
            write!(f, ":\n{raw}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line() {
        let err = FormatError::at_line(ParseErrorKind::DuplicateKey, 7, "\tuser:\tbob");
        assert_eq!(
            err.to_string(),
            "duplicate key, section, or account at line 7:\n\tuser:\tbob"
        );
    }

    #[test]
    fn test_display_whole_input() {
        let err = FormatError::whole_input(ParseErrorKind::NoTopLevelSectionFound);
        assert_eq!(err.to_string(), "found no top-level section headings");
    }
}
