//! Collected format violations and how to report them.

use std::fmt;
use std::io;
use std::ops::Range;

use acctfile_parse::{FormatError, ParseErrorKind};
use ariadne::{Color, Label, Report, ReportKind, Source};

/// A format violation found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// 1-based line number, absent for whole-input problems.
    pub line: Option<usize>,
    /// The offending line as read.
    pub raw: Option<String>,
}

impl Diagnostic {
    /// Render this diagnostic with ariadne.
    ///
    /// `source` must be the text that was parsed, so the line can be shown
    /// in context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    /// Write the report to a writer.
    pub fn write_report<W: io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range = self.range(source);
        let label = match self.line {
            Some(line) => format!("line {line}"),
            None => "end of input".to_string(),
        };
        let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(self.kind.message())
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(Color::Red),
            );
        if let Some(help) = self.kind.help() {
            report = report.with_help(help);
        }
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    /// Byte range of the offending line, without its line terminator.
    fn range(&self, source: &str) -> Range<usize> {
        let Some(line) = self.line else {
            return source.len()..source.len();
        };
        let mut start = 0;
        for (index, text) in source.split_inclusive('\n').enumerate() {
            if index + 1 == line {
                let body = text.trim_end_matches(['\n', '\r']);
                return start..start + body.len();
            }
            start += text.len();
        }
        source.len()..source.len()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(line) = self.line {
            write!(f, " at line {line}:\n{}", self.raw.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

impl From<FormatError> for Diagnostic {
    fn from(err: FormatError) -> Self {
        Self {
            kind: err.kind,
            line: err.line,
            raw: err.raw,
        }
    }
}

/// How a caller wants collected diagnostics surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Print each diagnostic as an error; the caller should stop.
    Die,
    /// Print each diagnostic as a warning and carry on.
    #[default]
    Warn,
    /// Print diagnostics as plain output and carry on.
    Stdout,
    /// Say nothing.
    Silent,
}

/// Diagnostics collected over one parse, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.items.push(diagnostic.into());
    }

    /// Number of diagnostics recorded.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate diagnostics in the order they were found.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Kinds in order, mostly useful in tests.
    pub fn kinds(&self) -> Vec<ParseErrorKind> {
        self.items.iter().map(|d| d.kind).collect()
    }

    /// Write every diagnostic according to `verbosity`.
    ///
    /// Returns `true` when the caller should stop: `Die` with at least one
    /// diagnostic.
    pub fn report<W: io::Write>(&self, verbosity: Verbosity, mut writer: W) -> io::Result<bool> {
        let prefix = match verbosity {
            Verbosity::Silent => return Ok(false),
            Verbosity::Die => "error: ",
            Verbosity::Warn => "warning: ",
            Verbosity::Stdout => "",
        };
        for diagnostic in &self.items {
            writeln!(writer, "{prefix}{diagnostic}")?;
        }
        Ok(verbosity == Verbosity::Die && !self.items.is_empty())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
