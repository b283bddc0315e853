#![doc = include_str!("../README.md")]

mod tracing_macros;

mod builder;
mod diagnostic;
mod entries;
mod entry;
mod error;
mod query;

use std::fmt;
use std::io::{self, BufRead};

pub use acctfile_parse::{
    AccountId, DuplicateKeys, Event, FormatError, ParseErrorKind, ParseMode, ParseOptions, Parser,
    StrLines, Syntax, Value, split_values,
};
pub use builder::EntryBuilder;
pub use diagnostic::{Diagnostic, Diagnostics, Verbosity};
pub use entries::Entries;
pub use entry::{Account, DEFAULT_SECTION, Entry, META_SECTION, Section};
pub use error::Error;
pub use query::{Hit, find_entry, search_entries};

/// Parse entries lazily from any line source.
pub fn parse<I>(lines: I, options: ParseOptions) -> Entries<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    Entries::new(lines, options)
}

/// Everything a completed parse produced.
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    /// Entries in file order.
    pub entries: Vec<Entry>,
    /// Violations tolerated along the way.
    pub diagnostics: Diagnostics,
}

/// A parse that stopped early.
#[derive(Debug)]
pub struct ParseFailure {
    /// Entries completed before the error.
    pub entries: Vec<Entry>,
    /// Why parsing stopped.
    pub error: Error,
    /// Violations recorded up to and including the error.
    pub diagnostics: Diagnostics,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ParseFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Parse a whole string.
pub fn parse_str(source: &str, options: ParseOptions) -> Result<Parsed, ParseFailure> {
    collect(Entries::from_source(source, options))
}

/// Parse everything a reader yields.
pub fn parse_reader<R: BufRead>(reader: R, options: ParseOptions) -> Result<Parsed, ParseFailure> {
    collect(Entries::from_reader(reader, options))
}

fn collect<I>(mut iter: Entries<I>) -> Result<Parsed, ParseFailure>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut entries = Vec::new();
    let mut failure = None;
    for item in iter.by_ref() {
        match item {
            Ok(entry) => entries.push(entry),
            Err(error) => {
                failure = Some(error);
                break;
            }
        }
    }
    let diagnostics = iter.into_diagnostics();
    match failure {
        Some(error) => Err(ParseFailure {
            entries,
            error,
            diagnostics,
        }),
        None => Ok(Parsed {
            entries,
            diagnostics,
        }),
    }
}
