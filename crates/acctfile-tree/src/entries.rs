//! The lazy entry iterator.

use std::io::{self, BufRead};

use acctfile_parse::{Event, ParseErrorKind, ParseOptions, Parser, StrLines};

use crate::builder::EntryBuilder;
use crate::diagnostic::Diagnostics;
use crate::entry::Entry;
use crate::error::Error;
use crate::trace;

/// Yields entries one at a time as the input is read.
///
/// In permissive mode format violations are recorded in
/// [`Entries::diagnostics`] and iteration continues. In strict mode the
/// first violation is yielded as an [`Error::Format`] and the iterator is
/// finished. `NoTopLevelSectionFound` can only be known at end of input, so
/// it is recorded but never yielded. I/O and internal errors always end the
/// iteration.
pub struct Entries<I> {
    parser: Parser<I>,
    builder: EntryBuilder,
    strict: bool,
    diagnostics: Diagnostics,
    done: bool,
}

impl<'src> Entries<StrLines<'src>> {
    /// Parse entries from a string.
    pub fn from_source(source: &'src str, options: ParseOptions) -> Self {
        Self::new(StrLines::new(source), options)
    }
}

impl<R: BufRead> Entries<io::Lines<R>> {
    /// Parse entries from a buffered reader.
    pub fn from_reader(reader: R, options: ParseOptions) -> Self {
        Self::new(reader.lines(), options)
    }
}

impl<I> Entries<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Parse entries from any line source.
    pub fn new(lines: I, options: ParseOptions) -> Self {
        let strict = options.is_strict();
        let builder = EntryBuilder::new(options.duplicates);
        Self {
            parser: Parser::new(lines, options),
            builder,
            strict,
            diagnostics: Diagnostics::new(),
            done: false,
        }
    }

    /// Violations recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Take the recorded violations.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Current 1-based line number.
    pub fn line_number(&self) -> usize {
        self.parser.line_number()
    }
}

impl<I> Iterator for Entries<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Entry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let event = match self.parser.next_event() {
                Some(Ok(event)) => event,
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(Error::Io(err)));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };
            if matches!(event, Event::DocumentEnd) {
                trace!(diagnostics = self.diagnostics.len(), "end of input");
            }
            match self.builder.event(event) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => {}
                Err(Error::Format(err)) => {
                    let fatal = self.strict && err.kind != ParseErrorKind::NoTopLevelSectionFound;
                    self.diagnostics.push(err.clone());
                    if fatal {
                        self.done = true;
                        return Some(Err(Error::Format(err)));
                    }
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<I> std::iter::FusedIterator for Entries<I> where I: Iterator<Item = io::Result<String>> {}
