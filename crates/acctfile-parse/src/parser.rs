//! Pull-based line parser for accounts files.

use std::collections::VecDeque;
use std::io::{self, BufRead};

use tracing::{debug, trace};

use crate::line::{LineContext, LineKind, Position, classify};
use crate::{Event, FormatError, ParseErrorKind, ParseOptions, Syntax, split_values};

/// Adapts `&str` lines to the `io::Result<String>` items a [`Parser`] reads.
pub struct StrLines<'src> {
    inner: std::str::Lines<'src>,
}

impl<'src> StrLines<'src> {
    /// Iterate the lines of `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: source.lines(),
        }
    }
}

impl Iterator for StrLines<'_> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|line| Ok(line.to_owned()))
    }
}

/// Pull-based event parser.
///
/// Reads one line at a time from any source of `io::Result<String>` and
/// produces [`Event`]s. At most one entry is ever open; it is closed by the
/// next heading, by leaving the records section, or by the end of input.
pub struct Parser<I> {
    lines: I,
    options: ParseOptions,
    line_number: usize,
    state: ParserState,
    syntax: Syntax,
    /// Set right after a label line, so a matching ruler closes the heading
    /// block instead of opening a new one.
    labelled: Option<Level>,
    in_entry: bool,
    seen_top: bool,
    event_queue: VecDeque<Event>,
    finished: bool,
}

/// Heading structure state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParserState {
    /// Before the first `=` ruler.
    AwaitTopHeading,
    /// Just saw an opening `=` ruler.
    AwaitTopLabel,
    /// Inside a `>>name` section.
    InTopSection { name: String, sub: SubState },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SubState {
    AwaitSubHeading,
    AwaitSubLabel,
    InSubSection { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Top,
    Sub,
}

impl<'src> Parser<StrLines<'src>> {
    /// Create a parser over an in-memory document.
    pub fn from_source(source: &'src str, options: ParseOptions) -> Self {
        Self::new(StrLines::new(source), options)
    }
}

impl<R: BufRead> Parser<io::Lines<R>> {
    /// Create a parser over a buffered reader.
    pub fn from_reader(reader: R, options: ParseOptions) -> Self {
        Self::new(reader.lines(), options)
    }
}

impl<I> Parser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Create a parser over a line source.
    pub fn new(lines: I, options: ParseOptions) -> Self {
        let syntax = options.syntax;
        Self {
            lines,
            options,
            line_number: 0,
            state: ParserState::AwaitTopHeading,
            syntax,
            labelled: None,
            in_entry: false,
            seen_top: false,
            event_queue: VecDeque::new(),
            finished: false,
        }
    }

    /// The options this parser was created with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Number of the last line read (1-based, 0 before the first read).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The syntax family in use. Stays `Auto` until a key/value line is seen.
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Get the next event.
    ///
    /// Returns `None` once [`Event::DocumentEnd`] has been delivered, or after
    /// the line source fails.
    pub fn next_event(&mut self) -> Option<io::Result<Event>> {
        loop {
            // Drain queue first
            if let Some(event) = self.event_queue.pop_front() {
                return Some(Ok(event));
            }
            if self.finished {
                return None;
            }
            match self.lines.next() {
                Some(Ok(line)) => {
                    self.line_number += 1;
                    self.process_line(&line);
                }
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err));
                }
                None => self.finish(),
            }
        }
    }

    fn context(&self) -> LineContext {
        let position = match &self.state {
            ParserState::AwaitTopHeading => Position::BeforeSections,
            ParserState::AwaitTopLabel => Position::AwaitTopLabel,
            ParserState::InTopSection { name, sub } => match sub {
                SubState::AwaitSubLabel => Position::AwaitSubLabel,
                SubState::InSubSection { name: sub_name }
                    if *name == self.options.top_section
                        && *sub_name == self.options.sub_section =>
                {
                    Position::InAccounts
                }
                _ => Position::OutsideAccounts,
            },
        };
        LineContext {
            position,
            syntax: self.syntax,
        }
    }

    fn process_line(&mut self, raw: &str) {
        let line = self.line_number;
        let kind = classify(raw, &self.context());
        let labelled = self.labelled.take();

        match kind {
            LineKind::Skip => {
                // Comments and blank lines don't break a heading block.
                self.labelled = labelled;
            }

            LineKind::TopRuler if labelled == Some(Level::Top) => {
                trace!(line, "closing ruler");
            }
            LineKind::TopRuler => {
                trace!(line, "top-level ruler");
                self.close_entry();
                self.state = ParserState::AwaitTopLabel;
            }
            LineKind::TopLabel(name) => {
                debug!(line, section = %name, "top-level section");
                self.seen_top = true;
                self.labelled = Some(Level::Top);
                self.state = ParserState::InTopSection {
                    name: name.clone(),
                    sub: SubState::AwaitSubHeading,
                };
                self.event_queue.push_back(Event::TopSection { line, name });
            }

            LineKind::SubRuler if labelled == Some(Level::Sub) => {
                trace!(line, "closing ruler");
            }
            LineKind::SubRuler => {
                trace!(line, "sub-section ruler");
                self.close_entry();
                self.set_sub_state(SubState::AwaitSubLabel);
            }
            LineKind::SubLabel(name) => {
                debug!(line, section = %name, "sub-section");
                self.labelled = Some(Level::Sub);
                self.set_sub_state(SubState::InSubSection { name: name.clone() });
                self.event_queue.push_back(Event::SubSection { line, name });
            }

            LineKind::Ignored => {
                trace!(line, "outside the records section");
            }

            LineKind::EntryHeading(name) => {
                self.close_entry();
                trace!(line, entry = name, "entry");
                self.in_entry = true;
                self.event_queue.push_back(Event::EntryStart {
                    line,
                    name: name.to_string(),
                });
            }

            LineKind::Malformed(kind) => self.malformed(kind, raw),

            LineKind::AccountMarker(_)
            | LineKind::SectionMarker(_)
            | LineKind::FlagMarker(_)
            | LineKind::KeyValue(_)
                if !self.in_entry =>
            {
                trace!(line, "body line outside an entry");
            }
            LineKind::AccountMarker(id) => {
                self.event_queue.push_back(Event::Account { line, id });
            }
            LineKind::SectionMarker(name) => {
                self.event_queue.push_back(Event::Section { line, name });
            }
            LineKind::FlagMarker(flag) => {
                self.event_queue.push_back(Event::Flag {
                    line,
                    flag: flag.to_string(),
                });
            }
            LineKind::KeyValue(kv) => {
                if self.syntax == Syntax::Auto {
                    debug!(line, syntax = ?kv.syntax, "detected key/value syntax");
                    self.syntax = kv.syntax;
                }
                match split_values(kv.values) {
                    Ok(values) => self.event_queue.push_back(Event::Values {
                        line,
                        raw: raw.to_string(),
                        section: kv.section,
                        key: kv.key.to_string(),
                        values,
                    }),
                    Err(kind) => self.error(kind, raw),
                }
            }
        }
    }

    fn malformed(&mut self, kind: ParseErrorKind, raw: &str) {
        match kind {
            // Without a label we don't know which section we're in, so
            // nothing is interpreted until the next ruler.
            ParseErrorKind::ExpectedTopLabel => self.state = ParserState::AwaitTopHeading,
            ParseErrorKind::ExpectedSubLabel => self.set_sub_state(SubState::AwaitSubHeading),
            // Could be a heading we failed to recognize: stop attributing
            // lines to the current entry.
            ParseErrorKind::MalformedEntryHeader => self.close_entry(),
            _ if !self.in_entry => {
                trace!(line = self.line_number, "malformed line outside an entry");
                return;
            }
            _ => {}
        }
        self.error(kind, raw);
    }

    fn error(&mut self, kind: ParseErrorKind, raw: &str) {
        debug!(line = self.line_number, %kind, "format error");
        self.event_queue.push_back(Event::Error(FormatError::at_line(
            kind,
            self.line_number,
            raw,
        )));
    }

    fn set_sub_state(&mut self, state: SubState) {
        if let ParserState::InTopSection { sub, .. } = &mut self.state {
            *sub = state;
        }
    }

    fn close_entry(&mut self) {
        if self.in_entry {
            self.in_entry = false;
            self.event_queue.push_back(Event::EntryEnd);
        }
    }

    fn finish(&mut self) {
        self.close_entry();
        if !self.seen_top {
            self.event_queue.push_back(Event::Error(FormatError::whole_input(
                ParseErrorKind::NoTopLevelSectionFound,
            )));
        }
        self.event_queue.push_back(Event::DocumentEnd);
        self.finished = true;
    }
}

impl<I> Iterator for Parser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}
