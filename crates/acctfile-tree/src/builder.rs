//! Folds parser events into [`Entry`] trees.

use acctfile_parse::{AccountId, DuplicateKeys, Event, FormatError, ParseErrorKind};

use crate::entry::{DEFAULT_SECTION, Entry};
use crate::error::Error;
use crate::{debug, trace};

/// Where body lines currently land.
struct Cursor {
    entry: Entry,
    account: AccountId,
    section: String,
}

/// Builds entries from a stream of [`Event`]s.
///
/// Feed events in order with [`EntryBuilder::event`]; a finished entry is
/// handed back when its [`Event::EntryEnd`] arrives.
pub struct EntryBuilder {
    duplicates: DuplicateKeys,
    current: Option<Cursor>,
}

impl EntryBuilder {
    /// Create a builder with the given duplicate-key policy.
    pub fn new(duplicates: DuplicateKeys) -> Self {
        Self {
            duplicates,
            current: None,
        }
    }

    /// Whether an entry is open.
    pub fn in_entry(&self) -> bool {
        self.current.is_some()
    }

    /// Process one event.
    ///
    /// Format errors (both those reported by the parser and duplicate keys
    /// detected here) come back as [`Error::Format`]; the builder stays
    /// usable afterwards.
    pub fn event(&mut self, event: Event) -> Result<Option<Entry>, Error> {
        match event {
            Event::EntryStart { line, name } => {
                if self.current.is_some() {
                    return Err(Error::Internal(format!(
                        "entry at line {line} started before the previous one ended"
                    )));
                }
                self.current = Some(Cursor {
                    entry: Entry::new(name),
                    account: AccountId::DEFAULT,
                    section: DEFAULT_SECTION.to_string(),
                });
                Ok(None)
            }
            Event::EntryEnd => Ok(self.current.take().map(|cursor| cursor.entry)),

            Event::Account { line, id } => {
                let cursor = self.cursor(line)?;
                trace!(line, account = %id, "account");
                cursor.account = id;
                cursor.section = DEFAULT_SECTION.to_string();
                Ok(None)
            }
            Event::Section { line, name } => {
                let cursor = self.cursor(line)?;
                trace!(line, section = %name, "section");
                cursor.section = name;
                Ok(None)
            }
            Event::Flag { line, flag } => {
                let cursor = self.cursor(line)?;
                cursor
                    .entry
                    .add_flag(&cursor.account, &cursor.section, flag);
                Ok(None)
            }
            Event::Values {
                line,
                raw,
                section,
                key,
                values,
            } => {
                let duplicates = self.duplicates;
                let cursor = self.cursor(line)?;
                let section = section.as_deref().unwrap_or(&cursor.section);
                let seen = cursor
                    .entry
                    .section(&cursor.account, section)
                    .is_some_and(|s| s.contains_key(&key));
                match (seen, duplicates) {
                    (true, DuplicateKeys::Reject) => {
                        debug!(line, key = %key, "duplicate key");
                        Err(Error::Format(FormatError::at_line(
                            ParseErrorKind::DuplicateKey,
                            line,
                            raw,
                        )))
                    }
                    (true, DuplicateKeys::Append) => {
                        cursor
                            .entry
                            .add_values(&cursor.account, section, key, values);
                        Ok(None)
                    }
                    (false, _) => {
                        cursor
                            .entry
                            .set_values(&cursor.account, section, key, values);
                        Ok(None)
                    }
                }
            }

            Event::Error(err) => Err(Error::Format(err)),

            Event::TopSection { .. } | Event::SubSection { .. } | Event::DocumentEnd => Ok(None),
        }
    }

    fn cursor(&mut self, line: usize) -> Result<&mut Cursor, Error> {
        self.current
            .as_mut()
            .ok_or_else(|| Error::Internal(format!("body line {line} outside an entry")))
    }
}
