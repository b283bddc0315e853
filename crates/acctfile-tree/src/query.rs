//! Lookups over parsed entries.

use acctfile_parse::{AccountId, Value};

use crate::entry::Entry;

/// A value together with where it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    /// Account holding the value.
    pub account: &'a AccountId,
    /// Section name within the account.
    pub section: &'a str,
    /// Key the value is listed under.
    pub key: &'a str,
    /// The value itself.
    pub value: &'a Value,
}

/// The entry whose heading is exactly `name`.
pub fn find_entry<'a>(entries: &'a [Entry], name: &str) -> Option<&'a Entry> {
    entries.iter().find(|entry| entry.name == name)
}

/// Entries whose heading or meta `keys` contain `query`, ignoring case.
pub fn search_entries<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let query = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry.name.to_lowercase().contains(&query)
                || entry.keys.iter().any(|key| key.to_lowercase().contains(&query))
        })
        .collect()
}

impl Entry {
    /// Every stored value, in account, section, key then value order.
    pub fn hits(&self) -> impl Iterator<Item = Hit<'_>> {
        self.accounts.values().flat_map(|account| {
            account.sections.values().flat_map(move |section| {
                section.fields.iter().flat_map(move |(key, values)| {
                    values.iter().map(move |value| Hit {
                        account: &account.id,
                        section: &section.name,
                        key,
                        value,
                    })
                })
            })
        })
    }

    /// Values stored under `key` in any account or section.
    pub fn values_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = Hit<'a>> {
        self.hits().filter(move |hit| hit.key == key)
    }

    /// Values carrying `flag`.
    pub fn flagged<'a>(&'a self, flag: &'a str) -> impl Iterator<Item = Hit<'a>> {
        self.hits().filter(move |hit| hit.value.has_flag(flag))
    }
}
