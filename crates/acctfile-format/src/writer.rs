//! Line-by-line accounts-file writer.

use acctfile_parse::{AccountId, Value};
use acctfile_tree::{DEFAULT_SECTION, Entry, META_SECTION, Section};

use crate::escape::format_values;
use crate::options::FormatOptions;
use crate::trace;

/// Builds accounts-file text one entry at a time.
///
/// Markers are written only when the account or section actually changes,
/// so a simple entry comes out as a heading followed by its key lines.
pub struct AccountsWriter {
    out: String,
    options: FormatOptions,
    /// Where the reader's cursor is after the lines written so far.
    account: AccountId,
    section: String,
}

impl AccountsWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::with_options(FormatOptions::default())
    }

    /// Create a new writer with the given options.
    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            out: String::new(),
            options,
            account: AccountId::DEFAULT,
            section: DEFAULT_SECTION.to_string(),
        }
    }

    /// Consume the writer and return the output.
    pub fn finish(self) -> String {
        self.out
    }

    /// Write the ruler and label lines that open the records section.
    pub fn write_headings(&mut self) {
        let width = self.options.ruler_width;
        self.line(&"=".repeat(width));
        self.line(">>Online");
        self.line(&"-".repeat(width));
        self.line(">Accounts");
    }

    /// Write one entry.
    pub fn write_entry(&mut self, entry: &Entry) {
        trace!(entry = %entry.name, "write entry");
        self.line(&format!("{}:", entry.name));
        self.account = AccountId::DEFAULT;
        self.section = DEFAULT_SECTION.to_string();

        if let Some(meta) = entry.meta() {
            self.write_meta(meta);
        }

        for account in entry.accounts.values() {
            let sections: Vec<&Section> = account
                .sections
                .values()
                .filter(|section| {
                    !section.is_empty() && !(account.id.is_default() && section.name == META_SECTION)
                })
                .collect();
            if sections.is_empty() {
                continue;
            }
            self.enter_account(&account.id);
            for section in sections {
                self.enter_section(&section.name);
                self.write_flags(section);
                for (key, values) in section.iter() {
                    self.write_key(None, key, values);
                }
            }
        }
    }

    fn write_meta(&mut self, meta: &Section) {
        if !meta.flags.is_empty() {
            self.enter_section(META_SECTION);
            self.write_flags(meta);
            self.enter_section(DEFAULT_SECTION);
        }
        for (key, values) in meta.iter() {
            self.write_key(Some(META_SECTION), key, values);
        }
    }

    fn enter_account(&mut self, id: &AccountId) {
        if *id == self.account {
            return;
        }
        let marker = if id.is_default() {
            "{account}".to_string()
        } else {
            format!("{{account {id}}}")
        };
        self.body(&marker);
        self.account = id.clone();
        // An account marker always lands in the `default` section.
        self.section = DEFAULT_SECTION.to_string();
    }

    fn enter_section(&mut self, name: &str) {
        if name != self.section {
            self.body(&format!("[{name}]"));
            self.section = name.to_string();
        }
    }

    fn write_flags(&mut self, section: &Section) {
        for flag in &section.flags {
            // Flag lines are not split on `;`, so they are written verbatim.
            self.body(&format!("**{flag}**"));
        }
    }

    fn write_key(&mut self, inline_section: Option<&str>, key: &str, values: &[Value]) {
        let values = format_values(values, self.options.separator);
        let gap = if self.options.is_legacy() { " " } else { "\t" };
        let mut line = String::new();
        if let Some(section) = inline_section {
            line.push('[');
            line.push_str(section);
            line.push(']');
            line.push_str(gap);
        }
        line.push_str(key);
        line.push(':');
        line.push_str(gap);
        line.push_str(&values);
        self.body(&line);
    }

    fn body(&mut self, text: &str) {
        self.out.push_str(self.options.indent);
        self.line(text);
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl Default for AccountsWriter {
    fn default() -> Self {
        Self::new()
    }
}
