//! Formatting options for accounts-file output.

use acctfile_parse::Syntax;

/// Options for serializing entries.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Indentation for body lines (default: a tab)
    pub indent: &'static str,

    /// Separator between values (default: "; "). Must contain a `;`.
    pub separator: &'static str,

    /// Key/value layout (default: `Current`, tab-delimited).
    /// `Legacy` writes `key: value`; `Auto` is treated as `Current`.
    pub syntax: Syntax,

    /// Write the `>>Online` / `>Accounts` heading block first (default: true)
    pub headings: bool,

    /// Width of the heading rulers (default: 70)
    pub ruler_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "\t",
            separator: "; ",
            syntax: Syntax::Current,
            headings: true,
            ruler_width: 70,
        }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the older space-delimited layout, indented by two spaces.
    pub fn legacy(mut self) -> Self {
        self.syntax = Syntax::Legacy;
        self.indent = "  ";
        self
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Set the value separator.
    pub fn separator(mut self, separator: &'static str) -> Self {
        self.separator = separator;
        self
    }

    /// Enable or disable the heading block.
    pub fn headings(mut self, headings: bool) -> Self {
        self.headings = headings;
        self
    }

    /// Set the ruler width.
    pub fn ruler_width(mut self, width: usize) -> Self {
        self.ruler_width = width;
        self
    }

    pub(crate) fn is_legacy(&self) -> bool {
        self.syntax == Syntax::Legacy
    }
}
