//! Parser configuration.

/// How format violations are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// The first violation aborts the parse.
    Strict,
    /// Violations are collected and parsing continues.
    #[default]
    Permissive,
}

/// Which key/value line syntax the file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    /// Decide at the first key/value line, then stick with it.
    #[default]
    Auto,
    /// `  key: value; value` with space indentation.
    Legacy,
    /// `\tkey:\tvalue; value`, including `\t[section]\tkey:\tvalue`.
    Current,
}

/// What to do when a key is declared again in the same account and section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Report a `DuplicateKey` violation and keep the first declaration.
    #[default]
    Reject,
    /// Append the new values to the existing list.
    Append,
}

/// Options for parsing accounts files.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Strict or permissive handling of violations (default: permissive)
    pub mode: ParseMode,

    /// Key/value syntax family (default: auto-detect)
    pub syntax: Syntax,

    /// Duplicate key policy (default: reject)
    pub duplicates: DuplicateKeys,

    /// Top-level section holding the records (default: "online")
    pub top_section: String,

    /// Sub-section holding the records (default: "accounts")
    pub sub_section: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            syntax: Syntax::default(),
            duplicates: DuplicateKeys::default(),
            top_section: "online".to_string(),
            sub_section: "accounts".to_string(),
        }
    }
}

impl ParseOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort on the first violation.
    pub fn strict(mut self) -> Self {
        self.mode = ParseMode::Strict;
        self
    }

    /// Collect violations and keep going.
    pub fn permissive(mut self) -> Self {
        self.mode = ParseMode::Permissive;
        self
    }

    /// Fix the key/value syntax instead of detecting it.
    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Set the duplicate key policy.
    pub fn duplicates(mut self, duplicates: DuplicateKeys) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Set the section names that hold records. Matching is case-insensitive.
    pub fn sections(mut self, top: &str, sub: &str) -> Self {
        self.top_section = top.trim().to_lowercase();
        self.sub_section = sub.trim().to_lowercase();
        self
    }

    /// Whether the parse aborts on the first violation.
    pub fn is_strict(&self) -> bool {
        self.mode == ParseMode::Strict
    }
}
