//! Account identifiers.

use std::fmt;

/// Identifies an account inside an entry.
///
/// Accounts are introduced by `{account N}` markers. Most files number them,
/// but the marker text is free-form, so anything that is not an unsigned
/// integer is kept verbatim as a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountId {
    /// A numbered account. `0` is the implicit default account.
    Number(u64),
    /// A non-numeric marker such as `{account work}`.
    Named(String),
}

impl AccountId {
    /// The implicit account every entry starts in.
    pub const DEFAULT: AccountId = AccountId::Number(0);

    /// Interpret the text between `{account` and `}`.
    ///
    /// An empty marker (`{account}`) resets to the default account.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::DEFAULT;
        }
        match text.parse::<u64>() {
            Ok(number) => AccountId::Number(number),
            Err(_) => AccountId::Named(text.to_string()),
        }
    }

    /// Whether this is account `0`.
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u64> for AccountId {
    fn from(number: u64) -> Self {
        AccountId::Number(number)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountId::Number(number) => write!(f, "{number}"),
            AccountId::Named(name) => f.write_str(name),
        }
    }
}
