//! The record tree: entries own accounts, accounts own sections, sections
//! own ordered `key -> [Value]` lists.
//!
//! Everything is addressed explicitly by `(account, section, key)`. The
//! `meta` section is entry-global: whatever account is asked for, it is
//! stored under account `0`, and its `urls`, `keys` and `app` lists are
//! mirrored onto the entry.

use indexmap::{IndexMap, IndexSet};

use acctfile_parse::{AccountId, Value};

/// Section that holds keys declared before any `[section]` marker.
pub const DEFAULT_SECTION: &str = "default";

/// Section that holds entry-wide metadata.
pub const META_SECTION: &str = "meta";

/// A named group of keys inside an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Lowercased section name.
    pub name: String,
    /// Flags set by `**flag**` lines while this section was current.
    pub flags: IndexSet<String>,
    /// Keys in first-seen order.
    pub fields: IndexMap<String, Vec<Value>>,
}

impl Section {
    /// Create an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: IndexSet::new(),
            fields: IndexMap::new(),
        }
    }

    /// Values for `key`.
    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.fields.get(key).map(Vec::as_slice)
    }

    /// Whether `key` is declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Whether `key` has a value with this text, whatever its flags.
    pub fn contains_text(&self, key: &str, text: &str) -> bool {
        self.get(key)
            .is_some_and(|values| values.iter().any(|value| value.text == text))
    }

    /// Whether `flag` is set on the section.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// No keys and no flags.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.flags.is_empty()
    }

    /// Iterate keys and their values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.fields
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

/// A numbered sub-identity of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The account identifier.
    pub id: AccountId,
    /// Sections in first-seen order. The default section is always first.
    pub sections: IndexMap<String, Section>,
    /// Name of the section used when no marker is given.
    pub default_section: String,
}

impl Account {
    /// Create an account holding an empty default section.
    pub fn new(id: AccountId) -> Self {
        let mut sections = IndexMap::new();
        sections.insert(DEFAULT_SECTION.to_string(), Section::new(DEFAULT_SECTION));
        Self {
            id,
            sections,
            default_section: DEFAULT_SECTION.to_string(),
        }
    }

    /// Look up a section.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// The section keys land in when no marker is given.
    pub fn primary(&self) -> Option<&Section> {
        self.sections.get(&self.default_section)
    }

    /// Get a section, creating it if needed.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections
            .entry(name.to_string())
            .or_insert_with(|| Section::new(name))
    }

    /// Whether every section is empty.
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Section::is_empty)
    }
}

/// One record of the accounts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Heading text without the trailing colon.
    pub name: String,
    /// Accounts in first-seen order. Account `0` is always present.
    pub accounts: IndexMap<AccountId, Account>,
    /// Mirrors `meta` / `urls`.
    pub urls: Vec<String>,
    /// Mirrors `meta` / `keys`.
    pub keys: Vec<String>,
    /// Mirrors `meta` / `app`.
    pub app: Vec<String>,
}

impl Entry {
    /// Create an entry holding the default account and section.
    pub fn new(name: impl Into<String>) -> Self {
        let mut accounts = IndexMap::new();
        accounts.insert(AccountId::DEFAULT, Account::new(AccountId::DEFAULT));
        Self {
            name: name.into(),
            accounts,
            urls: Vec::new(),
            keys: Vec::new(),
            app: Vec::new(),
        }
    }

    /// The heading without a trailing ` (alias)`.
    pub fn site(&self) -> &str {
        match self.split_alias() {
            Some((site, _)) => site,
            None => &self.name,
        }
    }

    /// The alias in a heading like `example.com (Example)`.
    pub fn alias(&self) -> Option<&str> {
        self.split_alias().map(|(_, alias)| alias)
    }

    fn split_alias(&self) -> Option<(&str, &str)> {
        let inner = self.name.strip_suffix(')')?;
        let open = inner.rfind(" (")?;
        let alias = &inner[open + 2..];
        (!alias.is_empty()).then(|| (&self.name[..open], alias))
    }

    /// The first URL from the meta section.
    pub fn url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    /// Look up an account.
    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Look up a section.
    pub fn section(&self, account: &AccountId, section: &str) -> Option<&Section> {
        self.accounts.get(slot_account(account, section))?.section(section)
    }

    /// The entry-wide metadata section, if anything was stored there.
    pub fn meta(&self) -> Option<&Section> {
        self.section(&AccountId::DEFAULT, META_SECTION)
    }

    /// Get a section, creating the account and section if needed.
    pub fn section_mut(&mut self, account: &AccountId, section: &str) -> &mut Section {
        let account = slot_account(account, section);
        self.accounts
            .entry(account.clone())
            .or_insert_with(|| Account::new(account.clone()))
            .section_mut(section)
    }

    /// Values stored at `(account, section, key)`.
    pub fn get_values(&self, account: &AccountId, section: &str, key: &str) -> Option<&[Value]> {
        self.section(account, section)?.get(key)
    }

    /// First value stored at `(account, section, key)`.
    pub fn get_value(&self, account: &AccountId, section: &str, key: &str) -> Option<&Value> {
        self.get_values(account, section, key)?.first()
    }

    /// Replace the values at `(account, section, key)`, returning the old ones.
    pub fn set_values(
        &mut self,
        account: &AccountId,
        section: &str,
        key: impl Into<String>,
        values: Vec<Value>,
    ) -> Option<Vec<Value>> {
        let key = key.into();
        let previous = self
            .section_mut(account, section)
            .fields
            .insert(key.clone(), values);
        if section == META_SECTION {
            self.mirror_meta(&key);
        }
        previous
    }

    /// Store a single unflagged value.
    pub fn set_value(
        &mut self,
        account: &AccountId,
        section: &str,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Option<Vec<Value>> {
        self.set_values(account, section, key, vec![Value::new(text)])
    }

    /// Append values to `(account, section, key)`.
    pub fn add_values(
        &mut self,
        account: &AccountId,
        section: &str,
        key: impl Into<String>,
        values: Vec<Value>,
    ) {
        let key = key.into();
        self.section_mut(account, section)
            .fields
            .entry(key.clone())
            .or_default()
            .extend(values);
        if section == META_SECTION {
            self.mirror_meta(&key);
        }
    }

    /// Set a flag on a section. Returns `false` if it was already set.
    pub fn add_flag(&mut self, account: &AccountId, section: &str, flag: impl Into<String>) -> bool {
        self.section_mut(account, section).flags.insert(flag.into())
    }

    fn mirror_meta(&mut self, key: &str) {
        let texts: Vec<String> = self
            .get_values(&AccountId::DEFAULT, META_SECTION, key)
            .unwrap_or_default()
            .iter()
            .map(|value| value.text.clone())
            .collect();
        match key {
            "urls" => self.urls = texts,
            "keys" => self.keys = texts,
            "app" => self.app = texts,
            _ => {}
        }
    }
}

fn slot_account<'a>(account: &'a AccountId, section: &str) -> &'a AccountId {
    if section == META_SECTION {
        &AccountId::DEFAULT
    } else {
        account
    }
}
