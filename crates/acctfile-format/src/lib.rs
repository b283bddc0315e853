#![doc = include_str!("../README.md")]

mod tracing_macros;

mod escape;
mod options;
mod writer;

pub use escape::{escape_value, format_value, format_values};
pub use options::FormatOptions;
pub use writer::AccountsWriter;

use acctfile_tree::Entry;

/// Serialize entries with default options.
pub fn serialize(entries: &[Entry]) -> String {
    serialize_with(entries, FormatOptions::default())
}

/// Serialize entries with custom options.
pub fn serialize_with(entries: &[Entry], options: FormatOptions) -> String {
    let headings = options.headings;
    let mut writer = AccountsWriter::with_options(options);
    if headings {
        writer.write_headings();
    }
    for entry in entries {
        writer.write_entry(entry);
    }
    writer.finish()
}

/// Serialize a single entry without the heading block.
pub fn format_entry(entry: &Entry, options: FormatOptions) -> String {
    let mut writer = AccountsWriter::with_options(options);
    writer.write_entry(entry);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use acctfile_tree::{AccountId, META_SECTION, ParseOptions, Value, parse_str};

    fn read_back(entries: &[Entry]) -> Vec<Entry> {
        let text = serialize(entries);
        let parsed = parse_str(&text, ParseOptions::new().strict()).unwrap();
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        parsed.entries
    }

    fn sample() -> Entry {
        let mut entry = Entry::new("bank.com (Bank)");
        let main = AccountId::DEFAULT;
        entry.set_values(
            &main,
            META_SECTION,
            "urls",
            vec![Value::new("https://bank.com"), Value::new("https://m.bank.com")],
        );
        entry.set_value(&main, "default", "username", "alice");
        entry.set_values(
            &main,
            "default",
            "password",
            vec![
                Value::with_flags("s3;cret", ["old"]),
                Value::new("n3w"),
            ],
        );
        entry.set_value(&main, "security questions", "pet", "rex");

        let joint = AccountId::Number(2);
        entry.set_value(&joint, "default", "username", "bob");
        entry.add_flag(&joint, "default", "closed");
        entry
    }

    #[test]
    fn test_simple_entry() {
        let mut entry = Entry::new("example.com");
        entry.set_value(&AccountId::DEFAULT, "default", "username", "alice");
        entry.set_values(
            &AccountId::DEFAULT,
            "default",
            "password",
            vec![Value::with_flags("s3cret", ["used credit card"])],
        );
        insta::assert_snapshot!(serialize(&[entry]), @r"
        ======================================================================
        >>Online
        ----------------------------------------------------------------------
        >Accounts
        example.com:
        	username:	alice
        	password:	s3cret **used credit card**
        ");
    }

    #[test]
    fn test_markers() {
        insta::assert_snapshot!(format_entry(&sample(), FormatOptions::default()), @r"
        bank.com (Bank):
        	[meta]	urls:	https://bank.com; https://m.bank.com
        	username:	alice
        	password:	s3\;cret **old**; n3w
        	[security questions]
        	pet:	rex
        	{account 2}
        	**closed**
        	username:	bob
        ");
    }

    #[test]
    fn test_legacy_layout() {
        let options = FormatOptions::new().legacy().headings(false);
        insta::assert_snapshot!(serialize_with(&[sample()], options), @r"
        bank.com (Bank):
          [meta] urls: https://bank.com; https://m.bank.com
          username: alice
          password: s3\;cret **old**; n3w
          [security questions]
          pet: rex
          {account 2}
          **closed**
          username: bob
        ");
    }

    #[test]
    fn test_meta_flags() {
        let mut entry = Entry::new("site");
        entry.add_flag(&AccountId::DEFAULT, META_SECTION, "inactive");
        entry.set_value(&AccountId::DEFAULT, META_SECTION, "app", "site-app");
        entry.set_value(&AccountId::DEFAULT, "default", "user", "x");
        insta::assert_snapshot!(format_entry(&entry, FormatOptions::default()), @r"
        site:
        	[meta]
        	**inactive**
        	[default]
        	[meta]	app:	site-app
        	user:	x
        ");
    }

    #[test]
    fn test_empty_accounts_are_skipped() {
        let mut entry = Entry::new("site");
        entry.section_mut(&AccountId::Number(1), "notes");
        entry.set_value(&AccountId::Number(3), "default", "user", "carol");
        let text = format_entry(&entry, FormatOptions::default());
        assert_eq!(text, "site:\n\t{account 3}\n\tuser:\tcarol\n");
    }

    #[test]
    fn test_return_to_default_account() {
        let mut entry = Entry::new("site");
        entry.accounts.clear();
        entry.set_value(&AccountId::Number(1), "default", "user", "b");
        entry.set_value(&AccountId::DEFAULT, "default", "user", "a");
        let text = format_entry(&entry, FormatOptions::default());
        assert_eq!(
            text,
            "site:\n\t{account 1}\n\tuser:\tb\n\t{account}\n\tuser:\ta\n"
        );

        let parsed = read_back(std::slice::from_ref(&entry));
        assert_eq!(parsed, [entry]);
        let back = &parsed[0];
        assert_eq!(back.get_value(&AccountId::DEFAULT, "default", "user").unwrap().text, "a");
        assert_eq!(back.get_value(&AccountId::Number(1), "default", "user").unwrap().text, "b");
    }

    #[test]
    fn test_section_flags_are_written_verbatim() {
        let mut entry = Entry::new("site");
        entry.add_flag(&AccountId::DEFAULT, "default", "a;b");
        entry.add_flag(&AccountId::DEFAULT, "default", r"c:\x");
        entry.set_value(&AccountId::DEFAULT, "default", "user", "x");
        let text = format_entry(&entry, FormatOptions::default());
        assert_eq!(text, "site:\n\t**a;b**\n\t**c:\\x**\n\tuser:\tx\n");

        let parsed = read_back(std::slice::from_ref(&entry));
        let flags: Vec<_> = parsed[0]
            .section(&AccountId::DEFAULT, "default")
            .unwrap()
            .flags
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(flags, ["a;b", r"c:\x"]);
        assert_eq!(parsed, [entry]);
    }

    #[test]
    fn test_no_entries() {
        assert_eq!(serialize_with(&[], FormatOptions::new().headings(false)), "");
        assert_eq!(serialize(&[]).lines().count(), 4);
    }

    #[test]
    fn test_ruler_width() {
        let text = serialize_with(&[], FormatOptions::new().ruler_width(20));
        assert_eq!(text.lines().next(), Some("===================="));
    }
}
