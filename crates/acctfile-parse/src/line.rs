//! Line classification.
//!
//! [`classify`] is a pure function: it looks at one line plus the position
//! the parser is in and says what kind of line it is. All state changes
//! happen in the [`Parser`](crate::Parser).

use crate::{AccountId, ParseErrorKind, Syntax};

/// Minimum run of `=` or `-` that makes a ruler line.
pub const RULER_MIN_LEN: usize = 20;

/// Where the parser is in the heading structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// No `=` ruler seen yet.
    BeforeSections,
    /// The previous significant line was an opening `=` ruler.
    AwaitTopLabel,
    /// The previous significant line was an opening `-` ruler.
    AwaitSubLabel,
    /// Inside a section whose content is not interpreted.
    OutsideAccounts,
    /// Inside the record-holding sub-section.
    InAccounts,
}

/// Everything [`classify`] needs to know besides the line itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext {
    /// Position in the heading structure.
    pub position: Position,
    /// Syntax family in use; `Auto` until the first key/value line.
    pub syntax: Syntax,
}

/// The kind of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank line or `#` comment.
    Skip,
    /// A run of `=`.
    TopRuler,
    /// A run of `-`.
    SubRuler,
    /// `>>name`, lowercased.
    TopLabel(String),
    /// `>name`, lowercased.
    SubLabel(String),
    /// Content outside the record-holding section.
    Ignored,
    /// Unindented `name:`.
    EntryHeading(&'a str),
    /// `{account N}`.
    AccountMarker(AccountId),
    /// `[name]`, or a legacy `name:` label, lowercased.
    SectionMarker(String),
    /// A line holding only `**flag**`.
    FlagMarker(&'a str),
    /// A key with its raw (unsplit) values.
    KeyValue(KeyValue<'a>),
    /// A line that breaks the format.
    Malformed(ParseErrorKind),
}

/// A classified key/value line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue<'a> {
    /// Section from the one-line `[section]\tkey:\tvalue` form.
    pub section: Option<String>,
    /// Key without its colon.
    pub key: &'a str,
    /// Values before splitting.
    pub values: &'a str,
    /// The syntax family the line was read with.
    pub syntax: Syntax,
}

/// Whether `line` is a ruler made of `c`.
pub fn is_ruler(line: &str, c: char) -> bool {
    let line = line.trim();
    line.chars().count() >= RULER_MIN_LEN && line.chars().all(|x| x == c)
}

/// Classify one line.
pub fn classify<'a>(line: &'a str, context: &LineContext) -> LineKind<'a> {
    let line = line.trim_end();
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return LineKind::Skip;
    }
    if is_ruler(trimmed, '=') {
        return LineKind::TopRuler;
    }

    match context.position {
        Position::BeforeSections => LineKind::Ignored,
        Position::AwaitTopLabel => label(line, ">>")
            .map(LineKind::TopLabel)
            .unwrap_or(LineKind::Malformed(ParseErrorKind::ExpectedTopLabel)),
        _ if is_ruler(trimmed, '-') => LineKind::SubRuler,
        Position::AwaitSubLabel => label(line, ">")
            .map(LineKind::SubLabel)
            .unwrap_or(LineKind::Malformed(ParseErrorKind::ExpectedSubLabel)),
        Position::OutsideAccounts => LineKind::Ignored,
        Position::InAccounts if is_indented(line) => classify_body(line, context.syntax),
        Position::InAccounts => entry_heading(line),
    }
}

fn label(line: &str, prefix: &str) -> Option<String> {
    let rest = line.strip_prefix(prefix)?;
    if rest.starts_with('>') {
        return None;
    }
    let name = rest.trim();
    (!name.is_empty()).then(|| name.to_lowercase())
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

fn entry_heading(line: &str) -> LineKind<'_> {
    match line.strip_suffix(':') {
        Some(name) if !name.is_empty() => LineKind::EntryHeading(name),
        _ => LineKind::Malformed(ParseErrorKind::MalformedEntryHeader),
    }
}

fn classify_body(line: &str, syntax: Syntax) -> LineKind<'_> {
    let body = line.trim();

    if let Some(inner) = body
        .strip_prefix("{account")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        return LineKind::AccountMarker(AccountId::parse(inner));
    }

    if let Some(name) = body
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        && !name.contains(['[', ']', '\t'])
    {
        let name = name.trim();
        if name.is_empty() {
            return LineKind::Malformed(ParseErrorKind::UnrecognizedLine);
        }
        return LineKind::SectionMarker(name.to_lowercase());
    }

    if let Some(flag) = body
        .strip_prefix("**")
        .and_then(|rest| rest.strip_suffix("**"))
        && !flag.trim().is_empty()
        && !flag.contains('*')
    {
        return LineKind::FlagMarker(flag.trim());
    }

    if !body.contains(':') {
        return LineKind::Malformed(ParseErrorKind::UnrecognizedLine);
    }

    let syntax = match syntax {
        Syntax::Auto => detect_syntax(line, body),
        fixed => fixed,
    };
    let (section, rest) = split_inline_section(body);
    match syntax {
        Syntax::Current => current_key_value(section, rest),
        _ => legacy_key_value(line, section, rest),
    }
}

/// Tab-indented lines with a tab inside are the current syntax.
fn detect_syntax(line: &str, body: &str) -> Syntax {
    if line.starts_with('\t') && body.contains('\t') {
        Syntax::Current
    } else {
        Syntax::Legacy
    }
}

/// Peel a leading `[section]` off a one-line key/value.
fn split_inline_section(body: &str) -> (Option<String>, &str) {
    if let Some(after) = body.strip_prefix('[')
        && let Some(end) = after.find(']')
    {
        let name = after[..end].trim();
        let rest = &after[end + 1..];
        if !name.is_empty() && rest.starts_with(char::is_whitespace) {
            return (Some(name.to_lowercase()), rest);
        }
    }
    (None, body)
}

fn current_key_value(section: Option<String>, rest: &str) -> LineKind<'_> {
    let fields: Vec<&str> = rest
        .split('\t')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect();
    let &[key, values] = fields.as_slice() else {
        return LineKind::Malformed(ParseErrorKind::MalformedKeyValue);
    };
    match key.strip_suffix(':').map(str::trim_end) {
        Some(key) if !key.is_empty() => LineKind::KeyValue(KeyValue {
            section,
            key,
            values,
            syntax: Syntax::Current,
        }),
        _ => LineKind::Malformed(ParseErrorKind::MalformedKeyValue),
    }
}

fn legacy_key_value<'a>(line: &str, section: Option<String>, rest: &'a str) -> LineKind<'a> {
    let rest = rest.trim();
    // The key ends at the first colon followed by whitespace, so keys and
    // values may hold colons of their own (`url: http://...`).
    let split = rest
        .char_indices()
        .find(|&(i, c)| c == ':' && rest[i + 1..].starts_with(char::is_whitespace));

    if let Some((colon, _)) = split {
        let key = rest[..colon].trim();
        let values = rest[colon + 1..].trim();
        if key.is_empty() {
            return LineKind::Malformed(ParseErrorKind::MalformedKeyValue);
        }
        return LineKind::KeyValue(KeyValue {
            section,
            key,
            values,
            syntax: Syntax::Legacy,
        });
    }

    if section.is_none()
        && is_legacy_section_indent(line)
        && let Some(name) = rest.strip_suffix(':').map(str::trim)
        && !name.is_empty()
    {
        return LineKind::SectionMarker(name.to_lowercase());
    }
    LineKind::Malformed(ParseErrorKind::MalformedKeyValue)
}

/// Legacy section labels sit at 3 to 5 spaces.
fn is_legacy_section_indent(line: &str) -> bool {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    (3..=5).contains(&spaces) && !line[spaces..].starts_with(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_accounts(syntax: Syntax) -> LineContext {
        LineContext {
            position: Position::InAccounts,
            syntax,
        }
    }

    fn at(position: Position) -> LineContext {
        LineContext {
            position,
            syntax: Syntax::Auto,
        }
    }

    fn key_value(kind: LineKind<'_>) -> KeyValue<'_> {
        match kind {
            LineKind::KeyValue(kv) => kv,
            other => panic!("expected key/value, got {other:?}"),
        }
    }

    #[test]
    fn test_skip_blank_and_comment() {
        let ctx = in_accounts(Syntax::Auto);
        assert_eq!(classify("", &ctx), LineKind::Skip);
        assert_eq!(classify(" \t ", &ctx), LineKind::Skip);
        assert_eq!(classify("  # note", &ctx), LineKind::Skip);
    }

    #[test]
    fn test_rulers() {
        let ctx = in_accounts(Syntax::Auto);
        assert_eq!(classify(&"=".repeat(20), &ctx), LineKind::TopRuler);
        assert_eq!(classify(&"-".repeat(70), &ctx), LineKind::SubRuler);
        assert!(!is_ruler(&"=".repeat(19), '='));
    }

    #[test]
    fn test_sub_ruler_before_sections_is_ignored() {
        assert_eq!(
            classify(&"-".repeat(30), &at(Position::BeforeSections)),
            LineKind::Ignored
        );
    }

    #[test]
    fn test_top_label() {
        let ctx = at(Position::AwaitTopLabel);
        assert_eq!(
            classify(">>Online", &ctx),
            LineKind::TopLabel("online".into())
        );
        assert_eq!(
            classify(">>>Online", &ctx),
            LineKind::Malformed(ParseErrorKind::ExpectedTopLabel)
        );
        assert_eq!(
            classify("Online", &ctx),
            LineKind::Malformed(ParseErrorKind::ExpectedTopLabel)
        );
    }

    #[test]
    fn test_sub_label() {
        let ctx = at(Position::AwaitSubLabel);
        assert_eq!(
            classify(">Accounts ", &ctx),
            LineKind::SubLabel("accounts".into())
        );
        assert_eq!(
            classify(">>Accounts", &ctx),
            LineKind::Malformed(ParseErrorKind::ExpectedSubLabel)
        );
    }

    #[test]
    fn test_entry_heading() {
        let ctx = in_accounts(Syntax::Auto);
        assert_eq!(
            classify("example.com:", &ctx),
            LineKind::EntryHeading("example.com")
        );
        assert_eq!(
            classify("example.com notes", &ctx),
            LineKind::Malformed(ParseErrorKind::MalformedEntryHeader)
        );
        assert_eq!(
            classify(":", &ctx),
            LineKind::Malformed(ParseErrorKind::MalformedEntryHeader)
        );
        // Only the colon is removed; the rest of the heading is kept as written.
        assert_eq!(classify("site :", &ctx), LineKind::EntryHeading("site "));
    }

    #[test]
    fn test_markers() {
        let ctx = in_accounts(Syntax::Auto);
        assert_eq!(
            classify("\t{account 2}", &ctx),
            LineKind::AccountMarker(AccountId::Number(2))
        );
        assert_eq!(
            classify("  {account}", &ctx),
            LineKind::AccountMarker(AccountId::DEFAULT)
        );
        assert_eq!(
            classify("\t[Security Questions]", &ctx),
            LineKind::SectionMarker("security questions".into())
        );
        assert_eq!(
            classify("\t**used credit card**", &ctx),
            LineKind::FlagMarker("used credit card")
        );
    }

    #[test]
    fn test_current_key_value() {
        let kv = key_value(classify("\tpassword:\ts3cret; old", &in_accounts(Syntax::Auto)));
        assert_eq!(kv.key, "password");
        assert_eq!(kv.values, "s3cret; old");
        assert_eq!(kv.section, None);
        assert_eq!(kv.syntax, Syntax::Current);
    }

    #[test]
    fn test_current_multiple_tabs() {
        let kv = key_value(classify("\tpin:\t\t\t1234", &in_accounts(Syntax::Current)));
        assert_eq!(kv.key, "pin");
        assert_eq!(kv.values, "1234");
    }

    #[test]
    fn test_current_inline_section() {
        let kv = key_value(classify(
            "\t[Meta]\turls:\thttps://example.com",
            &in_accounts(Syntax::Current),
        ));
        assert_eq!(kv.section.as_deref(), Some("meta"));
        assert_eq!(kv.key, "urls");
        assert_eq!(kv.values, "https://example.com");
    }

    #[test]
    fn test_current_rejects_space_delimited() {
        assert_eq!(
            classify("\tuser: bob", &in_accounts(Syntax::Current)),
            LineKind::Malformed(ParseErrorKind::MalformedKeyValue)
        );
    }

    #[test]
    fn test_legacy_key_value() {
        let kv = key_value(classify("  url: http://example.com", &in_accounts(Syntax::Auto)));
        assert_eq!(kv.key, "url");
        assert_eq!(kv.values, "http://example.com");
        assert_eq!(kv.syntax, Syntax::Legacy);
    }

    #[test]
    fn test_legacy_tab_indent_without_inner_tab() {
        let kv = key_value(classify("\tuser: bob", &in_accounts(Syntax::Auto)));
        assert_eq!(kv.syntax, Syntax::Legacy);
        assert_eq!(kv.key, "user");
    }

    #[test]
    fn test_legacy_inline_section() {
        let kv = key_value(classify("  [meta] keys: alpha", &in_accounts(Syntax::Legacy)));
        assert_eq!(kv.section.as_deref(), Some("meta"));
        assert_eq!(kv.key, "keys");
    }

    #[test]
    fn test_legacy_section_label() {
        let ctx = in_accounts(Syntax::Legacy);
        assert_eq!(
            classify("    Security questions:", &ctx),
            LineKind::SectionMarker("security questions".into())
        );
        assert_eq!(
            classify("  notes:", &ctx),
            LineKind::Malformed(ParseErrorKind::MalformedKeyValue)
        );
    }

    #[test]
    fn test_unrecognized_body() {
        assert_eq!(
            classify("\tjust some words", &in_accounts(Syntax::Auto)),
            LineKind::Malformed(ParseErrorKind::UnrecognizedLine)
        );
    }

    #[test]
    fn test_outside_accounts() {
        assert_eq!(
            classify("\tuser:\tbob", &at(Position::OutsideAccounts)),
            LineKind::Ignored
        );
    }
}
