//! Values and the escape-aware value splitter.
//!
//! A value field looks like `text **flag** **other flag**`. Fields are
//! separated by `;`, and `\;` / `\\` stand for a literal `;` / `\`.

use std::fmt;

use indexmap::IndexSet;

use crate::ParseErrorKind;

/// A single datum plus its boolean flags.
///
/// Equality compares the text *and* the flag set (flag order is ignored).
/// Use [`Value::text_eq`] when flags should not count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    /// The display text, with flag annotations removed.
    pub text: String,
    /// Flags in declaration order.
    pub flags: IndexSet<String>,
}

impl Value {
    /// Create a value with no flags.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flags: IndexSet::new(),
        }
    }

    /// Create a value with the given flags.
    pub fn with_flags<I, S>(text: impl Into<String>, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// The display text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether `flag` is set.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Compare texts only, ignoring flags.
    pub fn text_eq(&self, other: &Value) -> bool {
        self.text == other.text
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::new(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::new(text)
    }
}

/// Split a raw value field into values.
///
/// Splits on unescaped `;`, trims each field and pulls out its `**flag**`
/// annotations. A field holding nothing but flags attaches them to the
/// value before it, so `s3cret; **used credit card**` is one flagged value.
pub fn split_values(raw: &str) -> Result<Vec<Value>, ParseErrorKind> {
    let mut values: Vec<Value> = Vec::new();
    for field in split_unescaped(raw) {
        let value = parse_field(&field)?;
        if value.text.is_empty()
            && !value.flags.is_empty()
            && let Some(previous) = values.last_mut()
        {
            previous.flags.extend(value.flags);
            continue;
        }
        values.push(value);
    }
    Ok(values)
}

fn split_unescaped(raw: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ (';' | '\\')) => current.push(next),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ';' => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_field(field: &str) -> Result<Value, ParseErrorKind> {
    let field = field.trim();
    if !field.contains("**") {
        return Ok(Value::new(field));
    }

    let mut pieces = Vec::new();
    let mut flags = IndexSet::new();
    let mut rest = field;
    while let Some(open) = rest.find("**") {
        let before = &rest[..open];
        // `**` must start a word: `pass**word**` is not a flag.
        if !before.is_empty() && !before.ends_with(char::is_whitespace) {
            return Err(ParseErrorKind::UnbalancedFlagMarkup);
        }
        let inner = &rest[open + 2..];
        let close = inner
            .find("**")
            .ok_or(ParseErrorKind::UnbalancedFlagMarkup)?;
        let flag = inner[..close].trim();
        if flag.is_empty() || flag.contains('*') {
            return Err(ParseErrorKind::UnbalancedFlagMarkup);
        }
        rest = &inner[close + 2..];
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return Err(ParseErrorKind::UnbalancedFlagMarkup);
        }
        pieces.push(before.trim());
        flags.insert(flag.to_string());
    }
    pieces.push(rest.trim());

    let text = pieces
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Value { text, flags })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[Value]) -> Vec<&str> {
        values.iter().map(Value::as_str).collect()
    }

    #[test]
    fn test_plain_values() {
        let values = split_values("alice; bob ;carol").unwrap();
        assert_eq!(texts(&values), ["alice", "bob", "carol"]);
    }

    #[test]
    fn test_escaped_semicolon() {
        let values = split_values("a\\;b; c").unwrap();
        assert_eq!(texts(&values), ["a;b", "c"]);
    }

    #[test]
    fn test_escaped_backslash() {
        let values = split_values(r"C:\\temp\\; x").unwrap();
        assert_eq!(texts(&values), [r"C:\temp\", "x"]);
    }

    #[test]
    fn test_lone_backslash_is_literal() {
        let values = split_values(r"a\b").unwrap();
        assert_eq!(texts(&values), [r"a\b"]);
    }

    #[test]
    fn test_trailing_flag() {
        let values = split_values("secret **used credit card**; plain").unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].text, "secret");
        assert!(values[0].has_flag("used credit card"));
        assert_eq!(values[0].flags.len(), 1);
        assert_eq!(values[1].text, "plain");
        assert!(values[1].flags.is_empty());
    }

    #[test]
    fn test_multiple_flags() {
        let values = split_values("hunter2 **old** **shared**").unwrap();
        assert_eq!(values[0].text, "hunter2");
        let flags: Vec<_> = values[0].flags.iter().map(String::as_str).collect();
        assert_eq!(flags, ["old", "shared"]);
    }

    #[test]
    fn test_flag_only_field_attaches_to_previous() {
        let values = split_values("s3cret; **used credit card**").unwrap();
        assert_eq!(values, [Value::with_flags("s3cret", ["used credit card"])]);
    }

    #[test]
    fn test_flag_only_first_field() {
        let values = split_values("**expired**").unwrap();
        assert_eq!(values, [Value::with_flags("", ["expired"])]);
    }

    #[test]
    fn test_single_stars_are_text() {
        let values = split_values("p*ss*word").unwrap();
        assert_eq!(texts(&values), ["p*ss*word"]);
    }

    #[test]
    fn test_unclosed_flag() {
        assert_eq!(
            split_values("secret **used"),
            Err(ParseErrorKind::UnbalancedFlagMarkup)
        );
    }

    #[test]
    fn test_empty_flag() {
        assert_eq!(
            split_values("secret ****"),
            Err(ParseErrorKind::UnbalancedFlagMarkup)
        );
    }

    #[test]
    fn test_glued_flag() {
        assert_eq!(
            split_values("pass**word**"),
            Err(ParseErrorKind::UnbalancedFlagMarkup)
        );
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let values = split_values("a;;b").unwrap();
        assert_eq!(texts(&values), ["a", "", "b"]);
    }

    #[test]
    fn test_flags_ignored_by_text_eq() {
        let plain = Value::new("x");
        let flagged = Value::with_flags("x", ["old"]);
        assert!(plain.text_eq(&flagged));
        assert_ne!(plain, flagged);
    }
}
