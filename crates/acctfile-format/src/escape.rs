//! Escaping for value fields.

use std::borrow::Cow;

use acctfile_parse::Value;

/// Escape `\` and `;` so the text reads back as a single value.
pub fn escape_value(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', ';']) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Render one value with its flags appended as `**flag**`.
pub fn format_value(value: &Value) -> String {
    let mut out = escape_value(&value.text).into_owned();
    for flag in &value.flags {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str("**");
        out.push_str(&escape_value(flag));
        out.push_str("**");
    }
    out
}

/// Render a value list, joined by `separator`.
pub fn format_values(values: &[Value], separator: &str) -> String {
    values
        .iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(separator)
}
