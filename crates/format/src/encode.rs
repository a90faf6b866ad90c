//! Token encoding for safe embedding
//!
//! The inverse of tokenization: given a cell value, produce text that the
//! tokenizer reads back as exactly that one token. Values containing blank
//! characters, `#`, or `"` are wrapped in quotes with inner quotes escaped;
//! the empty value encodes as `""`.

/// Characters that force a value into quoted form
fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|ch| matches!(ch, ' ' | '\n' | '\t' | '\x0B' | '\r' | '\x0C' | '#' | '"'))
}

/// Encode one cell value for embedding in a record line
///
/// One corner of the grammar is unrepresentable: inside a quoted region a
/// backslash immediately before the closing quote always reads back as an
/// escaped quote, so a quoted value cannot end in a backslash. Such values
/// round-trip only when they need no quoting.
///
/// # Example
///
/// ```
/// use condb_format::{encode, lexical_split};
///
/// assert_eq!(encode("123"), "123");
/// assert_eq!(encode("John Smith"), "\"John Smith\"");
/// assert_eq!(lexical_split(&encode("say \"hi\"")), vec!["say \"hi\""]);
/// ```
pub fn encode(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Decode one encoded cell value
///
/// Strips one level of surrounding quotes and unescapes `\"`. Unquoted
/// input is returned unchanged, so `decode(encode(v)) == v` for any value
/// without embedded newlines.
pub fn decode(encoded: &str) -> String {
    let inner = match encoded.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"').unwrap_or(rest),
        None => return encoded.to_string(),
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            let mut probe = chars.clone();
            if probe.next() == Some('"') {
                out.push('"');
                chars = probe;
                continue;
            }
        }
        out.push(ch);
    }
    out
}
