//! Record tokenizer for the flat-file data format
//!
//! Splits one record line into lexical tokens:
//! 1) `"quoted values"` form one token,
//! 2) `#` outside a quoted region starts a comment running to end of line,
//! 3) blank characters (space, newline, tab, vertical tab, carriage
//!    return, form feed) separate tokens and are otherwise skipped.
//!
//! Parse-time inconsistencies are handled, not rejected:
//! - No ending quote: the quoted value is taken up to the end of the line.
//! - Comment symbol inside a quoted region is literal text, so a record
//!   holding `"info #4"` reads back as the string `info #4`.
//! - Stuck fragments: with no whitespace between symbols and quotes
//!   everything merges into one token. `John" Smith"` and `John" "Smith`
//!   both parse as the single value `John Smith`. Beware of the same rule
//!   applying to numbers: `5.14"Smith"` parses as one value `5.14Smith`,
//!   which usually means a forgotten column separator.

/// Blank characters that separate tokens
const BLANK_CHARACTERS: &[char] = &[' ', '\n', '\t', '\x0B', '\r', '\x0C'];

#[inline]
fn is_blank(ch: char) -> bool {
    BLANK_CHARACTERS.contains(&ch)
}

/// Lazy tokenizer over one record line
///
/// A `Tokenizer` is a finite iterator of owned tokens. It is `Clone`, so a
/// consumer can remember a position and restart from it; creating a new
/// tokenizer over the same line restarts from the beginning.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    chars: std::str::Chars<'a>,
}

impl<'a> Tokenizer<'a> {
    /// Tokenize one record line
    pub fn new(line: &'a str) -> Self {
        Tokenizer {
            chars: line.chars(),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        // skip separating blanks
        loop {
            let mut probe = self.chars.clone();
            match probe.next() {
                Some(ch) if is_blank(ch) => self.chars = probe,
                Some('#') => return None, // comment runs to end of line
                Some(_) => break,
                None => return None,
            }
        }

        let mut token = String::new();
        let mut in_quotes = false;

        loop {
            let mut probe = self.chars.clone();
            let Some(ch) = probe.next() else {
                // end of line: an open quote is closed implicitly
                break;
            };

            if in_quotes {
                match ch {
                    '"' => in_quotes = false,
                    '\\' => {
                        // only `\"` is an escape; anything else is literal
                        let mut after = probe.clone();
                        if after.next() == Some('"') {
                            token.push('"');
                            probe = after;
                        } else {
                            token.push('\\');
                        }
                    }
                    _ => token.push(ch),
                }
                self.chars = probe;
                continue;
            }

            match ch {
                '"' => {
                    in_quotes = true;
                    self.chars = probe;
                }
                '#' => break, // token ends; comment consumed on next call
                ch if is_blank(ch) => break,
                ch => {
                    token.push(ch);
                    self.chars = probe;
                }
            }
        }

        Some(token)
    }
}

/// Tokenize one record line
///
/// # Example
///
/// ```
/// use condb_format::tokenize;
///
/// let tokens: Vec<String> = tokenize("\"John Smith\" 123 #note").collect();
/// assert_eq!(tokens, vec!["John Smith", "123"]);
/// ```
pub fn tokenize(line: &str) -> Tokenizer<'_> {
    Tokenizer::new(line)
}

/// Tokenize one record line into a vector
pub fn lexical_split(line: &str) -> Vec<String> {
    tokenize(line).collect()
}

/// Tokenize a multi-line text, concatenating the tokens of every line
///
/// Comments still end at their line. Consumers group the flat token
/// sequence into rows using the table's column count.
pub fn tokenize_text(text: &str) -> Vec<String> {
    text.lines().flat_map(tokenize).collect()
}
