//! Text data format for constants tables
//!
//! This crate owns the lexical layer of the flat-file data format:
//! tokenization of one record line into string tokens (quoting, comments,
//! escaping) and the inverse encoding of a token for safe embedding.
//!
//! The grammar is authoritative here:
//!
//! ```text
//! record    := token* comment?
//! token     := bareword | quoted
//! bareword  := any run of non-blank, non-'#', non-'"' characters
//! quoted    := '"' ( '\"' | any-char-except-unescaped-'"' )* '"'?
//! comment   := '#' any-char-to-end-of-line   (ignored inside quoted)
//! ```
//!
//! Adjacent quoted/bareword fragments with no intervening whitespace merge
//! into a single token.

#![warn(clippy::all)]

pub mod encode;
pub mod lexer;

pub use encode::{decode, encode};
pub use lexer::{lexical_split, tokenize, tokenize_text, Tokenizer};
