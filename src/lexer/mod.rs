//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into tokens for the parser. It handles:
//!
//! - Tokenization of source text using anchored regex patterns
//! - Recognition of keywords, identifiers, integer literals and operators
//! - Token position tracking for error reporting
//! - Comments and whitespace handling
//!
//! Tokens are pulled one at a time through the [`lexer::TokenSource`] trait.

pub mod lexer;
pub mod tokens;
