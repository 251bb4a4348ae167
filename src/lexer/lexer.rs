use std::{collections::VecDeque, sync::Arc};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Anything the parser can pull tokens from.
///
/// Once the input is exhausted an implementation must keep returning an
/// `EOF` token on every call.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

// Two-character operators must come before their one-character prefixes.
lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^//[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assign, "=") },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Bang, "!") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Minus, "-") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Asterisk, "*") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
    ];
}

/// Regex-driven scanner that produces tokens on demand.
pub struct Lexer {
    pending: VecDeque<Token>,
    source: String,
    pos: usize,
    file: Arc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Arc::new(file)
        } else {
            Arc::new(String::from("shell"))
        };

        Lexer {
            pending: VecDeque::new(),
            source,
            pos: 0,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.pending.push_back(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Arc::clone(&self.file))
    }

    /// Span of the next `len` bytes starting at the current position.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + len) as u32, Arc::clone(&self.file)),
        }
    }

    /// Runs the first matching pattern, or emits an `Illegal` token for one character.
    fn scan(&mut self) {
        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(self.remainder()) {
                (pattern.handler)(self, &pattern.regex);
                return;
            }
        }

        let illegal = self.remainder().chars().next().map(String::from).unwrap_or_default();
        let len = illegal.len();
        let span = self.span_of(len);
        self.push(MK_TOKEN!(TokenKind::Illegal, illegal, span));
        self.advance_n(len);
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Token {
        while self.pending.is_empty() && !self.at_eof() {
            self.scan();
        }

        match self.pending.pop_front() {
            Some(token) => {
                trace!(token = %token, "scanned");
                token
            }
            None => MK_TOKEN!(TokenKind::EOF, String::new(), self.span_of(0)),
        }
    }
}

fn matched_len(lexer: &Lexer, regex: &Regex) -> usize {
    regex.find(lexer.remainder()).map(|m| m.end()).unwrap_or(0)
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let matched = lexer.remainder()[..len].to_string();

    let span = lexer.span_of(len);
    lexer.push(MK_TOKEN!(TokenKind::Int, matched, span));
    lexer.advance_n(len);
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    lexer.advance_n(len);
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let value = lexer.remainder()[..len].to_string();
    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let span = lexer.span_of(len);
    lexer.push(MK_TOKEN!(kind, value, span));
    lexer.advance_n(len);
}

/// Replays an already-lexed token list as a [`TokenSource`].
pub struct TokenStream {
    tokens: VecDeque<Token>,
    eof: Token,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof = tokens
            .iter()
            .rev()
            .find(|token| token.kind == TokenKind::EOF)
            .cloned()
            .unwrap_or_else(|| {
                let end = tokens
                    .last()
                    .map(|token| token.span.end.clone())
                    .unwrap_or_else(Position::null);
                MK_TOKEN!(TokenKind::EOF, String::new(), Span { start: end.clone(), end })
            });

        TokenStream {
            tokens: tokens.into(),
            eof,
        }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Token {
        match self.tokens.pop_front() {
            Some(token) if token.kind != TokenKind::EOF => token,
            _ => {
                self.tokens.clear();
                self.eof.clone()
            }
        }
    }
}

/// Lexes a whole source into a token list terminated by a single `EOF`.
pub fn tokenize(source: String, file: Option<String>) -> Vec<Token> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
