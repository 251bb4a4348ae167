//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program-level loop.
//! The parser keeps a two-token window (current + peek) over a
//! [`TokenSource`] and dispatches through the shared [`Lookups`] tables:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//!
//! Errors never abort a parse. Routines record a diagnostic where the
//! problem is found and hand back `None` in place of the node; the enclosing
//! operator chain keeps going and the statement is dropped at the end.

use std::mem;

use tracing::{debug, warn};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::{Lexer, TokenSource},
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    lookups::{binding_power, BindingPower, LEDLookup, Lookups, NUDLookup, StmtLookup, LOOKUPS},
    stmt::parse_stmt,
};

/// Deepest expression nesting accepted before parsing gives up on a statement.
pub const MAX_EXPR_DEPTH: usize = 128;

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Where tokens are pulled from, one at a time
    source: Box<dyn TokenSource>,
    /// The token being parsed
    current: Token,
    /// One token of lookahead
    peek: Token,
    /// Statement, NUD and LED routines
    lookups: &'static Lookups,
    /// Errors recorded so far, in the order they were found
    errors: Vec<Error>,
    /// Current `parse_expr` recursion depth
    depth: usize,
    /// Set after a nesting overflow; silences errors until the statement ends
    bailing: bool,
}

impl Parser {
    /// Creates a parser over `source` and fills the current/peek window.
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Parser::with_lookups(source, &*LOOKUPS)
    }

    /// Creates a parser that dispatches through a caller-supplied routine table.
    pub fn with_lookups(source: impl TokenSource + 'static, lookups: &'static Lookups) -> Self {
        let mut source: Box<dyn TokenSource> = Box::new(source);
        let current = source.next_token();
        let peek = source.next_token();

        Parser {
            source,
            current,
            peek,
            lookups,
            errors: vec![],
            depth: 0,
            bailing: false,
        }
    }

    /// Creates a parser that lexes `source` on demand.
    pub fn from_source(source: String, file: Option<String>) -> Self {
        Parser::new(Lexer::new(source, file))
    }

    /// Shifts the window forward by one token.
    pub fn next_token(&mut self) {
        let next = self.source.next_token();
        self.current = mem::replace(&mut self.peek, next);
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek.kind
    }

    pub fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    pub fn current_binding_power(&self) -> BindingPower {
        binding_power(self.current.kind)
    }

    pub fn peek_binding_power(&self) -> BindingPower {
        binding_power(self.peek.kind)
    }

    /// Advances onto the peek token if it is of kind `expected_kind`.
    ///
    /// # Returns
    ///
    /// The token that became current, or `None` after recording an
    /// `UnexpectedToken` error. The window does not move on failure.
    pub fn expect_peek(&mut self, expected_kind: TokenKind) -> Option<Token> {
        if self.peek_is(expected_kind) {
            self.next_token();
            return Some(self.current.clone());
        }

        self.record(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: expected_kind,
                found: self.peek.kind,
            },
            self.peek.span.start.clone(),
        ));
        None
    }

    /// Enters one level of expression nesting.
    ///
    /// Past [`MAX_EXPR_DEPTH`] this records a `NestingTooDeep` error, skips to
    /// the end of the statement and returns `None`. Callers must pair a
    /// successful call with [`Parser::exit_nesting`].
    pub fn enter_nesting(&mut self) -> Option<()> {
        if self.bailing {
            return None;
        }

        if self.depth >= MAX_EXPR_DEPTH {
            self.record(Error::new(
                ErrorImpl::NestingTooDeep {
                    limit: MAX_EXPR_DEPTH,
                },
                self.get_position(),
            ));
            self.bailing = true;
            while !self.peek_is(TokenKind::Semicolon) && !self.peek_is(TokenKind::EOF) {
                self.next_token();
            }
            return None;
        }

        self.depth += 1;
        Some(())
    }

    pub fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    /// Position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.span.start.clone()
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &'static StmtLookup {
        let lookups: &'static Lookups = self.lookups;
        lookups.get_stmt_lookup()
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &'static NUDLookup {
        let lookups: &'static Lookups = self.lookups;
        lookups.get_nud_lookup()
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &'static LEDLookup {
        let lookups: &'static Lookups = self.lookups;
        lookups.get_led_lookup()
    }

    /// Errors recorded so far. Empty when the input parsed cleanly.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.to_string()).collect()
    }

    /// Appends `error` to the error list. Errors raised while unwinding from a
    /// nesting overflow are dropped.
    pub fn record(&mut self, error: Error) {
        if self.bailing {
            return;
        }

        warn!(
            error = %error,
            offset = error.get_position().0,
            file = %error.get_position().1,
            "parse error"
        );
        self.errors.push(error);
    }

    /// Parses statements until end-of-input.
    ///
    /// Always returns a program. A statement that fails to parse is left out
    /// (its errors are already recorded) and parsing resumes at the following
    /// token.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.current_is(TokenKind::EOF) {
            if let Some(stmt) = parse_stmt(self) {
                debug!(%stmt, "parsed statement");
                program.statements.push(stmt);
            }
            self.bailing = false;
            self.depth = 0;
            self.next_token();
        }

        debug!(
            statements = program.statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        program
    }
}

/// Parses a whole source text.
///
/// This is the main entry point for parsing: it lexes `source` on demand,
/// runs [`Parser::parse_program`] and hands back the program together with
/// every error recorded along the way.
pub fn parse(source: String, file: Option<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::from_source(source, file);
    let program = parser.parse_program();

    (program, parser.errors)
}
