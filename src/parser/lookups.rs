use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, lowest to highest.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Lowest,
    Equals,
    Comparison,
    Sum,
    Product,
    Prefix,
    Call,
}

lazy_static! {
    static ref BINDING_POWERS: HashMap<TokenKind, BindingPower> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Equals, BindingPower::Equals);
        map.insert(TokenKind::NotEquals, BindingPower::Equals);
        map.insert(TokenKind::Less, BindingPower::Comparison);
        map.insert(TokenKind::Greater, BindingPower::Comparison);
        map.insert(TokenKind::Plus, BindingPower::Sum);
        map.insert(TokenKind::Minus, BindingPower::Sum);
        map.insert(TokenKind::Asterisk, BindingPower::Product);
        map.insert(TokenKind::Slash, BindingPower::Product);
        map.insert(TokenKind::OpenParen, BindingPower::Call);
        map
    };

    /// Routine registries shared by every parser.
    pub static ref LOOKUPS: Lookups = create_token_lookups();
}

/// Binding power of `kind` when it appears in operator position.
pub fn binding_power(kind: TokenKind) -> BindingPower {
    BINDING_POWERS
        .get(&kind)
        .copied()
        .unwrap_or(BindingPower::Lowest)
}

// Handlers record their own errors and return `None` for a null node. A LED
// handler receives `None` as its left operand when that operand failed.
pub type StmtHandler = fn(&mut Parser) -> Option<Stmt>;
pub type NUDHandler = fn(&mut Parser) -> Option<Expr>;
pub type LEDHandler = fn(&mut Parser, Option<Expr>, BindingPower) -> Option<Expr>;

pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;

/// Per-token-kind parse routines. Read-only once built.
#[derive(Default)]
pub struct Lookups {
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
}

impl Lookups {
    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, led_fn: LEDHandler) {
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token. Unregistered kinds fall back
    /// to expression statements.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }
}

pub fn create_token_lookups() -> Lookups {
    let mut lookups = Lookups::default();

    // Equality and relational
    lookups.led(TokenKind::Equals, parse_binary_expr);
    lookups.led(TokenKind::NotEquals, parse_binary_expr);
    lookups.led(TokenKind::Less, parse_binary_expr);
    lookups.led(TokenKind::Greater, parse_binary_expr);

    // Additive and multiplicative
    lookups.led(TokenKind::Plus, parse_binary_expr);
    lookups.led(TokenKind::Minus, parse_binary_expr);
    lookups.led(TokenKind::Asterisk, parse_binary_expr);
    lookups.led(TokenKind::Slash, parse_binary_expr);

    lookups.led(TokenKind::OpenParen, parse_call_expr);

    // Literals and symbols
    lookups.nud(TokenKind::Identifier, parse_primary_expr);
    lookups.nud(TokenKind::Int, parse_primary_expr);
    lookups.nud(TokenKind::True, parse_primary_expr);
    lookups.nud(TokenKind::False, parse_primary_expr);
    lookups.nud(TokenKind::Bang, parse_prefix_expr);
    lookups.nud(TokenKind::Minus, parse_prefix_expr);
    lookups.nud(TokenKind::OpenParen, parse_grouping_expr);
    lookups.nud(TokenKind::If, parse_if_expr);
    lookups.nud(TokenKind::Function, parse_fn_expr);

    // Statements
    lookups.stmt(TokenKind::Let, parse_let_stmt);
    lookups.stmt(TokenKind::Return, parse_return_stmt);

    lookups
}
