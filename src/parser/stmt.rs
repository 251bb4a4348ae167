use crate::{
    ast::{
        expressions::{Expr, IdentifierExpr},
        statements::{BlockStmt, ExpressionStmt, LetStmt, ReturnStmt, Stmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

/// Dispatches on the current token. Kinds without a statement handler start
/// an expression statement.
pub fn parse_stmt(parser: &mut Parser) -> Option<Stmt> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

/// Consumes an optional trailing `;`.
fn skip_semicolon(parser: &mut Parser) {
    if parser.peek_is(TokenKind::Semicolon) {
        parser.next_token();
    }
}

/// Parses a statement's expression and its optional `;`. The `;` is consumed
/// even when the expression fails so it is not reported a second time.
fn parse_terminated_expr(parser: &mut Parser) -> Option<Expr> {
    let expr = parse_expr(parser, BindingPower::Lowest);
    skip_semicolon(parser);
    expr
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Option<Stmt> {
    let token = parser.current_token().clone();
    let expression = parse_terminated_expr(parser)?;

    Some(Stmt::Expression(ExpressionStmt { token, expression }))
}

pub fn parse_let_stmt(parser: &mut Parser) -> Option<Stmt> {
    let token = parser.current_token().clone();

    let name_token = parser.expect_peek(TokenKind::Identifier)?;
    let name = IdentifierExpr {
        value: name_token.value.clone(),
        token: name_token,
    };

    parser.expect_peek(TokenKind::Assign)?;
    parser.next_token();
    let value = parse_terminated_expr(parser)?;

    Some(Stmt::Let(LetStmt { token, name, value }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Option<Stmt> {
    let token = parser.current_token().clone();

    parser.next_token();
    let value = parse_terminated_expr(parser)?;

    Some(Stmt::Return(ReturnStmt { token, value }))
}

/// Parses `{ ... }` with the current token on the opening brace. Leaves the
/// closing brace as the current token. Statements that fail inside the block
/// are dropped and parsing carries on with the next one.
pub fn parse_block_stmt(parser: &mut Parser) -> Option<BlockStmt> {
    let token = parser.current_token().clone();
    parser.next_token();

    let mut statements = Vec::new();
    while !parser.current_is(TokenKind::CloseCurly) {
        if parser.current_is(TokenKind::EOF) {
            let error = Error::new(
                ErrorImpl::UnexpectedToken {
                    expected: TokenKind::CloseCurly,
                    found: TokenKind::EOF,
                },
                parser.get_position(),
            );
            parser.record(error);
            return None;
        }

        statements.extend(parse_stmt(parser));
        parser.next_token();
    }

    Some(BlockStmt { token, statements })
}
