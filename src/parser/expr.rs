use tracing::trace;

use crate::{
    ast::expressions::{
        BooleanExpr, CallExpr, Expr, FunctionExpr, IdentifierExpr, IfExpr, InfixExpr,
        IntegerExpr, PrefixExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block_stmt};

/// Parses the expression starting at the current token.
///
/// Infix operators are folded into `left` while the peek token binds tighter
/// than `bp`. On return the current token is the last token of the expression.
/// `None` means an error was recorded somewhere inside; the operator chain is
/// still consumed so the caller resumes after the whole expression.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Option<Expr> {
    parser.enter_nesting()?;
    let expr = parse_expr_at(parser, bp);
    parser.exit_nesting();
    expr
}

fn parse_expr_at(parser: &mut Parser, bp: BindingPower) -> Option<Expr> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        let error = Error::new(
            ErrorImpl::NoPrefixParseFn { kind: token_kind },
            parser.get_position(),
        );
        parser.record(error);
        return None;
    };

    let mut left = nud(parser);

    // While the upcoming operator binds tighter than bp, keep extending lhs
    while !parser.peek_is(TokenKind::Semicolon) && parser.peek_binding_power() > bp {
        let Some(led) = parser.get_led_lookup().get(&parser.peek_token_kind()).copied() else {
            break;
        };

        trace!(operator = %parser.peek_token_kind(), ?bp, "folding infix");
        parser.next_token();
        let operator_bp = parser.current_binding_power();
        left = led(parser, left, operator_bp);
    }

    left
}

pub fn parse_primary_expr(parser: &mut Parser) -> Option<Expr> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Int => match token.value.parse::<i64>() {
            Ok(value) => Some(Expr::Integer(IntegerExpr { token, value })),
            Err(_) => {
                parser.record(Error::new(
                    ErrorImpl::IntegerParseError {
                        literal: token.value.clone(),
                    },
                    token.span.start.clone(),
                ));
                None
            }
        },
        TokenKind::Identifier => Some(Expr::Identifier(IdentifierExpr {
            value: token.value.clone(),
            token,
        })),
        TokenKind::True | TokenKind::False => Some(Expr::Boolean(BooleanExpr {
            value: token.kind == TokenKind::True,
            token,
        })),
        _ => {
            parser.record(Error::new(
                ErrorImpl::NoPrefixParseFn { kind: token.kind },
                token.span.start.clone(),
            ));
            None
        }
    }
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Option<Expr> {
    let operator_token = parser.current_token().clone();
    parser.next_token();
    let rhs = parse_expr(parser, BindingPower::Prefix)?;

    Some(Expr::Prefix(PrefixExpr {
        operator: operator_token.value.clone(),
        token: operator_token,
        right: Box::new(rhs),
    }))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Option<Expr>,
    bp: BindingPower,
) -> Option<Expr> {
    let operator_token = parser.current_token().clone();
    parser.next_token();
    // The right operand is parsed even when the left one failed.
    let right = parse_expr(parser, bp);

    Some(Expr::Infix(InfixExpr {
        operator: operator_token.value.clone(),
        token: operator_token,
        left: Box::new(left?),
        right: Box::new(right?),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Option<Expr> {
    parser.next_token();
    let expr = parse_expr(parser, BindingPower::Lowest);
    parser.expect_peek(TokenKind::CloseParen)?;

    expr
}

pub fn parse_if_expr(parser: &mut Parser) -> Option<Expr> {
    // if (<condition>) { ... } else { ... }
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::OpenParen)?;
    parser.next_token();
    let condition = parse_expr(parser, BindingPower::Lowest);
    parser.expect_peek(TokenKind::CloseParen)?;

    parser.expect_peek(TokenKind::OpenCurly)?;
    let consequence = parse_block_stmt(parser)?;

    let alternative = if parser.peek_is(TokenKind::Else) {
        parser.next_token();
        parser.expect_peek(TokenKind::OpenCurly)?;
        Some(parse_block_stmt(parser)?)
    } else {
        None
    };

    Some(Expr::If(IfExpr {
        token,
        condition: Box::new(condition?),
        consequence,
        alternative,
    }))
}

pub fn parse_fn_expr(parser: &mut Parser) -> Option<Expr> {
    // fn(a, b) { ... }
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    if parser.peek_is(TokenKind::CloseParen) {
        parser.next_token();
    } else {
        loop {
            let name = parser.expect_peek(TokenKind::Identifier)?;
            parameters.push(IdentifierExpr {
                value: name.value.clone(),
                token: name,
            });

            if !parser.peek_is(TokenKind::Comma) {
                break;
            }
            parser.next_token();
        }
        parser.expect_peek(TokenKind::CloseParen)?;
    }

    parser.expect_peek(TokenKind::OpenCurly)?;
    let body = parse_block_stmt(parser)?;

    Some(Expr::Function(FunctionExpr {
        token,
        parameters,
        body,
    }))
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Option<Expr>,
    _bp: BindingPower,
) -> Option<Expr> {
    // <callee>(<arg>, ...)
    let token = parser.current_token().clone();

    let mut arguments = vec![];
    let mut arguments_ok = true;
    if parser.peek_is(TokenKind::CloseParen) {
        parser.next_token();
    } else {
        parser.next_token();
        let arg = parse_expr(parser, BindingPower::Lowest);
        arguments_ok &= arg.is_some();
        arguments.extend(arg);

        while parser.peek_is(TokenKind::Comma) {
            parser.next_token();
            parser.next_token();
            let arg = parse_expr(parser, BindingPower::Lowest);
            arguments_ok &= arg.is_some();
            arguments.extend(arg);
        }
        parser.expect_peek(TokenKind::CloseParen)?;
    }

    if !arguments_ok {
        return None;
    }

    Some(Expr::Call(CallExpr {
        token,
        function: Box::new(left?),
        arguments,
    }))
}
