//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language's constructs:
//! - Let, return and expression statements
//! - Literals, prefix and infix expressions
//! - Operator precedence and associativity
//! - Conditionals, function literals and calls
//! - Error collection and forward progress on malformed input

use std::thread;

use crate::{
    ast::{
        ast::{Node, Program},
        expressions::Expr,
        statements::Stmt,
    },
    lexer::{
        lexer::{tokenize, TokenStream},
        tokens::TokenKind,
    },
};

use super::{
    expr::parse_primary_expr,
    lookups::{binding_power, BindingPower, Lookups},
    parser::{parse, Parser, MAX_EXPR_DEPTH},
};

fn parse_source(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::from_source(source.to_string(), Some("test.mk".to_string()));
    let program = parser.parse_program();
    let errors = parser.error_messages();
    (program, errors)
}

fn parse_ok(source: &str) -> Program {
    let (program, errors) = parse_source(source);
    assert!(errors.is_empty(), "parser errors for {:?}: {:?}", source, errors);
    program
}

fn single_expr(program: &Program) -> &Expr {
    assert_eq!(program.len(), 1, "expected one statement, got {}", program);
    match &program.statements[0] {
        Stmt::Expression(stmt) => &stmt.expression,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

fn assert_integer(expr: &Expr, expected: i64) {
    match expr {
        Expr::Integer(int) => {
            assert_eq!(int.value, expected);
            assert_eq!(int.token_literal(), expected.to_string());
        }
        other => panic!("expected integer {}, got {:?}", expected, other),
    }
}

fn assert_identifier(expr: &Expr, expected: &str) {
    match expr {
        Expr::Identifier(ident) => {
            assert_eq!(ident.value, expected);
            assert_eq!(ident.token_literal(), expected);
        }
        other => panic!("expected identifier {}, got {:?}", expected, other),
    }
}

#[test]
fn test_parse_let_statements() {
    let program = parse_ok("let x = 5;\nlet y = 10;\nlet foobar = 838383;\n");

    assert_eq!(program.len(), 3);
    for (stmt, (name, value)) in program
        .iter()
        .zip([("x", 5), ("y", 10), ("foobar", 838383)])
    {
        assert_eq!(stmt.token_literal(), "let");
        match stmt {
            Stmt::Let(let_stmt) => {
                assert_eq!(let_stmt.name.value, name);
                assert_eq!(let_stmt.name.token_literal(), name);
                assert_integer(&let_stmt.value, value);
            }
            other => panic!("expected let statement, got {:?}", other),
        }
    }
}

#[test]
fn test_parse_let_statement_values() {
    let program = parse_ok("let y = true; let foobar = y");

    match &program.statements[0] {
        Stmt::Let(stmt) => assert!(matches!(&stmt.value, Expr::Boolean(b) if b.value)),
        other => panic!("expected let statement, got {:?}", other),
    }
    match &program.statements[1] {
        Stmt::Let(stmt) => assert_identifier(&stmt.value, "y"),
        other => panic!("expected let statement, got {:?}", other),
    }
}

#[test]
fn test_parse_return_statements() {
    let program = parse_ok("return 5;\nreturn 10;\nreturn 993322;\n");

    assert_eq!(program.len(), 3);
    for (stmt, value) in program.iter().zip([5, 10, 993322]) {
        assert_eq!(stmt.token_literal(), "return");
        match stmt {
            Stmt::Return(ret) => assert_integer(&ret.value, value),
            other => panic!("expected return statement, got {:?}", other),
        }
    }
}

#[test]
fn test_return_value_matches_expression_parse() {
    let returned = parse_ok("return a + b * c;");
    let bare = parse_ok("a + b * c;");

    match &returned.statements[0] {
        Stmt::Return(ret) => assert_eq!(ret.value.to_string(), single_expr(&bare).to_string()),
        other => panic!("expected return statement, got {:?}", other),
    }
}

#[test]
fn test_parse_identifier_expression() {
    for source in ["foobar", "foobar;"] {
        let program = parse_ok(source);
        assert_identifier(single_expr(&program), "foobar");
    }
}

#[test]
fn test_parse_integer_literal_expression() {
    let program = parse_ok("5;");
    let expr = single_expr(&program);

    assert_integer(expr, 5);
    assert_eq!(program.statements[0].token_literal(), "5");
}

#[test]
fn test_parse_boolean_expression() {
    for (source, expected) in [("true;", true), ("false;", false)] {
        let program = parse_ok(source);
        match single_expr(&program) {
            Expr::Boolean(b) => {
                assert_eq!(b.value, expected);
                assert_eq!(b.token_literal(), source.trim_end_matches(';'));
            }
            other => panic!("expected boolean, got {:?}", other),
        }
    }
}

#[test]
fn test_parse_prefix_expressions() {
    for (source, operator, value) in [("!5;", "!", 5), ("-15;", "-", 15)] {
        let program = parse_ok(source);
        match single_expr(&program) {
            Expr::Prefix(prefix) => {
                assert_eq!(prefix.operator, operator);
                assert_eq!(prefix.token_literal(), operator);
                assert_integer(&prefix.right, value);
            }
            other => panic!("expected prefix expression, got {:?}", other),
        }
    }

    let program = parse_ok("!true");
    assert_eq!(program.to_string(), "(!true)");
}

#[test]
fn test_parse_infix_expressions() {
    for operator in ["+", "-", "*", "/", ">", "<", "==", "!="] {
        let source = format!("5 {} 5;", operator);
        let program = parse_ok(&source);

        match single_expr(&program) {
            Expr::Infix(infix) => {
                assert_integer(&infix.left, 5);
                assert_eq!(infix.operator, operator);
                assert_integer(&infix.right, 5);
            }
            other => panic!("expected infix expression for {}, got {:?}", source, other),
        }
    }
}

#[test]
fn test_multiplication_nests_inside_addition() {
    let program = parse_ok("1 + 2 * 3");

    let Expr::Infix(sum) = single_expr(&program) else {
        panic!("expected infix expression");
    };
    assert_eq!(sum.operator, "+");
    assert_integer(&sum.left, 1);

    let Expr::Infix(product) = sum.right.as_ref() else {
        panic!("expected product on the right, got {:?}", sum.right);
    };
    assert_eq!(product.operator, "*");
    assert_integer(&product.left, 2);
    assert_integer(&product.right, 3);
}

#[test]
fn test_operator_precedence_rendering() {
    let cases = [
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("3 + 4; -5 * 5", "(3 + 4)\n((-5) * 5)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
        ("true", "true"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
        ),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
    ];

    for (source, expected) in cases {
        assert_eq!(parse_ok(source).to_string(), expected, "source: {}", source);
    }
}

#[test]
fn test_rendered_expressions_reparse_to_same_tree() {
    let sources = [
        "a + b * c - d / e",
        "-a * -b",
        "!!x == !y",
        "1 < 2 != 3 > 4",
        "-(1 + 2) * 3",
        "a - (b - c)",
        "x",
        "42",
    ];

    for source in sources {
        let first = parse_ok(source);
        let rendered = first.to_string();
        let second = parse_ok(&rendered);

        assert_eq!(second.to_string(), rendered, "source: {}", source);
        assert_eq!(
            single_expr(&second).token_literal(),
            single_expr(&first).token_literal()
        );
    }
}

#[test]
fn test_parse_if_expression() {
    let program = parse_ok("if (x < y) { x }");

    let Expr::If(if_expr) = single_expr(&program) else {
        panic!("expected if expression");
    };
    assert_eq!(if_expr.token_literal(), "if");
    assert_eq!(if_expr.condition.to_string(), "(x < y)");
    assert_eq!(if_expr.consequence.statements.len(), 1);
    match &if_expr.consequence.statements[0] {
        Stmt::Expression(stmt) => assert_identifier(&stmt.expression, "x"),
        other => panic!("expected expression statement, got {:?}", other),
    }
    assert!(if_expr.alternative.is_none());
    assert_eq!(program.to_string(), "if (x < y) { x }");
}

#[test]
fn test_parse_if_else_expression() {
    let program = parse_ok("if (flag) { x } else { let y = 1; y }");

    let Expr::If(if_expr) = single_expr(&program) else {
        panic!("expected if expression");
    };
    assert_identifier(&if_expr.condition, "flag");
    let alternative = if_expr.alternative.as_ref().expect("else branch");
    assert_eq!(alternative.statements.len(), 2);
    assert_eq!(
        program.to_string(),
        "if (flag) { x } else { let y = 1; y }"
    );
}

#[test]
fn test_parse_function_literal() {
    let program = parse_ok("fn(x, y) { x + y; }");

    let Expr::Function(function) = single_expr(&program) else {
        panic!("expected function literal");
    };
    assert_eq!(function.token_literal(), "fn");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.parameters[0].value, "x");
    assert_eq!(function.parameters[1].value, "y");
    assert_eq!(function.body.statements.len(), 1);
    assert_eq!(function.body.statements[0].to_string(), "(x + y)");
}

#[test]
fn test_parse_function_parameters() {
    let cases: [(&str, &[&str]); 3] = [
        ("fn() {};", &[]),
        ("fn(x) {};", &["x"]),
        ("fn(x, y, z) {};", &["x", "y", "z"]),
    ];

    for (source, expected) in cases {
        let program = parse_ok(source);
        let Expr::Function(function) = single_expr(&program) else {
            panic!("expected function literal for {}", source);
        };
        let names: Vec<&str> = function.parameters.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(names, expected);
    }
}

#[test]
fn test_parse_call_expression() {
    let program = parse_ok("add(1, 2 * 3, 4 + 5);");

    let Expr::Call(call) = single_expr(&program) else {
        panic!("expected call expression");
    };
    assert_eq!(call.token_literal(), "(");
    assert_identifier(&call.function, "add");
    assert_eq!(call.arguments.len(), 3);
    assert_integer(&call.arguments[0], 1);
    assert_eq!(call.arguments[1].to_string(), "(2 * 3)");
    assert_eq!(call.arguments[2].to_string(), "(4 + 5)");
}

#[test]
fn test_parse_call_on_function_literal() {
    let program = parse_ok("let r = fn(x) { x * 2 }(21);");

    assert_eq!(program.to_string(), "let r = fn(x) { (x * 2) }(21);");
}

#[test]
fn test_empty_input() {
    let (program, errors) = parse_source("");

    assert!(program.is_empty());
    assert!(errors.is_empty());
    assert_eq!(program.token_literal(), "");
}

#[test]
fn test_stray_closing_delimiter() {
    let (program, errors) = parse_source(")");

    assert!(program.is_empty());
    assert_eq!(errors, vec!["no prefix parse function for ) found"]);
}

#[test]
fn test_let_missing_assign() {
    let (program, errors) = parse_source("let x 5;");

    assert_eq!(errors, vec!["expected next token to be =, got INT instead"]);
    // Parsing resumes right after the identifier.
    assert_eq!(program.to_string(), "5");
}

#[test]
fn test_let_errors_are_collected_in_order() {
    let (program, errors) = parse_source("let = 5;\nlet x 5;\nlet 838383;\nlet ok = 1;");

    assert_eq!(
        errors,
        vec![
            "expected next token to be IDENT, got = instead",
            "no prefix parse function for = found",
            "expected next token to be =, got INT instead",
            "expected next token to be IDENT, got INT instead",
        ]
    );
    let lets = program
        .iter()
        .filter(|stmt| matches!(stmt, Stmt::Let(_)))
        .count();
    assert_eq!(lets, 1);
    assert_eq!(program.statements.last().map(|s| s.to_string()), Some("let ok = 1;".to_string()));
}

#[test]
fn test_integer_overflow_is_reported_once() {
    let (program, errors) = parse_source("99999999999999999999; 7;");

    assert_eq!(errors, vec!["could not parse \"99999999999999999999\" as integer"]);
    assert_eq!(program.len(), 1);
    assert_integer(single_expr(&program), 7);
}

#[test]
fn test_bad_literal_inside_infix_drops_only_its_statement() {
    let (program, errors) = parse_source("let x = 99999999999999999999 + 1;");

    assert_eq!(errors, vec!["could not parse \"99999999999999999999\" as integer"]);
    assert!(program.is_empty(), "unexpected statements: {}", program);
}

#[test]
fn test_missing_operand_mid_chain_drops_only_its_statement() {
    let (program, errors) = parse_source("let x = 1 + ) + 2;");

    assert_eq!(errors, vec!["no prefix parse function for ) found"]);
    assert!(program.is_empty(), "unexpected statements: {}", program);
}

#[test]
fn test_bad_call_argument_drops_only_its_statement() {
    let (program, errors) = parse_source("add(1, 99999999999999999999, 3); let y = 2;");

    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "let y = 2;");
}

#[test]
fn test_failed_statement_inside_block() {
    let (program, errors) = parse_source("if (x) { ) } let y = 1;");

    assert_eq!(errors, vec!["no prefix parse function for ) found"]);
    assert_eq!(program.len(), 2);
    assert_eq!(program.statements[1].to_string(), "let y = 1;");
}

#[test]
fn test_deep_prefix_chain_is_rejected() {
    let source = format!("{}1", "-".repeat(50_000));
    let (program, errors) = parse_source(&source);

    assert!(program.is_empty());
    assert_eq!(
        errors,
        vec![format!("expression nested deeper than {} levels", MAX_EXPR_DEPTH)]
    );
}

#[test]
fn test_deep_grouping_is_rejected_and_parsing_resumes() {
    let source = format!("{}1{}; let y = 2;", "(".repeat(50_000), ")".repeat(50_000));
    let (program, errors) = parse_source(&source);

    assert_eq!(
        errors,
        vec![format!("expression nested deeper than {} levels", MAX_EXPR_DEPTH)]
    );
    assert_eq!(program.to_string(), "let y = 2;");
}

#[test]
fn test_nesting_below_limit_parses() {
    let depth = MAX_EXPR_DEPTH / 2;
    let source = format!("{}1{}; {}2", "(".repeat(depth), ")".repeat(depth), "-".repeat(depth));
    let program = parse_ok(&source);

    assert_eq!(program.len(), 2);
    assert_integer(
        match &program.statements[0] {
            Stmt::Expression(stmt) => &stmt.expression,
            other => panic!("expected expression statement, got {:?}", other),
        },
        1,
    );
}

#[test]
fn test_program_renders_statements_on_separate_lines() {
    let program = parse_ok("a; b");
    let rendered = program.to_string();

    assert_eq!(rendered, "a\nb");
    assert_eq!(parse_ok(&rendered).len(), 2);
}

#[test]
fn test_illegal_token() {
    let (_, errors) = parse_source("@");

    assert_eq!(errors, vec!["no prefix parse function for ILLEGAL found"]);
}

#[test]
fn test_missing_right_operand() {
    let (program, errors) = parse_source("5 + ;");

    assert!(program.is_empty());
    assert_eq!(errors, vec!["no prefix parse function for ; found"]);
}

#[test]
fn test_unterminated_group() {
    let (_, errors) = parse_source("(1 + 2");

    assert_eq!(errors, vec!["expected next token to be ), got EOF instead"]);
}

#[test]
fn test_unterminated_block() {
    let (_, errors) = parse_source("if (x) { y");

    assert_eq!(errors, vec!["expected next token to be }, got EOF instead"]);
}

#[test]
fn test_bad_function_parameter() {
    let (_, errors) = parse_source("fn(1) { }");

    assert_eq!(errors[0], "expected next token to be IDENT, got INT instead");
}

#[test]
fn test_malformed_input_terminates() {
    let (_, errors) = parse_source("let let let ) ( } { , ; = = fn if else ( ( ( fn( add(1,");

    assert!(!errors.is_empty());
}

#[test]
fn test_error_positions_point_at_offending_token() {
    let mut parser = Parser::from_source("let x = );".to_string(), None);
    parser.parse_program();

    assert_eq!(parser.errors().len(), 1);
    assert_eq!(parser.errors()[0].get_position().0, 8);
    assert_eq!(parser.errors()[0].get_position().1.as_str(), "shell");
}

#[test]
fn test_parse_from_token_stream() {
    let tokens = tokenize("let a = 1 + 2;".to_string(), None);
    let mut parser = Parser::new(TokenStream::new(tokens));
    let program = parser.parse_program();

    assert!(parser.errors().is_empty());
    assert_eq!(program.to_string(), "let a = (1 + 2);");
}

#[test]
fn test_parse_function_returns_errors() {
    let (program, errors) = parse("let a = 1; )".to_string(), None);

    assert_eq!(program.len(), 1);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "NoPrefixParseFn");
}

#[test]
fn test_binding_power_table() {
    assert_eq!(binding_power(TokenKind::Equals), BindingPower::Equals);
    assert_eq!(binding_power(TokenKind::NotEquals), BindingPower::Equals);
    assert_eq!(binding_power(TokenKind::Less), BindingPower::Comparison);
    assert_eq!(binding_power(TokenKind::Plus), BindingPower::Sum);
    assert_eq!(binding_power(TokenKind::Slash), BindingPower::Product);
    assert_eq!(binding_power(TokenKind::OpenParen), BindingPower::Call);
    assert_eq!(binding_power(TokenKind::Identifier), BindingPower::Lowest);
    assert_eq!(binding_power(TokenKind::Semicolon), BindingPower::Lowest);

    assert!(BindingPower::Lowest < BindingPower::Equals);
    assert!(BindingPower::Equals < BindingPower::Comparison);
    assert!(BindingPower::Comparison < BindingPower::Sum);
    assert!(BindingPower::Sum < BindingPower::Product);
    assert!(BindingPower::Product < BindingPower::Prefix);
    assert!(BindingPower::Prefix < BindingPower::Call);
}

#[test]
fn test_custom_lookups() {
    let mut lookups = Lookups::default();
    lookups.nud(TokenKind::Int, parse_primary_expr);
    let lookups: &'static Lookups = Box::leak(Box::new(lookups));

    let mut parser = Parser::with_lookups(TokenStream::new(tokenize("1 + 2".to_string(), None)), lookups);
    let program = parser.parse_program();

    // Without an infix routine for `+` the expression stops after `1`.
    assert_eq!(program.len(), 2);
    assert_eq!(parser.error_messages(), vec!["no prefix parse function for + found"]);
}

#[test]
fn test_parsers_on_separate_threads() {
    let handles: Vec<_> = ["a + b * c", "let x = -1;", "fn(a) { a }(2)"]
        .into_iter()
        .map(|source| thread::spawn(move || parse(source.to_string(), None)))
        .collect();

    let rendered: Vec<String> = handles
        .into_iter()
        .map(|handle| {
            let (program, errors) = handle.join().unwrap();
            assert!(errors.is_empty());
            program.to_string()
        })
        .collect();

    assert_eq!(rendered, vec!["(a + (b * c))", "let x = (-1);", "fn(a) { a }(2)"]);
}
