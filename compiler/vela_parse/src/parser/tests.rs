use pretty_assertions::assert_eq;
use vela_diagnostic::ErrorCode;
use vela_ir::{BinaryOp, ExprKind, Literal, ParsedExpr, UnaryOp};

use super::*;

/// Fully parenthesized rendering of the parse tree.
fn show(parsed: &ParsedExpr) -> String {
    fn go(p: &ParsedExpr, id: ExprId) -> String {
        match p.arena.kind(id) {
            ExprKind::Literal(Literal::String(s)) => format!("{s:?}"),
            ExprKind::Literal(lit) => lit.to_string(),
            ExprKind::Ident(name) => name.to_string(),
            ExprKind::Field { receiver, name } => format!("{}.{name}", go(p, *receiver)),
            ExprKind::MethodCall {
                receiver,
                name,
                args,
            } => {
                let args: Vec<_> = args.iter().map(|a| go(p, *a)).collect();
                format!("{}.{name}({})", go(p, *receiver), args.join(", "))
            }
            ExprKind::Construct { type_name, args } => {
                let args: Vec<_> = args.iter().map(|a| go(p, *a)).collect();
                format!("new {type_name}({})", args.join(", "))
            }
            ExprKind::Index { receiver, index } => {
                format!("{}[{}]", go(p, *receiver), go(p, *index))
            }
            ExprKind::Binary { op, left, right } => {
                format!("({} {} {})", go(p, *left), op.as_symbol(), go(p, *right))
            }
            ExprKind::Unary { op, operand } => format!("({}{})", op.as_symbol(), go(p, *operand)),
        }
    }
    go(parsed, parsed.root)
}

fn parse(source: &str) -> String {
    show(&parse_expression(source, 0).unwrap())
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(parse("1 + 2 * 3 - 4"), "((1 + (2 * 3)) - 4)");
    assert_eq!(parse("a || b && c == d < e"), "(a || (b && (c == (d < e))))");
    assert_eq!(parse("8 / 4 / 2"), "((8 / 4) / 2)");
}

#[test]
fn unary_binds_tighter_than_binary() {
    assert_eq!(parse("-a.b + !c"), "((-a.b) + (!c))");
    assert_eq!(parse("--1"), "(-(-1))");
}

#[test]
fn postfix_chains() {
    assert_eq!(
        parse("person.name.substring(1, 2)[0]"),
        "person.name.substring(1, 2)[0]"
    );
    assert_eq!(parse("Math.max(a, 2L)"), "Math.max(a, 2)");
    assert_eq!(parse("Point(1, 2).x"), "new Point(1, 2).x");
    assert_eq!(parse("s.isEmpty()"), "s.isEmpty()");
}

#[test]
fn parentheses_group() {
    assert_eq!(parse("(1 + 2) * 3"), "((1 + 2) * 3)");
    let parsed = parse_expression("(a)", 0).unwrap();
    assert_eq!(parsed.text(parsed.root), "(a)");
}

#[test]
fn spans_cover_whole_nodes() {
    let parsed = parse_expression("a.b + 1", 0).unwrap();
    assert_eq!(parsed.text(parsed.root), "a.b + 1");
    let ExprKind::Binary { left, op, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected a binary node");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert_eq!(parsed.text(*left), "a.b");
}

#[test]
fn negative_literals_stay_unary() {
    let parsed = parse_expression("-5", 0).unwrap();
    assert!(matches!(
        parsed.arena.kind(parsed.root),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            ..
        }
    ));
}

#[test]
fn trailing_tokens_are_rejected() {
    let err = parse_expression("a b", 0).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1001);
    assert!(err.message.contains("identifier `b`"));
}

#[test]
fn missing_member_name() {
    let err = parse_expression("a.", 0).unwrap_err();
    assert!(err.message.contains("member name"));
}

#[test]
fn unclosed_call() {
    let err = parse_expression("f(1, 2", 0).unwrap_err();
    assert!(err.message.contains("end of expression"));
}

#[test]
fn error_spans_are_relocated() {
    let err = parse_expression("1 + )", 10).unwrap_err();
    assert_eq!(err.span.map(|s| s.start), Some(14));
}

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse(&source), "1");
}
