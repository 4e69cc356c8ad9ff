//! Precedence-climbing parser over the token stream.

use std::rc::Rc;

use tracing::instrument;
use vela_diagnostic::{unexpected_token, CompileError, CompileResult};
use vela_ir::{BinaryOp, ExprArena, ExprId, ExprKind, ParsedExpr, Span, UnaryOp};

use crate::lexer::{tokenize, Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

/// Parse expression text (the part between `${` and `}`).
///
/// `base_offset` is where `source` starts inside the attribute value; error
/// spans are reported relative to the attribute.
#[instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_expression(source: &str, base_offset: u32) -> CompileResult<ParsedExpr> {
    let relocate = |e: CompileError| match e.span {
        Some(span) => {
            let moved = span.offset_by(base_offset);
            e.with_span(moved)
        }
        None => e,
    };
    let tokens = tokenize(source).map_err(relocate)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        arena: ExprArena::new(),
    };
    let root = parser.parse_expr().map_err(relocate)?;
    parser.expect_eof().map_err(relocate)?;
    Ok(ParsedExpr {
        source: source.into(),
        arena: parser.arena,
        root,
        base_offset,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    arena: ExprArena,
}

impl Parser {
    fn current(&self) -> &Token {
        // `tokenize` always ends the stream with `Eof` and the parser never
        // advances past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> CompileResult<Span> {
        if self.kind() == kind {
            Ok(self.advance().span)
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_eof(&self) -> CompileResult<()> {
        match self.kind() {
            TokenKind::Eof => Ok(()),
            _ => Err(self.error("an operator or the end of the expression")),
        }
    }

    #[cold]
    fn error(&self, expected: &str) -> CompileError {
        let token = self.current();
        unexpected_token(token.kind.describe(), expected).with_span(token.span)
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.arena.span(id)
    }

    fn parse_expr(&mut self) -> CompileResult<ExprId> {
        ensure_sufficient_stack(|| self.parse_binary(0))
    }

    /// Parse operators binding at least as tightly as `min_power`.
    fn parse_binary(&mut self, min_power: u8) -> CompileResult<ExprId> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_binary_op() {
            let power = op.binding_power();
            if power < min_power {
                break;
            }
            self.advance();
            let right = ensure_sufficient_stack(|| self.parse_binary(power + 1))?;
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.arena.alloc(ExprKind::Binary { op, left, right }, span);
        }
        Ok(left)
    }

    fn match_binary_op(&self) -> Option<BinaryOp> {
        Some(match self.kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::PipePipe => BinaryOp::Or,
            _ => return None,
        })
    }

    fn parse_unary(&mut self) -> CompileResult<ExprId> {
        let op = match self.kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(self.span_of(operand));
        Ok(self.arena.alloc(ExprKind::Unary { op, operand }, span))
    }

    fn parse_postfix(&mut self) -> CompileResult<ExprId> {
        let mut receiver = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                let TokenKind::Ident(name) = self.kind().clone() else {
                    return Err(self.error("a member name"));
                };
                self.advance();
                if self.kind() == &TokenKind::LParen {
                    let (args, end) = self.parse_args()?;
                    let span = self.span_of(receiver).merge(end);
                    receiver = self
                        .arena
                        .alloc(ExprKind::MethodCall { receiver, name, args }, span);
                } else {
                    let span = self.span_of(receiver).merge(self.tokens[self.pos - 1].span);
                    receiver = self.arena.alloc(ExprKind::Field { receiver, name }, span);
                }
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.parse_expr()?;
                let end = self.expect(&TokenKind::RBracket, "`]`")?;
                let span = self.span_of(receiver).merge(end);
                receiver = self.arena.alloc(ExprKind::Index { receiver, index }, span);
            } else {
                return Ok(receiver);
            }
        }
    }

    /// `( expr, ... )`, returning the arguments and the closing span.
    fn parse_args(&mut self) -> CompileResult<(Vec<ExprId>, Span)> {
        self.expect(&TokenKind::LParen, "`(`")?;
        let mut args = Vec::new();
        if self.kind() != &TokenKind::RParen {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(&TokenKind::RParen, "`,` or `)`")?;
        Ok((args, end))
    }

    fn parse_primary(&mut self) -> CompileResult<ExprId> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Literal(literal) => {
                self.advance();
                Ok(self.arena.alloc(ExprKind::Literal(literal), token.span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.kind() == &TokenKind::LParen {
                    let (args, end) = self.parse_args()?;
                    let type_name: Rc<str> = name;
                    return Ok(self
                        .arena
                        .alloc(ExprKind::Construct { type_name, args }, token.span.merge(end)));
                }
                Ok(self.arena.alloc(ExprKind::Ident(name), token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                let end = self.expect(&TokenKind::RParen, "`)`")?;
                // Parentheses only group; widen the span so display names
                // keep them.
                let kind = self.arena.kind(inner).clone();
                Ok(self.arena.alloc(kind, token.span.merge(end)))
            }
            _ => Err(self.error("an expression")),
        }
    }
}

#[cfg(test)]
mod tests;
