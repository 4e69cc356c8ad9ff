//! Tokenizer for binding expressions.

use std::rc::Rc;

use vela_diagnostic::{invalid_number, unexpected_token, unterminated_string, CompileResult};
use vela_ir::{Literal, Span};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TokenKind {
    Literal(Literal),
    Ident(Rc<str>),
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Bang,
    Eof,
}

impl TokenKind {
    /// How the token is named in "expected ..., found ..." messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Literal(Literal::String(s)) => format!("string {s:?}"),
            TokenKind::Literal(lit) => format!("`{lit}`"),
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Eof => "end of expression".to_owned(),
            other => format!("`{}`", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Literal(_) | TokenKind::Ident(_) | TokenKind::Eof => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokenize `source`. The result always ends with an `Eof` token.
pub(crate) fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::from_range(start..self.pos)
    }

    fn next_token(&mut self) -> CompileResult<Token> {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        let start = self.pos;
        let Some(byte) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: self.span_from(start),
            });
        };
        let starts_word = self.source[start..]
            .chars()
            .next()
            .is_some_and(|c| c == '_' || c == '$' || c.is_alphabetic());
        let kind = match byte {
            b'0'..=b'9' => return self.number(start),
            b'\'' | b'"' => return self.string(start, byte),
            _ if starts_word => return Ok(self.word(start)),
            _ => self.punct(start)?,
        };
        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn punct(&mut self, start: usize) -> CompileResult<TokenKind> {
        let two = |lexer: &mut Self, kind| {
            lexer.pos += 2;
            kind
        };
        let one = |lexer: &mut Self, kind| {
            lexer.pos += 1;
            kind
        };
        let kind = match (self.peek(), self.peek_at(1)) {
            (Some(b'='), Some(b'=')) => two(self, TokenKind::EqEq),
            (Some(b'!'), Some(b'=')) => two(self, TokenKind::NotEq),
            (Some(b'<'), Some(b'=')) => two(self, TokenKind::LtEq),
            (Some(b'>'), Some(b'=')) => two(self, TokenKind::GtEq),
            (Some(b'&'), Some(b'&')) => two(self, TokenKind::AmpAmp),
            (Some(b'|'), Some(b'|')) => two(self, TokenKind::PipePipe),
            (Some(b'.'), _) => one(self, TokenKind::Dot),
            (Some(b','), _) => one(self, TokenKind::Comma),
            (Some(b'('), _) => one(self, TokenKind::LParen),
            (Some(b')'), _) => one(self, TokenKind::RParen),
            (Some(b'['), _) => one(self, TokenKind::LBracket),
            (Some(b']'), _) => one(self, TokenKind::RBracket),
            (Some(b'+'), _) => one(self, TokenKind::Plus),
            (Some(b'-'), _) => one(self, TokenKind::Minus),
            (Some(b'*'), _) => one(self, TokenKind::Star),
            (Some(b'/'), _) => one(self, TokenKind::Slash),
            (Some(b'%'), _) => one(self, TokenKind::Percent),
            (Some(b'<'), _) => one(self, TokenKind::Lt),
            (Some(b'>'), _) => one(self, TokenKind::Gt),
            (Some(b'!'), _) => one(self, TokenKind::Bang),
            _ => {
                let found: String = self.source[start..].chars().take(1).collect();
                return Err(unexpected_token(format!("`{found}`"), "an expression")
                    .with_span(Span::from_range(start..start + found.len())));
            }
        };
        Ok(kind)
    }

    fn word(&mut self, start: usize) -> Token {
        let rest = &self.source[start..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| !(c == '_' || c == '$' || c.is_alphanumeric()))
            .map_or(rest.len(), |(i, _)| i);
        self.pos = start + len;
        let text = &rest[..len];
        let kind = match text {
            "true" => TokenKind::Literal(Literal::Boolean(true)),
            "false" => TokenKind::Literal(Literal::Boolean(false)),
            "null" => TokenKind::Literal(Literal::Null),
            _ => TokenKind::Ident(text.into()),
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    /// `42`, `42L`, `1.5`, `1.5f`, `2d`, `1e3`.
    fn number(&mut self, start: usize) -> CompileResult<Token> {
        self.digits();
        let mut floating = false;
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            floating = true;
            self.pos += 1;
            self.digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some(b'+' | b'-')));
            if self.peek_at(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                floating = true;
                self.pos += 1 + sign;
                self.digits();
            }
        }
        let text = &self.source[start..self.pos];
        let suffix = self.peek();
        let literal = match suffix {
            Some(b'L' | b'l') if !floating => {
                self.pos += 1;
                text.parse::<i64>().ok().map(Literal::long)
            }
            Some(b'f' | b'F') => {
                self.pos += 1;
                text.parse::<f32>().ok().filter(|v| v.is_finite()).map(Literal::float)
            }
            Some(b'd' | b'D') => {
                self.pos += 1;
                text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Literal::double)
            }
            _ if floating => text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Literal::double),
            _ => text.parse::<i64>().ok().map(|value| Literal::Integer {
                value,
                long: i32::try_from(value).is_err(),
            }),
        };
        // `12abc` is one malformed number, not a number and an identifier.
        if self.peek().is_some_and(|b| b == b'_' || b.is_ascii_alphanumeric()) {
            self.word(self.pos);
            return Err(invalid_number(&self.source[start..self.pos]).with_span(self.span_from(start)));
        }
        match literal {
            Some(literal) => Ok(Token {
                kind: TokenKind::Literal(literal),
                span: self.span_from(start),
            }),
            None => Err(invalid_number(&self.source[start..self.pos]).with_span(self.span_from(start))),
        }
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn string(&mut self, start: usize, quote: u8) -> CompileResult<Token> {
        self.pos += 1;
        let mut text = String::new();
        let rest = &self.source[self.pos..];
        let mut chars = rest.char_indices();
        while let Some((offset, c)) = chars.next() {
            if c == char::from(quote) {
                self.pos += offset + 1;
                return Ok(Token {
                    kind: TokenKind::Literal(Literal::string(text)),
                    span: self.span_from(start),
                });
            }
            if c == '\\' {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                text.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            } else {
                text.push(c);
            }
        }
        self.pos = self.source.len();
        Err(unterminated_string().with_span(self.span_from(start)))
    }
}
