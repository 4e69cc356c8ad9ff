//! Parsed expression arena.
//!
//! The parser produces a flat arena of [`Expr`] nodes addressed by
//! [`ExprId`]. Children are referenced by id, so the tree is cheap to build
//! and to walk in any order. The arena is immutable once parsing finishes.

use std::fmt;
use std::rc::Rc;

use crate::{BinaryOp, Literal, Span, UnaryOp};

/// Index of an expression in an [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Untyped expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// `null`, `"text"`, `'text'`, `42`, `42L`, `1.5`, `1.5f`, `true`.
    Literal(Literal),
    /// A bare identifier: a scope name or a type name.
    Ident(Rc<str>),
    /// `receiver.name`
    Field { receiver: ExprId, name: Rc<str> },
    /// `receiver.name(args...)`
    MethodCall {
        receiver: ExprId,
        name: Rc<str>,
        args: Vec<ExprId>,
    },
    /// `Name(args...)`: a constructor call on a type name.
    Construct { type_name: Rc<str>, args: Vec<ExprId> },
    /// `receiver[index]`
    Index { receiver: ExprId, index: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary { op: UnaryOp, operand: ExprId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Flat storage for the nodes of one parsed expression.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        ExprArena::default()
    }

    /// Append a node and return its id.
    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let raw = u32::try_from(self.exprs.len()).unwrap_or(u32::MAX);
        self.exprs.push(Expr { kind, span });
        ExprId(raw)
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different arena. Ids are only handed out
    /// by [`ExprArena::alloc`], so this indicates a compiler bug.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.get(id).kind
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.get(id).span
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

/// A parsed expression together with the text it was parsed from.
///
/// Spans in the arena are relative to `source`, which is the text between
/// `${` and `}`; `base_offset` is where that text starts in the attribute.
#[derive(Clone, Debug)]
pub struct ParsedExpr {
    pub source: Rc<str>,
    pub arena: ExprArena,
    pub root: ExprId,
    pub base_offset: u32,
}

impl ParsedExpr {
    /// Source text of a node, used as the display name of continuations.
    pub fn text(&self, id: ExprId) -> &str {
        self.arena.span(id).slice(&self.source).unwrap_or("")
    }

    /// Span of a node relative to the whole attribute value.
    pub fn attribute_span(&self, id: ExprId) -> Span {
        self.arena.span(id).offset_by(self.base_offset)
    }
}
