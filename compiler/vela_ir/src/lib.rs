//! Shared IR types for the Vela binding compiler.
//!
//! This crate holds the pieces every other phase agrees on:
//!
//! - [`Span`]: byte ranges into attribute text, used by diagnostics.
//! - [`BinaryOp`] / [`UnaryOp`]: the operator set of the expression language.
//! - [`ExprArena`] / [`ExprId`] / [`ParsedExpr`]: the parser's output, an
//!   arena of untyped expression nodes.
//! - [`Literal`] / [`NumRank`]: compile-time values used for constant folding
//!   and the fixed numeric promotion ranking.
//!
//! Nothing here knows about types or the host runtime; that lives in
//! `vela_types` and `vela_runtime`.

mod expr;
pub mod literal;
mod operators;
mod span;

pub use expr::{Expr, ExprArena, ExprId, ExprKind, ParsedExpr};
pub use literal::{Literal, NumRank};
pub use operators::{BinaryOp, OpCategory, UnaryOp};
pub use span::Span;
