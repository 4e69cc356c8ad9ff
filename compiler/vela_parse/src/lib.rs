//! Parsing of binding attribute text.
//!
//! An attribute value is either plain text or a binding expression written
//! `${...}`. [`parse_attribute`] tells the two apart; [`parse_expression`]
//! parses the text between the braces into a [`ParsedExpr`].
//!
//! The grammar, loosest binding first:
//!
//! ```text
//! expr     = or
//! or       = and ( "||" and )*
//! and      = eq ( "&&" eq )*
//! eq       = cmp ( ("==" | "!=") cmp )*
//! cmp      = add ( ("<" | "<=" | ">" | ">=") add )*
//! add      = mul ( ("+" | "-") mul )*
//! mul      = unary ( ("*" | "/" | "%") unary )*
//! unary    = ("-" | "!") unary | postfix
//! postfix  = primary ( "." IDENT [ "(" args ")" ] | "[" expr "]" )*
//! primary  = literal | IDENT [ "(" args ")" ] | "(" expr ")"
//! ```

mod attribute;
mod lexer;
mod parser;
pub mod stack;

pub use attribute::{parse_attribute, AttributeValue};
pub use parser::parse_expression;
pub use vela_ir::ParsedExpr;
