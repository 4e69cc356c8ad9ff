//! Classification of attribute text.

use vela_diagnostic::CompileResult;

use crate::parse_expression;
use vela_ir::ParsedExpr;

/// What an attribute value turned out to be.
#[derive(Clone, Debug)]
pub enum AttributeValue {
    /// Plain text, with a leading `\$` escape already removed.
    Literal(String),
    Expression(ParsedExpr),
}

/// Classify and, for `${...}`, parse an attribute value.
///
/// Only a value that is exactly one `${...}` (surrounding whitespace
/// allowed) is an expression. A leading backslash escapes the dollar sign:
/// `\${x}` is the literal text `${x}`.
pub fn parse_attribute(text: &str) -> CompileResult<AttributeValue> {
    if let Some(rest) = text.strip_prefix("\\$") {
        return Ok(AttributeValue::Literal(format!("${rest}")));
    }
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("${")
        .and_then(|body| body.strip_suffix('}'))
    else {
        return Ok(AttributeValue::Literal(text.to_owned()));
    };
    let leading = text.len() - text.trim_start().len();
    let base = u32::try_from(leading + 2).unwrap_or(u32::MAX);
    parse_expression(inner, base).map(AttributeValue::Expression)
}
