//! The coercion engine.
//!
//! Given a source and a target type, produce the instructions that turn a
//! value of the first into a value of the second, or `None` when no rule
//! applies. Runtime coercions ([`coerce`]) operate on the value on top of
//! the stack and replace it. Literal coercions ([`coerce_literal`]) convert
//! attribute text at compile time and push the result.
//!
//! Rules, tried in order:
//!
//! 1. Assignable types need nothing.
//! 2. Strings parse into numbers, booleans and chars.
//! 3. Strings name enum constants.
//! 4. Strings feed a static `valueOf(String)` factory.
//! 5. Boxed and primitive types box, unbox and convert. Booleans never
//!    become numbers.
//! 6. Numeric primitives widen and narrow.
//! 7. Anything becomes a string through host string conversion.
//!
//! A reference source that needs a real conversion is guarded: `null`
//! skips the conversion and produces the target's default instead.

use vela_diagnostic::{unconvertible, CompileResult};
use vela_emit::{Op, RenderCommand};
use vela_ir::literal::narrow;
use vela_ir::Literal;
use vela_types::{
    display, is_assignable, match_enum_constant, MethodInfo, Prim, Ty, TypeModel,
};

/// Runtime coercion of the value on top of the stack.
pub fn coerce(model: &dyn TypeModel, source: Ty, target: Ty) -> Option<RenderCommand> {
    if is_assignable(model, source, target) {
        return Some(RenderCommand::empty());
    }
    if source == Ty::Null {
        return Some(RenderCommand::op(Op::Pop).then(default_value(target)?));
    }
    let convert = conversion(model, source, target)?;
    if source.is_reference() {
        Some(null_guarded(convert, default_value(target)?))
    } else {
        Some(convert)
    }
}

/// Compile-time coercion of attribute text; pushes the converted constant.
pub fn coerce_literal(model: &dyn TypeModel, text: &str, target: Ty) -> Option<RenderCommand> {
    match target {
        Ty::Str | Ty::Object => Some(RenderCommand::op(Op::PushStr(text.into()))),
        Ty::Prim(prim) => literal_constant(text, prim),
        Ty::Boxed(prim) => {
            Some(literal_constant(text, prim)?.then(RenderCommand::op(Op::Box(prim))))
        }
        Ty::Class(_) => {
            if let Some(constants) = model.enum_constants(target) {
                let name = match_enum_constant(&constants, text)?;
                let field = model.static_field(target, name)?;
                return Some(RenderCommand::op(Op::GetStatic(field.id)));
            }
            let factory = value_of(model, target)?;
            Some(RenderCommand::ops([
                Op::PushStr(text.into()),
                Op::InvokeStatic {
                    method: factory.id,
                    argc: 1,
                },
            ]))
        }
        Ty::Void | Ty::Null => None,
    }
}

/// [`coerce`], failing with an unconvertible error.
pub fn require_coercion(
    model: &dyn TypeModel,
    source: Ty,
    target: Ty,
) -> CompileResult<RenderCommand> {
    coerce(model, source, target)
        .ok_or_else(|| unconvertible(display(model, source), display(model, target)))
}

/// [`coerce_literal`], failing with an unconvertible error.
pub fn require_literal_coercion(
    model: &dyn TypeModel,
    text: &str,
    target: Ty,
) -> CompileResult<RenderCommand> {
    coerce_literal(model, text, target)
        .ok_or_else(|| unconvertible(format!("\"{text}\""), display(model, target)))
}

/// Pushes the value a `null` source turns into.
pub fn default_value(target: Ty) -> Option<RenderCommand> {
    let ops = match target {
        Ty::Void => return None,
        Ty::Null | Ty::Boxed(_) | Ty::Str | Ty::Object | Ty::Class(_) => vec![Op::PushNull],
        Ty::Prim(Prim::Boolean) => vec![Op::PushBool(false)],
        Ty::Prim(Prim::Char) => vec![Op::PushChar('\0')],
        Ty::Prim(prim @ (Prim::Byte | Prim::Short)) => vec![
            Op::PushInt(0),
            Op::Convert {
                from: Prim::Int,
                to: prim,
            },
        ],
        Ty::Prim(Prim::Int) => vec![Op::PushInt(0)],
        Ty::Prim(Prim::Long) => vec![Op::PushLong(0)],
        Ty::Prim(Prim::Float) => vec![Op::PushFloat(0.0)],
        Ty::Prim(Prim::Double) => vec![Op::PushDouble(0.0)],
    };
    Some(RenderCommand::ops(ops))
}

fn conversion(model: &dyn TypeModel, source: Ty, target: Ty) -> Option<RenderCommand> {
    match (source, target) {
        (Ty::Void, _) | (_, Ty::Void | Ty::Null) => None,
        (_, Ty::Str) => Some(RenderCommand::op(Op::ToStr)),
        (Ty::Str, Ty::Prim(prim)) => Some(parse(prim)),
        (Ty::Str, Ty::Boxed(prim)) => Some(parse(prim).then(RenderCommand::op(Op::Box(prim)))),
        (Ty::Str, Ty::Class(class)) => {
            if model.enum_constants(target).is_some() {
                return Some(RenderCommand::op(Op::EnumValueOf(class)));
            }
            let factory = value_of(model, target)?;
            Some(RenderCommand::op(Op::InvokeStatic {
                method: factory.id,
                argc: 1,
            }))
        }
        (Ty::Prim(from), Ty::Prim(to)) => cast(from, to),
        (Ty::Boxed(from), Ty::Prim(to)) => {
            Some(RenderCommand::op(Op::Unbox(from)).then(cast(from, to)?))
        }
        (Ty::Prim(from), Ty::Boxed(to)) => {
            Some(cast(from, to)?.then(RenderCommand::op(Op::Box(to))))
        }
        (Ty::Boxed(from), Ty::Boxed(to)) => Some(RenderCommand::seq([
            RenderCommand::op(Op::Unbox(from)),
            cast(from, to)?,
            RenderCommand::op(Op::Box(to)),
        ])),
        (Ty::Prim(prim), to) if is_assignable(model, Ty::Boxed(prim), to) => {
            Some(RenderCommand::op(Op::Box(prim)))
        }
        _ => None,
    }
}

/// Primitive to primitive. Booleans only convert to themselves.
fn cast(from: Prim, to: Prim) -> Option<RenderCommand> {
    if from == to {
        Some(RenderCommand::empty())
    } else if from.is_numeric() && to.is_numeric() {
        Some(RenderCommand::op(Op::Convert { from, to }))
    } else {
        None
    }
}

fn parse(prim: Prim) -> RenderCommand {
    RenderCommand::op(match prim {
        Prim::Boolean => Op::ParseBool,
        Prim::Char => Op::ParseChar,
        numeric => Op::ParseNumber(numeric),
    })
}

fn null_guarded(convert: RenderCommand, default: RenderCommand) -> RenderCommand {
    RenderCommand::new(move |b| {
        let is_null = b.new_label();
        let done = b.new_label();
        b.emit(Op::Dup);
        b.emit(Op::JumpIfNull(is_null));
        convert.render(b);
        b.emit(Op::Jump(done));
        b.place(is_null);
        b.emit(Op::Pop);
        default.render(b);
        b.place(done);
    })
}

/// Literal text converted to a primitive constant.
///
/// Integral targets reject floating-point text and out-of-range values.
fn literal_constant(text: &str, prim: Prim) -> Option<RenderCommand> {
    let op = match prim {
        Prim::Boolean => Op::PushBool(Literal::parse_boolean(text)?),
        Prim::Char => {
            let mut chars = text.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Op::PushChar(c)
        }
        Prim::Byte | Prim::Short => {
            let value = integral(text)?;
            let fits = match prim {
                Prim::Byte => i8::try_from(value).is_ok(),
                _ => i16::try_from(value).is_ok(),
            };
            if !fits {
                return None;
            }
            return Some(RenderCommand::ops([
                Op::PushInt(i32::try_from(value).ok()?),
                Op::Convert {
                    from: Prim::Int,
                    to: prim,
                },
            ]));
        }
        Prim::Int => Op::PushInt(i32::try_from(integral(text)?).ok()?),
        Prim::Long => Op::PushLong(integral(text)?),
        Prim::Float => {
            let value = narrow(Literal::parse_numeric(text)?.as_f64()?);
            if !value.is_finite() {
                return None;
            }
            Op::PushFloat(value)
        }
        Prim::Double => Op::PushDouble(Literal::parse_numeric(text)?.as_f64()?),
    };
    Some(RenderCommand::op(op))
}

fn integral(text: &str) -> Option<i64> {
    match Literal::parse_numeric(text)? {
        Literal::Integer { value, .. } => Some(value),
        _ => None,
    }
}

/// A static `valueOf(String)` factory producing `target`.
fn value_of(model: &dyn TypeModel, target: Ty) -> Option<MethodInfo> {
    model
        .static_methods(target, "valueOf", 1)
        .into_iter()
        .find(|m| {
            m.is_accessible()
                && m.params.first() == Some(&Ty::Str)
                && is_assignable(model, m.ret, target)
        })
}

#[cfg(test)]
mod tests;
