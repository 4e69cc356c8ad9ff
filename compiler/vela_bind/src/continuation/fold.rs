//! Compile-time evaluation of operators over literal operands.
//!
//! Every function here computes exactly what the runtime would: integral
//! arithmetic wraps at the promoted width, `float` arithmetic rounds to
//! single precision, and string operands are read the way the runtime
//! parse ops read them. Integral division by zero is not folded; the
//! runtime reports it.
//!
//! A `None` result means "render it", never "error".

use vela_ir::literal::narrow;
use vela_ir::{BinaryOp, Literal};
use vela_types::Prim;

/// A literal converted to the promoted kind of an operation.
#[derive(Copy, Clone, Debug)]
enum Num {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integral to float conversion rounds like the host"
)]
fn operand(literal: &Literal, kind: Prim) -> Option<Num> {
    let parsed = matches!(literal, Literal::String(_));
    let view = literal.numeric_view()?;
    let num = match (kind, view) {
        (Prim::Boolean, Literal::Boolean(b)) => Num::Boolean(b),
        (Prim::Int, Literal::Integer { value, .. }) => Num::Int(i32::try_from(value).ok()?),
        (Prim::Long, Literal::Integer { value, .. }) => Num::Long(value),
        // Text goes through the double parser, a constant through a cast.
        (Prim::Float, Literal::Integer { value, .. }) if parsed => {
            Num::Float(narrow(value as f64))
        }
        (Prim::Float, Literal::Integer { value, .. }) => Num::Float(value as f32),
        (
            Prim::Float,
            Literal::FloatingPoint {
                value,
                double: false,
            },
        ) => Num::Float(narrow(value)),
        (Prim::Double, view @ (Literal::Integer { .. } | Literal::FloatingPoint { .. })) => {
            Num::Double(view.as_f64()?)
        }
        _ => return None,
    };
    Some(num)
}

fn pair(kind: Prim, left: &Literal, right: &Literal) -> Option<(Num, Num)> {
    Some((operand(left, kind)?, operand(right, kind)?))
}

/// `+ - * / %` at `kind`.
pub(super) fn arithmetic(op: BinaryOp, kind: Prim, left: &Literal, right: &Literal) -> Option<Literal> {
    let folded = match pair(kind, left, right)? {
        (Num::Int(a), Num::Int(b)) => {
            Literal::int(wrap_int(integral(op, i64::from(a), i64::from(b))?))
        }
        (Num::Long(a), Num::Long(b)) => Literal::long(integral(op, a, b)?),
        (Num::Float(a), Num::Float(b)) => Literal::float(floating(op, a, b)?),
        (Num::Double(a), Num::Double(b)) => Literal::double(floating(op, a, b)?),
        _ => return None,
    };
    Some(folded)
}

fn integral(op: BinaryOp, a: i64, b: i64) -> Option<i64> {
    match op {
        BinaryOp::Add => Some(a.wrapping_add(b)),
        BinaryOp::Sub => Some(a.wrapping_sub(b)),
        BinaryOp::Mul => Some(a.wrapping_mul(b)),
        BinaryOp::Div if b != 0 => Some(a.wrapping_div(b)),
        BinaryOp::Rem if b != 0 => Some(a.wrapping_rem(b)),
        _ => None,
    }
}

/// `int` results are computed in `i64` and wrapped back.
#[expect(clippy::cast_possible_truncation, reason = "wraps like int arithmetic")]
fn wrap_int(value: i64) -> i32 {
    value as i32
}

fn floating<F>(op: BinaryOp, a: F, b: F) -> Option<F>
where
    F: std::ops::Add<Output = F>
        + std::ops::Sub<Output = F>
        + std::ops::Mul<Output = F>
        + std::ops::Div<Output = F>
        + std::ops::Rem<Output = F>,
{
    match op {
        BinaryOp::Add => Some(a + b),
        BinaryOp::Sub => Some(a - b),
        BinaryOp::Mul => Some(a * b),
        BinaryOp::Div => Some(a / b),
        BinaryOp::Rem => Some(a % b),
        _ => None,
    }
}

/// Ordering and value equality at `kind`.
pub(super) fn compare(op: BinaryOp, kind: Prim, left: &Literal, right: &Literal) -> Option<Literal> {
    let result = match pair(kind, left, right)? {
        (Num::Boolean(a), Num::Boolean(b)) => match op {
            BinaryOp::Eq => a == b,
            BinaryOp::NotEq => a != b,
            _ => return None,
        },
        (Num::Int(a), Num::Int(b)) => ordered(op, a, b)?,
        (Num::Long(a), Num::Long(b)) => ordered(op, a, b)?,
        (Num::Float(a), Num::Float(b)) => ordered(op, a, b)?,
        (Num::Double(a), Num::Double(b)) => ordered(op, a, b)?,
        _ => return None,
    };
    Some(Literal::Boolean(result))
}

fn ordered<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> Option<bool> {
    match op {
        BinaryOp::Lt => Some(a < b),
        BinaryOp::LtEq => Some(a <= b),
        BinaryOp::Gt => Some(a > b),
        BinaryOp::GtEq => Some(a >= b),
        BinaryOp::Eq => Some(a == b),
        BinaryOp::NotEq => Some(a != b),
        _ => None,
    }
}

/// `==`/`!=` between string and null literals.
pub(super) fn references(op: BinaryOp, left: &Literal, right: &Literal) -> Option<Literal> {
    let equal = match (left, right) {
        (Literal::Null, Literal::Null) => true,
        (Literal::String(a), Literal::String(b)) => a == b,
        (Literal::Null, Literal::String(_)) | (Literal::String(_), Literal::Null) => false,
        _ => return None,
    };
    Some(Literal::Boolean(equal == (op == BinaryOp::Eq)))
}

/// Unary `-` at `kind`.
pub(super) fn negate(kind: Prim, literal: &Literal) -> Option<Literal> {
    let folded = match operand(literal, kind)? {
        Num::Int(v) => Literal::int(v.wrapping_neg()),
        Num::Long(v) => Literal::long(v.wrapping_neg()),
        Num::Float(v) => Literal::float(-v),
        Num::Double(v) => Literal::double(-v),
        Num::Boolean(_) => return None,
    };
    Some(folded)
}
