//! The stack-machine instruction set.

use std::fmt;
use std::rc::Rc;

use vela_ir::BinaryOp;
use vela_types::{ClassId, FieldId, MethodId, Prim};

use crate::Label;

/// One instruction.
///
/// Operands are popped right to left: for `Invoke { argc: 2 }` the stack
/// holds `receiver, arg0, arg1` with `arg1` on top.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    // Constants
    PushNull,
    PushBool(bool),
    PushInt(i32),
    PushLong(i64),
    PushFloat(f32),
    PushDouble(f64),
    PushChar(char),
    PushStr(Rc<str>),

    // Slots
    /// Value of a local in the host frame.
    LoadLocal(u32),
    LoadCapture(u32),
    StoreCapture(u32),
    LoadScratch(u32),
    StoreScratch(u32),
    /// The `step` argument of the update routine, as `int`.
    LoadStep,

    // Stack
    Dup,
    Pop,
    Swap,

    // Members
    /// `object -> value`; reads through observable cells.
    GetProperty(Rc<str>),
    /// `object -> cell`; the property's observable cell itself.
    GetObservable(Rc<str>),
    /// `cell -> value`
    ObservableValue,
    GetStatic(FieldId),
    Invoke { method: MethodId, argc: u8 },
    InvokeStatic { method: MethodId, argc: u8 },
    Construct { method: MethodId, argc: u8 },
    /// `string, int -> string` holding the one character at the index.
    CharAt,

    // Operators
    /// Arithmetic computed in `kind`; integral division by zero faults.
    Arith { op: BinaryOp, kind: Prim },
    Neg(Prim),
    /// Comparison or equality computed in `kind`, pushes `boolean`.
    Cmp { op: BinaryOp, kind: Prim },
    /// Value equality of two references, pushes `boolean`.
    RefEq,
    Not,
    /// `string, string -> string`
    Concat,
    /// Primitive cast.
    Convert { from: Prim, to: Prim },

    // Conversions
    Box(Prim),
    /// Faults on `null`.
    Unbox(Prim),
    /// Parse a string into the primitive; faults on malformed text.
    ParseNumber(Prim),
    ParseBool,
    ParseChar,
    /// String form of any value; `null` becomes `"null"`.
    ToStr,
    /// Look up an enum constant by name, with the case-insensitive and
    /// constant-case fallbacks.
    EnumValueOf(ClassId),

    // Control flow
    Jump(Label),
    JumpIfFalse(Label),
    JumpIfTrue(Label),
    JumpIfNull(Label),
    JumpIfNonNull(Label),
    /// Pops two values and jumps when they are the same object.
    JumpIfSame(Label),
    /// Pops an `int` and jumps when it is zero.
    JumpIfZero(Label),
    /// Pops an `int` and jumps to `targets[value - low]`, or `default`.
    TableSwitch {
        low: u32,
        targets: Vec<Label>,
        default: Label,
    },

    // Persistent state
    /// Single-word flag storage: push whether `mask` is set.
    FlagTest { mask: u64 },
    FlagAssign { mask: u64, value: bool },
    /// Multi-word flag storage.
    BitTest(u32),
    BitAssign { bit: u32, value: bool },
    CounterLoad(u32),
    CounterAdd { counter: u32, delta: i32 },

    // Binding protocol
    /// Pops a cell and attaches this binding's listener tagged with `step`.
    Subscribe(u32),
    /// Pops a cell and detaches the listener tagged with `step`.
    Unsubscribe(u32),
    /// Pops the computed value and stores it in the binding result.
    Publish,
    LockAcquire,
    LockRelease,
    /// Internal consistency fault.
    Fault(Rc<str>),
    Return,
}

impl Op {
    /// Labels this instruction may transfer control to.
    pub fn targets(&self) -> Vec<Label> {
        match self {
            Op::Jump(l)
            | Op::JumpIfFalse(l)
            | Op::JumpIfTrue(l)
            | Op::JumpIfNull(l)
            | Op::JumpIfNonNull(l)
            | Op::JumpIfSame(l)
            | Op::JumpIfZero(l) => vec![*l],
            Op::TableSwitch {
                targets, default, ..
            } => targets.iter().chain(std::iter::once(default)).copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Whether execution never falls through to the next instruction.
    pub const fn is_terminator(&self) -> bool {
        matches!(
            self,
            Op::Jump(_) | Op::TableSwitch { .. } | Op::Fault(_) | Op::Return
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::PushStr(s) => write!(f, "PushStr {s:?}"),
            Op::GetProperty(name) => write!(f, "GetProperty {name}"),
            Op::GetObservable(name) => write!(f, "GetObservable {name}"),
            Op::Arith { op, kind } => write!(f, "Arith {} {}", op.as_symbol(), kind.name()),
            Op::Cmp { op, kind } => write!(f, "Cmp {} {}", op.as_symbol(), kind.name()),
            Op::Convert { from, to } => write!(f, "Convert {} -> {}", from.name(), to.name()),
            Op::FlagTest { mask } => write!(f, "FlagTest {mask:#x}"),
            Op::FlagAssign { mask, value } => write!(f, "FlagAssign {mask:#x} = {value}"),
            Op::TableSwitch {
                low,
                targets,
                default,
            } => {
                write!(f, "TableSwitch {low}: [")?;
                for (i, target) in targets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{target}")?;
                }
                write!(f, "] else {default}")
            }
            other => write!(f, "{other:?}"),
        }
    }
}
