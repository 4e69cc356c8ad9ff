//! The routine interpreter.
//!
//! A [`Machine`] executes one routine on an operand stack. Routines that
//! touch binding state (captures, scratch, flags, counters, listeners and
//! the result lock) need a [`BindingInstance`]; one-shot routines of static
//! bindings run without one through [`evaluate`].
//!
//! Locks acquired by `LockAcquire` are tracked and released when the
//! routine fails, so an error never leaves a result cell locked.

mod numeric;

use std::rc::Rc;

use tracing::trace;
use vela_emit::{Op, Routine};
use vela_types::Prim;

use crate::error::{
    fault, index_out_of_bounds, missing_instance, no_such_member, null_reference, number_format,
    type_mismatch, RuntimeResult,
};
use crate::{BindingInstance, ClassRegistry, Value};

/// Run a routine that needs no binding instance and return the value it
/// leaves on the stack (`Null` when it leaves none).
pub fn evaluate(routine: &Routine, registry: &ClassRegistry, locals: &[Value]) -> RuntimeResult<Value> {
    let mut machine = Machine::new(registry, locals, None, 0);
    Ok(machine.run(routine)?.unwrap_or(Value::Null))
}

pub(crate) struct Machine<'a> {
    registry: &'a ClassRegistry,
    locals: &'a [Value],
    instance: Option<&'a BindingInstance>,
    step: u32,
    stack: Vec<Value>,
    held_locks: u32,
}

impl<'a> Machine<'a> {
    pub(crate) fn new(
        registry: &'a ClassRegistry,
        locals: &'a [Value],
        instance: Option<&'a BindingInstance>,
        step: u32,
    ) -> Self {
        Machine {
            registry,
            locals,
            instance,
            step,
            stack: Vec::with_capacity(16),
            held_locks: 0,
        }
    }

    pub(crate) fn run(&mut self, routine: &Routine) -> RuntimeResult<Option<Value>> {
        let result = self.execute(routine);
        if result.is_err() {
            self.release_held_locks();
        }
        result
    }

    fn release_held_locks(&mut self) {
        if let Some(instance) = self.instance {
            while self.held_locks > 0 {
                self.held_locks -= 1;
                // The routine's own error wins over one raised by a
                // deferred notification.
                let _ = instance.result().unlock();
            }
        }
    }

    fn instance(&self) -> RuntimeResult<&'a BindingInstance> {
        self.instance.ok_or_else(missing_instance)
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> RuntimeResult<Value> {
        self.stack
            .pop()
            .ok_or_else(|| fault("operand stack underflow"))
    }

    fn pop_int(&mut self) -> RuntimeResult<i32> {
        match self.pop()? {
            Value::Int(v) => Ok(v),
            other => Err(type_mismatch("int", other.kind_name())),
        }
    }

    fn pop_args(&mut self, argc: u8) -> RuntimeResult<Vec<Value>> {
        let count = usize::from(argc);
        if self.stack.len() < count {
            return Err(fault("operand stack underflow"));
        }
        Ok(self.stack.split_off(self.stack.len() - count))
    }

    fn execute(&mut self, routine: &Routine) -> RuntimeResult<Option<Value>> {
        let ops = routine.ops();
        let mut pc = 0;
        while let Some(op) = ops.get(pc) {
            pc += 1;
            match op {
                Op::PushNull => self.push(Value::Null),
                Op::PushBool(b) => self.push(Value::Bool(*b)),
                Op::PushInt(v) => self.push(Value::Int(*v)),
                Op::PushLong(v) => self.push(Value::Long(*v)),
                Op::PushFloat(v) => self.push(Value::Float(*v)),
                Op::PushDouble(v) => self.push(Value::Double(*v)),
                Op::PushChar(c) => self.push(Value::Char(*c)),
                Op::PushStr(s) => self.push(Value::Str(Rc::clone(s))),

                Op::LoadLocal(index) => {
                    let value = self
                        .locals
                        .get(*index as usize)
                        .cloned()
                        .ok_or_else(|| fault("local slot out of range"))?;
                    self.push(value);
                }
                Op::LoadCapture(slot) => {
                    let value = self.instance()?.capture(*slot)?;
                    self.push(value);
                }
                Op::StoreCapture(slot) => {
                    let value = self.pop()?;
                    self.instance()?.set_capture(*slot, value)?;
                }
                Op::LoadScratch(slot) => {
                    let value = self.instance()?.scratch(*slot)?;
                    self.push(value);
                }
                Op::StoreScratch(slot) => {
                    let value = self.pop()?;
                    self.instance()?.set_scratch(*slot, value)?;
                }
                Op::LoadStep => {
                    let step = i32::try_from(self.step).unwrap_or(i32::MAX);
                    self.push(Value::Int(step));
                }

                Op::Dup => {
                    let top = self.stack.last().cloned().ok_or_else(|| fault("operand stack underflow"))?;
                    self.push(top);
                }
                Op::Pop => {
                    self.pop()?;
                }
                Op::Swap => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(b);
                    self.push(a);
                }

                Op::GetProperty(name) => {
                    let value = match self.pop()? {
                        Value::Object(object) => object
                            .get(name)
                            .ok_or_else(|| no_such_member(&**name))?,
                        Value::Null => return Err(null_reference(format!("read of `{name}`"))),
                        other => return Err(type_mismatch("object", other.kind_name())),
                    };
                    self.push(value);
                }
                Op::GetObservable(name) => {
                    let cell = match self.pop()? {
                        Value::Object(object) => object
                            .observable(name)
                            .ok_or_else(|| no_such_member(&**name))?,
                        Value::Null => return Err(null_reference(format!("read of `{name}`"))),
                        other => return Err(type_mismatch("object", other.kind_name())),
                    };
                    self.push(Value::Cell(cell));
                }
                Op::ObservableValue => match self.pop()? {
                    Value::Cell(cell) => self.push(cell.get()),
                    Value::Null => return Err(null_reference("observable read")),
                    other => return Err(type_mismatch("observable", other.kind_name())),
                },
                Op::GetStatic(field) => {
                    let value = self.registry.static_value(*field)?;
                    self.push(value);
                }
                Op::Invoke { method, argc } => {
                    let args = self.pop_args(*argc)?;
                    let receiver = self.pop()?;
                    if receiver.is_null() {
                        let name = self.registry.method_name(*method).unwrap_or("method");
                        return Err(null_reference(format!("call of `{name}`")));
                    }
                    let mut all = Vec::with_capacity(args.len() + 1);
                    all.push(receiver);
                    all.extend(args);
                    let value = self.registry.invoke(*method, &all)?;
                    self.push(value);
                }
                Op::InvokeStatic { method, argc } | Op::Construct { method, argc } => {
                    let args = self.pop_args(*argc)?;
                    let value = self.registry.invoke(*method, &args)?;
                    self.push(value);
                }
                Op::CharAt => {
                    let index = self.pop_int()?;
                    let text = match self.pop()? {
                        Value::Str(s) => s,
                        Value::Null => return Err(null_reference("string index")),
                        other => return Err(type_mismatch("String", other.kind_name())),
                    };
                    let c = usize::try_from(index)
                        .ok()
                        .and_then(|i| text.chars().nth(i))
                        .ok_or_else(|| index_out_of_bounds(i64::from(index), text.chars().count()))?;
                    self.push(Value::string(c.to_string()));
                }

                Op::Arith { op, kind } => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(numeric::arith(*op, *kind, &a, &b)?);
                }
                Op::Neg(kind) => {
                    let a = self.pop()?;
                    self.push(numeric::negate(*kind, &a)?);
                }
                Op::Cmp { op, kind } => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(Value::Bool(numeric::compare(*op, *kind, &a, &b)?));
                }
                Op::RefEq => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(Value::Bool(a == b));
                }
                Op::Not => {
                    let a = self.pop()?.as_bool()?;
                    self.push(Value::Bool(!a));
                }
                Op::Concat => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    let joined = format!(
                        "{}{}",
                        self.registry.to_host_string(&a),
                        self.registry.to_host_string(&b)
                    );
                    self.push(Value::string(joined));
                }
                Op::Convert { to, .. } => {
                    let a = self.pop()?;
                    self.push(numeric::convert(&a, *to)?);
                }

                Op::Box(_) => {}
                Op::Unbox(prim) => {
                    if self.stack.last().is_some_and(Value::is_null) {
                        return Err(null_reference(format!("unboxing to {}", prim.name())));
                    }
                }
                Op::ParseNumber(prim) => {
                    let text = self.pop_text("number parse")?;
                    self.push(numeric::parse(&text, *prim)?);
                }
                Op::ParseBool => {
                    let text = self.pop_text("boolean parse")?;
                    self.push(Value::Bool(text.eq_ignore_ascii_case("true")));
                }
                Op::ParseChar => {
                    let text = self.pop_text("char parse")?;
                    let mut chars = text.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => self.push(Value::Char(c)),
                        _ => return Err(number_format(&text, Prim::Char.name())),
                    }
                }
                Op::ToStr => {
                    let a = self.pop()?;
                    self.push(Value::string(self.registry.to_host_string(&a)));
                }
                Op::EnumValueOf(class) => {
                    let text = self.pop_text("enum lookup")?;
                    self.push(self.registry.enum_value_of(*class, &text)?);
                }

                Op::Jump(label) => pc = routine.target(*label),
                Op::JumpIfFalse(label) => {
                    if !self.pop()?.as_bool()? {
                        pc = routine.target(*label);
                    }
                }
                Op::JumpIfTrue(label) => {
                    if self.pop()?.as_bool()? {
                        pc = routine.target(*label);
                    }
                }
                Op::JumpIfNull(label) => {
                    if self.pop()?.is_null() {
                        pc = routine.target(*label);
                    }
                }
                Op::JumpIfNonNull(label) => {
                    if !self.pop()?.is_null() {
                        pc = routine.target(*label);
                    }
                }
                Op::JumpIfSame(label) => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    if a.same(&b) {
                        pc = routine.target(*label);
                    }
                }
                Op::JumpIfZero(label) => {
                    if self.pop_int()? == 0 {
                        pc = routine.target(*label);
                    }
                }
                Op::TableSwitch {
                    low,
                    targets,
                    default,
                } => {
                    let value = i64::from(self.pop_int()?) - i64::from(*low);
                    let target = usize::try_from(value)
                        .ok()
                        .and_then(|i| targets.get(i))
                        .unwrap_or(default);
                    pc = routine.target(*target);
                }

                Op::FlagTest { mask } => {
                    let set = self.instance()?.flag_word(0)? & mask != 0;
                    self.push(Value::Bool(set));
                }
                Op::FlagAssign { mask, value } => {
                    self.instance()?.update_flag_word(0, *mask, *value)?;
                }
                Op::BitTest(bit) => {
                    let set = self.instance()?.flag_word(bit / 64)? & (1 << (bit % 64)) != 0;
                    self.push(Value::Bool(set));
                }
                Op::BitAssign { bit, value } => {
                    self.instance()?
                        .update_flag_word(bit / 64, 1 << (bit % 64), *value)?;
                }
                Op::CounterLoad(counter) => {
                    let value = self.instance()?.counter(*counter)?;
                    self.push(Value::Int(value));
                }
                Op::CounterAdd { counter, delta } => {
                    self.instance()?.add_to_counter(*counter, *delta)?;
                }

                Op::Subscribe(step) => {
                    if let Value::Cell(cell) = self.pop()? {
                        self.instance()?.subscribe(&cell, *step);
                    }
                }
                Op::Unsubscribe(step) => {
                    if let Value::Cell(cell) = self.pop()? {
                        self.instance()?.unsubscribe(&cell, *step);
                    }
                }
                Op::Publish => {
                    let value = self.pop()?;
                    self.instance()?.result().set(value)?;
                }
                Op::LockAcquire => {
                    self.instance()?.result().lock();
                    self.held_locks += 1;
                }
                Op::LockRelease => {
                    let instance = self.instance()?;
                    self.held_locks = self.held_locks.saturating_sub(1);
                    instance.result().unlock()?;
                }
                Op::Fault(message) => return Err(fault(message)),
                Op::Return => {
                    trace!(depth = self.stack.len(), "return");
                    return Ok(self.stack.pop());
                }
            }
        }
        Ok(self.stack.pop())
    }

    fn pop_text(&mut self, operation: &str) -> RuntimeResult<Rc<str>> {
        match self.pop()? {
            Value::Str(s) => Ok(s),
            Value::Null => Err(null_reference(operation)),
            other => Err(type_mismatch("String", other.kind_name())),
        }
    }
}

#[cfg(test)]
mod tests;
