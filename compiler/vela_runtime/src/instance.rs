//! Live dynamic bindings.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::{debug, trace};
use vela_emit::ArtifactImage;

use crate::error::{fault, RuntimeResult};
use crate::machine::Machine;
use crate::{ClassRegistry, HostObject, Listener, ObservableValue, Value};

#[derive(Debug)]
struct State {
    captures: Vec<Value>,
    scratch: Vec<Value>,
    flags: Vec<u64>,
    counters: Vec<i32>,
}

/// One instantiated dynamic binding.
///
/// Owns the private state the artifact describes and the result cell the
/// computed value is published to. Listeners it attaches to observed cells
/// hold only a weak reference, so dropping the last `Rc` ends the binding.
pub struct BindingInstance {
    image: Rc<ArtifactImage>,
    registry: Rc<ClassRegistry>,
    state: RefCell<State>,
    result: Rc<ObservableValue>,
    /// Steps requested while an update held the result lock.
    queued: RefCell<SmallVec<[u32; 4]>>,
    this: Weak<BindingInstance>,
}

impl BindingInstance {
    /// Instantiate `image`: run `init` in the host frame given by `locals`,
    /// then evaluate from scratch.
    pub fn create(
        image: Rc<ArtifactImage>,
        registry: Rc<ClassRegistry>,
        locals: &[Value],
    ) -> RuntimeResult<Rc<Self>> {
        let state = State {
            captures: vec![Value::Null; image.captures as usize],
            scratch: vec![Value::Null; image.scratch as usize],
            flags: vec![0; image.flags.words() as usize],
            counters: vec![0; image.counters as usize],
        };
        let instance = Rc::new_cyclic(|this| BindingInstance {
            image,
            registry,
            state: RefCell::new(state),
            result: ObservableValue::new(Value::Null),
            queued: RefCell::new(SmallVec::new()),
            this: this.clone(),
        });
        Machine::new(&instance.registry, locals, Some(&*instance), 0).run(&instance.image.init)?;
        instance.update(0)?;
        Ok(instance)
    }

    /// Re-evaluate starting at `step`.
    ///
    /// A call arriving while an update is in progress is queued and runs
    /// after the lock is released: a single queued step resumes from that
    /// step, several queued steps resume from scratch.
    pub fn update(&self, step: u32) -> RuntimeResult<()> {
        if self.result.is_locked() {
            trace!(step, "update deferred");
            self.queued.borrow_mut().push(step);
            return Ok(());
        }
        self.run_update(step)?;
        loop {
            let queued = std::mem::take(&mut *self.queued.borrow_mut());
            let next = match queued.as_slice() {
                [] => break,
                [only] => *only,
                _ => 0,
            };
            self.run_update(next)?;
        }
        Ok(())
    }

    fn run_update(&self, step: u32) -> RuntimeResult<()> {
        debug!(step, "update");
        Machine::new(&self.registry, &[], Some(self), step).run(&self.image.update)?;
        Ok(())
    }

    /// Cell the computed value is published to.
    pub fn result(&self) -> &Rc<ObservableValue> {
        &self.result
    }

    pub fn value(&self) -> Value {
        self.result.get()
    }

    pub fn image(&self) -> &ArtifactImage {
        &self.image
    }

    /// Drive `target.property` from this binding's result.
    pub fn bind_to(&self, target: &Rc<HostObject>, property: &str) -> RuntimeResult<()> {
        target.bind(property, &self.result)
    }

    /// Listeners this binding currently has on `cell`.
    pub fn subscriptions_on(&self, cell: &ObservableValue) -> usize {
        cell.binding_listener_count(&self.this)
    }

    pub(crate) fn capture(&self, slot: u32) -> RuntimeResult<Value> {
        self.state
            .borrow()
            .captures
            .get(slot as usize)
            .cloned()
            .ok_or_else(|| fault("capture slot out of range"))
    }

    pub(crate) fn set_capture(&self, slot: u32, value: Value) -> RuntimeResult<()> {
        let mut state = self.state.borrow_mut();
        let target = state
            .captures
            .get_mut(slot as usize)
            .ok_or_else(|| fault("capture slot out of range"))?;
        *target = value;
        Ok(())
    }

    pub(crate) fn scratch(&self, slot: u32) -> RuntimeResult<Value> {
        self.state
            .borrow()
            .scratch
            .get(slot as usize)
            .cloned()
            .ok_or_else(|| fault("scratch slot out of range"))
    }

    pub(crate) fn set_scratch(&self, slot: u32, value: Value) -> RuntimeResult<()> {
        let mut state = self.state.borrow_mut();
        let target = state
            .scratch
            .get_mut(slot as usize)
            .ok_or_else(|| fault("scratch slot out of range"))?;
        *target = value;
        Ok(())
    }

    pub(crate) fn flag_word(&self, word: u32) -> RuntimeResult<u64> {
        self.state
            .borrow()
            .flags
            .get(word as usize)
            .copied()
            .ok_or_else(|| fault("flag word out of range"))
    }

    pub(crate) fn update_flag_word(&self, word: u32, mask: u64, value: bool) -> RuntimeResult<()> {
        let mut state = self.state.borrow_mut();
        let bits = state
            .flags
            .get_mut(word as usize)
            .ok_or_else(|| fault("flag word out of range"))?;
        if value {
            *bits |= mask;
        } else {
            *bits &= !mask;
        }
        Ok(())
    }

    pub(crate) fn counter(&self, counter: u32) -> RuntimeResult<i32> {
        self.state
            .borrow()
            .counters
            .get(counter as usize)
            .copied()
            .ok_or_else(|| fault("counter out of range"))
    }

    pub(crate) fn add_to_counter(&self, counter: u32, delta: i32) -> RuntimeResult<()> {
        let mut state = self.state.borrow_mut();
        let value = state
            .counters
            .get_mut(counter as usize)
            .ok_or_else(|| fault("counter out of range"))?;
        *value += delta;
        Ok(())
    }

    pub(crate) fn subscribe(&self, cell: &ObservableValue, step: u32) {
        trace!(step, "subscribe");
        cell.add_listener(Listener::Binding {
            instance: self.this.clone(),
            step,
        });
    }

    pub(crate) fn unsubscribe(&self, cell: &ObservableValue, step: u32) {
        trace!(step, "unsubscribe");
        cell.remove_binding_listener(&self.this, step);
    }
}
