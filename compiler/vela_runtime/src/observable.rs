//! Observable cells and their listener lists.
//!
//! A cell notifies its listeners whenever its value changes identity. The
//! listener list can be locked: while any lock is held, notifications are
//! deferred and delivered once when the last lock is released. Binding
//! instances hold this lock on their result cell for the duration of an
//! update, so listeners of the result never see a half-computed value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::trace;

use crate::error::RuntimeResult;
use crate::{BindingInstance, Value};

/// A change listener.
#[derive(Clone)]
pub enum Listener {
    /// Re-run a binding's update routine at `step`.
    Binding {
        instance: Weak<BindingInstance>,
        step: u32,
    },
    /// Host callback receiving the new value.
    Callback(Rc<dyn Fn(&Value) -> RuntimeResult<()>>),
}

impl Listener {
    fn is_binding(&self, target: &Weak<BindingInstance>, tag: u32) -> bool {
        matches!(self, Listener::Binding { instance, step } if *step == tag && instance.ptr_eq(target))
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Binding { step, .. } => write!(f, "Binding(step {step})"),
            Listener::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// A value with change notification.
pub struct ObservableValue {
    value: RefCell<Value>,
    listeners: RefCell<Vec<Listener>>,
    lock_depth: Cell<u32>,
    pending: Cell<bool>,
}

impl ObservableValue {
    pub fn new(value: Value) -> Rc<Self> {
        Rc::new(ObservableValue {
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
            lock_depth: Cell::new(0),
            pending: Cell::new(false),
        })
    }

    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Store `value` and notify listeners if it differs from the current
    /// value.
    pub fn set(&self, value: Value) -> RuntimeResult<()> {
        if self.value.borrow().same(&value) {
            return Ok(());
        }
        *self.value.borrow_mut() = value;
        self.fire()
    }

    pub fn add_listener(&self, listener: Listener) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Remove one binding listener with the given step tag. Returns whether
    /// one was found.
    pub fn remove_binding_listener(&self, instance: &Weak<BindingInstance>, step: u32) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|l| l.is_binding(instance, step)) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of binding listeners attached by `instance`.
    pub fn binding_listener_count(&self, instance: &Weak<BindingInstance>) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| matches!(l, Listener::Binding { instance: i, .. } if i.ptr_eq(instance)))
            .count()
    }

    pub fn lock(&self) {
        self.lock_depth.set(self.lock_depth.get() + 1);
    }

    /// Release one lock; the last release delivers a deferred notification.
    pub fn unlock(&self) -> RuntimeResult<()> {
        let depth = self.lock_depth.get().saturating_sub(1);
        self.lock_depth.set(depth);
        if depth == 0 && self.pending.replace(false) {
            return self.fire();
        }
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.lock_depth.get() > 0
    }

    fn fire(&self) -> RuntimeResult<()> {
        if self.is_locked() {
            self.pending.set(true);
            return Ok(());
        }
        // Listeners may add or remove listeners on this cell.
        let snapshot: SmallVec<[Listener; 4]> = self.listeners.borrow().iter().cloned().collect();
        trace!(listeners = snapshot.len(), "notify");
        for listener in snapshot {
            match listener {
                Listener::Binding { instance, step } => {
                    if let Some(instance) = instance.upgrade() {
                        instance.update(step)?;
                    }
                }
                Listener::Callback(callback) => callback(&self.get())?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ObservableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableValue")
            .field("value", &*self.value.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .field("lock_depth", &self.lock_depth.get())
            .finish()
    }
}

#[cfg(test)]
mod tests;
