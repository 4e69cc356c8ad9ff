//! Host objects.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use vela_types::ClassId;

use crate::error::RuntimeResult;
use crate::{Listener, ObservableValue, Value};

/// Storage of one property.
#[derive(Clone, Debug)]
pub enum Slot {
    Plain(Value),
    Observable(Rc<ObservableValue>),
}

/// An instance of a host class: a class id plus named property slots.
pub struct HostObject {
    class: ClassId,
    slots: RefCell<FxHashMap<Rc<str>, Slot>>,
}

impl HostObject {
    pub fn new(class: ClassId) -> Self {
        HostObject {
            class,
            slots: RefCell::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn with_property(self, name: &str, value: Value) -> Self {
        self.slots.borrow_mut().insert(name.into(), Slot::Plain(value));
        self
    }

    #[must_use]
    pub fn with_observable(self, name: &str, value: Value) -> Self {
        self.slots
            .borrow_mut()
            .insert(name.into(), Slot::Observable(ObservableValue::new(value)));
        self
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Current value of a property, reading through observable cells.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.slots.borrow().get(name)? {
            Slot::Plain(value) => Some(value.clone()),
            Slot::Observable(cell) => Some(cell.get()),
        }
    }

    /// The observable cell behind a property.
    pub fn observable(&self, name: &str) -> Option<Rc<ObservableValue>> {
        match self.slots.borrow().get(name)? {
            Slot::Observable(cell) => Some(Rc::clone(cell)),
            Slot::Plain(_) => None,
        }
    }

    /// Write a property. Observable properties notify their listeners.
    pub fn set(&self, name: &str, value: Value) -> RuntimeResult<()> {
        let cell = {
            let mut slots = self.slots.borrow_mut();
            match slots.get_mut(name) {
                Some(Slot::Observable(cell)) => Rc::clone(cell),
                Some(Slot::Plain(slot)) => {
                    *slot = value;
                    return Ok(());
                }
                None => {
                    slots.insert(name.into(), Slot::Plain(value));
                    return Ok(());
                }
            }
        };
        cell.set(value)
    }

    /// Keep property `name` equal to `source` from now on.
    ///
    /// The current value is copied immediately; later changes of `source`
    /// are written through while this object is alive.
    pub fn bind(self: &Rc<Self>, name: &str, source: &ObservableValue) -> RuntimeResult<()> {
        self.set(name, source.get())?;
        let target: Weak<HostObject> = Rc::downgrade(self);
        let name: Rc<str> = name.into();
        source.add_listener(Listener::Callback(Rc::new(move |value: &Value| {
            match target.upgrade() {
                Some(object) => object.set(&name, value.clone()),
                None => Ok(()),
            }
        })));
        Ok(())
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("class", &self.class)
            .field("slots", &self.slots.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
