use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

fn recorder(cell: &ObservableValue) -> Rc<RefCell<Vec<Value>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    cell.add_listener(Listener::Callback(Rc::new(move |v: &Value| {
        sink.borrow_mut().push(v.clone());
        Ok(())
    })));
    seen
}

#[test]
fn set_notifies_on_change_only() {
    let cell = ObservableValue::new(Value::Int(1));
    let seen = recorder(&cell);
    cell.set(Value::Int(1)).unwrap();
    cell.set(Value::Int(2)).unwrap();
    assert_eq!(*seen.borrow(), vec![Value::Int(2)]);
}

#[test]
fn lock_defers_and_coalesces() {
    let cell = ObservableValue::new(Value::Int(0));
    let seen = recorder(&cell);
    cell.lock();
    cell.lock();
    cell.set(Value::Int(1)).unwrap();
    cell.set(Value::Int(2)).unwrap();
    cell.unlock().unwrap();
    assert!(seen.borrow().is_empty());
    cell.unlock().unwrap();
    assert_eq!(*seen.borrow(), vec![Value::Int(2)]);
    assert!(!cell.is_locked());
}

#[test]
fn unlock_without_changes_is_silent() {
    let cell = ObservableValue::new(Value::Null);
    let seen = recorder(&cell);
    cell.lock();
    cell.unlock().unwrap();
    assert!(seen.borrow().is_empty());
}

#[test]
fn dead_binding_listeners_are_skipped() {
    let cell = ObservableValue::new(Value::Int(0));
    cell.add_listener(Listener::Binding {
        instance: Weak::new(),
        step: 1,
    });
    cell.set(Value::Int(5)).unwrap();
    assert_eq!(cell.listener_count(), 1);
}

#[test]
fn binding_listeners_are_removed_by_step() {
    let cell = ObservableValue::new(Value::Int(0));
    let nobody: Weak<BindingInstance> = Weak::new();
    cell.add_listener(Listener::Binding {
        instance: nobody.clone(),
        step: 1,
    });
    cell.add_listener(Listener::Binding {
        instance: nobody.clone(),
        step: 2,
    });
    assert!(cell.remove_binding_listener(&nobody, 2));
    assert!(!cell.remove_binding_listener(&nobody, 2));
    assert_eq!(cell.binding_listener_count(&nobody), 1);
}
