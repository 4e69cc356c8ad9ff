use std::rc::Rc;

use pretty_assertions::assert_eq;
use vela_types::ClassId;

use super::*;

fn person() -> HostObject {
    HostObject::new(ClassId::from_raw(3))
        .with_property("id", Value::Int(7))
        .with_observable("name", Value::string("Ada"))
}

#[test]
fn get_reads_through_cells() {
    let p = person();
    assert_eq!(p.get("id"), Some(Value::Int(7)));
    assert_eq!(p.get("name"), Some(Value::string("Ada")));
    assert_eq!(p.get("missing"), None);
}

#[test]
fn only_observable_properties_have_cells() {
    let p = person();
    assert!(p.observable("name").is_some());
    assert!(p.observable("id").is_none());
}

#[test]
fn set_goes_through_the_cell() {
    let p = person();
    let cell = p.observable("name").unwrap();
    p.set("name", Value::string("Grace")).unwrap();
    assert_eq!(cell.get(), Value::string("Grace"));
}

#[test]
fn bind_follows_the_source() {
    let label = Rc::new(HostObject::new(ClassId::from_raw(4)).with_observable("text", Value::Null));
    let source = ObservableValue::new(Value::string("a"));
    label.bind("text", &source).unwrap();
    assert_eq!(label.get("text"), Some(Value::string("a")));
    source.set(Value::string("b")).unwrap();
    assert_eq!(label.get("text"), Some(Value::string("b")));
}

#[test]
fn bind_stops_after_target_is_dropped() {
    let source = ObservableValue::new(Value::Int(1));
    {
        let target = Rc::new(HostObject::new(ClassId::from_raw(4)));
        target.bind("value", &source).unwrap();
    }
    source.set(Value::Int(2)).unwrap();
    assert_eq!(source.get(), Value::Int(2));
}
