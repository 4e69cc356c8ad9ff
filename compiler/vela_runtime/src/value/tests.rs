use std::rc::Rc;

use vela_ir::Literal;
use vela_types::{ClassId, Prim};

use super::*;

#[test]
fn literals_map_to_their_kinds() {
    assert_eq!(Value::from_literal(&Literal::int(3)), Value::Int(3));
    assert_eq!(Value::from_literal(&Literal::long(3)), Value::Long(3));
    assert_eq!(Value::from_literal(&Literal::float(1.5)), Value::Float(1.5));
    assert_eq!(Value::from_literal(&Literal::string("a")), Value::string("a"));
    assert_eq!(Value::from_literal(&Literal::Null), Value::Null);
}

#[test]
fn boxed_numbers_of_different_kinds_differ() {
    assert_ne!(Value::Int(3), Value::Long(3));
    assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
}

#[test]
fn objects_compare_by_identity() {
    let a = Rc::new(HostObject::new(ClassId::from_raw(0)));
    let b = Rc::new(HostObject::new(ClassId::from_raw(0)));
    assert!(Value::Object(Rc::clone(&a)).same(&Value::Object(Rc::clone(&a))));
    assert!(!Value::Object(a).same(&Value::Object(b)));
}

#[test]
fn integral_views() {
    assert_eq!(Value::Char('A').as_i64().unwrap(), 65);
    assert_eq!(Value::Int(-2).as_f64().unwrap(), -2.0);
    assert!(Value::string("1").as_i64().is_err());
}

#[test]
fn zero_defaults() {
    assert_eq!(Value::zero(Prim::Boolean), Value::Bool(false));
    assert_eq!(Value::zero(Prim::Char), Value::Char('\0'));
    assert_eq!(Value::zero(Prim::Double), Value::Double(0.0));
}
