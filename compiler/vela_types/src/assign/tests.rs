use std::rc::Rc;

use pretty_assertions::assert_eq;
use smallvec::smallvec;

use super::*;
use crate::{ClassId, FieldInfo, MemberFlags, MethodId, Prim, PropertyInfo};

const SHAPE: ClassId = ClassId::from_raw(0);
const CIRCLE: ClassId = ClassId::from_raw(1);
const COLOR: ClassId = ClassId::from_raw(2);

/// Three classes: `Circle extends Shape`, and an unrelated `Color`.
struct Shapes;

impl TypeModel for Shapes {
    fn resolve_type(&self, name: &str) -> Option<Ty> {
        match name {
            "Shape" => Some(Ty::Class(SHAPE)),
            "Circle" => Some(Ty::Class(CIRCLE)),
            "Color" => Some(Ty::Class(COLOR)),
            _ => None,
        }
    }

    fn class_name(&self, class: ClassId) -> String {
        ["Shape", "Circle", "Color"][class.index()].to_owned()
    }

    fn superclass(&self, class: ClassId) -> Option<ClassId> {
        (class == CIRCLE).then_some(SHAPE)
    }

    fn property(&self, _owner: Ty, _name: &str) -> Option<PropertyInfo> {
        None
    }

    fn methods(&self, _owner: Ty, _name: &str, _arity: usize) -> Vec<MethodInfo> {
        Vec::new()
    }

    fn static_methods(&self, _owner: Ty, _name: &str, _arity: usize) -> Vec<MethodInfo> {
        Vec::new()
    }

    fn constructors(&self, _owner: Ty, _arity: usize) -> Vec<MethodInfo> {
        Vec::new()
    }

    fn static_field(&self, _owner: Ty, _name: &str) -> Option<FieldInfo> {
        None
    }

    fn enum_constants(&self, _owner: Ty) -> Option<Vec<Rc<str>>> {
        None
    }
}

#[test]
fn identical_types_are_assignable() {
    assert!(is_assignable(&Shapes, Ty::INT, Ty::INT));
    assert!(is_assignable(&Shapes, Ty::Str, Ty::Str));
}

#[test]
fn null_goes_to_references_only() {
    assert!(is_assignable(&Shapes, Ty::Null, Ty::Str));
    assert!(is_assignable(&Shapes, Ty::Null, Ty::Boxed(Prim::Int)));
    assert!(!is_assignable(&Shapes, Ty::Null, Ty::INT));
}

#[test]
fn subclass_into_superclass() {
    assert!(is_assignable(&Shapes, Ty::Class(CIRCLE), Ty::Class(SHAPE)));
    assert!(!is_assignable(&Shapes, Ty::Class(SHAPE), Ty::Class(CIRCLE)));
    assert!(!is_assignable(&Shapes, Ty::Class(COLOR), Ty::Class(SHAPE)));
}

#[test]
fn boxing_is_not_assignment() {
    assert!(!is_assignable(&Shapes, Ty::INT, Ty::Boxed(Prim::Int)));
    assert!(!is_assignable(&Shapes, Ty::Boxed(Prim::Int), Ty::INT));
    assert!(!is_assignable(&Shapes, Ty::INT, Ty::Object));
    assert!(is_assignable(&Shapes, Ty::Boxed(Prim::Int), Ty::Object));
}

#[test]
fn no_widening_without_conversion() {
    assert!(!is_assignable(&Shapes, Ty::INT, Ty::LONG));
}

#[test]
fn display_names() {
    assert_eq!(display(&Shapes, Ty::Class(CIRCLE)), "Circle");
    assert_eq!(display(&Shapes, Ty::Boxed(Prim::Char)), "Character");
    assert_eq!(display(&Shapes, Ty::DOUBLE), "double");
}

#[test]
fn method_signature() {
    let method = MethodInfo {
        id: MethodId::from_raw(7),
        owner: Ty::Class(SHAPE),
        name: "scale".into(),
        params: smallvec![Ty::DOUBLE, Ty::Class(COLOR)],
        ret: Ty::Class(SHAPE),
        flags: MemberFlags::ACCESSIBLE,
    };
    assert_eq!(signature(&Shapes, &method), "scale(double, Color)");
}
