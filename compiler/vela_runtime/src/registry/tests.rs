use pretty_assertions::assert_eq;
use vela_types::{is_assignable, MemberFlags, Prim, Ty, TypeModel};

use super::*;

fn shapes() -> (ClassRegistry, ClassId, ClassId) {
    let mut reg = ClassRegistry::new();
    let shape = reg.define_class("Shape", None);
    let circle = reg.define_class("Circle", Some(shape));
    reg.add_property(
        shape,
        "name",
        Ty::Str,
        MemberFlags::ACCESSIBLE | MemberFlags::OBSERVABLE,
    );
    reg.add_method(Ty::Class(shape), "area", &[], Ty::DOUBLE, |_, _| {
        Ok(Value::Double(0.0))
    });
    reg.add_method(Ty::Class(circle), "area", &[], Ty::DOUBLE, |_, _| {
        Ok(Value::Double(3.0))
    });
    (reg, shape, circle)
}

#[test]
fn builtin_type_names_resolve() {
    let reg = ClassRegistry::new();
    assert_eq!(reg.resolve_type("String"), Some(Ty::Str));
    assert_eq!(reg.resolve_type("Integer"), Some(Ty::Boxed(Prim::Int)));
    assert!(matches!(reg.resolve_type("Math"), Some(Ty::Class(_))));
    assert_eq!(reg.resolve_type("Nope"), None);
}

#[test]
fn properties_are_inherited() {
    let (reg, _, circle) = shapes();
    let name = reg.property(Ty::Class(circle), "name").unwrap();
    assert!(name.is_observable());
    assert_eq!(name.ty, Ty::Str);
}

#[test]
fn overrides_hide_inherited_methods() {
    let (reg, _, circle) = shapes();
    let found = reg.methods(Ty::Class(circle), "area", 0);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].owner, Ty::Class(circle));
}

#[test]
fn object_methods_apply_to_everything_referential() {
    let (reg, shape, _) = shapes();
    assert_eq!(reg.methods(Ty::Class(shape), "toString", 0).len(), 1);
    assert_eq!(reg.methods(Ty::Str, "toString", 0).len(), 1);
    assert!(reg.methods(Ty::INT, "toString", 0).is_empty());
}

#[test]
fn overloads_filtered_by_arity() {
    let reg = ClassRegistry::new();
    assert_eq!(reg.methods(Ty::Str, "substring", 1).len(), 1);
    assert_eq!(reg.methods(Ty::Str, "substring", 2).len(), 1);
    let math = reg.resolve_type("Math").unwrap();
    assert_eq!(reg.static_methods(math, "max", 2).len(), 3);
}

#[test]
fn enums_expose_constants_and_fields() {
    let mut reg = ClassRegistry::new();
    let color = reg.define_enum("Color", &["RED", "DARK_BLUE"]);
    let ty = Ty::Class(color);
    assert_eq!(
        reg.enum_constants(ty).unwrap(),
        vec![Rc::<str>::from("RED"), Rc::<str>::from("DARK_BLUE")]
    );
    let field = reg.static_field(ty, "DARK_BLUE").unwrap();
    assert_eq!(
        reg.static_value(field.id).unwrap(),
        Value::Enum(EnumValue {
            class: color,
            name: "DARK_BLUE".into()
        })
    );
    assert_eq!(
        reg.enum_value_of(color, "darkBlue").unwrap(),
        reg.static_value(field.id).unwrap()
    );
    assert!(reg.enum_value_of(color, "green").is_err());
}

#[test]
fn registry_drives_assignability() {
    let (reg, shape, circle) = shapes();
    assert!(is_assignable(&reg, Ty::Class(circle), Ty::Class(shape)));
    assert!(!is_assignable(&reg, Ty::Class(shape), Ty::Class(circle)));
}

#[test]
fn invoke_runs_the_implementation() {
    let reg = ClassRegistry::new();
    let length = reg.methods(Ty::Str, "length", 0).remove(0);
    assert_eq!(
        reg.invoke(length.id, &[Value::string("héllo")]).unwrap(),
        Value::Int(5)
    );
}

#[test]
fn host_strings() {
    let reg = ClassRegistry::new();
    assert_eq!(reg.to_host_string(&Value::Double(2.0)), "2.0");
    assert_eq!(reg.to_host_string(&Value::Float(0.5)), "0.5");
    assert_eq!(reg.to_host_string(&Value::Null), "null");
    assert_eq!(reg.to_host_string(&Value::Char('x')), "x");
}
