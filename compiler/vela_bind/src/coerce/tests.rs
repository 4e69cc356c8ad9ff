use std::rc::Rc;

use pretty_assertions::assert_eq;
use vela_diagnostic::CompileErrorKind;
use vela_emit::{Op, RenderCommand, RoutineBuilder};
use vela_runtime::{evaluate, ClassRegistry, EnumValue, Value};
use vela_types::{Prim, Ty};

use super::*;

fn ops(command: &RenderCommand) -> Vec<Op> {
    let mut b = RoutineBuilder::new();
    command.render(&mut b);
    b.finish().unwrap().ops().to_vec()
}

/// Push `input`, apply `command`, return what is left.
fn run(registry: &ClassRegistry, input: Value, command: &RenderCommand) -> Value {
    let mut b = RoutineBuilder::new();
    let push = RenderCommand::op(match input {
        Value::Null => Op::PushNull,
        Value::Int(v) => Op::PushInt(v),
        Value::Double(v) => Op::PushDouble(v),
        Value::Bool(v) => Op::PushBool(v),
        Value::Str(s) => Op::PushStr(s),
        other => panic!("unsupported input {other:?}"),
    });
    push.render(&mut b);
    command.render(&mut b);
    b.emit(Op::Return);
    evaluate(&b.finish().unwrap(), registry, &[]).unwrap()
}

#[test]
fn assignable_types_need_nothing() {
    let registry = ClassRegistry::new();
    for (from, to) in [
        (Ty::Str, Ty::Object),
        (Ty::Null, Ty::Str),
        (Ty::INT, Ty::INT),
        (Ty::Boxed(Prim::Int), Ty::Object),
    ] {
        assert_eq!(ops(&coerce(&registry, from, to).unwrap()), vec![], "{from:?} -> {to:?}");
    }
}

#[test]
fn numeric_primitives_widen_and_narrow() {
    let registry = ClassRegistry::new();
    let widen = coerce(&registry, Ty::INT, Ty::LONG).unwrap();
    assert_eq!(run(&registry, Value::Int(3), &widen), Value::Long(3));
    let narrow = coerce(&registry, Ty::DOUBLE, Ty::INT).unwrap();
    assert_eq!(run(&registry, Value::Double(2.9), &narrow), Value::Int(2));
}

#[test]
fn booleans_never_become_numbers() {
    let registry = ClassRegistry::new();
    assert!(coerce(&registry, Ty::BOOLEAN, Ty::INT).is_none());
    assert!(coerce(&registry, Ty::INT, Ty::BOOLEAN).is_none());
    assert!(coerce(&registry, Ty::Boxed(Prim::Boolean), Ty::DOUBLE).is_none());
}

#[test]
fn strings_parse_at_runtime() {
    let registry = ClassRegistry::new();
    let to_int = coerce(&registry, Ty::Str, Ty::INT).unwrap();
    assert_eq!(run(&registry, Value::string("42"), &to_int), Value::Int(42));
    let to_bool = coerce(&registry, Ty::Str, Ty::BOOLEAN).unwrap();
    assert_eq!(run(&registry, Value::string("TRUE"), &to_bool), Value::Bool(true));
    let to_boxed = coerce(&registry, Ty::Str, Ty::Boxed(Prim::Double)).unwrap();
    assert_eq!(run(&registry, Value::string("1.5"), &to_boxed), Value::Double(1.5));
}

#[test]
fn anything_becomes_a_string() {
    let registry = ClassRegistry::new();
    let command = coerce(&registry, Ty::INT, Ty::Str).unwrap();
    assert_eq!(ops(&command), vec![Op::ToStr]);
    assert_eq!(run(&registry, Value::Int(7), &command), Value::string("7"));
}

#[test]
fn boxing_goes_through_the_primitive() {
    let registry = ClassRegistry::new();
    assert_eq!(
        ops(&coerce(&registry, Ty::INT, Ty::Object).unwrap()),
        vec![Op::Box(Prim::Int)]
    );
    let unbox = coerce(&registry, Ty::Boxed(Prim::Int), Ty::DOUBLE).unwrap();
    assert_eq!(run(&registry, Value::Int(4), &unbox), Value::Double(4.0));
}

#[test]
fn null_never_reaches_the_conversion() {
    let registry = ClassRegistry::new();
    let command = coerce(&registry, Ty::Str, Ty::INT).unwrap();
    let ops = ops(&command);
    let guard = ops.iter().position(|op| matches!(op, Op::JumpIfNull(_))).unwrap();
    let parse = ops
        .iter()
        .position(|op| matches!(op, Op::ParseNumber(Prim::Int)))
        .unwrap();
    assert!(guard < parse, "{ops:?}");
    assert_eq!(run(&registry, Value::Null, &command), Value::Int(0));

    let unbox = coerce(&registry, Ty::Boxed(Prim::Boolean), Ty::BOOLEAN).unwrap();
    assert_eq!(run(&registry, Value::Null, &unbox), Value::Bool(false));

    let to_text = coerce(&registry, Ty::Object, Ty::Str).unwrap();
    assert_eq!(run(&registry, Value::Null, &to_text), Value::Null);
}

#[test]
fn null_literal_coerces_to_the_default() {
    let registry = ClassRegistry::new();
    let command = coerce(&registry, Ty::Null, Ty::LONG).unwrap();
    assert_eq!(ops(&command), vec![Op::Pop, Op::PushLong(0)]);
}

#[test]
fn strings_name_enum_constants() {
    let mut registry = ClassRegistry::new();
    let color = registry.define_enum("Color", &["RED", "DARK_BLUE"]);
    let command = coerce(&registry, Ty::Str, Ty::Class(color)).unwrap();
    assert_eq!(
        run(&registry, Value::string("darkBlue"), &command),
        Value::Enum(EnumValue {
            class: color,
            name: Rc::from("DARK_BLUE"),
        })
    );

    let literal = coerce_literal(&registry, "red", Ty::Class(color)).unwrap();
    assert_eq!(
        run(&registry, Value::Null, &RenderCommand::op(Op::Pop).then(literal)),
        Value::Enum(EnumValue {
            class: color,
            name: Rc::from("RED"),
        })
    );
    assert!(coerce_literal(&registry, "green", Ty::Class(color)).is_none());
}

#[test]
fn strings_feed_value_of_factories() {
    let mut registry = ClassRegistry::new();
    let money = registry.define_class("Money", None);
    let factory = registry.add_static_method(
        Ty::Class(money),
        "valueOf",
        &[Ty::Str],
        Ty::Class(money),
        |_, args| Ok(args[0].clone()),
    );
    assert_eq!(
        ops(&coerce_literal(&registry, "12.50", Ty::Class(money)).unwrap()),
        vec![
            Op::PushStr(Rc::from("12.50")),
            Op::InvokeStatic {
                method: factory,
                argc: 1
            },
        ]
    );
    assert!(coerce(&registry, Ty::Str, Ty::Class(money)).is_some());
    assert!(coerce(&registry, Ty::INT, Ty::Class(money)).is_none());
}

#[test]
fn literal_text_is_checked_at_compile_time() {
    let registry = ClassRegistry::new();
    let push = |text: &str, target: Ty| coerce_literal(&registry, text, target).map(|c| ops(&c));

    assert_eq!(push("42", Ty::INT), Some(vec![Op::PushInt(42)]));
    assert_eq!(push("3.5", Ty::INT), None);
    assert_eq!(push("3000000000", Ty::INT), None);
    assert_eq!(push("3000000000", Ty::LONG), Some(vec![Op::PushLong(3_000_000_000)]));
    assert_eq!(push("2.5", Ty::FLOAT), Some(vec![Op::PushFloat(2.5)]));
    assert_eq!(push("1e400", Ty::DOUBLE), None);
    assert_eq!(push("300", Ty::Prim(Prim::Byte)), None);
    assert_eq!(push("False", Ty::BOOLEAN), Some(vec![Op::PushBool(false)]));
    assert_eq!(push("x", Ty::Prim(Prim::Char)), Some(vec![Op::PushChar('x')]));
    assert_eq!(push("xy", Ty::Prim(Prim::Char)), None);
    assert_eq!(
        push("7", Ty::Boxed(Prim::Int)),
        Some(vec![Op::PushInt(7), Op::Box(Prim::Int)])
    );
    assert_eq!(push("hi", Ty::Object), Some(vec![Op::PushStr(Rc::from("hi"))]));
}

#[test]
fn failures_name_both_sides() {
    let registry = ClassRegistry::new();
    let err = require_literal_coercion(&registry, "3.5", Ty::INT).unwrap_err();
    assert_eq!(
        err.kind,
        CompileErrorKind::Unconvertible {
            from: "\"3.5\"".to_owned(),
            to: "int".to_owned(),
        }
    );
    let err = require_coercion(&registry, Ty::BOOLEAN, Ty::LONG).unwrap_err();
    assert_eq!(err.message, "cannot convert `boolean` to `long`");
}
