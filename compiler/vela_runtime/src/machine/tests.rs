use std::rc::Rc;

use pretty_assertions::assert_eq;
use vela_emit::{Op, RoutineBuilder};
use vela_ir::BinaryOp;
use vela_types::{ClassId, Prim, Ty, TypeModel};

use super::*;
use crate::error::RuntimeErrorKind;
use crate::HostObject;

fn run(ops: Vec<Op>) -> RuntimeResult<Value> {
    run_with(&ClassRegistry::new(), &[], ops)
}

fn run_with(registry: &ClassRegistry, locals: &[Value], ops: Vec<Op>) -> RuntimeResult<Value> {
    let mut b = RoutineBuilder::new();
    for op in ops {
        b.emit(op);
    }
    evaluate(&b.finish().unwrap(), registry, locals)
}

#[test]
fn int_arithmetic_wraps() {
    let value = run(vec![
        Op::PushInt(i32::MAX),
        Op::PushInt(1),
        Op::Arith {
            op: BinaryOp::Add,
            kind: Prim::Int,
        },
    ]);
    assert_eq!(value.unwrap(), Value::Int(i32::MIN));
}

#[test]
fn integral_division_by_zero_faults() {
    let err = run(vec![
        Op::PushLong(1),
        Op::PushLong(0),
        Op::Arith {
            op: BinaryOp::Rem,
            kind: Prim::Long,
        },
    ])
    .unwrap_err();
    assert_eq!(err.kind, RuntimeErrorKind::ArithmeticFault);
}

#[test]
fn float_arithmetic_is_single_precision() {
    let value = run(vec![
        Op::PushFloat(0.1),
        Op::PushFloat(0.2),
        Op::Arith {
            op: BinaryOp::Add,
            kind: Prim::Float,
        },
    ]);
    assert_eq!(value.unwrap(), Value::Float(0.1_f32 + 0.2_f32));
}

#[test]
fn comparisons_push_booleans() {
    let value = run(vec![
        Op::PushInt(2),
        Op::PushLong(3),
        Op::Cmp {
            op: BinaryOp::Lt,
            kind: Prim::Long,
        },
    ]);
    assert_eq!(value.unwrap(), Value::Bool(true));
}

#[test]
fn casts_follow_host_rules() {
    let value = run(vec![
        Op::PushDouble(f64::NAN),
        Op::Convert {
            from: Prim::Double,
            to: Prim::Int,
        },
    ]);
    assert_eq!(value.unwrap(), Value::Int(0));
    let value = run(vec![
        Op::PushLong(1 << 40 | 5),
        Op::Convert {
            from: Prim::Long,
            to: Prim::Int,
        },
    ]);
    assert_eq!(value.unwrap(), Value::Int(5));
}

#[test]
fn parse_number_rejects_malformed_text() {
    let err = run(vec![Op::PushStr("3.5".into()), Op::ParseNumber(Prim::Int)]).unwrap_err();
    assert!(matches!(err.kind, RuntimeErrorKind::NumberFormat { .. }));
    let value = run(vec![Op::PushStr(" 3.5 ".into()), Op::ParseNumber(Prim::Double)]);
    assert_eq!(value.unwrap(), Value::Double(3.5));
}

#[test]
fn unbox_null_faults() {
    let err = run(vec![Op::PushNull, Op::Unbox(Prim::Int)]).unwrap_err();
    assert!(matches!(err.kind, RuntimeErrorKind::NullReference { .. }));
}

#[test]
fn char_at_yields_a_string() {
    let value = run(vec![Op::PushStr("abc".into()), Op::PushInt(1), Op::CharAt]);
    assert_eq!(value.unwrap(), Value::string("b"));
    let err = run(vec![Op::PushStr("abc".into()), Op::PushInt(3), Op::CharAt]).unwrap_err();
    assert!(matches!(err.kind, RuntimeErrorKind::IndexOutOfBounds { .. }));
}

#[test]
fn concat_uses_host_strings() {
    let value = run(vec![Op::PushStr("x=".into()), Op::PushDouble(1.0), Op::Concat]);
    assert_eq!(value.unwrap(), Value::string("x=1.0"));
}

#[test]
fn table_switch_selects_target() {
    let mut b = RoutineBuilder::new();
    let zero = b.new_label();
    let one = b.new_label();
    let other = b.new_label();
    b.emit(Op::PushInt(1));
    b.emit(Op::TableSwitch {
        low: 0,
        targets: vec![zero, one],
        default: other,
    });
    b.place(zero);
    b.emit(Op::PushStr("zero".into()));
    b.emit(Op::Return);
    b.place(one);
    b.emit(Op::PushStr("one".into()));
    b.emit(Op::Return);
    b.place(other);
    b.emit(Op::Fault("unreachable".into()));
    let routine = b.finish().unwrap();
    let value = evaluate(&routine, &ClassRegistry::new(), &[]).unwrap();
    assert_eq!(value, Value::string("one"));
}

#[test]
fn invoke_passes_receiver_first() {
    let registry = ClassRegistry::new();
    let substring = registry.methods(Ty::Str, "substring", 2).remove(0);
    let value = run_with(
        &registry,
        &[Value::string("binding")],
        vec![
            Op::LoadLocal(0),
            Op::PushInt(1),
            Op::PushInt(4),
            Op::Invoke {
                method: substring.id,
                argc: 2,
            },
        ],
    );
    assert_eq!(value.unwrap(), Value::string("ind"));
}

#[test]
fn invoke_on_null_faults() {
    let registry = ClassRegistry::new();
    let length = registry.methods(Ty::Str, "length", 0).remove(0);
    let err = run_with(
        &registry,
        &[],
        vec![
            Op::PushNull,
            Op::Invoke {
                method: length.id,
                argc: 0,
            },
        ],
    )
    .unwrap_err();
    assert!(err.message.contains("length"));
}

#[test]
fn property_reads() {
    let object = Rc::new(
        HostObject::new(ClassId::from_raw(0))
            .with_property("plain", Value::Int(1))
            .with_observable("watched", Value::Int(2)),
    );
    let locals = [Value::Object(object)];
    let registry = ClassRegistry::new();
    let plain = run_with(&registry, &locals, vec![Op::LoadLocal(0), Op::GetProperty("plain".into())]);
    assert_eq!(plain.unwrap(), Value::Int(1));
    let watched = run_with(
        &registry,
        &locals,
        vec![
            Op::LoadLocal(0),
            Op::GetObservable("watched".into()),
            Op::ObservableValue,
        ],
    );
    assert_eq!(watched.unwrap(), Value::Int(2));
}

#[test]
fn binding_state_needs_an_instance() {
    let err = run(vec![Op::LoadScratch(0)]).unwrap_err();
    assert_eq!(err.kind, RuntimeErrorKind::MissingInstance);
}

#[test]
fn fault_reports_message() {
    let err = run(vec![Op::Fault("bad step".into())]).unwrap_err();
    assert_eq!(err.message, "internal fault: bad step");
}
