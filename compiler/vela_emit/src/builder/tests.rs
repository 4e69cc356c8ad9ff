use pretty_assertions::assert_eq;

use super::*;

#[test]
fn labels_resolve_to_instruction_index() {
    let mut b = RoutineBuilder::new();
    let end = b.new_label();
    b.emit(Op::PushBool(true));
    b.emit(Op::JumpIfTrue(end));
    b.emit(Op::PushInt(1));
    b.place(end);
    b.emit(Op::Return);
    let routine = b.finish().unwrap();
    assert_eq!(routine.target(end), 3);
    assert_eq!(routine.len(), 4);
}

#[test]
fn keyed_labels_are_shared() {
    let mut b = RoutineBuilder::new();
    let jump_to = b.keyed_label(LabelKey::Step(2));
    b.emit(Op::Jump(jump_to));
    b.emit(Op::PushNull);
    b.place_key(LabelKey::Step(2));
    b.emit(Op::Return);
    assert_eq!(b.keyed_label(LabelKey::Step(2)), jump_to);
    let routine = b.finish().unwrap();
    assert_eq!(routine.target(jump_to), 2);
}

#[test]
fn unplaced_label_is_an_error() {
    let mut b = RoutineBuilder::new();
    let dangling = b.new_label();
    b.emit(Op::Jump(dangling));
    assert_eq!(b.finish(), Err(EmitError::Unplaced(dangling)));
}

#[test]
fn double_placement_is_an_error() {
    let mut b = RoutineBuilder::new();
    let label = b.new_label();
    b.place(label);
    b.emit(Op::Pop);
    b.place(label);
    assert_eq!(b.finish(), Err(EmitError::PlacedTwice(label)));
}

#[test]
fn label_at_end_resolves_past_last_op() {
    let mut b = RoutineBuilder::new();
    let end = b.new_label();
    b.emit(Op::Jump(end));
    b.place(end);
    let routine = b.finish().unwrap();
    assert_eq!(routine.target(end), 1);
}

#[test]
fn disassembly_marks_labels() {
    let mut b = RoutineBuilder::new();
    let top = b.new_label();
    b.place(top);
    b.emit(Op::LoadStep);
    b.emit(Op::TableSwitch {
        low: 0,
        targets: vec![top],
        default: top,
    });
    let text = b.finish().unwrap().disassemble();
    assert_eq!(
        text,
        "L0:\n    0  LoadStep\n    1  TableSwitch 0: [L0] else L0\n"
    );
}
