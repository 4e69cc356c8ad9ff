use pretty_assertions::assert_eq;

use super::*;

fn ops_of(command: &RenderCommand) -> Vec<Op> {
    let mut b = RoutineBuilder::new();
    command.render(&mut b);
    b.finish().unwrap().ops().to_vec()
}

#[test]
fn seq_renders_in_order() {
    let command = RenderCommand::seq([
        RenderCommand::op(Op::PushInt(1)),
        RenderCommand::empty(),
        RenderCommand::ops([Op::PushInt(2), Op::Arith {
            op: vela_ir::BinaryOp::Add,
            kind: vela_types::Prim::Int,
        }]),
    ]);
    assert_eq!(
        ops_of(&command),
        vec![
            Op::PushInt(1),
            Op::PushInt(2),
            Op::Arith {
                op: vela_ir::BinaryOp::Add,
                kind: vela_types::Prim::Int,
            },
        ]
    );
}

#[test]
fn commands_render_repeatedly() {
    let command = RenderCommand::op(Op::Dup).then(RenderCommand::op(Op::Pop));
    assert_eq!(ops_of(&command), ops_of(&command));
    assert_eq!(ops_of(&command).len(), 2);
}

#[test]
fn labels_are_fresh_per_render() {
    let command = RenderCommand::new(|b| {
        let skip = b.new_label();
        b.emit(Op::Jump(skip));
        b.place(skip);
    });
    let mut b = RoutineBuilder::new();
    command.render(&mut b);
    command.render(&mut b);
    let routine = b.finish().unwrap();
    assert_eq!(routine.len(), 2);
}
