use std::rc::Rc;

use pretty_assertions::assert_eq;
use vela_emit::{FlagLayout, Op, Routine, RoutineBuilder};
use vela_types::{MemberFlags, Ty};

use super::dispatch::{self, Entry};
use super::*;

fn observable(name: &str) -> PropertyInfo {
    PropertyInfo {
        owner: Ty::Object,
        name: Rc::from(name),
        ty: Ty::Str,
        flags: MemberFlags::ACCESSIBLE | MemberFlags::OBSERVABLE,
    }
}

fn ops(command: &RenderCommand) -> Vec<Op> {
    let mut b = RoutineBuilder::new();
    command.render(&mut b);
    b.finish().unwrap().ops().to_vec()
}

/// Dispatch, the step-0 body, then the common exit.
fn update(strategy: SavePointStrategy, body: &RenderCommand) -> (Routine, Dispatch) {
    let dispatch = strategy.finish(FlagLayout::WORD_BITS);
    let mut b = RoutineBuilder::new();
    dispatch.command.render(&mut b);
    b.place_key(LabelKey::Step(0));
    body.render(&mut b);
    b.place_key(LabelKey::Exit);
    b.emit(Op::Return);
    (b.finish().unwrap(), dispatch)
}

/// Targets of the `index`-th table switch.
fn switch(routine: &Routine, index: usize) -> (u32, Vec<usize>) {
    routine
        .ops()
        .iter()
        .filter_map(|op| match op {
            Op::TableSwitch { low, targets, .. } => Some((
                *low,
                targets.iter().map(|&label| routine.target(label)).collect(),
            )),
            _ => None,
        })
        .nth(index)
        .unwrap()
}

#[test]
fn observe_resumes_through_the_stored_handle() {
    let mut strategy = SavePointStrategy::new();
    let body = RenderCommand::op(Op::LoadLocal(0)).then(strategy.observe(&observable("b")));
    assert_eq!(strategy.steps(), 2);

    let (routine, dispatch) = update(strategy, &body);
    assert_eq!(dispatch.steps, vec![0, 1]);
    assert_eq!(dispatch.context.scratch, 1);

    let (low, targets) = switch(&routine, 0);
    assert_eq!(low, 0);
    assert_eq!(routine.ops()[targets[0]], Op::LoadLocal(0));
    assert_eq!(
        routine.ops()[targets[1]..targets[1] + 2].to_vec(),
        vec![Op::LoadScratch(0), Op::ObservableValue]
    );
    assert!(routine.ops().contains(&Op::Subscribe(1)));
    assert!(routine.ops().contains(&Op::Unsubscribe(1)));
}

#[test]
fn unchanged_handle_skips_the_resubscription() {
    let mut strategy = SavePointStrategy::new();
    let observe = ops(&strategy.observe(&observable("b")));
    assert_eq!(
        observe[..3].to_vec(),
        vec![Op::GetObservable(Rc::from("b")), Op::Dup, Op::LoadScratch(0)]
    );
    assert!(matches!(observe[3], Op::JumpIfSame(_)));
    assert_eq!(
        observe[observe.len() - 3..].to_vec(),
        vec![Op::Pop, Op::LoadScratch(0), Op::ObservableValue]
    );
}

#[test]
fn operands_before_a_monitored_one_are_spilled() {
    let mut strategy = SavePointStrategy::new();
    let observed = strategy.observe(&observable("b"));
    let command = strategy.operands(vec![
        Operand::new(RenderCommand::op(Op::PushInt(1)), false),
        Operand::new(RenderCommand::op(Op::LoadLocal(0)).then(observed), true),
        Operand::new(RenderCommand::op(Op::PushInt(2)), false),
    ]);

    let ops = ops(&command);
    assert_eq!(
        ops[..3].to_vec(),
        vec![Op::PushInt(1), Op::StoreScratch(1), Op::LoadLocal(0)]
    );
    assert_eq!(
        ops[ops.len() - 4..].to_vec(),
        vec![
            Op::StoreScratch(2),
            Op::LoadScratch(1),
            Op::LoadScratch(2),
            Op::PushInt(2),
        ]
    );
}

#[test]
fn leading_monitored_operand_needs_no_spill() {
    let mut strategy = SavePointStrategy::new();
    let observed = strategy.observe(&observable("b"));
    let command = strategy.operands(vec![
        Operand::new(observed.clone(), true),
        Operand::new(RenderCommand::op(Op::PushInt(2)), false),
    ]);
    assert_eq!(ops(&command), ops(&observed.then(RenderCommand::op(Op::PushInt(2)))));
    assert_eq!(strategy.finish(64).context.scratch, 1);
}

#[test]
fn unmonitored_right_operand_is_rendered_directly() {
    let mut strategy = SavePointStrategy::new();
    let left = RenderCommand::op(Op::PushBool(true));
    let command = strategy.short_circuit(
        BinaryOp::And,
        left.clone(),
        &mut |_: &mut dyn RenderingStrategy| RenderCommand::op(Op::LoadLocal(1)),
        false,
    );
    let expected = direct::short_circuit(BinaryOp::And, left, RenderCommand::op(Op::LoadLocal(1)));
    assert_eq!(ops(&command), ops(&expected));

    let dispatch = strategy.finish(64);
    assert_eq!(dispatch.context.flags, FlagLayout::Word { bits: 0 });
    assert_eq!(dispatch.context.counters, 0);
}

#[test]
fn monitored_right_operand_gets_a_guarded_container() {
    let mut strategy = SavePointStrategy::new();
    let body = strategy.short_circuit(
        BinaryOp::Or,
        RenderCommand::op(Op::LoadLocal(0)),
        &mut |s: &mut dyn RenderingStrategy| {
            RenderCommand::op(Op::LoadLocal(1)).then(s.observe(&observable("c")))
        },
        true,
    );
    let (routine, dispatch) = update(strategy, &body);
    assert_eq!(dispatch.steps, vec![0, 1]);
    assert_eq!(dispatch.context.flags, FlagLayout::Word { bits: 1 });
    assert_eq!(dispatch.context.counters, 1);

    // Step 1 goes through the container's flag, then its own table.
    let (_, root) = switch(&routine, 0);
    assert_eq!(routine.ops()[root[1]], Op::FlagTest { mask: 1 });
    let Op::JumpIfFalse(stale) = routine.ops()[root[1] + 1] else {
        panic!("expected the stale check");
    };
    assert_eq!(routine.ops()[routine.target(stale)], Op::Return);

    let (low, child) = switch(&routine, 1);
    assert_eq!(low, 1);
    assert_eq!(routine.ops()[child[0]], Op::LoadScratch(0));

    // Listeners are counted, and dropped when the right side is skipped.
    assert!(routine.ops().contains(&Op::CounterAdd { counter: 0, delta: 1 }));
    assert!(routine.ops().contains(&Op::CounterLoad(0)));
    assert!(routine.ops().contains(&Op::FlagAssign { mask: 1, value: false }));
    let unsubscribes = routine
        .ops()
        .iter()
        .filter(|op| **op == Op::Unsubscribe(1))
        .count();
    assert_eq!(unsubscribes, 2);
}

#[test]
fn plan_forwards_child_ranges() {
    let mut cx = RendererContext::new();
    let mut containers = Containers::new();
    let point = |step, handle| SavePoint {
        step,
        handle,
        counters: SmallVec::new(),
    };
    containers.get_mut(ContainerId::ROOT).save_points.push(point(1, 0));
    let child = containers.open(
        ContainerId::ROOT,
        2,
        Branch {
            flag: cx.alloc_flag(),
            counter: cx.alloc_counter(),
        },
    );
    containers.get_mut(child).save_points.push(point(2, 1));
    containers.close(child, 3);
    containers.get_mut(ContainerId::ROOT).save_points.push(point(3, 2));
    containers.close(ContainerId::ROOT, 4);

    assert_eq!(containers.branch_counters(child).as_slice(), &[0]);
    assert!(containers.branch_counters(ContainerId::ROOT).is_empty());

    let tables = dispatch::plan(&containers);
    assert_eq!(tables.len(), 2);
    assert_eq!(
        tables[0].entries,
        vec![
            Entry::Resume(0),
            Entry::Resume(1),
            Entry::Child(child),
            Entry::Resume(3),
        ]
    );
    assert_eq!((tables[1].offset, tables[1].entries.clone()), (2, vec![Entry::Resume(2)]));
    assert!(tables[0].flag.is_none());
}
