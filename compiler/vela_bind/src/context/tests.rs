use pretty_assertions::assert_eq;
use vela_emit::{FlagLayout, Op, RoutineBuilder};
use vela_types::Ty;

use super::*;
use crate::scope::{Loadable, LoadableId};

fn render(command: &RenderCommand) -> Vec<Op> {
    let mut b = RoutineBuilder::new();
    command.render(&mut b);
    b.finish().unwrap().ops().to_vec()
}

#[test]
fn captures_are_deduplicated_by_loadable() {
    let mut cx = RendererContext::new();
    let a = Loadable::local(LoadableId::from_raw(7), "a", Ty::Object, 0);
    let b = Loadable::local(LoadableId::from_raw(9), "b", Ty::Object, 3);
    assert_eq!(cx.capture(&a), 0);
    assert_eq!(cx.capture(&b), 1);
    assert_eq!(cx.capture(&a), 0);
    assert_eq!(cx.captures(), 2);

    let frozen = cx.finish(64);
    assert_eq!(frozen.captures, 2);
    assert_eq!(
        render(&frozen.init),
        vec![
            Op::LoadLocal(0),
            Op::StoreCapture(0),
            Op::LoadLocal(3),
            Op::StoreCapture(1),
        ]
    );
}

#[test]
fn allocation_is_monotonic() {
    let mut cx = RendererContext::new();
    assert_eq!(cx.alloc_scratch(), 0);
    assert_eq!(cx.alloc_scratch(), 1);
    assert_eq!(cx.alloc_counter(), 0);
    assert_eq!(cx.alloc_flag().index(), 0);
    assert_eq!(cx.alloc_flag().index(), 1);
    assert_eq!((cx.scratch(), cx.flags(), cx.counters()), (2, 2, 1));
}

#[test]
fn flag_commands_follow_the_frozen_layout() {
    let mut cx = RendererContext::new();
    let flags: Vec<FlagBit> = (0..3).map(|_| cx.alloc_flag()).collect();
    let test = flags[2].test();
    let set = flags[2].assign(true);

    // Composed before finish, rendered after: the layout is read late.
    let frozen = cx.finish(2);
    assert_eq!(frozen.flags, FlagLayout::Bits { bits: 3, words: 1 });
    assert_eq!(render(&test), vec![Op::BitTest(2)]);
    assert_eq!(
        render(&set),
        vec![Op::BitAssign {
            bit: 2,
            value: true
        }]
    );
}

#[test]
fn a_single_word_uses_masks() {
    let mut cx = RendererContext::new();
    let _ = cx.alloc_flag();
    let flag = cx.alloc_flag();
    let frozen = cx.finish(64);
    assert_eq!(frozen.flags, FlagLayout::Word { bits: 2 });
    assert_eq!(render(&flag.test()), vec![Op::FlagTest { mask: 0b10 }]);
    assert_eq!(
        render(&flag.assign(false)),
        vec![Op::FlagAssign {
            mask: 0b10,
            value: false
        }]
    );
}
