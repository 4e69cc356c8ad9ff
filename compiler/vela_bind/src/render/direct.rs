//! The direct strategy: read everything, every time.
//!
//! Used for static bindings, which run once in the host frame, and for the
//! parts of a dynamic binding that contain no monitoring point.

use std::rc::Rc;

use vela_emit::{Op, RenderCommand};
use vela_ir::BinaryOp;
use vela_types::PropertyInfo;

use crate::continuation::short_circuit_jump;
use crate::scope::Loadable;
use crate::strategy::{DeferredRender, Operand, RenderingStrategy};

#[derive(Copy, Clone, Debug, Default)]
pub struct DirectStrategy;

impl RenderingStrategy for DirectStrategy {
    fn load_scope(&mut self, loadable: &Loadable) -> RenderCommand {
        loadable.load.clone()
    }

    fn observe(&mut self, property: &PropertyInfo) -> RenderCommand {
        RenderCommand::op(Op::GetProperty(Rc::clone(&property.name)))
    }

    fn operands(&mut self, operands: Vec<Operand>) -> RenderCommand {
        RenderCommand::seq(operands.into_iter().map(|operand| operand.command))
    }

    fn short_circuit(
        &mut self,
        op: BinaryOp,
        left: RenderCommand,
        right: &mut DeferredRender<'_>,
        _right_monitored: bool,
    ) -> RenderCommand {
        let right = right(self);
        short_circuit(op, left, right)
    }
}

/// `left; dup; jump-if-decided END; pop; right; END:`
pub(crate) fn short_circuit(op: BinaryOp, left: RenderCommand, right: RenderCommand) -> RenderCommand {
    RenderCommand::new(move |b| {
        let end = b.new_label();
        left.render(b);
        b.emit(Op::Dup);
        b.emit(short_circuit_jump(op, end));
        b.emit(Op::Pop);
        right.render(b);
        b.place(end);
    })
}
