//! How a continuation tree is evaluated.
//!
//! The tree fixes what is computed; a [`RenderingStrategy`] fixes how the
//! parts that depend on the evaluation model are emitted. The static
//! renderer reads everything directly, once. The save-point compiler turns
//! every observable read into a resumable step.

use vela_emit::RenderCommand;
use vela_ir::BinaryOp;
use vela_types::PropertyInfo;

use crate::scope::Loadable;

/// One operand of an operation, already rendered.
#[derive(Clone, Debug)]
pub struct Operand {
    pub command: RenderCommand,
    /// Whether the operand contains a monitoring point.
    pub monitored: bool,
}

impl Operand {
    pub fn new(command: RenderCommand, monitored: bool) -> Self {
        Operand { command, monitored }
    }

    /// An operand whose value is already on the stack, like the receiver of
    /// a chain element.
    pub fn on_stack() -> Self {
        Operand::new(RenderCommand::empty(), false)
    }
}

/// Right operand of `&&`/`||`, rendered on demand so the strategy can
/// prepare for it first.
pub type DeferredRender<'a> = dyn FnMut(&mut dyn RenderingStrategy) -> RenderCommand + 'a;

pub trait RenderingStrategy {
    /// Push the value of a scope entry.
    fn load_scope(&mut self, loadable: &Loadable) -> RenderCommand;

    /// Replace the receiver on the stack with the current value of an
    /// observable property.
    fn observe(&mut self, property: &PropertyInfo) -> RenderCommand;

    /// Push the operands of one operation, in order.
    fn operands(&mut self, operands: Vec<Operand>) -> RenderCommand;

    /// `left op right` for `&&`/`||`; `left` leaves a boolean on the stack.
    fn short_circuit(
        &mut self,
        op: BinaryOp,
        left: RenderCommand,
        right: &mut DeferredRender<'_>,
        right_monitored: bool,
    ) -> RenderCommand;
}
