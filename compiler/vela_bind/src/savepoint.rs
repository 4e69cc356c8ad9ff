//! The incremental save-point compiler.
//!
//! A dynamic binding is re-evaluated every time one of the observable
//! properties it reads changes. Rather than starting over, the update
//! routine resumes at the step of the property that changed: everything
//! computed before that point is still valid and was left in scratch slots
//! by the previous evaluation.
//!
//! # Steps
//!
//! Every monitoring point gets a step number, in evaluation order starting
//! at 1; step 0 evaluates from scratch. At a monitoring point the compiled
//! code fetches the property's observable handle, compares it with the
//! handle stored by the previous evaluation, moves the change listener if
//! the handle changed, and then reaches the step's resume label, where it
//! reads the current value through the stored handle.
//!
//! # Empty stack at resume labels
//!
//! The update routine jumps to a resume label with an empty operand stack.
//! Operands evaluated before a later operand that contains a monitoring
//! point are therefore spilled to scratch slots and reloaded once the last
//! monitored operand is done.
//!
//! # Short-circuit branches
//!
//! The right operand of `&&`/`||` may or may not run. When it contains
//! monitoring points it is compiled into a derived container with a flag
//! bit (did the right side run last time) and a counter (how many listeners
//! it holds). Skipping the right side clears the flag and, if the counter is
//! not zero, detaches every listener beneath it. A notification for a step
//! inside a container whose flag is clear is stale and ends the update
//! without publishing.

mod container;
mod dispatch;

use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, instrument, trace};
use vela_emit::{LabelKey, Op, RenderCommand, RoutineBuilder};
use vela_ir::BinaryOp;
use vela_types::PropertyInfo;

use self::container::{Branch, ContainerId, Containers, SavePoint};
use crate::context::{FrozenContext, RendererContext};
use crate::continuation::short_circuit_jump;
use crate::render::direct;
use crate::scope::Loadable;
use crate::strategy::{DeferredRender, Operand, RenderingStrategy};

/// Renders a continuation tree as a resumable update body.
#[derive(Debug)]
pub struct SavePointStrategy {
    context: RendererContext,
    containers: Containers,
    current: ContainerId,
    next_step: u32,
}

/// What the update routine needs besides the body.
#[derive(Clone, Debug)]
pub struct Dispatch {
    /// Jumps to the resume label of the requested step.
    pub command: RenderCommand,
    pub context: FrozenContext,
    /// Every assigned step, starting with 0.
    pub steps: Vec<u32>,
}

impl Default for SavePointStrategy {
    fn default() -> Self {
        SavePointStrategy::new()
    }
}

impl SavePointStrategy {
    pub fn new() -> Self {
        SavePointStrategy {
            context: RendererContext::new(),
            containers: Containers::new(),
            current: ContainerId::ROOT,
            next_step: 1,
        }
    }

    /// Steps handed out so far, including step 0.
    pub fn steps(&self) -> u32 {
        self.next_step
    }

    fn alloc_step(&mut self) -> u32 {
        let step = self.next_step;
        self.next_step += 1;
        step
    }

    /// Detach every listener of `container` and its descendants.
    fn clear(&self, container: ContainerId) -> RenderCommand {
        let points: Vec<SavePoint> = self
            .containers
            .subtree_save_points(container)
            .into_iter()
            .cloned()
            .collect();
        RenderCommand::new(move |b| {
            for point in &points {
                let skip = b.new_label();
                let next = b.new_label();
                b.emit(Op::LoadScratch(point.handle));
                b.emit(Op::Dup);
                b.emit(Op::JumpIfNull(skip));
                b.emit(Op::Unsubscribe(point.step));
                b.emit(Op::PushNull);
                b.emit(Op::StoreScratch(point.handle));
                adjust_counters(b, &point.counters, -1);
                b.emit(Op::Jump(next));
                b.place(skip);
                b.emit(Op::Pop);
                b.place(next);
            }
        })
    }

    /// Close the root container and build the dispatch tables.
    #[instrument(level = "debug", skip_all, fields(steps = self.next_step))]
    pub fn finish(mut self, flag_word_bits: u32) -> Dispatch {
        self.containers.close(ContainerId::ROOT, self.next_step);
        let tables = dispatch::plan(&self.containers);
        debug!(tables = tables.len(), "dispatch planned");
        Dispatch {
            command: dispatch::render(tables),
            context: self.context.finish(flag_word_bits),
            steps: (0..self.next_step).collect(),
        }
    }
}

fn adjust_counters(b: &mut RoutineBuilder, counters: &[u32], delta: i32) {
    for &counter in counters {
        b.emit(Op::CounterAdd { counter, delta });
    }
}

impl RenderingStrategy for SavePointStrategy {
    fn load_scope(&mut self, loadable: &Loadable) -> RenderCommand {
        RenderCommand::op(Op::LoadCapture(self.context.capture(loadable)))
    }

    fn observe(&mut self, property: &PropertyInfo) -> RenderCommand {
        let step = self.alloc_step();
        let handle = self.context.alloc_scratch();
        let counters: SmallVec<[u32; 4]> = self.containers.branch_counters(self.current);
        trace!(property = %property.name, step, handle, "save point");
        self.containers
            .get_mut(self.current)
            .save_points
            .push(SavePoint {
                step,
                handle,
                counters: counters.clone(),
            });

        let name = Rc::clone(&property.name);
        RenderCommand::new(move |b| {
            let keep = b.new_label();
            let no_detach = b.new_label();
            let attach = b.new_label();
            b.emit(Op::GetObservable(Rc::clone(&name)));
            b.emit(Op::Dup);
            b.emit(Op::LoadScratch(handle));
            b.emit(Op::JumpIfSame(keep));

            // The handle changed: move the listener.
            b.emit(Op::LoadScratch(handle));
            b.emit(Op::Dup);
            b.emit(Op::JumpIfNull(no_detach));
            b.emit(Op::Unsubscribe(step));
            adjust_counters(b, &counters, -1);
            b.emit(Op::Jump(attach));
            b.place(no_detach);
            b.emit(Op::Pop);
            b.place(attach);
            b.emit(Op::StoreScratch(handle));
            b.emit(Op::LoadScratch(handle));
            b.emit(Op::Subscribe(step));
            adjust_counters(b, &counters, 1);
            let resume = b.keyed_label(LabelKey::Step(step));
            b.emit(Op::Jump(resume));

            b.place(keep);
            b.emit(Op::Pop);
            b.place_key(LabelKey::Step(step));
            b.emit(Op::LoadScratch(handle));
            b.emit(Op::ObservableValue);
        })
    }

    fn operands(&mut self, operands: Vec<Operand>) -> RenderCommand {
        let last = operands
            .iter()
            .rposition(|operand| operand.monitored)
            .filter(|&last| last > 0);
        let Some(last) = last else {
            return RenderCommand::seq(operands.into_iter().map(|operand| operand.command));
        };

        let slots: Vec<u32> = (0..=last).map(|_| self.context.alloc_scratch()).collect();
        trace!(spilled = slots.len(), "spill operands");
        let mut parts = Vec::with_capacity(operands.len() + 2 * slots.len());
        let mut operands = operands.into_iter();
        for (&slot, operand) in slots.iter().zip(operands.by_ref()) {
            parts.push(operand.command);
            parts.push(RenderCommand::op(Op::StoreScratch(slot)));
        }
        parts.extend(slots.iter().map(|&slot| RenderCommand::op(Op::LoadScratch(slot))));
        parts.extend(operands.map(|operand| operand.command));
        RenderCommand::seq(parts)
    }

    fn short_circuit(
        &mut self,
        op: BinaryOp,
        left: RenderCommand,
        right: &mut DeferredRender<'_>,
        right_monitored: bool,
    ) -> RenderCommand {
        if !right_monitored {
            let right = right(self);
            return direct::short_circuit(op, left, right);
        }

        let flag = self.context.alloc_flag();
        let counter = self.context.alloc_counter();
        let branch = Branch {
            flag: flag.clone(),
            counter,
        };
        let parent = self.current;
        let child = self.containers.open(parent, self.next_step, branch);
        self.current = child;
        let right = right(self);
        self.current = parent;
        self.containers.close(child, self.next_step);
        trace!(
            flag = flag.index(),
            counter,
            steps = ?(self.containers.get(child).offset..self.next_step),
            "derived container"
        );

        let clear = self.clear(child);
        let ran = flag.assign(true);
        let skipped = flag.assign(false);
        RenderCommand::new(move |b| {
            let skip = b.new_label();
            let end = b.new_label();
            left.render(b);
            b.emit(Op::Dup);
            b.emit(short_circuit_jump(op, skip));
            b.emit(Op::Pop);
            ran.render(b);
            right.render(b);
            b.emit(Op::Jump(end));

            b.place(skip);
            skipped.render(b);
            b.emit(Op::CounterLoad(counter));
            b.emit(Op::JumpIfZero(end));
            clear.render(b);
            b.place(end);
        })
    }
}

#[cfg(test)]
mod tests;
