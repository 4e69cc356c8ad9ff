//! Render commands: deferred, composable emission.

use std::fmt;
use std::rc::Rc;

use crate::{Op, RoutineBuilder};

/// An opaque callback that appends instructions to a routine.
///
/// Commands are cheap to clone and may be rendered any number of times,
/// into any number of builders. The compiler only composes them; it never
/// looks inside.
#[derive(Clone)]
pub struct RenderCommand(Rc<dyn Fn(&mut RoutineBuilder)>);

impl RenderCommand {
    pub fn new(f: impl Fn(&mut RoutineBuilder) + 'static) -> Self {
        RenderCommand(Rc::new(f))
    }

    /// A command that emits nothing.
    pub fn empty() -> Self {
        RenderCommand::new(|_| {})
    }

    /// A command that emits a single instruction.
    pub fn op(op: Op) -> Self {
        RenderCommand::new(move |b| b.emit(op.clone()))
    }

    /// A command that emits a fixed instruction sequence.
    pub fn ops(ops: impl IntoIterator<Item = Op>) -> Self {
        let ops: Vec<Op> = ops.into_iter().collect();
        RenderCommand::new(move |b| {
            for op in &ops {
                b.emit(op.clone());
            }
        })
    }

    /// Commands rendered one after another.
    pub fn seq(commands: impl IntoIterator<Item = RenderCommand>) -> Self {
        let commands: Vec<RenderCommand> = commands.into_iter().collect();
        match commands.len() {
            0 => RenderCommand::empty(),
            1 => commands.into_iter().next().unwrap_or_else(RenderCommand::empty),
            _ => RenderCommand::new(move |b| {
                for command in &commands {
                    command.render(b);
                }
            }),
        }
    }

    #[must_use]
    pub fn then(self, next: RenderCommand) -> Self {
        RenderCommand::seq([self, next])
    }

    #[inline]
    pub fn render(&self, builder: &mut RoutineBuilder) {
        (self.0)(builder);
    }
}

impl fmt::Debug for RenderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderCommand(..)")
    }
}

#[cfg(test)]
mod tests;
