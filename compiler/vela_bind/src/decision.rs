//! The binding decision and the static renderer.
//!
//! A binding with no monitoring point can never change after it is first
//! evaluated, so it is rendered once with [`DirectStrategy`] and run in the
//! host frame. Everything else becomes a dynamic artifact.

use tracing::{debug, instrument};
use vela_diagnostic::{assembly_failed, CompileResult};
use vela_emit::{Op, RenderCommand, Routine, RoutineBuilder};
use vela_ir::Literal;
use vela_types::{is_assignable, Ty};

use crate::coerce::{require_coercion, require_literal_coercion};
use crate::continuation::ContinuationTree;
use crate::render::DirectStrategy;
use crate::CompileCx;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingMode {
    /// Evaluated once.
    Static,
    /// Re-evaluated whenever an observed property changes.
    Dynamic,
}

impl ContinuationTree {
    /// Static iff the root has no monitoring point. Computed once.
    pub fn classify(&self) -> BindingMode {
        *self.mode.get_or_init(|| {
            let points = self.node(self.root()).monitoring_points();
            let mode = if points == 0 {
                BindingMode::Static
            } else {
                BindingMode::Dynamic
            };
            debug!(points, ?mode, "classified binding");
            mode
        })
    }
}

/// A binding evaluated once in the host frame.
#[derive(Clone, Debug)]
pub struct StaticBinding {
    /// Type of the value the command leaves on the stack.
    pub ty: Ty,
    pub command: RenderCommand,
}

impl StaticBinding {
    /// The command followed by `Return`.
    pub fn routine(&self) -> CompileResult<Routine> {
        let mut builder = RoutineBuilder::new();
        self.command.render(&mut builder);
        builder.emit(Op::Return);
        builder.finish().map_err(|e| assembly_failed(e.to_string()))
    }
}

/// Render `tree` for one-shot evaluation, converted to `target` when given.
///
/// A string literal is converted at compile time, so `"3.5"` bound to an
/// `int` fails here rather than when the element is created.
#[instrument(level = "debug", skip_all, fields(ty = ?tree.ty(), target = ?target))]
pub fn render_static(
    tree: &ContinuationTree,
    cx: &CompileCx<'_>,
    target: Option<Ty>,
) -> CompileResult<StaticBinding> {
    let body = tree.render(&mut DirectStrategy);
    let Some(target) = target else {
        return Ok(StaticBinding {
            ty: tree.ty(),
            command: body,
        });
    };

    if let Some(Literal::String(text)) = tree.node(tree.root()).as_literal() {
        if !is_assignable(cx.model, Ty::Str, target) {
            return Ok(StaticBinding {
                ty: target,
                command: require_literal_coercion(cx.model, text, target)?,
            });
        }
    }
    let coercion = require_coercion(cx.model, tree.ty(), target)?;
    Ok(StaticBinding {
        ty: target,
        command: body.then(coercion),
    })
}
