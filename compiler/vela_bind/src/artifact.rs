//! The binding-target artifact compiler.
//!
//! Packages a dynamic binding for the runtime: the frozen storage counts,
//! an `init` routine filling the capture slots in the host frame, and the
//! `update` routine the runtime calls with the step of the property that
//! changed.

use tracing::{debug, instrument};
use vela_diagnostic::{assembly_failed, read_only_target, CompileResult};
use vela_emit::{ArtifactImage, LabelKey, Op, RenderCommand, Routine, RoutineBuilder};
use vela_types::Ty;

use crate::coerce::require_coercion;
use crate::continuation::ContinuationTree;
use crate::savepoint::SavePointStrategy;
use crate::CompileCx;

/// The property a binding is assigned to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingTarget {
    /// Element name for diagnostics.
    pub element: Option<String>,
    pub property: String,
    pub ty: Ty,
    pub read_only: bool,
}

impl BindingTarget {
    pub fn new(property: impl Into<String>, ty: Ty) -> Self {
        BindingTarget {
            element: None,
            property: property.into(),
            ty,
            read_only: false,
        }
    }

    #[must_use]
    pub fn on_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// A compiled dynamic binding.
#[derive(Clone, Debug, PartialEq)]
pub struct BindingArtifact {
    pub image: ArtifactImage,
    /// Type of the published value.
    pub ty: Ty,
}

/// Compile `tree` into an artifact publishing values of `target`'s type.
///
/// The update routine holds the result lock for its whole run:
///
/// ```text
/// lock; dispatch(step); STEP 0: body; coerce; publish; EXIT: unlock; return
/// ```
#[instrument(level = "debug", skip_all, fields(ty = ?tree.ty(), target = ?target.map(|t| t.ty)))]
pub fn compile_artifact(
    tree: &ContinuationTree,
    cx: &CompileCx<'_>,
    target: Option<&BindingTarget>,
) -> CompileResult<BindingArtifact> {
    if let Some(target) = target.filter(|target| target.read_only) {
        return Err(read_only_target(&target.property));
    }
    let (ty, coercion) = match target {
        Some(target) => (target.ty, require_coercion(cx.model, tree.ty(), target.ty)?),
        None => (tree.ty(), RenderCommand::empty()),
    };

    let mut strategy = SavePointStrategy::new();
    let body = tree.render(&mut strategy);
    let dispatch = strategy.finish(cx.flag_word_bits);

    let update = assemble(|b| {
        b.emit(Op::LockAcquire);
        dispatch.command.render(b);
        b.place_key(LabelKey::Step(0));
        body.render(b);
        coercion.render(b);
        b.emit(Op::Publish);
        b.place_key(LabelKey::Exit);
        b.emit(Op::LockRelease);
        b.emit(Op::Return);
    })?;
    let init = assemble(|b| {
        dispatch.context.init.render(b);
        b.emit(Op::Return);
    })?;

    let frozen = &dispatch.context;
    debug!(
        steps = dispatch.steps.len(),
        captures = frozen.captures,
        scratch = frozen.scratch,
        flags = ?frozen.flags,
        counters = frozen.counters,
        update = update.len(),
        "artifact assembled"
    );
    Ok(BindingArtifact {
        image: ArtifactImage {
            captures: frozen.captures,
            scratch: frozen.scratch,
            flags: frozen.flags,
            counters: frozen.counters,
            init,
            update,
            steps: dispatch.steps,
        },
        ty,
    })
}

fn assemble(build: impl FnOnce(&mut RoutineBuilder)) -> CompileResult<Routine> {
    let mut builder = RoutineBuilder::new();
    build(&mut builder);
    builder.finish().map_err(|e| assembly_failed(e.to_string()))
}
