//! Binding compiler core.
//!
//! Turns the text of one attribute into something the host can run:
//!
//! 1. [`vela_parse::parse_attribute`] separates plain text from `${...}`
//!    expressions.
//! 2. [`ContinuationTree::build`] types, resolves and folds the expression.
//! 3. [`ContinuationTree::classify`] decides between a static binding,
//!    evaluated once in the host frame, and a dynamic one.
//! 4. Static bindings are rendered directly ([`render_static`]); dynamic
//!    ones go through the save-point compiler into a [`BindingArtifact`]
//!    ([`compile_artifact`]).
//!
//! Every failure is a [`vela_diagnostic::CompileError`], raised where it is
//! detected. There is no recovery and no partial output.

pub mod artifact;
pub mod coerce;
pub mod context;
pub mod continuation;
mod cx;
pub mod decision;
pub mod render;
pub mod savepoint;
pub mod scope;
pub mod strategy;

use tracing::{debug, instrument};
use vela_diagnostic::CompileResult;
use vela_emit::{Op, RenderCommand};
use vela_parse::{parse_attribute, AttributeValue};
use vela_types::Ty;

pub use artifact::{compile_artifact, BindingArtifact, BindingTarget};
pub use coerce::{coerce, coerce_literal, require_coercion, require_literal_coercion};
pub use continuation::{ContId, ContKind, Continuation, ContinuationTree};
pub use cx::{CompileCx, TreeOptions};
pub use decision::{render_static, BindingMode, StaticBinding};
pub use render::DirectStrategy;
pub use savepoint::SavePointStrategy;
pub use scope::{Loadable, LoadableId, Scope, ScopeEntry};
pub use strategy::{Operand, RenderingStrategy};

/// The outcome of compiling one attribute.
#[derive(Clone, Debug)]
pub enum CompiledBinding {
    Static(StaticBinding),
    Dynamic(BindingArtifact),
    /// Reads a scope entry that has no value yet. The walker compiles the
    /// attribute again once the entry is bound.
    Deferred { ty: Ty },
}

impl CompiledBinding {
    pub fn mode(&self) -> Option<BindingMode> {
        match self {
            CompiledBinding::Static(_) => Some(BindingMode::Static),
            CompiledBinding::Dynamic(_) => Some(BindingMode::Dynamic),
            CompiledBinding::Deferred { .. } => None,
        }
    }
}

/// Compile attribute text against `scope`.
///
/// With a target, the value is converted to the target's type; plain text
/// is converted at compile time. Errors carry the target's element name.
#[instrument(level = "debug", skip_all, fields(source = %source))]
pub fn compile_binding(
    source: &str,
    scope: &Scope,
    cx: &CompileCx<'_>,
    target: Option<&BindingTarget>,
) -> CompileResult<CompiledBinding> {
    compile(source, scope, cx, target).map_err(|error| {
        match target.and_then(|target| target.element.as_deref()) {
            Some(element) => error.with_element(element),
            None => error,
        }
    })
}

fn compile(
    source: &str,
    scope: &Scope,
    cx: &CompileCx<'_>,
    target: Option<&BindingTarget>,
) -> CompileResult<CompiledBinding> {
    let parsed = match parse_attribute(source)? {
        AttributeValue::Literal(text) => {
            let Some(target) = target else {
                return Ok(CompiledBinding::Static(StaticBinding {
                    ty: Ty::Str,
                    command: RenderCommand::op(Op::PushStr(text.into())),
                }));
            };
            let command = require_literal_coercion(cx.model, &text, target.ty)?;
            return Ok(CompiledBinding::Static(StaticBinding {
                ty: target.ty,
                command,
            }));
        }
        AttributeValue::Expression(parsed) => parsed,
    };

    let tree = ContinuationTree::build(&parsed, scope, cx)?;
    if !tree.node(tree.root()).can_evaluate_now() {
        debug!("binding reads a pending scope entry");
        return Ok(CompiledBinding::Deferred { ty: tree.ty() });
    }
    match tree.classify() {
        BindingMode::Static => {
            render_static(&tree, cx, target.map(|target| target.ty)).map(CompiledBinding::Static)
        }
        BindingMode::Dynamic => compile_artifact(&tree, cx, target).map(CompiledBinding::Dynamic),
    }
}
