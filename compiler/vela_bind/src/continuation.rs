//! The continuation tree: the typed, resolved form of a binding expression.
//!
//! Construction walks the parsed expression once. Every node comes out with
//! its result type, its member resolved against the type model, the number
//! of monitoring points beneath it, and, when every input is a compile-time
//! constant, already folded into a literal. Nothing is revisited after
//! construction; rendering only reads.
//!
//! # Chains
//!
//! Fluent access (`a.b.c(x)[i]`) is a [`ContKind::Chain`]: an ordered list
//! of elements where every element after the first takes the previous
//! element's value as its implicit receiver. Elements record cumulative
//! monitoring counts, so a chain reports the count of its last element.
//! A chain never ends in a literal: folding the last element replaces the
//! whole chain.
//!
//! # Errors
//!
//! Resolution failures are raised as soon as the failing node is built,
//! carrying the span of that node.

mod build;
mod fold;
mod render;
mod resolve;

use std::cell::OnceCell;
use std::rc::Rc;

use tracing::instrument;
use vela_diagnostic::CompileResult;
use vela_emit::RenderCommand;
use vela_ir::{BinaryOp, Literal, ParsedExpr, Span, UnaryOp};
use vela_types::{FieldInfo, MethodInfo, Prim, PropertyInfo, Ty};

use crate::decision::BindingMode;
use crate::scope::{Scope, ScopeEntry};
use crate::CompileCx;

pub(crate) use render::short_circuit_jump;

/// Index of a node in a [`ContinuationTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ContId(u32);

impl ContId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A sub-expression together with the conversion its consumer needs.
#[derive(Clone, Debug)]
pub struct Arg {
    pub node: ContId,
    pub coercion: RenderCommand,
}

/// How an index expression reads its receiver.
#[derive(Clone, Debug)]
pub enum IndexAccess {
    /// One-character substring of a `String`.
    Chars,
    /// A one-argument `get` method.
    Method(MethodInfo),
}

/// What a binary node computes, decided from its operand types.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum OperatorPlan {
    Arithmetic(Prim),
    Concat,
    /// Ordering or value equality at the promoted kind.
    Compare(Prim),
    /// Equality of two references.
    RefEquality,
    ShortCircuit,
}

#[derive(Clone, Debug)]
pub enum ContKind {
    Literal(Literal),
    ScopeRead(ScopeEntry),
    /// A type name in receiver position: the owner of static members.
    TypeRef(Ty),
    Chain(Vec<ContId>),

    // Chain elements; the receiver is the previous element.
    Property(PropertyInfo),
    StaticField(FieldInfo),
    Method { method: MethodInfo, args: Vec<Arg> },
    StaticCall { method: MethodInfo, args: Vec<Arg> },
    Index { index: Arg, access: IndexAccess },

    Construct { method: MethodInfo, args: Vec<Arg> },
    Binary {
        op: BinaryOp,
        left: Arg,
        right: Arg,
        plan: OperatorPlan,
    },
    Unary { op: UnaryOp, operand: Arg, kind: Prim },
}

/// One node of the tree.
#[derive(Clone, Debug)]
pub struct Continuation {
    kind: ContKind,
    name: Rc<str>,
    span: Span,
    ty: Ty,
    monitoring: u32,
    evaluable: bool,
}

impl Continuation {
    pub fn kind(&self) -> &ContKind {
        &self.kind
    }

    /// Source text of the node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Span relative to the attribute text.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn ty(&self) -> Ty {
        self.ty
    }

    /// Observable reads at or beneath this node.
    pub fn monitoring_points(&self) -> u32 {
        self.monitoring
    }

    /// False when a scope read beneath this node names a pending entry.
    pub fn can_evaluate_now(&self) -> bool {
        self.evaluable
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ContKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

/// Arena of continuations built from one parsed expression.
#[derive(Debug)]
pub struct ContinuationTree {
    nodes: Vec<Continuation>,
    root: ContId,
    pub(crate) mode: OnceCell<BindingMode>,
}

impl ContinuationTree {
    /// Type, resolve and fold `parsed`.
    #[instrument(level = "debug", skip_all, fields(source = %parsed.source))]
    pub fn build(parsed: &ParsedExpr, scope: &Scope, cx: &CompileCx<'_>) -> CompileResult<Self> {
        let (nodes, root) = build::Builder::new(parsed, scope, cx).finish()?;
        Ok(ContinuationTree {
            nodes,
            root,
            mode: OnceCell::new(),
        })
    }

    pub fn root(&self) -> ContId {
        self.root
    }

    pub fn node(&self, id: ContId) -> &Continuation {
        &self.nodes[id.index()]
    }

    /// Result type of the whole expression.
    pub fn ty(&self) -> Ty {
        self.node(self.root).ty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
