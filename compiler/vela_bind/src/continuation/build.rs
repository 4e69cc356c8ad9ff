//! Tree construction: resolution, typing and folding in one pass.

use std::rc::Rc;

use tracing::trace;
use vela_diagnostic::{
    illegal_index, incompatible_operands, index_out_of_range, no_applicable_member,
    type_not_found, unknown_identifier, CompileError, CompileResult, MemberKind,
};
use vela_emit::RenderCommand;
use vela_ir::{BinaryOp, ExprId, ExprKind, Literal, NumRank, OpCategory, ParsedExpr, UnaryOp};
use vela_parse::stack::ensure_sufficient_stack;
use vela_types::{MethodInfo, Prim, Ty};

use super::{fold, resolve, Arg, ContId, ContKind, Continuation, IndexAccess, OperatorPlan};
use crate::coerce::{coerce, require_coercion};
use crate::scope::{Scope, ScopeEntry};
use crate::CompileCx;

pub(super) struct Builder<'a, 'm> {
    parsed: &'a ParsedExpr,
    scope: &'a Scope,
    cx: &'a CompileCx<'m>,
    nodes: Vec<Continuation>,
}

/// What a parent needs to know about a child, detached from the arena.
#[derive(Copy, Clone, Debug)]
struct Facts {
    ty: Ty,
    monitoring: u32,
    evaluable: bool,
}

impl Facts {
    const fn fixed(ty: Ty) -> Self {
        Facts {
            ty,
            monitoring: 0,
            evaluable: true,
        }
    }

    /// Facts of a node computed from `self` and `other`.
    fn join(self, other: Facts, ty: Ty) -> Self {
        Facts {
            ty,
            monitoring: self.monitoring + other.monitoring,
            evaluable: self.evaluable && other.evaluable,
        }
    }
}

impl<'a, 'm> Builder<'a, 'm> {
    pub(super) fn new(parsed: &'a ParsedExpr, scope: &'a Scope, cx: &'a CompileCx<'m>) -> Self {
        Builder {
            parsed,
            scope,
            cx,
            nodes: Vec::new(),
        }
    }

    pub(super) fn finish(mut self) -> CompileResult<(Vec<Continuation>, ContId)> {
        let root = self.expr(self.parsed.root)?;
        self.value(root)?;
        Ok((self.nodes, root))
    }

    fn expr(&mut self, id: ExprId) -> CompileResult<ContId> {
        ensure_sufficient_stack(|| self.expr_inner(id))
            .map_err(|e| e.or_span(self.parsed.attribute_span(id)))
    }

    fn expr_inner(&mut self, id: ExprId) -> CompileResult<ContId> {
        let parsed = self.parsed;
        match parsed.arena.kind(id) {
            ExprKind::Literal(literal) => Ok(self.literal(id, literal.clone())),
            ExprKind::Ident(name) => self.ident(id, name),
            ExprKind::Field { receiver, name } => {
                let receiver = self.expr(*receiver)?;
                self.field(id, receiver, name)
            }
            ExprKind::MethodCall {
                receiver,
                name,
                args,
            } => {
                let receiver = self.expr(*receiver)?;
                let args = self.values(args)?;
                self.method_call(id, receiver, name, &args)
            }
            ExprKind::Construct { type_name, args } => {
                let args = self.values(args)?;
                self.construct(id, type_name, &args)
            }
            ExprKind::Index { receiver, index } => {
                let receiver = self.expr(*receiver)?;
                self.index(id, receiver, *index)
            }
            ExprKind::Binary { op, left, right } => self.binary(id, *op, *left, *right),
            ExprKind::Unary { op, operand } => {
                let operand = self.expr(*operand)?;
                self.unary(id, *op, operand)
            }
        }
    }

    fn values(&mut self, ids: &[ExprId]) -> CompileResult<Vec<ContId>> {
        ids.iter()
            .map(|&id| {
                let node = self.expr(id)?;
                self.value(node)?;
                Ok(node)
            })
            .collect()
    }

    // Arena

    fn node(&self, id: ContId) -> &Continuation {
        &self.nodes[id.index()]
    }

    fn facts(&self, id: ContId) -> Facts {
        let node = self.node(id);
        Facts {
            ty: node.ty,
            monitoring: node.monitoring,
            evaluable: node.evaluable,
        }
    }

    fn push(&mut self, expr: ExprId, kind: ContKind, facts: Facts) -> ContId {
        let id = ContId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Continuation {
            kind,
            name: Rc::from(self.parsed.text(expr)),
            span: self.parsed.attribute_span(expr),
            ty: facts.ty,
            monitoring: facts.monitoring,
            evaluable: facts.evaluable,
        });
        id
    }

    fn literal(&mut self, expr: ExprId, literal: Literal) -> ContId {
        let ty = literal_ty(&literal);
        self.push(expr, ContKind::Literal(literal), Facts::fixed(ty))
    }

    /// Append an element to the chain that ends in `receiver`.
    fn chain(&mut self, expr: ExprId, receiver: ContId, kind: ContKind, facts: Facts) -> ContId {
        let element = self.push(expr, kind, facts);
        let mut elements = match &self.node(receiver).kind {
            ContKind::Chain(elements) => elements.clone(),
            _ => vec![receiver],
        };
        elements.push(element);
        self.push(expr, ContKind::Chain(elements), facts)
    }

    /// Reject a type name where a value is required.
    fn value(&self, id: ContId) -> CompileResult<()> {
        let node = self.node(id);
        match node.kind {
            ContKind::TypeRef(_) => Err(unknown_identifier(&node.name).with_span(node.span)),
            _ => Ok(()),
        }
    }

    /// Rank used for promotion. String literals rank as the number they
    /// spell.
    fn rank(&self, id: ContId) -> Option<NumRank> {
        let node = self.node(id);
        match node.as_literal() {
            Some(literal) => literal.numeric_view().and_then(|view| view.rank()),
            None => node.ty.rank(),
        }
    }

    /// The literal of `id` when folding is enabled.
    fn constant(&self, id: ContId) -> Option<&Literal> {
        if !self.cx.options.fold_constants {
            return None;
        }
        self.node(id).as_literal()
    }

    fn literal_bool(&self, id: ContId) -> Option<bool> {
        match self.constant(id)?.numeric_view()? {
            Literal::Boolean(value) => Some(value),
            _ => None,
        }
    }

    fn fold_pair(
        &self,
        left: ContId,
        right: ContId,
        fold: impl FnOnce(&Literal, &Literal) -> Option<Literal>,
    ) -> Option<Literal> {
        let (l, r) = (self.constant(left)?, self.constant(right)?);
        let folded = fold(l, r);
        trace!(left = %l, right = %r, ?folded, "fold");
        folded
    }

    fn incompatible(&self, op: BinaryOp, left: ContId, right: ContId) -> CompileError {
        incompatible_operands(
            op.as_symbol(),
            self.cx.display(self.node(left).ty),
            self.cx.display(self.node(right).ty),
        )
    }

    // Names and members

    fn ident(&mut self, expr: ExprId, name: &str) -> CompileResult<ContId> {
        if let Some(entry) = self.scope.lookup(name) {
            let facts = Facts {
                ty: entry.ty(),
                monitoring: 0,
                evaluable: matches!(entry, ScopeEntry::Bound(_)),
            };
            return Ok(self.push(expr, ContKind::ScopeRead(entry.clone()), facts));
        }
        match self.cx.model.resolve_type(name) {
            Some(ty) => Ok(self.push(expr, ContKind::TypeRef(ty), Facts::fixed(ty))),
            None => Err(unknown_identifier(name)),
        }
    }

    fn field(&mut self, expr: ExprId, receiver: ContId, name: &str) -> CompileResult<ContId> {
        let owner = self.facts(receiver);
        if let ContKind::TypeRef(ty) = self.node(receiver).kind {
            let field = self.cx.model.static_field(ty, name).ok_or_else(|| {
                no_applicable_member(MemberKind::StaticField, name, self.cx.display(ty))
            })?;
            let facts = Facts {
                ty: field.ty,
                ..owner
            };
            return Ok(self.chain(expr, receiver, ContKind::StaticField(field), facts));
        }
        let property = self.cx.model.property(owner.ty, name).ok_or_else(|| {
            no_applicable_member(MemberKind::Property, name, self.cx.display(owner.ty))
        })?;
        let facts = Facts {
            ty: property.ty,
            monitoring: owner.monitoring + u32::from(property.is_observable()),
            evaluable: owner.evaluable,
        };
        Ok(self.chain(expr, receiver, ContKind::Property(property), facts))
    }

    fn method_call(
        &mut self,
        expr: ExprId,
        receiver: ContId,
        name: &str,
        args: &[ContId],
    ) -> CompileResult<ContId> {
        let owner = self.facts(receiver);
        let types: Vec<Ty> = args.iter().map(|&arg| self.node(arg).ty).collect();
        if let ContKind::TypeRef(ty) = self.node(receiver).kind {
            let candidates = self.cx.model.static_methods(ty, name, args.len());
            let method =
                resolve::select(self.cx, MemberKind::StaticMethod, name, ty, candidates, &types)?;
            let (args, facts) = self.arguments(args, &method, owner)?;
            return Ok(self.chain(expr, receiver, ContKind::StaticCall { method, args }, facts));
        }
        let candidates = self.cx.model.methods(owner.ty, name, args.len());
        let method =
            resolve::select(self.cx, MemberKind::Method, name, owner.ty, candidates, &types)?;
        let (args, facts) = self.arguments(args, &method, owner)?;
        Ok(self.chain(expr, receiver, ContKind::Method { method, args }, facts))
    }

    fn construct(&mut self, expr: ExprId, type_name: &str, args: &[ContId]) -> CompileResult<ContId> {
        let owner = self
            .cx
            .model
            .resolve_type(type_name)
            .ok_or_else(|| type_not_found(type_name))?;
        let types: Vec<Ty> = args.iter().map(|&arg| self.node(arg).ty).collect();
        let candidates = self.cx.model.constructors(owner, args.len());
        let method = resolve::select(
            self.cx,
            MemberKind::Constructor,
            type_name,
            owner,
            candidates,
            &types,
        )?;
        let (args, facts) = self.arguments(args, &method, Facts::fixed(owner))?;
        Ok(self.push(expr, ContKind::Construct { method, args }, facts))
    }

    /// Coerce arguments to the parameters of the selected method.
    fn arguments(
        &self,
        args: &[ContId],
        method: &MethodInfo,
        receiver: Facts,
    ) -> CompileResult<(Vec<Arg>, Facts)> {
        let mut facts = Facts {
            ty: method.ret,
            ..receiver
        };
        let mut coerced = Vec::with_capacity(args.len());
        for (&node, &param) in args.iter().zip(&method.params) {
            let arg = self.facts(node);
            facts = facts.join(arg, method.ret);
            coerced.push(Arg {
                node,
                coercion: require_coercion(self.cx.model, arg.ty, param)?,
            });
        }
        Ok((coerced, facts))
    }

    fn index(&mut self, expr: ExprId, receiver: ContId, index: ExprId) -> CompileResult<ContId> {
        self.value(receiver)?;
        let index = self.expr(index)?;
        self.value(index)?;
        let target = self.facts(receiver);
        let position = self.facts(index);
        let index_node = self.node(index);
        let literal_index = index_node.as_literal().and_then(Literal::numeric_view);
        if let Some(Literal::Integer { value, .. }) = literal_index {
            if value < 0 {
                return Err(illegal_index(value.to_string()).with_span(index_node.span));
            }
        }

        if target.ty != Ty::Str {
            let candidates = self.cx.model.methods(target.ty, "get", 1);
            let method = resolve::select(
                self.cx,
                MemberKind::Indexer,
                "get",
                target.ty,
                candidates,
                &[position.ty],
            )?;
            let (mut args, facts) = self.arguments(&[index], &method, target)?;
            let Some(index) = args.pop() else {
                return Err(no_applicable_member(
                    MemberKind::Indexer,
                    "get",
                    self.cx.display(target.ty),
                ));
            };
            let access = IndexAccess::Method(method);
            return Ok(self.chain(expr, receiver, ContKind::Index { index, access }, facts));
        }

        let well_formed = match (&literal_index, index_node.as_literal()) {
            (Some(Literal::Integer { .. }), _) => true,
            (_, Some(_)) => false,
            (_, None) => true,
        };
        let coercion = coerce(self.cx.model, position.ty, Ty::INT)
            .filter(|_| well_formed && position.ty != Ty::Null)
            .ok_or_else(|| illegal_index(&*index_node.name).with_span(index_node.span))?;

        if self.cx.options.fold_constants {
            if let (Some(Literal::String(text)), Some(Literal::Integer { value, .. })) =
                (self.node(receiver).as_literal(), &literal_index)
            {
                let length = text.chars().count();
                let c = usize::try_from(*value)
                    .ok()
                    .and_then(|i| text.chars().nth(i))
                    .ok_or_else(|| index_out_of_range(*value, length))?;
                trace!(index = value, %c, "fold string index");
                return Ok(self.literal(expr, Literal::string(c.to_string())));
            }
        }

        let facts = target.join(position, Ty::Str);
        let index = Arg {
            node: index,
            coercion,
        };
        let access = IndexAccess::Chars;
        Ok(self.chain(expr, receiver, ContKind::Index { index, access }, facts))
    }

    // Operators

    fn binary(
        &mut self,
        expr: ExprId,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    ) -> CompileResult<ContId> {
        let left = self.expr(left)?;
        self.value(left)?;
        if op.category() == OpCategory::ShortCircuit {
            return self.short_circuit(expr, op, left, right);
        }
        let right = self.expr(right)?;
        self.value(right)?;
        if op.category() == OpCategory::Equality {
            return self.equality(expr, op, left, right);
        }
        self.numeric(expr, op, left, right)
    }

    fn binary_node(
        &mut self,
        expr: ExprId,
        op: BinaryOp,
        left: Arg,
        right: Arg,
        plan: OperatorPlan,
        ty: Ty,
    ) -> ContId {
        let facts = self.facts(left.node).join(self.facts(right.node), ty);
        let kind = ContKind::Binary {
            op,
            left,
            right,
            plan,
        };
        self.push(expr, kind, facts)
    }

    /// Common kind of two operands under the fixed promotion ranking.
    fn promote(&self, left: ContId, right: ContId) -> Prim {
        Prim::of_rank(NumRank::promote(self.rank(left), self.rank(right)))
    }

    /// Convert an operand to the promoted kind.
    fn promoted(
        &self,
        op: BinaryOp,
        node: ContId,
        kind: Prim,
        pair: (ContId, ContId),
    ) -> CompileResult<Arg> {
        let ty = self.node(node).ty;
        let coercion = match ty {
            Ty::Null | Ty::Void => None,
            ty => coerce(self.cx.model, ty, Ty::Prim(kind)),
        };
        coercion
            .map(|coercion| Arg { node, coercion })
            .ok_or_else(|| self.incompatible(op, pair.0, pair.1))
    }

    /// Whether `node` makes `+` a concatenation.
    fn concatenates(&self, node: ContId) -> bool {
        let node = self.node(node);
        let numeric_text = matches!(
            node.as_literal(),
            Some(Literal::String(text)) if Literal::parse_numeric(text).is_some()
        );
        node.ty == Ty::Str && !numeric_text
    }

    fn numeric(
        &mut self,
        expr: ExprId,
        op: BinaryOp,
        left: ContId,
        right: ContId,
    ) -> CompileResult<ContId> {
        if op == BinaryOp::Add && (self.concatenates(left) || self.concatenates(right)) {
            return Ok(self.concat(expr, left, right));
        }
        let kind = self.promote(left, right);
        if kind == Prim::Boolean {
            return Err(self.incompatible(op, left, right));
        }
        let l = self.promoted(op, left, kind, (left, right))?;
        let r = self.promoted(op, right, kind, (left, right))?;
        let comparison = op.category() == OpCategory::Comparison;
        let folded = self.fold_pair(left, right, |l, r| {
            if comparison {
                fold::compare(op, kind, l, r)
            } else {
                fold::arithmetic(op, kind, l, r)
            }
        });
        if let Some(folded) = folded {
            return Ok(self.literal(expr, folded));
        }
        let (plan, ty) = if comparison {
            (OperatorPlan::Compare(kind), Ty::BOOLEAN)
        } else {
            (OperatorPlan::Arithmetic(kind), Ty::Prim(kind))
        };
        Ok(self.binary_node(expr, op, l, r, plan, ty))
    }

    fn concat(&mut self, expr: ExprId, left: ContId, right: ContId) -> ContId {
        if let (Some(l), Some(r)) = (self.constant(left), self.constant(right)) {
            let joined = Literal::string(format!("{l}{r}"));
            trace!(folded = %joined, "fold concatenation");
            return self.literal(expr, joined);
        }
        let operand = |node| Arg {
            node,
            coercion: RenderCommand::empty(),
        };
        self.binary_node(
            expr,
            BinaryOp::Add,
            operand(left),
            operand(right),
            OperatorPlan::Concat,
            Ty::Str,
        )
    }

    fn equality(
        &mut self,
        expr: ExprId,
        op: BinaryOp,
        left: ContId,
        right: ContId,
    ) -> CompileResult<ContId> {
        let (lt, rt) = (self.node(left).ty, self.node(right).ty);
        let null_side = lt == Ty::Null || rt == Ty::Null;
        if (lt.is_primitive() || rt.is_primitive()) && null_side {
            return Err(self.incompatible(op, left, right));
        }
        if (lt.primitive().is_some() || rt.primitive().is_some()) && !null_side {
            let kind = self.promote(left, right);
            let l = self.promoted(op, left, kind, (left, right))?;
            let r = self.promoted(op, right, kind, (left, right))?;
            if let Some(folded) = self.fold_pair(left, right, |l, r| fold::compare(op, kind, l, r)) {
                return Ok(self.literal(expr, folded));
            }
            return Ok(self.binary_node(expr, op, l, r, OperatorPlan::Compare(kind), Ty::BOOLEAN));
        }
        if lt == Ty::Void || rt == Ty::Void {
            return Err(self.incompatible(op, left, right));
        }
        if let Some(folded) = self.fold_pair(left, right, |l, r| fold::references(op, l, r)) {
            return Ok(self.literal(expr, folded));
        }
        let operand = |node| Arg {
            node,
            coercion: RenderCommand::empty(),
        };
        let (l, r) = (operand(left), operand(right));
        Ok(self.binary_node(expr, op, l, r, OperatorPlan::RefEquality, Ty::BOOLEAN))
    }

    /// Boolean operand of `&&`, `||` or `!`.
    fn condition(&self, symbol: &'static str, node: ContId) -> CompileResult<Arg> {
        let ty = self.node(node).ty;
        let coercion = if ty.is_boolean() || ty == Ty::Str {
            coerce(self.cx.model, ty, Ty::BOOLEAN)
        } else {
            None
        };
        coercion
            .map(|coercion| Arg { node, coercion })
            .ok_or_else(|| incompatible_operands(symbol, self.cx.display(ty), "boolean".to_owned()))
    }

    fn short_circuit(
        &mut self,
        expr: ExprId,
        op: BinaryOp,
        left: ContId,
        right: ExprId,
    ) -> CompileResult<ContId> {
        let l = self.condition(op.as_symbol(), left)?;
        let decided = self.literal_bool(left);
        if decided.is_some() && decided == op.short_circuit_value() {
            trace!(op = op.as_symbol(), "right operand skipped");
            return Ok(self.literal(expr, Literal::Boolean(decided == Some(true))));
        }
        let right = self.expr(right)?;
        self.value(right)?;
        let r = self.condition(op.as_symbol(), right)?;
        if let (Some(lv), Some(rv)) = (decided, self.literal_bool(right)) {
            let value = if op == BinaryOp::And { lv && rv } else { lv || rv };
            return Ok(self.literal(expr, Literal::Boolean(value)));
        }
        Ok(self.binary_node(expr, op, l, r, OperatorPlan::ShortCircuit, Ty::BOOLEAN))
    }

    fn unary(&mut self, expr: ExprId, op: UnaryOp, operand: ContId) -> CompileResult<ContId> {
        self.value(operand)?;
        let facts = self.facts(operand);
        match op {
            UnaryOp::Not => {
                let arg = self.condition(op.as_symbol(), operand)?;
                if let Some(value) = self.literal_bool(operand) {
                    return Ok(self.literal(expr, Literal::Boolean(!value)));
                }
                let kind = ContKind::Unary {
                    op,
                    operand: arg,
                    kind: Prim::Boolean,
                };
                Ok(self.push(expr, kind, Facts { ty: Ty::BOOLEAN, ..facts }))
            }
            UnaryOp::Neg => {
                let kind = Prim::of_rank(NumRank::promote(self.rank(operand), None));
                let coercion = match facts.ty {
                    Ty::Null | Ty::Void => None,
                    _ if kind == Prim::Boolean => None,
                    ty => coerce(self.cx.model, ty, Ty::Prim(kind)),
                };
                let Some(coercion) = coercion else {
                    return Err(incompatible_operands(
                        op.as_symbol(),
                        self.cx.display(facts.ty),
                        "number".to_owned(),
                    ));
                };
                if let Some(folded) = self.constant(operand).and_then(|l| fold::negate(kind, l)) {
                    return Ok(self.literal(expr, folded));
                }
                let node = ContKind::Unary {
                    op,
                    operand: Arg {
                        node: operand,
                        coercion,
                    },
                    kind,
                };
                Ok(self.push(expr, node, Facts { ty: Ty::Prim(kind), ..facts }))
            }
        }
    }
}

/// Static type of a literal.
fn literal_ty(literal: &Literal) -> Ty {
    match literal {
        Literal::Null => Ty::Null,
        Literal::String(_) => Ty::Str,
        Literal::Integer { long: false, .. } => Ty::INT,
        Literal::Integer { long: true, .. } => Ty::LONG,
        Literal::FloatingPoint { double: false, .. } => Ty::FLOAT,
        Literal::FloatingPoint { double: true, .. } => Ty::DOUBLE,
        Literal::Boolean(_) => Ty::BOOLEAN,
    }
}
