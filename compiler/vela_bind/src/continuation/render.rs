//! Turning a continuation tree into render commands.
//!
//! Rendering walks nodes in evaluation order and asks the strategy for
//! everything that depends on how the binding is evaluated: reading scope
//! values, reading observable properties, sequencing operands and
//! short-circuit branches. Everything else is fixed here.

use std::rc::Rc;

use vela_emit::{Label, Op, RenderCommand};
use vela_ir::literal::narrow;
use vela_ir::{BinaryOp, Literal, UnaryOp};
use vela_parse::stack::ensure_sufficient_stack;

use super::{Arg, ContId, ContKind, ContinuationTree, IndexAccess, OperatorPlan};
use crate::scope::ScopeEntry;
use crate::strategy::{Operand, RenderingStrategy};

impl ContinuationTree {
    /// Render the whole expression; the command leaves its value on the
    /// stack.
    pub fn render(&self, strategy: &mut dyn RenderingStrategy) -> RenderCommand {
        self.render_node(self.root(), strategy)
    }

    fn render_node(&self, id: ContId, strategy: &mut dyn RenderingStrategy) -> RenderCommand {
        ensure_sufficient_stack(|| self.render_inner(id, strategy))
    }

    fn render_arg(&self, arg: &Arg, strategy: &mut dyn RenderingStrategy) -> Operand {
        let command = self.render_node(arg.node, strategy).then(arg.coercion.clone());
        Operand::new(command, self.node(arg.node).monitoring_points() > 0)
    }

    fn render_args(&self, args: &[Arg], strategy: &mut dyn RenderingStrategy) -> Vec<Operand> {
        args.iter().map(|arg| self.render_arg(arg, strategy)).collect()
    }

    /// Chain elements expect their receiver on the stack.
    fn render_inner(&self, id: ContId, strategy: &mut dyn RenderingStrategy) -> RenderCommand {
        let node = self.node(id);
        match node.kind() {
            ContKind::Literal(literal) => push_literal(literal),
            ContKind::ScopeRead(ScopeEntry::Bound(loadable)) => strategy.load_scope(loadable),
            ContKind::ScopeRead(ScopeEntry::Pending(_)) => {
                RenderCommand::op(Op::Fault(format!("`{}` is not loadable yet", node.name()).into()))
            }
            // Static members do not take a receiver.
            ContKind::TypeRef(_) => RenderCommand::empty(),
            ContKind::Chain(elements) => RenderCommand::seq(
                elements
                    .iter()
                    .map(|&element| self.render_node(element, strategy)),
            ),

            ContKind::Property(property) if property.is_observable() => strategy.observe(property),
            ContKind::Property(property) => {
                RenderCommand::op(Op::GetProperty(Rc::clone(&property.name)))
            }
            ContKind::StaticField(field) => RenderCommand::op(Op::GetStatic(field.id)),
            ContKind::Method { method, args } => {
                let mut operands = vec![Operand::on_stack()];
                operands.extend(self.render_args(args, strategy));
                strategy.operands(operands).then(RenderCommand::op(Op::Invoke {
                    method: method.id,
                    argc: argc(args),
                }))
            }
            ContKind::StaticCall { method, args } => {
                let operands = self.render_args(args, strategy);
                strategy.operands(operands).then(RenderCommand::op(Op::InvokeStatic {
                    method: method.id,
                    argc: argc(args),
                }))
            }
            ContKind::Index { index, access } => {
                let operands = vec![Operand::on_stack(), self.render_arg(index, strategy)];
                let read = match access {
                    IndexAccess::Chars => Op::CharAt,
                    IndexAccess::Method(method) => Op::Invoke {
                        method: method.id,
                        argc: 1,
                    },
                };
                strategy.operands(operands).then(RenderCommand::op(read))
            }

            ContKind::Construct { method, args } => {
                let operands = self.render_args(args, strategy);
                strategy.operands(operands).then(RenderCommand::op(Op::Construct {
                    method: method.id,
                    argc: argc(args),
                }))
            }
            ContKind::Binary {
                op,
                left,
                right,
                plan,
            } => self.render_binary(*op, left, right, *plan, strategy),
            ContKind::Unary { op, operand, kind } => {
                let apply = match op {
                    UnaryOp::Not => Op::Not,
                    UnaryOp::Neg => Op::Neg(*kind),
                };
                self.render_node(operand.node, strategy)
                    .then(operand.coercion.clone())
                    .then(RenderCommand::op(apply))
            }
        }
    }

    fn render_binary(
        &self,
        op: BinaryOp,
        left: &Arg,
        right: &Arg,
        plan: OperatorPlan,
        strategy: &mut dyn RenderingStrategy,
    ) -> RenderCommand {
        if plan == OperatorPlan::ShortCircuit {
            let first = self.render_node(left.node, strategy).then(left.coercion.clone());
            let right_monitored = self.node(right.node).monitoring_points() > 0;
            let mut second = |strategy: &mut dyn RenderingStrategy| {
                self.render_node(right.node, strategy)
                    .then(right.coercion.clone())
            };
            return strategy.short_circuit(op, first, &mut second, right_monitored);
        }

        let operands = vec![
            self.render_arg(left, strategy),
            self.render_arg(right, strategy),
        ];
        let apply = match plan {
            OperatorPlan::Arithmetic(kind) => vec![Op::Arith { op, kind }],
            OperatorPlan::Compare(kind) => vec![Op::Cmp { op, kind }],
            OperatorPlan::Concat => vec![Op::Concat],
            OperatorPlan::RefEquality if op == BinaryOp::NotEq => vec![Op::RefEq, Op::Not],
            OperatorPlan::RefEquality => vec![Op::RefEq],
            OperatorPlan::ShortCircuit => Vec::new(),
        };
        strategy.operands(operands).then(RenderCommand::ops(apply))
    }
}

#[expect(clippy::cast_possible_truncation, reason = "overload selection caps arity at u8::MAX")]
fn argc(args: &[Arg]) -> u8 {
    args.len() as u8
}

/// Push a literal value.
fn push_literal(literal: &Literal) -> RenderCommand {
    let op = match literal {
        Literal::Null => Op::PushNull,
        Literal::String(text) => Op::PushStr(Rc::clone(text)),
        Literal::Integer { value, long: true } => Op::PushLong(*value),
        Literal::Integer { value, long: false } => {
            i32::try_from(*value).map_or(Op::PushLong(*value), Op::PushInt)
        }
        Literal::FloatingPoint {
            value,
            double: false,
        } => Op::PushFloat(narrow(*value)),
        Literal::FloatingPoint {
            value,
            double: true,
        } => Op::PushDouble(*value),
        Literal::Boolean(b) => Op::PushBool(*b),
    };
    RenderCommand::op(op)
}

/// The jump that skips the right operand of `&&`/`||`.
///
/// Pops the tested value.
pub(crate) fn short_circuit_jump(op: BinaryOp, target: Label) -> Op {
    if op == BinaryOp::And {
        Op::JumpIfFalse(target)
    } else {
        Op::JumpIfTrue(target)
    }
}
