//! Overload selection for methods, static methods, constructors and
//! indexers.
//!
//! A candidate is viable when every argument converts to its parameter,
//! with conversions allowed. Viable candidates are scored by how well the
//! arguments fit without conversion: argument `i` earns one point for every
//! parameter at position `i` or later that it is directly assignable to.
//! The single best score wins; a tie at the top is ambiguous.

use tracing::trace;
use vela_diagnostic::{ambiguous_call, no_applicable_member, CompileResult, MemberKind};
use vela_types::{is_assignable, signature, MethodInfo, Ty};

use crate::coerce::coerce;
use crate::CompileCx;

/// Arguments past this count cannot be encoded in a call instruction.
const MAX_ARGS: usize = u8::MAX as usize;

pub(super) fn select(
    cx: &CompileCx<'_>,
    kind: MemberKind,
    name: &str,
    owner: Ty,
    candidates: Vec<MethodInfo>,
    args: &[Ty],
) -> CompileResult<MethodInfo> {
    let not_found = || no_applicable_member(kind, name, cx.display(owner));
    if args.len() > MAX_ARGS {
        return Err(not_found());
    }

    let mut best: Vec<(MethodInfo, usize)> = Vec::new();
    for candidate in candidates {
        if !candidate.is_accessible() || candidate.arity() != args.len() {
            continue;
        }
        let Some(score) = score(cx, &candidate, args) else {
            continue;
        };
        trace!(candidate = %signature(cx.model, &candidate), score, "overload candidate");
        match best.first().map(|(_, top)| *top) {
            Some(top) if score < top => {}
            Some(top) if score == top => best.push((candidate, score)),
            _ => best = vec![(candidate, score)],
        }
    }

    if best.len() > 1 {
        let signatures = best
            .iter()
            .map(|(method, _)| signature(cx.model, method))
            .collect();
        return Err(ambiguous_call(name, cx.display(owner), signatures));
    }
    best.pop().map(|(method, _)| method).ok_or_else(not_found)
}

/// `None` when some argument cannot reach its parameter at all.
fn score(cx: &CompileCx<'_>, candidate: &MethodInfo, args: &[Ty]) -> Option<usize> {
    let params = &candidate.params;
    let convertible = args
        .iter()
        .zip(params.iter())
        .all(|(&arg, &param)| arg != Ty::Void && coerce(cx.model, arg, param).is_some());
    if !convertible {
        return None;
    }
    let score = args
        .iter()
        .enumerate()
        .map(|(i, &arg)| {
            params[i..]
                .iter()
                .filter(|&&param| is_assignable(cx.model, arg, param))
                .count()
        })
        .sum();
    Some(score)
}
