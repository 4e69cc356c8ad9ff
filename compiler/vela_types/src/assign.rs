//! Assignability and type display.

use crate::{MethodInfo, Ty, TypeModel};

/// Whether a value of type `from` can be used as `to` without any
/// conversion.
///
/// Identical types, `null` into any reference type, a subclass into its
/// superclass, and any reference into `Object`. Primitives are never
/// assignable to references (that needs boxing) and boxed types are never
/// assignable to primitives (that needs unboxing).
pub fn is_assignable(model: &dyn TypeModel, from: Ty, to: Ty) -> bool {
    if from == to {
        return true;
    }
    match (from, to) {
        (Ty::Null, to) => to.is_reference(),
        (from, Ty::Object) => from.is_reference(),
        (Ty::Class(sub), Ty::Class(sup)) => model.is_subclass(sub, sup),
        _ => false,
    }
}

/// Name of a type as it appears in diagnostics.
pub fn display(model: &dyn TypeModel, ty: Ty) -> String {
    match ty {
        Ty::Void => "void".to_owned(),
        Ty::Null => "null".to_owned(),
        Ty::Prim(p) => p.name().to_owned(),
        Ty::Boxed(p) => p.boxed_name().to_owned(),
        Ty::Str => "String".to_owned(),
        Ty::Object => "Object".to_owned(),
        Ty::Class(class) => model.class_name(class),
    }
}

/// `name(int, String)`
pub fn signature(model: &dyn TypeModel, method: &MethodInfo) -> String {
    let params: Vec<String> = method.params.iter().map(|&p| display(model, p)).collect();
    format!("{}({})", method.name, params.join(", "))
}

#[cfg(test)]
mod tests;
