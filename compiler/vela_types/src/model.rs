//! The reflective type-model provider.

use std::rc::Rc;

use crate::{ClassId, FieldInfo, MethodInfo, PropertyInfo, Ty};

/// Answers member queries about host types.
///
/// Queries are by owner type and member name; method-like queries also
/// filter by arity. Implementations must be total (unknown members yield
/// `None` or an empty list) and must not have observable side effects:
/// the compiler may repeat any query.
///
/// Built-in types (`String`, boxed primitives) are queried the same way as
/// host classes; an implementation decides which members they expose.
pub trait TypeModel {
    /// Resolve a type name as written in an expression.
    fn resolve_type(&self, name: &str) -> Option<Ty>;

    /// Display name of a host class.
    fn class_name(&self, class: ClassId) -> String;

    /// Direct superclass, `None` for roots.
    fn superclass(&self, class: ClassId) -> Option<ClassId>;

    fn property(&self, owner: Ty, name: &str) -> Option<PropertyInfo>;

    /// Instance methods named `name` taking `arity` arguments.
    fn methods(&self, owner: Ty, name: &str, arity: usize) -> Vec<MethodInfo>;

    /// Static methods named `name` taking `arity` arguments.
    fn static_methods(&self, owner: Ty, name: &str, arity: usize) -> Vec<MethodInfo>;

    fn constructors(&self, owner: Ty, arity: usize) -> Vec<MethodInfo>;

    /// Static field or enum constant.
    fn static_field(&self, owner: Ty, name: &str) -> Option<FieldInfo>;

    /// Constant names in declaration order, `None` when `owner` is not an
    /// enum.
    fn enum_constants(&self, owner: Ty) -> Option<Vec<Rc<str>>>;

    /// Whether `sub` is `sup` or inherits from it.
    fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut current = Some(sub);
        while let Some(class) = current {
            if class == sup {
                return true;
            }
            current = self.superclass(class);
        }
        false
    }
}
