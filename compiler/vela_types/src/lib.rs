//! Type descriptors and the type-model interface.
//!
//! The compiler reasons about host types through two things:
//!
//! - [`Ty`]: a small `Copy` descriptor (primitive, boxed primitive, string,
//!   object, or a host class addressed by [`ClassId`]).
//! - [`TypeModel`]: the reflective provider that answers member queries for
//!   a type (properties, methods by name and arity, constructors, static
//!   fields, enum constants). The provider is external to the compiler; it
//!   is assumed total and side-effect free.
//!
//! [`is_assignable`] and the display helpers are derived from those queries
//! and live here so every phase agrees on them.

mod assign;
mod member;
mod model;
mod naming;
mod ty;

pub use assign::{display, is_assignable, signature};
pub use member::{FieldId, FieldInfo, MemberFlags, MethodId, MethodInfo, PropertyInfo};
pub use model::TypeModel;
pub use naming::{constant_case, match_enum_constant};
pub use ty::{ClassId, Prim, Ty};
