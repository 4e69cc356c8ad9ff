//! Host runtime for compiled bindings.
//!
//! This crate plays the part of the UI toolkit the compiler targets:
//!
//! - [`Value`] and [`HostObject`]: the single-threaded, `Rc`-based object
//!   graph, with properties that are either plain or [`ObservableValue`]
//!   cells.
//! - [`ClassRegistry`]: host classes, their members and implementations.
//!   It implements [`vela_types::TypeModel`], so the compiler resolves
//!   against exactly what the runtime can execute.
//! - [`evaluate`]: runs a one-shot routine (static bindings).
//! - [`BindingInstance`]: instantiates an [`vela_emit::ArtifactImage`] and
//!   re-runs its update routine on change notifications.

mod builtins;
mod error;
mod instance;
mod machine;
mod object;
mod observable;
mod registry;
mod value;

pub use error::{
    arithmetic_fault, fault, index_out_of_bounds, missing_instance, no_such_constant,
    no_such_member, null_reference, number_format, type_mismatch, RuntimeError,
    RuntimeErrorKind, RuntimeResult,
};
pub use instance::BindingInstance;
pub use machine::evaluate;
pub use object::{HostObject, Slot};
pub use observable::{Listener, ObservableValue};
pub use registry::{ClassRegistry, MethodImpl};
pub use value::{EnumValue, Value};
