//! Instruction emitter for compiled bindings.
//!
//! The binding compiler never writes instructions directly. It composes
//! [`RenderCommand`]s, opaque callbacks that append to a
//! [`RoutineBuilder`], and the builder resolves labels into a finished
//! [`Routine`]. The instruction set ([`Op`]) is a small stack machine
//! understood by `vela_runtime`.
//!
//! A dynamic binding is shipped to the runtime as an [`ArtifactImage`]:
//! slot counts, the frozen [`FlagLayout`], and the `init`/`update`
//! routines.

mod builder;
mod command;
mod image;
mod layout;
mod op;

pub use builder::{EmitError, Label, LabelKey, Routine, RoutineBuilder};
pub use command::RenderCommand;
pub use image::ArtifactImage;
pub use layout::FlagLayout;
pub use op::Op;
