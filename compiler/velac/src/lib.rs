//! Driver for the Vela binding compiler.
//!
//! `vela_bind` compiles one attribute at a time. This crate is the layer
//! above it: [`CompileOptions`] (from code or the `VELA_*` environment),
//! [`init_tracing`] for diagnostics output, and [`CompileSession`], which
//! compiles whole markup units with their includes, detects include cycles
//! and memoizes finished units. Units come out as runnable bindings, a text
//! listing, or a serialized [`image`].

pub mod image;
pub mod options;
pub mod session;
pub mod tracing_setup;
pub mod unit;

pub use image::SiteImage;
pub use options::{CompileOptions, Encoding};
pub use session::{CompileSession, CompiledSite, CompiledUnit, UnitOutput};
pub use tracing_setup::init_tracing;
pub use unit::{BindingSite, MemoryLoader, Unit, UnitLoader};
