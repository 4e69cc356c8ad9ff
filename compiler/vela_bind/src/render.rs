//! Renderers for bindings evaluated from scratch.

pub mod direct;

pub use direct::DirectStrategy;
