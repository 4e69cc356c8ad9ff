//! The shipped form of a dynamic binding.

use crate::{FlagLayout, Routine};

/// Everything the runtime needs to instantiate a dynamic binding.
///
/// `init` runs once in the host frame and fills the capture slots.
/// `update` takes the dispatch step; step 0 evaluates from scratch.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactImage {
    pub captures: u32,
    pub scratch: u32,
    pub flags: FlagLayout,
    /// Live-subscription counters of the short-circuit containers.
    pub counters: u32,
    pub init: Routine,
    pub update: Routine,
    /// Every step the compiler assigned, ascending, starting with 0.
    pub steps: Vec<u32>,
}
