//! Private state of a dynamic binding, allocated while it compiles.
//!
//! The save-point compiler asks the context for storage as it walks the
//! tree: capture slots for scope values, scratch slots for observable
//! handles and spilled operands, flag bits and counters for short-circuit
//! branches. Everything grows monotonically. [`RendererContext::finish`]
//! freezes the counts and decides the flag layout, which is only known once
//! the last bit has been handed out.

use std::cell::OnceCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::trace;
use vela_emit::{FlagLayout, Op, RenderCommand};

use crate::scope::{Loadable, LoadableId};

/// A persistent flag bit.
///
/// Commands built from the handle read the layout when they are rendered,
/// so they may be composed before the context is frozen.
#[derive(Clone, Debug)]
pub struct FlagBit {
    bit: u32,
    layout: Rc<OnceCell<FlagLayout>>,
}

impl FlagBit {
    pub fn index(&self) -> u32 {
        self.bit
    }

    fn layout(&self) -> FlagLayout {
        self.layout
            .get()
            .copied()
            .unwrap_or_else(|| FlagLayout::choose(self.bit + 1, FlagLayout::WORD_BITS))
    }

    /// Push whether the bit is set.
    pub fn test(&self) -> RenderCommand {
        let flag = self.clone();
        RenderCommand::new(move |b| b.emit(flag.layout().test(flag.bit)))
    }

    pub fn assign(&self, value: bool) -> RenderCommand {
        let flag = self.clone();
        RenderCommand::new(move |b| b.emit(flag.layout().assign(flag.bit, value)))
    }
}

#[derive(Debug, Default)]
pub struct RendererContext {
    captures: FxHashMap<LoadableId, u32>,
    /// Load command of each capture slot, by slot.
    loads: Vec<RenderCommand>,
    scratch: u32,
    flags: u32,
    counters: u32,
    layout: Rc<OnceCell<FlagLayout>>,
}

impl RendererContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture slot holding `loadable`, allocating one on first use.
    pub fn capture(&mut self, loadable: &Loadable) -> u32 {
        if let Some(&slot) = self.captures.get(&loadable.id) {
            return slot;
        }
        let slot = slot_index(self.loads.len());
        trace!(name = %loadable.name, slot, "capture");
        self.captures.insert(loadable.id, slot);
        self.loads.push(loadable.load.clone());
        slot
    }

    pub fn alloc_scratch(&mut self) -> u32 {
        let slot = self.scratch;
        self.scratch += 1;
        slot
    }

    pub fn alloc_flag(&mut self) -> FlagBit {
        let bit = self.flags;
        self.flags += 1;
        FlagBit {
            bit,
            layout: Rc::clone(&self.layout),
        }
    }

    pub fn alloc_counter(&mut self) -> u32 {
        let counter = self.counters;
        self.counters += 1;
        counter
    }

    pub fn captures(&self) -> u32 {
        slot_index(self.loads.len())
    }

    pub fn scratch(&self) -> u32 {
        self.scratch
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn counters(&self) -> u32 {
        self.counters
    }

    /// Freeze the counts and fix the flag layout.
    pub fn finish(self, flag_word_bits: u32) -> FrozenContext {
        let flags = *self
            .layout
            .get_or_init(|| FlagLayout::choose(self.flags, flag_word_bits));
        let captures = slot_index(self.loads.len());
        let loads = self.loads;
        let init = RenderCommand::new(move |b| {
            for (slot, load) in loads.iter().enumerate() {
                load.render(b);
                b.emit(Op::StoreCapture(slot_index(slot)));
            }
        });
        FrozenContext {
            captures,
            scratch: self.scratch,
            flags,
            counters: self.counters,
            init,
        }
    }
}

/// Final storage counts of a compiled binding.
#[derive(Clone, Debug)]
pub struct FrozenContext {
    pub captures: u32,
    pub scratch: u32,
    pub flags: FlagLayout,
    pub counters: u32,
    /// Loads every captured value into its slot.
    pub init: RenderCommand,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slot counts are bounded by expression size"
)]
fn slot_index(index: usize) -> u32 {
    index as u32
}

#[cfg(test)]
mod tests;
