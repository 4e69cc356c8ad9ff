//! Storage layout of persistent flag bits.

use crate::Op;

/// How an artifact stores its flag bits.
///
/// Chosen once, after compilation, from the final bit count. Up to
/// `word_bits` flags share a single machine word; beyond that they live in
/// a multi-word bitset.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FlagLayout {
    Word { bits: u32 },
    Bits { bits: u32, words: u32 },
}

impl FlagLayout {
    /// Default word capacity.
    pub const WORD_BITS: u32 = 64;

    /// Pick a layout for `bits` flags. `word_bits` is clamped to 1..=64.
    pub fn choose(bits: u32, word_bits: u32) -> Self {
        let word_bits = word_bits.clamp(1, Self::WORD_BITS);
        if bits <= word_bits {
            FlagLayout::Word { bits }
        } else {
            FlagLayout::Bits {
                bits,
                words: bits.div_ceil(64),
            }
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            FlagLayout::Word { bits } | FlagLayout::Bits { bits, .. } => bits,
        }
    }

    /// Storage words the runtime allocates.
    pub const fn words(self) -> u32 {
        match self {
            FlagLayout::Word { bits: 0 } => 0,
            FlagLayout::Word { .. } => 1,
            FlagLayout::Bits { words, .. } => words,
        }
    }

    /// Instruction that pushes whether `bit` is set.
    pub fn test(self, bit: u32) -> Op {
        match self {
            FlagLayout::Word { .. } => Op::FlagTest { mask: 1 << bit },
            FlagLayout::Bits { .. } => Op::BitTest(bit),
        }
    }

    /// Instruction that sets or clears `bit`.
    pub fn assign(self, bit: u32, value: bool) -> Op {
        match self {
            FlagLayout::Word { .. } => Op::FlagAssign {
                mask: 1 << bit,
                value,
            },
            FlagLayout::Bits { .. } => Op::BitAssign { bit, value },
        }
    }
}
