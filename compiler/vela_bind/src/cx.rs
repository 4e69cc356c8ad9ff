//! Per-compilation inputs shared by every phase.

use vela_emit::FlagLayout;
use vela_types::{Ty, TypeModel};

/// Switches that change how a tree is built, never what it means.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeOptions {
    /// Fold operators over literal operands during construction.
    pub fold_constants: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            fold_constants: true,
        }
    }
}

/// The compilation context: the type model plus options.
///
/// Passed by reference through construction and rendering. There is no
/// global state; two contexts never share anything.
#[derive(Copy, Clone)]
pub struct CompileCx<'a> {
    pub model: &'a dyn TypeModel,
    pub options: TreeOptions,
    /// Flag bits that fit in one word before the artifact switches to a
    /// multi-word bitset.
    pub flag_word_bits: u32,
}

impl<'a> CompileCx<'a> {
    pub fn new(model: &'a dyn TypeModel) -> Self {
        CompileCx {
            model,
            options: TreeOptions::default(),
            flag_word_bits: FlagLayout::WORD_BITS,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_flag_word_bits(mut self, bits: u32) -> Self {
        self.flag_word_bits = bits;
        self
    }

    /// Type name for diagnostics.
    pub(crate) fn display(&self, ty: Ty) -> String {
        vela_types::display(self.model, ty)
    }
}
