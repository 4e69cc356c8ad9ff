//! Compile options.
//!
//! Options come from code (the builder methods) or from the environment:
//!
//! - `VELA_NO_FOLD`: any non-empty value disables constant folding.
//! - `VELA_FLAG_WORD_BITS`: flag bits that share one word before an
//!   artifact switches to a multi-word bitset (1 to 64).

use tracing::warn;
use vela_bind::{CompileCx, TreeOptions};
use vela_emit::FlagLayout;
use vela_types::TypeModel;

/// What a compiled unit is turned into.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Encoding {
    /// Runnable bindings.
    #[default]
    Artifact,
    /// A text listing of every binding's routines.
    Listing,
    /// Serialized routines and artifact images.
    Image,
}

impl Encoding {
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Artifact => "artifact",
            Encoding::Listing => "listing",
            Encoding::Image => "image",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CompileOptions {
    /// Encoding used when a unit is requested without one.
    pub encoding: Encoding,
    pub fold_constants: bool,
    pub flag_word_bits: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            encoding: Encoding::default(),
            fold_constants: true,
            flag_word_bits: FlagLayout::WORD_BITS,
        }
    }
}

impl CompileOptions {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// Apply the `VELA_*` variables that `lookup` reports.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if lookup("VELA_NO_FOLD").is_some_and(|value| !value.is_empty()) {
            self.fold_constants = false;
        }
        if let Some(text) = lookup("VELA_FLAG_WORD_BITS") {
            match text.trim().parse::<u32>() {
                Ok(bits @ 1..=FlagLayout::WORD_BITS) => self.flag_word_bits = bits,
                _ => warn!(value = %text, "ignoring invalid VELA_FLAG_WORD_BITS"),
            }
        }
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_fold_constants(mut self, fold: bool) -> Self {
        self.fold_constants = fold;
        self
    }

    #[must_use]
    pub fn with_flag_word_bits(mut self, bits: u32) -> Self {
        self.flag_word_bits = bits;
        self
    }

    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            fold_constants: self.fold_constants,
        }
    }

    /// A compilation context over `model` carrying these options.
    pub fn cx<'a>(&self, model: &'a dyn TypeModel) -> CompileCx<'a> {
        CompileCx::new(model)
            .with_options(self.tree_options())
            .with_flag_word_bits(self.flag_word_bits)
    }
}
