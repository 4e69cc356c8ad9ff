//! Compile errors for the binding compiler.
//!
//! Every fault the compiler detects is a [`CompileError`]: a structured
//! [`CompileErrorKind`], the human-readable message derived from it, and,
//! where available, the source span and the markup element the expression
//! came from. Errors are raised where they are detected and propagated with
//! `?`; nothing is batched or recovered.
//!
//! Constructors are free functions (`unknown_identifier`, `ambiguous_call`,
//! ...) so call sites read as the condition they report, and so the message
//! wording lives in one place.

mod error;
mod error_code;
pub mod report;

pub use error::{
    ambiguous_call, assembly_failed, illegal_index, include_cycle, incompatible_operands,
    index_out_of_range, invalid_number, no_applicable_member, read_only_target, type_not_found,
    unconvertible, unexpected_token, unit_not_found, unknown_identifier, unterminated_string,
    CompileError, CompileErrorKind, CompileResult, MemberKind,
};
pub use error_code::ErrorCode;
