//! Human-readable rendering of compile errors.
//!
//! Attribute expressions are single-line, so a report is the header, the
//! attribute text, and a caret line under the span:
//!
//! ```text
//! error[E2001]: unknown identifier `nmae` (in <Label>)
//!   | ${nmae.length()}
//!   |   ^^^^
//! ```

use std::fmt::Write;

use crate::CompileError;

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Render `error` against the attribute text it was raised for.
///
/// `source` is the complete attribute value; when it is `None`, or the
/// error carries no span, only the header line is produced.
pub fn render(error: &CompileError, source: Option<&str>, colors: bool) -> String {
    let mut out = String::new();
    if colors {
        let _ = write!(out, "{}error{}", colors::ERROR, colors::RESET);
        let _ = write!(out, "{}[{}]{}", colors::BOLD, error.code(), colors::RESET);
    } else {
        let _ = write!(out, "error[{}]", error.code());
    }
    let _ = write!(out, ": {}", error.message);
    if let Some(element) = &error.element {
        let _ = write!(out, " (in <{element}>)");
    }
    out.push('\n');

    let (Some(text), Some(span)) = (source, error.span) else {
        return out;
    };
    let start = (span.start as usize).min(text.len());
    let end = (span.end as usize).clamp(start, text.len());
    // Caret columns count characters, not bytes.
    let pad = text.get(..start).map_or(start, |s| s.chars().count());
    let width = text.get(start..end).map_or(1, |s| s.chars().count().max(1));

    let _ = writeln!(out, "  | {text}");
    let carets = "^".repeat(width);
    if colors {
        let _ = writeln!(
            out,
            "  | {}{}{carets}{}",
            " ".repeat(pad),
            colors::ERROR,
            colors::RESET
        );
    } else {
        let _ = writeln!(out, "  | {}{carets}", " ".repeat(pad));
    }
    out
}

#[cfg(test)]
mod tests;
