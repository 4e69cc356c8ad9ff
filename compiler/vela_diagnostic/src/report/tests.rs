use pretty_assertions::assert_eq;
use vela_ir::Span;

use super::*;
use crate::unknown_identifier;

#[test]
fn header_only_without_source() {
    let err = unknown_identifier("nmae");
    assert_eq!(
        render(&err, None, false),
        "error[E2001]: unknown identifier `nmae`\n"
    );
}

#[test]
fn caret_under_span() {
    let err = unknown_identifier("nmae")
        .with_span(Span::new(2, 6))
        .with_element("Label");
    let text = render(&err, Some("${nmae.length()}"), false);
    assert_eq!(
        text,
        "error[E2001]: unknown identifier `nmae` (in <Label>)\n  | ${nmae.length()}\n  |   ^^^^\n"
    );
}

#[test]
fn span_past_end_is_clamped() {
    let err = unknown_identifier("x").with_span(Span::new(3, 40));
    let text = render(&err, Some("${x}"), false);
    assert!(text.ends_with("  |    ^\n"));
}

#[test]
fn colors_wrap_header() {
    let err = unknown_identifier("x");
    let text = render(&err, None, ColorMode::Always.should_use_colors(false));
    assert!(text.contains("\x1b[1;31merror"));
    assert!(!ColorMode::Never.should_use_colors(true));
    assert!(ColorMode::Auto.should_use_colors(true));
}
