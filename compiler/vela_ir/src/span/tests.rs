use super::*;

#[test]
fn merge_covers_both() {
    let merged = Span::new(4, 9).merge(Span::new(2, 6));
    assert_eq!(merged, Span::new(2, 9));
}

#[test]
fn offset_shifts_both_ends() {
    assert_eq!(Span::new(0, 3).offset_by(2), Span::new(2, 5));
}

#[test]
fn from_range_saturates() {
    let huge = u32::MAX as usize + 7;
    let span = Span::from_range(1..huge);
    assert_eq!(span.start, 1);
    assert_eq!(span.end, u32::MAX);
}

#[test]
fn slice_out_of_bounds_is_none() {
    assert_eq!(Span::new(0, 3).slice("a.b"), Some("a.b"));
    assert_eq!(Span::new(2, 8).slice("a.b"), None);
}

#[test]
fn empty_and_len() {
    assert!(Span::DUMMY.is_empty());
    assert_eq!(Span::new(3, 10).len(), 7);
}
