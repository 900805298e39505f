use crate::position::LineMap;
use crate::span::Span;

#[test]
fn single_line_offsets() {
    let map = LineMap::build("hello");
    let pos = map.offset_to_position(2);
    assert_eq!(pos.line, 1);
    assert_eq!(pos.column, 3);
}

#[test]
fn multi_line_offsets() {
    let src = "abc\ndef\nghi";
    let map = LineMap::build(src);
    assert_eq!(map.line_count(), 3);
    let pos = map.offset_to_position(5); // 'e' on line 2
    assert_eq!(pos.line, 2);
    assert_eq!(pos.column, 2);
}

#[test]
fn span_to_range_spans_lines() {
    let src = "abc\ndefgh";
    let map = LineMap::build(src);
    let range = map.span_to_range(Span::new(2, 6));
    assert_eq!(range.start.line, 1);
    assert_eq!(range.end.line, 2);
}

#[test]
fn line_text_strips_terminator() {
    let src = "one\ntwo\nthree";
    let map = LineMap::build(src);
    assert_eq!(map.line_text(src, 1), "two");
    assert_eq!(map.line_text(src, 2), "three");
}
