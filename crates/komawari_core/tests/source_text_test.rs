use komawari_core::{SourceText, Span, normalize_line_endings};

#[test]
fn line_endings_are_normalized() {
    assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    let source = SourceText::new("a\r\n\r\nb");
    assert_eq!(source.to_string(), "a\n\nb");
    assert_eq!(source.len(), 4);
}

#[test]
fn offsets_count_characters_not_bytes() {
    let source = SourceText::new("銀河鉄道の夜");
    assert_eq!(source.len(), 6);
    assert_eq!(source.slice(Span::new(2, 4)), "鉄道");
}

#[test]
fn slice_clamps_to_bounds() {
    let source = SourceText::new("abc");
    assert_eq!(source.slice(Span::new(1, 99)), "bc");
    assert_eq!(source.slice(Span::new(50, 99)), "");
}

#[test]
fn blank_detection() {
    assert!(SourceText::new("").is_empty());
    assert!(SourceText::new(" \n\t").is_blank());
    assert!(!SourceText::new(" x ").is_blank());
}
