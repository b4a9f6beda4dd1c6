use linguadoc::utils::text::{contains_arabic, normalize_text};

#[test]
fn test_normalize_collapses_whitespace() {
    assert_eq!(normalize_text("  a\t b\n\nc  "), "a b c");
    assert_eq!(normalize_text(""), "");
    assert_eq!(normalize_text("   "), "");
}

#[test]
fn test_normalize_strips_zero_width_characters() {
    assert_eq!(normalize_text("a\u{200B}b\u{FEFF}c"), "abc");
}

#[test]
fn test_normalize_unifies_alef_forms_and_drops_tatweel() {
    // Alef madda, hamza above, and hamza below all normalize to bare alef.
    assert_eq!(normalize_text("\u{0622}\u{0623}\u{0625}"), "\u{0627}\u{0627}\u{0627}");
    // Tatweel elongation carries no content.
    assert_eq!(normalize_text("كتـــاب"), "كتاب");
}

#[test]
fn test_contains_arabic() {
    assert!(contains_arabic("نص عربي"));
    assert!(contains_arabic("mixed نص"));
    assert!(!contains_arabic("english only"));
    assert!(!contains_arabic(""));
}
