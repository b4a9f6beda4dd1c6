//! Text normalization applied to extracted and recognized block text.

/// Normalizes a block's text after extraction or recognition:
/// strips zero-width characters and the Arabic tatweel, unifies Alef
/// variants, and collapses whitespace runs into single spaces.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut last_was_space = false;

    for ch in text.chars() {
        let ch = match ch {
            // Tatweel and zero-width characters carry no content.
            '\u{0640}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => continue,
            // Alef with madda / hamza above / hamza below -> bare alef.
            '\u{0622}' | '\u{0623}' | '\u{0625}' => '\u{0627}',
            ch => ch,
        };

        if ch.is_whitespace() {
            if !last_was_space {
                normalized.push(' ');
                last_was_space = true;
            }
        } else {
            normalized.push(ch);
            last_was_space = false;
        }
    }

    normalized.trim().to_string()
}

/// `true` if the text contains characters from the Arabic Unicode block.
#[must_use]
pub fn contains_arabic(text: &str) -> bool {
    text.chars()
        .any(|ch| ('\u{0600}'..='\u{06FF}').contains(&ch))
}
