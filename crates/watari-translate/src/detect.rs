// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based source-language detection.
//!
//! Three-way classification (ja/pl/en) by script membership, with Japanese
//! taking precedence over Polish.

use watari_core::LanguageTag;

/// Polish letters that do not occur in plain ASCII English text.
const POLISH_DIACRITICS: &str = "ąćęłńóśźżĄĆĘŁŃÓŚŹŻ";

/// Classifies `text` into a source-language tag.
///
/// Ordered rules: any Japanese-script character wins, then any Polish
/// diacritic, then the English default. Total over all inputs, including
/// the empty string.
pub fn detect(text: &str) -> LanguageTag {
    if text.chars().any(is_japanese_char) {
        return LanguageTag::Ja;
    }
    if text.chars().any(|c| POLISH_DIACRITICS.contains(c)) {
        return LanguageTag::Pl;
    }
    LanguageTag::En
}

/// True for characters in the Japanese script ranges: hiragana, katakana,
/// CJK ideographs, and halfwidth katakana.
fn is_japanese_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // hiragana
        | '\u{30A0}'..='\u{30FF}' // katakana
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{FF66}'..='\u{FF9D}' // halfwidth katakana
    )
}
