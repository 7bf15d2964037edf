// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic prompt assembly for translation requests.
//!
//! A Japanese source asks for a dual Polish+English rendition with a fixed
//! two-line output contract; any other source asks for Japanese only. The
//! style footer is a fixed template parameter and is never altered by
//! calling logic.

use std::fmt::Write;

use watari_core::{LanguageTag, TranslationRequest};

/// Fixed styling instructions appended to every prompt.
const STYLE_FOOTER: &str = "Guidelines: this is casual everyday chat between friends. \
Keep the tone and politeness level of the original. Prefer natural nuance over \
literal wording. A slightly longer translation is fine when it reads better.";

/// Builds the full prompt for a translation request.
///
/// Output is byte-identical for identical inputs.
pub fn build(request: &TranslationRequest) -> String {
    let mut prompt = String::new();

    match request.source_language {
        LanguageTag::Ja => {
            prompt.push_str(
                "Translate the following Japanese chat message into Polish and English.\n\
                 Reply with exactly two lines in this format:\n\
                 Polish: <polish translation>\n\
                 English: <english translation>\n",
            );
        }
        source => {
            let _ = writeln!(
                prompt,
                "Translate the following {} chat message into Japanese.\n\
                 Reply with only the Japanese translation.",
                language_name(source),
            );
        }
    }

    if !request.history.is_empty() {
        prompt.push_str("\nRecent messages from the same sender, oldest first:\n");
        for (i, entry) in request.history.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {}", i + 1, entry.message);
        }
        prompt.push_str(
            "Resolve pronouns and omitted subjects in the message using this context.\n",
        );
    }

    let _ = write!(prompt, "\nMessage:\n{}\n\n{}", request.message, STYLE_FOOTER);

    prompt
}

fn language_name(tag: LanguageTag) -> &'static str {
    match tag {
        LanguageTag::Ja => "Japanese",
        LanguageTag::Pl => "Polish",
        LanguageTag::En => "English",
    }
}
