//! Text sanitization applied to every field injected into a prompt.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static SPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid space run regex"));
static NEWLINE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline run regex"));

/// Normalizes untrusted text before it is embedded in a prompt.
///
/// Steps, in order:
/// 1. NFC normalization
/// 2. NUL bytes removed
/// 3. Remaining control characters (except `\t`, `\n`, `\r`) replaced by a space
/// 4. Runs of 2+ spaces/tabs collapsed to one space
/// 5. Runs of 3+ newlines collapsed to exactly two
/// 6. Leading/trailing whitespace trimmed
pub fn sanitize_text(input: &str) -> String {
    let cleaned: String = input
        .nfc()
        .filter(|&c| c != '\0')
        .map(|c| {
            if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
                ' '
            } else {
                c
            }
        })
        .collect();

    let collapsed = SPACE_RUN_RE.replace_all(&cleaned, " ");
    let collapsed = NEWLINE_RUN_RE.replace_all(&collapsed, "\n\n");
    collapsed.trim().to_string()
}

/// Returns at most `max_chars` characters of `text`. Never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
