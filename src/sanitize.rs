use regex::Regex;
use std::sync::LazyLock;

/// Largo máximo de una nota, en caracteres.
pub const NOTE_MAX_CHARS: usize = 200;

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup regex"));

/// Strips every `<...>` span, trims, and bounds the note to `NOTE_MAX_CHARS`.
pub fn sanitize_note(raw: &str) -> String {
    let stripped = MARKUP.replace_all(raw, "");
    stripped.trim().chars().take(NOTE_MAX_CHARS).collect()
}
