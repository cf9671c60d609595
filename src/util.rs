use std::borrow::Cow;

/// Shortens `text` to at most `max_chars` characters, ending with an ellipsis
/// when anything was cut.
pub fn truncate_label(text: &str, max_chars: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }

    let kept = max_chars.saturating_sub(1);
    let mut short = text.chars().take(kept).collect::<String>();
    short.push('…');
    Cow::Owned(short)
}
