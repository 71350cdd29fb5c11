/// An in-progress `@query` found just before the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionQuery {
    /// Byte offset of the `@`
    pub anchor: usize,
    /// Text typed after the `@`, up to the cursor
    pub query: String,
}

/// Look for a mention being typed at `cursor`.
///
/// The nearest `@` before the cursor opens a query when it sits at the start
/// of the text or after whitespace, is not the start of an encoded token
/// (`@[`), and no line break lies between it and the cursor.
pub fn detect_mention_query(text: &str, cursor: usize) -> Option<MentionQuery> {
    let cursor = floor_char_boundary(text, cursor);
    let before = &text[..cursor];
    let anchor = before.rfind('@')?;

    let preceded_ok = before[..anchor]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace);
    if !preceded_ok {
        return None;
    }

    let query = &before[anchor + 1..];
    if query.starts_with('[') || query.contains('\n') || query.contains('\r') {
        return None;
    }

    Some(MentionQuery {
        anchor,
        query: query.to_string(),
    })
}

/// Largest char boundary at or below `offset`, clamped to the string length.
pub fn floor_char_boundary(s: &str, offset: usize) -> usize {
    let mut i = offset.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
