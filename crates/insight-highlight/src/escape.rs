//! HTML escaping for untrusted document text.

/// Escapes the five HTML-sensitive characters `& < > " '`.
///
/// Each character is replaced independently, so an `&` introduced by an entity is never
/// re-escaped within a single call. The function is not idempotent: escaping twice turns
/// `&amp;` into `&amp;amp;`, so each raw string must be escaped exactly once.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    push_escaped(&mut out, text);
    out
}

/// Appends the escaped form of `text` to `out`.
pub fn push_escaped(out: &mut String, text: &str) {
    let mut last = 0;
    for (i, ch) in text.char_indices() {
        let entity = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&apos;",
            _ => continue,
        };
        out.push_str(&text[last..i]);
        out.push_str(entity);
        last = i + ch.len_utf8();
    }
    out.push_str(&text[last..]);
}
