//! HTML escaping for user-supplied text
//!
//! Escaping happens exactly once, here, before text reaches storage.
//! Render layers must emit stored values verbatim.

/// Escape the six HTML-significant characters
///
/// Replaces `& < > " ' /` with their entity forms. The output matches what
/// the public site expects to embed directly into markup.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}
