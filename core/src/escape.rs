//! Field escaping for the non-multipart encodings.

/// Percent-encode a URL component.
///
/// Everything except ASCII alphanumerics and `-_.~` is escaped; space becomes
/// `%20` and non-ASCII characters are escaped as their UTF-8 bytes.
pub fn url_escape(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

/// Escape text for a `text/plain` body.
///
/// Whitespace, `=` and `\` are each prefixed with a backslash so that a line
/// can be split back into name and value at its first unescaped `=`.
pub fn plain_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace() || c == '=' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
