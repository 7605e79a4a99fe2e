//! Char-boundary-safe string truncation.
//!
//! Byte slicing (`&s[..n]`) panics inside a multibyte character, so every
//! length limit on page text goes through these helpers.

/// The first `n` characters of `s`.
pub fn prefix_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// The first `n` characters of `s`, with `...` appended when anything was
/// cut. Used for log previews.
pub fn preview(s: &str, n: usize) -> String {
    let mut prefix = prefix_chars(s, n);
    if s.chars().nth(n).is_some() {
        prefix.push_str("...");
    }
    prefix
}
