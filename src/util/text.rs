use std::borrow::Cow;

/// Renders newlines as the two-character escape `\n` so a snippet of feed
/// content stays on one console line.
///
/// Returns `Cow::Borrowed` when the input contains no newline (common case).
///
/// # Examples
///
/// ```
/// use feedgate::util::escape_newlines;
///
/// assert_eq!(escape_newlines("<item>\n<title>"), "<item>\\n<title>");
/// assert_eq!(escape_newlines("plain"), "plain");
/// ```
pub fn escape_newlines(s: &str) -> Cow<'_, str> {
    if s.contains('\n') {
        Cow::Owned(s.replace('\n', "\\n"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Extracts the characters surrounding `position` for display.
///
/// The window is the character range `[position - radius, position + radius)`
/// clamped to the bounds of `chars`, so it holds `radius` characters before
/// the position, the character itself, and `radius - 1` after it. Newlines
/// are escaped and the result is wrapped in `...` on both sides.
///
/// Positions are character offsets, not byte offsets, which is why this takes
/// the content as a `char` slice.
///
/// # Examples
///
/// ```
/// use feedgate::util::context_window;
///
/// let chars: Vec<char> = "abcdefghij".chars().collect();
/// assert_eq!(context_window(&chars, 5, 2), "...defg...");
/// assert_eq!(context_window(&chars, 0, 3), "...abc...");
/// ```
pub fn context_window(chars: &[char], position: usize, radius: usize) -> String {
    let start = position.saturating_sub(radius).min(chars.len());
    let end = position.saturating_add(radius).min(chars.len());
    let snippet: String = chars[start..end].iter().collect();
    format!("...{}...", escape_newlines(&snippet))
}
