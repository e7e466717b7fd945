//! Helpers for storing multi-line text as a single value.

/// Stands in for a line break inside a value.
pub const NEWLINE_TOKEN: &str = "/r/n";

/// Replace every line break (`\r\n` or `\n`) in `text` with [`NEWLINE_TOKEN`].
#[must_use]
pub fn multiline_to_single_line(text: &str) -> String {
    text.replace("\r\n", NEWLINE_TOKEN)
        .replace('\n', NEWLINE_TOKEN)
}

/// Replace every [`NEWLINE_TOKEN`] in `text` with `\n`.
#[must_use]
pub fn single_line_to_multiline(text: &str) -> String {
    text.replace(NEWLINE_TOKEN, "\n")
}
