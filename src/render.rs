//! Display rule for reply text, shared by the TUI and `coach ask`.

/// Stands in for an empty line so blank paragraphs keep their height.
pub const NBSP: &str = "\u{00A0}";

/// Splits a reply on `\n` into paragraphs; empty ones become [`NBSP`].
pub fn response_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| if line.is_empty() { NBSP } else { line })
        .collect()
}
