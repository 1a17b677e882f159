//! Text helpers for values that end up inside the generated registry.
//!
//! ## Notes
//! - [`quote_cue`] spells string constants the way the CUE side reads them.
//! - [`collapse_blank_lines`] and [`raw_string_literal`] prepare embedded CUE snippets.

/// Quote a string as a double-quoted CUE string literal.
///
/// ## Notes
/// - Printable characters (including non-ASCII) are kept as-is.
/// - Control characters without a short escape are written as `\uXXXX`.
///
/// ## Examples
/// ```rust
/// use cuegen_core::strings::quote_cue;
///
/// assert_eq!(quote_cue("a\"b"), r#""a\"b""#);
/// assert_eq!(quote_cue("tab\there"), r#""tab\there""#);
/// ```
pub fn quote_cue(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Collapse every run of blank lines into a single blank line.
///
/// A line is blank when it holds only whitespace; the kept blank line is emitted empty. Leading
/// blank lines are dropped and the result ends with exactly one newline (unless it is empty).
///
/// ## Examples
/// ```rust
/// use cuegen_core::strings::collapse_blank_lines;
///
/// assert_eq!(collapse_blank_lines("a\n\n\n\nb\n"), "a\n\nb\n");
/// ```
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_blank = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Spell `text` as a Rust raw string literal that no content of `text` can terminate.
///
/// The literal uses one more `#` than the longest `"#…#` run found in the text.
///
/// ## Examples
/// ```rust
/// use cuegen_core::strings::raw_string_literal;
///
/// assert_eq!(raw_string_literal("a: 1"), "r#\"a: 1\"#");
/// assert_eq!(raw_string_literal("x: \"#A\""), "r##\"x: \"#A\"\"##");
/// ```
pub fn raw_string_literal(text: &str) -> String {
    let hashes = "#".repeat(longest_hash_run_after_quote(text) + 1);
    format!("r{hashes}\"{text}\"{hashes}")
}

fn longest_hash_run_after_quote(text: &str) -> usize {
    let mut longest = 0;
    for (i, _) in text.match_indices('"') {
        let run = text[i + 1..].chars().take_while(|c| *c == '#').count();
        longest = longest.max(run);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_unicode_is_kept() {
        assert_eq!(quote_cue("héllo"), "\"héllo\"");
        assert_eq!(quote_cue("\u{1b}"), "\"\\u001b\"");
        assert_eq!(quote_cue(""), "\"\"");
    }

    #[test]
    fn test_collapse_keeps_single_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb\n");
        assert_eq!(collapse_blank_lines("\n\na\n  \n\t\nb\n\n"), "a\n\nb\n");
        assert_eq!(collapse_blank_lines(""), "");
    }

    #[test]
    fn test_raw_literal_hash_count() {
        assert_eq!(raw_string_literal(""), "r#\"\"#");
        assert!(raw_string_literal("\"###").starts_with("r####\""));
    }
}
