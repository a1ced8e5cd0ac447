//! Text sanitization for administrator-supplied tribute messages.
//!
//! The message ends up verbatim in a response header, so anything that could
//! split a header line must go before it is stored or emitted.

/// Clean a single-line text field.
///
/// - markup tags are removed
/// - control characters (CR, LF, tab, NUL, DEL, ...) become whitespace
/// - whitespace runs collapse to a single space
/// - leading and trailing whitespace is trimmed
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);

    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for c in stripped.chars() {
        if c.is_whitespace() || c.is_control() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}

/// Remove `<tag ...>` sequences. A `<` that does not open a tag is kept.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));

        match after.find('>') {
            Some(end) if opens_tag => {
                out.push_str(&rest[..start]);
                rest = &after[end + 1..];
            }
            _ => {
                out.push_str(&rest[..=start]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_breaks_are_flattened() {
        assert_eq!(sanitize_text_field("GNU\r\nTerry\tPratchett"), "GNU Terry Pratchett");
    }

    #[test]
    fn test_whitespace_is_collapsed_and_trimmed() {
        assert_eq!(sanitize_text_field("   Ozzy    Osbourne  "), "Ozzy Osbourne");
        assert_eq!(sanitize_text_field("\n\n"), "");
    }

    #[test]
    fn test_control_characters_removed() {
        assert_eq!(sanitize_text_field("a\u{0}b\u{7f}c"), "a b c");
    }

    #[test]
    fn test_tags_are_stripped() {
        assert_eq!(sanitize_text_field("<b>Terry</b> Pratchett"), "Terry Pratchett");
        assert_eq!(sanitize_text_field("<script>x</script>"), "x");
    }

    #[test]
    fn test_lone_angle_brackets_kept() {
        assert_eq!(sanitize_text_field("1 < 2"), "1 < 2");
        assert_eq!(sanitize_text_field("<unterminated"), "<unterminated");
    }

    #[test]
    fn test_quotes_survive() {
        assert_eq!(
            sanitize_text_field("Ozzy \"The Prince of Darkness\" Osbourne"),
            "Ozzy \"The Prince of Darkness\" Osbourne"
        );
    }
}
