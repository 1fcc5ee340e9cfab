/// Strips angle-bracket tags from text and trims the result.
///
/// A naive greedy non-nesting pass: every `<...>` span up to the next `>`
/// is removed, entities are left undecoded, and an unmatched `<` with no
/// closing `>` is kept verbatim. Good enough for rendering feed summaries
/// as plain text; this is not an HTML sanitizer.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                // No closing bracket: keep the remainder as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_nested_tags() {
        assert_eq!(strip_markup("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_markup("no markup here"), "no markup here");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(strip_markup("  <i>padded</i>  "), "padded");
        assert_eq!(strip_markup("<br/>\n  text \n"), "text");
    }

    #[test]
    fn test_tag_with_attributes() {
        assert_eq!(
            strip_markup(r#"<a href="https://example.com">link</a> text"#),
            "link text"
        );
    }

    #[test]
    fn test_unmatched_open_bracket_kept() {
        assert_eq!(strip_markup("a < b"), "a < b");
        assert_eq!(strip_markup("broken <tag"), "broken <tag");
    }

    #[test]
    fn test_entities_not_decoded() {
        assert_eq!(strip_markup("<p>a &amp; b</p>"), "a &amp; b");
    }

    #[test]
    fn test_only_markup_becomes_empty() {
        assert_eq!(strip_markup("<p></p><br/>"), "");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_stray_close_bracket_kept() {
        assert_eq!(strip_markup("a > b"), "a > b");
    }

    proptest! {
        #[test]
        fn prop_wrapping_tags_removed(body in "[^<>]{0,64}") {
            let wrapped = format!("<p>{body}</p>");
            prop_assert_eq!(strip_markup(&wrapped), body.trim());
        }

        #[test]
        fn prop_bracket_free_input_only_trimmed(s in "[^<>]{0,64}") {
            prop_assert_eq!(strip_markup(&s), s.trim());
        }
    }
}
