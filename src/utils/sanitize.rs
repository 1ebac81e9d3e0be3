//! The three sanitizers, one per context.
//!
//! Outgoing wire values are entity-encoded, stored values are stripped
//! (storage is not a render context), and server-echoed text is run through
//! ammonia before it reaches a display surface. Encoding is applied exactly
//! once per hop; stripping is idempotent.

/// Hard cap applied by every sanitizer, independent of the per-field length
/// rules that were already enforced.
pub const SANITIZED_MAX_LEN: usize = 500;

/// Prepare a field value for the wire: trim, entity-encode `<>&"'`, cap at
/// [`SANITIZED_MAX_LEN`] characters.
pub fn encode_input(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    truncate_chars(out, SANITIZED_MAX_LEN)
}

/// Prepare a field value for storage: trim, drop the HTML metacharacters
/// outright, cap the length. Unlike [`encode_input`] this is idempotent, so
/// a value can safely pass through it any number of times.
pub fn store_clean(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .collect();
    truncate_chars(cleaned, SANITIZED_MAX_LEN)
}

/// Fail-safe for text echoed back by the server before it is handed to a
/// display surface: strip any markup that survived the other layers.
pub fn display_safe(input: &str) -> String {
    truncate_chars(ammonia::clean(input), SANITIZED_MAX_LEN)
}

fn truncate_chars(s: String, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_input() {
        assert_eq!(encode_input("  plain text  "), "plain text");
        assert_eq!(
            encode_input("<b>\"quoted\" & 'solo'</b>"),
            "&lt;b&gt;&quot;quoted&quot; &amp; &#x27;solo&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_encode_input_caps_length() {
        let long = "a".repeat(600);
        assert_eq!(encode_input(&long).chars().count(), SANITIZED_MAX_LEN);
    }

    #[test]
    fn test_store_clean_strips() {
        assert_eq!(store_clean("Jane Doe"), "Jane Doe");
        assert_eq!(store_clean("<script>x</script>"), "scriptx/script");
        assert_eq!(store_clean("a & b"), "a  b");
    }

    #[test]
    fn test_store_clean_idempotent() {
        for input in [
            "Jane Doe",
            "<script>alert('xss')</script>",
            "a & b < c > d \" e ' f",
            "  padded  ",
            "",
            "&amp;&lt;&gt;",
        ] {
            let once = store_clean(input);
            assert_eq!(store_clean(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_display_safe_drops_markup() {
        assert_eq!(display_safe("TKT123456789"), "TKT123456789");
        assert!(!display_safe("<script>alert(1)</script>ok").contains("<script"));
    }
}
