//! Shared utility functions.

use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s/]+").unwrap());
static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w.\-]+").unwrap());

/// Convert a link target to a URL-safe slug.
///
/// Lowercases and trims the input, collapses runs of whitespace and `/`
/// into a single `-`, then drops everything that is not a word character,
/// `.` or `-`.
/// "My Note" -> "my-note"
/// "Projects/Q3 Plan" -> "projects-q3-plan"
pub fn slugify(s: &str) -> String {
    let lowered = s.to_lowercase();
    let hyphenated = SEPARATOR_RUN.replace_all(lowered.trim(), "-");
    NON_SLUG_CHARS.replace_all(&hyphenated, "").into_owned()
}

/// Uppercase the first character of a word, leaving the rest alone.
///
/// "warning" -> "Warning"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Escape text for use in HTML content or a quoted attribute value.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Note"), "my-note");
        assert_eq!(slugify("  Projects/Q3   Plan "), "projects-q3-plan");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("v1.2 release-notes"), "v1.2-release-notes");
        assert_eq!(slugify("a / b"), "a-b");
    }

    #[test]
    fn test_slugify_keeps_unicode_word_chars() {
        assert_eq!(slugify("Café Notes"), "café-notes");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in [
            "My Note",
            "Projects/Q3 Plan",
            "  weird -- spacing // here  ",
            "Ünïcödé Tïtle",
            "already-a-slug.md",
            "",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_slugify_output_charset() {
        let slug = slugify("A title/with all\tsorts of (punctuation)! & stuff");
        assert!(
            slug.chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '-')
        );
        assert!(!slug.contains(char::is_whitespace));
        assert!(!slug.contains('/'));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<div>&</div>"), "&lt;div&gt;&amp;&lt;/div&gt;");
        assert_eq!(escape_html(r#"a "b" c's"#), "a &quot;b&quot; c&#x27;s");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("warning"), "Warning");
        assert_eq!(capitalize("Note"), "Note");
        assert_eq!(capitalize(""), "");
    }
}
