//! Fenced code block highlighting.

use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language, themes};

use crate::config::MarkdownConfig;
use crate::util::escape_html;

/// Fence tags that mean "no language", rendered as plain code.
const PLAIN_TAGS: &[&str] = &["", "plaintext", "text", "txt"];

/// Highlights code blocks with autumnus, emitting CSS classes.
///
/// The page gets the theme's stylesheet from [`SyntaxHighlighter::css`].
pub struct SyntaxHighlighter {
    css: Option<String>,
}

impl SyntaxHighlighter {
    /// `None` when highlighting is switched off in the config.
    ///
    /// An unknown theme still highlights, just without a stylesheet.
    pub fn from_config(config: &MarkdownConfig) -> Option<Self> {
        if !config.highlight {
            return None;
        }

        let css = match themes::get(&config.highlight_theme) {
            Ok(theme) => Some(theme.css(false)),
            Err(_) => {
                tracing::warn!(theme = %config.highlight_theme, "unknown highlight theme");
                None
            }
        };
        Some(Self { css })
    }

    pub fn css(&self) -> Option<&str> {
        self.css.as_deref()
    }

    /// Render one code block. `info` is the fence info string; only its
    /// first word names the language.
    pub fn highlight(&self, code: &str, info: &str) -> String {
        let language = info.split_whitespace().next().unwrap_or_default();
        format_code(code, language).unwrap_or_else(|| plain_code_block(code, language))
    }
}

/// `None` for languages autumnus doesn't know, or if formatting fails.
fn format_code(code: &str, language: &str) -> Option<String> {
    let lang = Language::guess(language, code);
    if matches!(lang, Language::PlainText) && !PLAIN_TAGS.contains(&language) {
        return None;
    }

    let formatter = HtmlLinkedBuilder::new()
        .source(code)
        .lang(lang)
        .build()
        .ok()?;
    let mut output = Vec::new();
    formatter.format(&mut output).ok()?;
    String::from_utf8(output).ok()
}

/// The block pulldown-cmark itself would have written.
fn plain_code_block(code: &str, language: &str) -> String {
    if language.is_empty() {
        format!("<pre><code>{}</code></pre>", escape_html(code))
    } else {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(language),
            escape_html(code)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighter(theme: &str) -> SyntaxHighlighter {
        let config = MarkdownConfig {
            highlight_theme: theme.to_string(),
            ..MarkdownConfig::default()
        };
        SyntaxHighlighter::from_config(&config).unwrap()
    }

    #[test]
    fn test_disabled_in_config() {
        let config = MarkdownConfig {
            highlight: false,
            ..MarkdownConfig::default()
        };
        assert!(SyntaxHighlighter::from_config(&config).is_none());
    }

    #[test]
    fn test_theme_css() {
        assert!(highlighter("dracula").css().is_some_and(|css| !css.is_empty()));
        assert!(highlighter("no-such-theme").css().is_none());
    }

    #[test]
    fn test_highlight_rust() {
        let result = highlighter("dracula").highlight("fn main() {}", "rust");
        assert!(result.contains("<pre"));
        assert!(result.contains("</pre>"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_block() {
        let result = highlighter("dracula").highlight("some <code>", "unknown_lang_xyz");
        assert_eq!(
            result,
            "<pre><code class=\"language-unknown_lang_xyz\">some &lt;code&gt;</code></pre>"
        );
    }

    #[test]
    fn test_only_first_word_of_info_string_is_the_language() {
        let result = highlighter("dracula").highlight("x <y", "made_up_lang title=\"a.txt\"");
        assert_eq!(
            result,
            "<pre><code class=\"language-made_up_lang\">x &lt;y</code></pre>"
        );
    }
}
