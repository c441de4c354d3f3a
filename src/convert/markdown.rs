//! Markdown rendering with syntax highlighting.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

use super::highlight::SyntaxHighlighter;
use crate::config::MarkdownConfig;

#[derive(thiserror::Error, Debug)]
pub enum MarkdownError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

/// Turns intermediate markdown (which may contain raw HTML islands) into an
/// HTML fragment.
///
/// The pre-processor only needs this one capability, so transclusion can be
/// tested without a real markdown engine behind it.
pub trait Converter {
    fn render(&self, markdown: &str) -> Result<String, MarkdownError>;
}

/// The pulldown-cmark backed converter.
pub struct MarkdownConverter {
    options: Options,
    /// None when highlighting is switched off
    highlighter: Option<SyntaxHighlighter>,
}

impl MarkdownConverter {
    /// Build a converter from config, validating the extension list up front.
    pub fn new(markdown_config: &MarkdownConfig) -> Result<Self, MarkdownError> {
        let options = parse_options(&markdown_config.extensions)?;
        Ok(Self {
            options,
            highlighter: SyntaxHighlighter::from_config(markdown_config),
        })
    }

    /// CSS for the highlighting theme, if highlighting is enabled.
    pub fn highlight_css(&self) -> Option<String> {
        self.highlighter
            .as_ref()
            .and_then(|h| h.css())
            .map(str::to_string)
    }
}

impl Converter for MarkdownConverter {
    fn render(&self, markdown: &str) -> Result<String, MarkdownError> {
        Ok(render_markdown(markdown, self.options, self.highlighter.as_ref()))
    }
}

fn parse_options(extensions: &[String]) -> Result<Options, MarkdownError> {
    let mut options = Options::empty();
    for extension in extensions {
        match extension.as_str() {
            "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
            "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
            "gfm" => options.insert(Options::ENABLE_GFM),
            "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
            "math" => options.insert(Options::ENABLE_MATH),
            "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
            "tables" => options.insert(Options::ENABLE_TABLES),
            "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
            other => return Err(MarkdownError::InvalidExtension(other.to_string())),
        }
    }
    Ok(options)
}

/// Render markdown to HTML using pulldown-cmark, highlighting code blocks
/// when a highlighter is given.
pub fn render_markdown(
    markdown: &str,
    options: Options,
    highlighter: Option<&SyntaxHighlighter>,
) -> String {
    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    let Some(highlighter) = highlighter else {
        html::push_html(&mut html_output, parser);
        return html_output;
    };

    // Process events, intercepting code blocks for syntax highlighting
    let mut in_code_block = false;
    let mut code_language = String::new();
    let mut code_content = String::new();

    let events = parser.flat_map(|event| match event {
        Event::Start(Tag::CodeBlock(kind)) => {
            in_code_block = true;
            code_language = match kind {
                CodeBlockKind::Fenced(lang) => lang.to_string(),
                CodeBlockKind::Indented => String::new(),
            };
            code_content.clear();
            vec![] // Don't emit the start tag yet
        }
        Event::End(TagEnd::CodeBlock) => {
            in_code_block = false;
            let highlighted = highlighter.highlight(&code_content, &code_language);
            vec![Event::Html(highlighted.into())]
        }
        Event::Text(text) if in_code_block => {
            code_content.push_str(&text);
            vec![]
        }
        _ => vec![event],
    });

    html::push_html(&mut html_output, events);
    html_output
}
