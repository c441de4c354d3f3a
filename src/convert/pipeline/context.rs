//! Pipeline context for sharing state across stages.

use crate::config::TemplateConfig;
use crate::convert::markdown::MarkdownConverter;
use crate::convert::render::Renderer;

/// Shared context for pipeline stages.
pub struct PipelineContext<'a> {
    /// Markdown converter, also used for transcluded notes
    pub converter: &'a MarkdownConverter,

    /// Page template renderer
    pub renderer: &'a Renderer,

    /// Page-level template settings
    pub template: &'a TemplateConfig,

    /// Stylesheet for highlighted code, computed once per conversion
    pub highlight_css: Option<String>,
}

impl<'a> PipelineContext<'a> {
    /// Create a new pipeline context.
    pub fn new(
        converter: &'a MarkdownConverter,
        renderer: &'a Renderer,
        template: &'a TemplateConfig,
    ) -> Self {
        Self {
            converter,
            renderer,
            template,
            highlight_css: converter.highlight_css(),
        }
    }
}
