//! Template rendering stage.
//!
//! Wraps the converted content in the page template.

use crate::convert::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};
use crate::convert::render::{PageContext, PageInfo};

/// Stage that wraps content in the page template.
///
/// After this stage, `doc.output_html` contains the complete page.
pub struct TemplateStage;

impl Stage for TemplateStage {
    fn name(&self) -> &'static str {
        "template"
    }

    fn process(
        &self,
        doc: &mut ProcessingDocument,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let context = PageContext {
            page: PageInfo {
                title: doc.title(),
                lang: ctx.template.lang.clone(),
            },
            content: std::mem::take(&mut doc.content),
            math: ctx.template.math,
            footer: ctx.template.footer.clone(),
            highlight_css: ctx.highlight_css.clone(),
        };

        let html = ctx.renderer.render_page(&context)?;
        doc.content = context.content;
        doc.output_html = Some(html);
        Ok(())
    }
}
