//! Markdown rendering stage.

use crate::convert::markdown::Converter;
use crate::convert::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that converts markdown content to an HTML fragment.
///
/// Raw HTML produced by the preprocess stage passes through untouched.
pub struct MarkdownStage;

impl Stage for MarkdownStage {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn process(
        &self,
        doc: &mut ProcessingDocument,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        doc.content = ctx.converter.render(&doc.content)?;
        Ok(())
    }
}
