//! Obsidian syntax stage.

use crate::convert::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};
use crate::convert::preprocess::Preprocessor;

/// Stage that expands note-specific syntax before markdown rendering.
///
/// After this stage, `doc.content` is markdown with raw HTML islands and
/// `doc.transcluded` lists every embedded note that was read.
pub struct PreprocessStage;

impl Stage for PreprocessStage {
    fn name(&self) -> &'static str {
        "preprocess"
    }

    fn process(
        &self,
        doc: &mut ProcessingDocument,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let output = Preprocessor::new(ctx.converter).run(&doc.doc)?;

        doc.content = output.text;
        doc.transcluded = output.transcluded;
        Ok(())
    }
}
