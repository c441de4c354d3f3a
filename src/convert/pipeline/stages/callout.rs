//! Callout restructuring stage.

use crate::convert::callout::process_callouts;
use crate::convert::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that rewrites `[!type]` blockquotes into callout containers.
pub struct CalloutStage;

impl Stage for CalloutStage {
    fn name(&self) -> &'static str {
        "callouts"
    }

    fn process(
        &self,
        doc: &mut ProcessingDocument,
        _ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        doc.content = process_callouts(&doc.content)?;
        Ok(())
    }
}
