//! File writing stage.
//!
//! Writes the final HTML output to the filesystem.

use crate::convert::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that writes the rendered page to its output path.
///
/// This stage takes the final HTML from `doc.output_html` and writes it
/// to `doc.output_path`, creating any missing parent directories.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(
        &self,
        doc: &mut ProcessingDocument,
        _ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let html = doc.output_html.as_ref().ok_or_else(|| {
            PipelineError::stage(
                "write",
                format!(
                    "document '{}' has no output HTML (was template stage run?)",
                    doc.source_path().display()
                ),
            )
        })?;

        if let Some(parent) = doc.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&doc.output_path, html)?;
        tracing::info!(path = %doc.output_path.display(), bytes = html.len(), "wrote page");
        Ok(())
    }
}
