//! Pipeline error types.

use crate::convert::callout::CalloutError;
use crate::convert::markdown::MarkdownError;
use crate::convert::preprocess::PreprocessError;
use crate::convert::render::RenderError;

/// Errors that can occur during pipeline processing.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("pre-processing error: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("markdown rendering error: {0}")]
    Markdown(#[from] MarkdownError),

    #[error("callout processing error: {0}")]
    Callout(#[from] CalloutError),

    #[error("template rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipelineError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
