//! Conversion pipeline for a single note.
//!
//! The pipeline transforms a document through a series of stages:
//! 1. Pre-processing (Obsidian syntax to markdown + raw HTML)
//! 2. Markdown rendering (to an HTML fragment)
//! 3. Callout restructuring (on the parsed HTML tree)
//! 4. Template rendering (page template wrapper)
//! 5. File writing (output to disk)

mod context;
mod document;
mod error;
mod stages;

pub use context::PipelineContext;
pub use document::ProcessingDocument;
pub use error::PipelineError;

use stages::{CalloutStage, MarkdownStage, PreprocessStage, TemplateStage, WriteStage};

/// A stage in the document processing pipeline.
///
/// Stages transform the document sequentially, modifying it in place
/// before passing it to the next stage.
pub trait Stage: Send + Sync {
    /// Unique name for this stage.
    fn name(&self) -> &'static str;

    /// Process the document through this stage.
    ///
    /// The `ctx` provides access to shared resources like the converter
    /// and the template renderer.
    fn process(
        &self,
        doc: &mut ProcessingDocument,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// The document processing pipeline.
///
/// The default pipeline is: preprocess → markdown → callouts → template → write.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Create the default pipeline with standard stages.
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::in_memory();
        pipeline.add_stage(WriteStage);
        pipeline
    }

    /// The default pipeline without the final write, leaving the page in
    /// `output_html`.
    pub fn in_memory() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(PreprocessStage);
        pipeline.add_stage(MarkdownStage);
        pipeline.add_stage(CalloutStage);
        pipeline.add_stage(TemplateStage);
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run the pipeline on a document.
    ///
    /// Stops at the first failing stage; nothing after it runs.
    pub fn run(
        &self,
        doc: &mut ProcessingDocument,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), path = %doc.source_path().display(), "running stage");
            stage.process(doc, ctx)?;
        }
        Ok(())
    }

    /// Get the names of all stages in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::{MarkdownConfig, TemplateConfig};
    use crate::convert::document::Document;
    use crate::convert::markdown::MarkdownConverter;
    use crate::convert::render::Renderer;

    struct FailingStage;

    impl Stage for FailingStage {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn process(
            &self,
            _doc: &mut ProcessingDocument,
            _ctx: &PipelineContext,
        ) -> Result<(), PipelineError> {
            Err(PipelineError::stage("failing", "boom"))
        }
    }

    fn run(pipeline: &Pipeline, text: &str) -> Result<ProcessingDocument, PipelineError> {
        let converter = MarkdownConverter::new(&MarkdownConfig::default()).unwrap();
        let renderer = Renderer::new().unwrap();
        let template = TemplateConfig::default();
        let ctx = PipelineContext::new(&converter, &renderer, &template);

        let doc = Document::new(PathBuf::from("vault/My Note.md"), text.to_string());
        let mut doc = ProcessingDocument::new(doc, PathBuf::from("vault/My Note.html"));
        pipeline.run(&mut doc, &ctx)?;
        Ok(doc)
    }

    #[test]
    fn test_default_stage_order() {
        assert_eq!(
            Pipeline::default_pipeline().stage_names(),
            vec!["preprocess", "markdown", "callouts", "template", "write"]
        );
    }

    #[test]
    fn test_in_memory_pipeline() {
        let text = "# Heading\n\nSee [[Other Note|other]] and ==this==.\n\n\
                    > [!warning] Careful\n> Hot surface.\n\n> Plain quote\n";
        let doc = run(&Pipeline::in_memory(), text).unwrap();

        assert!(doc.content.contains("<h1>Heading</h1>"));
        assert!(
            doc.content
                .contains("<a href=\"other-note.html\" class=\"internal-link\">other</a>")
        );
        assert!(doc.content.contains("<mark>this</mark>"));
        assert!(doc.content.contains("<div class=\"callout callout-warning\">"));
        assert!(doc.content.contains("<div class=\"callout-title\">Careful</div>"));
        assert!(doc.content.contains("<p>Hot surface.</p>"));
        assert!(doc.content.contains("<blockquote>\n<p>Plain quote</p>\n</blockquote>"));

        let page = doc.output_html.unwrap();
        assert!(page.contains("<title>My Note</title>"));
        assert!(page.contains("<div class=\"callout callout-warning\">"));
    }

    #[test]
    fn test_failing_stage_stops_pipeline() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(FailingStage);
        pipeline.add_stage(TemplateStage);

        let err = run(&pipeline, "text").err().unwrap();
        assert!(matches!(err, PipelineError::Stage { .. }));
    }

    #[test]
    fn test_write_without_template_is_an_error() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(WriteStage);

        let err = run(&pipeline, "text").err().unwrap();
        assert!(err.to_string().contains("no output HTML"));
    }
}
