use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ConvertConfig, LoadedConfig};

use super::document::Document;
use super::markdown::{MarkdownConverter, MarkdownError};
use super::pipeline::{Pipeline, PipelineContext, PipelineError, ProcessingDocument};
use super::render::{RenderError, Renderer};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("Input file not found at {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("markdown error: {0}")]
    Markdown(#[from] MarkdownError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a successful conversion.
#[derive(Debug)]
pub struct BuildResult {
    pub output_path: PathBuf,
    /// The configuration the conversion ran with
    pub config: LoadedConfig,
    /// Every file the page was built from, starting with the input itself
    pub dependencies: Vec<PathBuf>,
}

/// Converts one note into one page.
///
/// The config is re-read on every build so a watching session picks up
/// edits to it.
pub struct Builder {
    input: PathBuf,
    output: PathBuf,
    config_file: Option<PathBuf>,
}

impl Builder {
    pub fn new(input: PathBuf, output: PathBuf, config_file: Option<PathBuf>) -> Self {
        Self {
            input,
            output,
            config_file,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn build(&self) -> Result<BuildResult, BuildError> {
        // Build pipeline:
        // 1. Load config (explicit file, or the one next to the input)
        // 2. Set up converter and renderer from it
        // 3. Run the note through the stages, writing the page

        if !self.input.is_file() {
            return Err(BuildError::InputNotFound(self.input.clone()));
        }

        let loaded = ConvertConfig::load_for_input(self.config_file.as_deref(), &self.input)?;
        if let Some(path) = &loaded.path {
            tracing::info!(path = %path.display(), "using config file");
        }

        let converter = MarkdownConverter::new(&loaded.config.markdown)?;
        let renderer = match loaded.template_path() {
            Some(path) => {
                tracing::info!(path = %path.display(), "using custom template");
                Renderer::with_template(&path)?
            }
            None => Renderer::new()?,
        };
        let ctx = PipelineContext::new(&converter, &renderer, &loaded.config.template);

        let doc = Document::load(&self.input)?;
        let mut doc = ProcessingDocument::new(doc, self.output.clone());
        let pipeline = Pipeline::default_pipeline();
        tracing::debug!(stages = ?pipeline.stage_names(), "running pipeline");
        pipeline.run(&mut doc, &ctx)?;

        let mut dependencies = vec![self.input.clone()];
        dependencies.append(&mut doc.transcluded);
        dependencies.extend(loaded.path.clone());
        dependencies.extend(loaded.template_path());

        Ok(BuildResult {
            output_path: doc.output_path,
            config: loaded,
            dependencies,
        })
    }
}
