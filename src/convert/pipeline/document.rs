//! Document types for pipeline processing.

use std::path::{Path, PathBuf};

use crate::convert::document::Document;

/// A document being processed through the pipeline.
///
/// Wraps the original `Document` with mutable state that evolves
/// through pipeline stages:
///
/// 1. Initially: `content` = raw note text
/// 2. After preprocess: `content` = markdown with raw HTML islands,
///    `transcluded` = embedded notes
/// 3. After markdown: `content` = HTML fragment
/// 4. After callouts: `content` = HTML fragment with callouts restructured
/// 5. After template: `output_html` = final page HTML
#[derive(Debug)]
pub struct ProcessingDocument {
    /// The original document
    pub doc: Document,

    /// Where the final page is written
    pub output_path: PathBuf,

    /// Content being processed (see the stage list above)
    pub content: String,

    /// Notes pulled in by `![[...md]]` embeds, at any depth.
    ///
    /// Empty until the preprocess stage populates it.
    pub transcluded: Vec<PathBuf>,

    /// Final HTML output after template rendering.
    ///
    /// None until the template stage populates it.
    pub output_html: Option<String>,
}

impl ProcessingDocument {
    /// Create a new processing document from a loaded note.
    pub fn new(doc: Document, output_path: PathBuf) -> Self {
        let content = doc.raw_content.clone();
        Self {
            doc,
            output_path,
            content,
            transcluded: Vec::new(),
            output_html: None,
        }
    }

    /// Path of the note being converted.
    pub fn source_path(&self) -> &Path {
        &self.doc.source_path
    }

    /// Get the document title.
    pub fn title(&self) -> String {
        self.doc.title()
    }
}
