//! Default pipeline stages.
//!
//! The standard conversion pipeline consists of:
//!
//! 1. **PreprocessStage** - Rewrite comments, highlights, wikilinks and embeds
//! 2. **MarkdownStage** - Convert markdown to HTML with syntax highlighting
//! 3. **CalloutStage** - Turn `[!type]` blockquotes into callout blocks
//! 4. **TemplateStage** - Wrap content in the page template
//! 5. **WriteStage** - Write final HTML to the output file

mod callout;
mod markdown;
mod preprocess;
mod template;
mod write;

pub use callout::CalloutStage;
pub use markdown::MarkdownStage;
pub use preprocess::PreprocessStage;
pub use template::TemplateStage;
pub use write::WriteStage;
