use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

/// The page template compiled into the binary.
const DEFAULT_PAGE_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/page.html"));

const PAGE_TEMPLATE_NAME: &str = "page.html";

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("template not found: {0}")]
    TemplateNotFound(String),
}

/// The page renderer, wrapping Tera.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Create a renderer using the built-in page template.
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE_NAME, DEFAULT_PAGE_TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Create a renderer from a custom page template file.
    pub fn with_template(template_path: &Path) -> Result<Self, RenderError> {
        if !template_path.is_file() {
            return Err(RenderError::TemplateNotFound(
                template_path.display().to_string(),
            ));
        }

        let mut tera = Tera::default();
        tera.add_template_file(template_path, Some(PAGE_TEMPLATE_NAME))?;
        Ok(Self { tera })
    }

    /// Render a page with the given context.
    pub fn render_page(&self, context: &PageContext) -> Result<String, RenderError> {
        let mut tera_context = Context::new();
        tera_context.insert("page", &context.page);
        tera_context.insert("content", &context.content);
        tera_context.insert("math", &context.math);
        tera_context.insert("footer", &context.footer);
        tera_context.insert("highlight_css", &context.highlight_css);

        Ok(self.tera.render(PAGE_TEMPLATE_NAME, &tera_context)?)
    }
}

/// Context passed to the page template.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub page: PageInfo,
    /// The converted note body (inserted unescaped)
    pub content: String,
    /// Include the MathJax loader
    pub math: bool,
    /// Raw footer HTML
    pub footer: Option<String>,
    /// Stylesheet for highlighted code blocks
    pub highlight_css: Option<String>,
}

/// Information about the current page.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub lang: String,
}
