//! Configuration type definitions.
//!
//! This module contains the data structures read from `obsidian-html.yaml`.
//! These types are pure data - no I/O or complex logic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Top-level config
// =============================================================================

/// Everything that can be tuned about a conversion. Every field has a default,
/// so an empty (or missing) config file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub markdown: MarkdownConfig,
    pub template: TemplateConfig,
    /// Settings for `--watch`
    pub watch: WatchConfig,
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
    /// Syntax-highlight fenced code blocks
    #[serde(default = "default_highlight")]
    pub highlight: bool,
    /// autumnus theme whose CSS is embedded in the page
    #[serde(default = "default_highlight_theme")]
    pub highlight_theme: String,
}

// No `gfm`: its alert support rewrites `> [!NOTE]` blocks before the
// callout pass sees the marker.
fn default_markdown_extensions() -> Vec<String> {
    vec![
        "footnotes".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

fn default_highlight() -> bool {
    true
}

fn default_highlight_theme() -> String {
    "github_light".to_string()
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
            highlight: default_highlight(),
            highlight_theme: default_highlight_theme(),
        }
    }
}

// =============================================================================
// Template configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Custom Tera page template (relative to the config file). The built-in
    /// template is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Value of the `<html lang>` attribute
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Include the MathJax loader
    #[serde(default = "default_math")]
    pub math: bool,
    /// Raw HTML placed in the page footer
    #[serde(default)]
    pub footer: Option<String>,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_math() -> bool {
    true
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: None,
            lang: default_lang(),
            math: default_math(),
            footer: None,
        }
    }
}

// =============================================================================
// Watch configuration
// =============================================================================

/// Configuration for file watching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Use polling-based watcher instead of native file system events.
    /// Useful for network filesystems, Docker volumes, or other situations
    /// where native events are unreliable.
    #[serde(default)]
    pub poll: bool,
    /// Poll interval in milliseconds (only used if poll=true).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Debounce timeout in milliseconds.
    /// Changes within this window are batched together.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll: false,
            poll_interval_ms: default_poll_interval_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}
