//! Configuration loading and types for obsidian-html.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files (`load`)

mod load;
mod types;

use std::path::PathBuf;

// Re-export all types for convenient access
pub use load::LoadedConfig;
pub use types::{ConvertConfig, MarkdownConfig, TemplateConfig, WatchConfig};

/// Config file picked up automatically from the input's directory.
pub const DEFAULT_CONFIG_FILE: &str = "obsidian-html.yaml";

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),
}
