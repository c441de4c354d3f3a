//! Configuration loading from files.
//!
//! This module handles reading and parsing configuration files.

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};

use super::{ConfigError, ConvertConfig, DEFAULT_CONFIG_FILE};

/// A loaded configuration together with the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ConvertConfig,
    /// The config file that was read (absent when running on defaults)
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Directory that relative paths inside the config resolve against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    /// Resolve the custom template path, if one is configured.
    pub fn template_path(&self) -> Option<PathBuf> {
        let path = self.config.template.path.as_ref()?;
        if path.is_relative() {
            if let Some(base) = self.base_dir() {
                return Some(base.join(path));
            }
        }
        Some(path.clone())
    }
}

impl ConvertConfig {
    /// Load the config for converting `input`.
    ///
    /// An explicit `config_file` must exist. Without one, `obsidian-html.yaml`
    /// next to the input is used when present, and the defaults otherwise.
    pub fn load_for_input(
        config_file: Option<&Path>,
        input: &Path,
    ) -> Result<LoadedConfig, ConfigError> {
        match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Ok(LoadedConfig {
                    config: Self::load_from_file(path, true)?,
                    path: Some(path.to_path_buf()),
                })
            }
            None => {
                let candidate = input
                    .parent()
                    .unwrap_or(Path::new("."))
                    .join(DEFAULT_CONFIG_FILE);
                let found = candidate.is_file();
                Ok(LoadedConfig {
                    config: Self::load_from_file(&candidate, false)?,
                    path: found.then_some(candidate),
                })
            }
        }
    }

    /// Load the config from a YAML file, layered over the defaults.
    pub(crate) fn load_from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let source = File::from(path)
            .format(FileFormat::Yaml)
            .required(required);

        Ok(Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize::<ConvertConfig>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("note.md");

        let loaded = ConvertConfig::load_for_input(None, &input).unwrap();

        assert!(loaded.path.is_none());
        assert!(loaded.config.markdown.highlight);
        assert!(loaded.config.template.math);
        assert_eq!(loaded.config.template.lang, "en");
        assert!(
            loaded
                .config
                .markdown
                .extensions
                .contains(&"footnotes".to_string())
        );
        assert!(!loaded.config.markdown.extensions.contains(&"gfm".to_string()));
    }

    #[test]
    fn test_picks_up_config_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "template:\n  lang: de\n  math: false\n  path: page.html\n",
        )
        .unwrap();
        let input = dir.path().join("note.md");

        let loaded = ConvertConfig::load_for_input(None, &input).unwrap();

        assert_eq!(loaded.config.template.lang, "de");
        assert!(!loaded.config.template.math);
        // Untouched sections keep their defaults
        assert_eq!(loaded.config.watch.debounce_ms, 100);
        assert_eq!(loaded.template_path(), Some(dir.path().join("page.html")));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        let err = ConvertConfig::load_for_input(Some(&missing), &dir.path().join("a.md"));
        assert!(matches!(err, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "markdown:\n  highlight: [not, a, bool]\n").unwrap();

        let err = ConvertConfig::load_for_input(Some(&path), &dir.path().join("a.md"));
        assert!(matches!(err, Err(ConfigError::Deserialize(_))));
    }
}
