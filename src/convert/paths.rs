//! Output path utilities.

use std::path::{Path, PathBuf};

/// Default page location for a note: the input path with an `.html` extension.
///
/// # Examples
/// ```ignore
/// default_output_path("notes/Daily.md") => "notes/Daily.html"
/// default_output_path("README") => "README.html"
/// ```
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("notes/Daily.md")),
            PathBuf::from("notes/Daily.html")
        );
        assert_eq!(
            default_output_path(Path::new("v1.2 notes.md")),
            PathBuf::from("v1.2 notes.html")
        );
        assert_eq!(default_output_path(Path::new("README")), PathBuf::from("README.html"));
    }
}
