use std::path::{Path, PathBuf};

// =============================================================================
// Documents
// =============================================================================

/// A note read from disk, ready to be converted.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the note lives; relative embeds resolve against its directory
    pub source_path: PathBuf,
    /// The note text exactly as read
    pub raw_content: String,
}

impl Document {
    pub fn new(source_path: PathBuf, raw_content: String) -> Self {
        Self {
            source_path,
            raw_content,
        }
    }

    /// Read a note from disk.
    pub fn load(source_path: &Path) -> Result<Self, std::io::Error> {
        let raw_content = std::fs::read_to_string(source_path)?;
        Ok(Self::new(source_path.to_path_buf(), raw_content))
    }

    /// The page title: the file name without its extension.
    pub fn title(&self) -> String {
        self.source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// =============================================================================
// Link references
// =============================================================================

/// What a `[[...]]` or `![[...]]` occurrence points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A plain wikilink to another note
    Page,
    Image,
    Audio,
    Video,
    /// An embed of anything without a dedicated renderer
    File,
    /// An embedded `.md` note, rendered in place
    Note,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "svg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];

impl LinkKind {
    /// Classify an embed target by its extension (case-insensitive).
    pub fn for_embed(target: &str) -> Self {
        let ext = match target.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => return LinkKind::File,
        };
        let ext = ext.as_str();

        if IMAGE_EXTENSIONS.contains(&ext) {
            LinkKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            LinkKind::Video
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            LinkKind::Audio
        } else if ext == "md" {
            LinkKind::Note
        } else {
            LinkKind::File
        }
    }
}

/// A parsed wikilink or embed.
///
/// `[[target#fragment|label]]` for links, `![[target|label]]` for embeds.
/// For embeds the label carries the sizing hint (e.g. `200x100`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    /// Trimmed target with any `#fragment` removed
    pub target: String,
    /// Heading/block anchor after `#`, if any
    pub fragment: Option<String>,
    /// Text after the first `|`, if any
    pub label: Option<String>,
    pub kind: LinkKind,
}

impl LinkReference {
    /// Parse the inside of a `[[...]]` wikilink.
    pub fn wikilink(target: &str, label: Option<&str>) -> Self {
        let (target, fragment) = match target.split_once('#') {
            Some((page, fragment)) => (page, Some(fragment.trim().to_string())),
            None => (target, None),
        };

        Self {
            target: target.trim().to_string(),
            fragment,
            label: label.map(str::to_string),
            kind: LinkKind::Page,
        }
    }

    /// Parse the inside of a `![[...]]` embed.
    pub fn embed(target: &str, label: Option<&str>) -> Self {
        let target = target.trim();
        Self {
            target: target.to_string(),
            fragment: None,
            label: label.map(str::to_string),
            kind: LinkKind::for_embed(target),
        }
    }

    /// The text to display: the label if given, otherwise the target as written.
    pub fn display_text(&self) -> String {
        match &self.label {
            Some(label) => label.trim().to_string(),
            None => match &self.fragment {
                Some(fragment) => format!("{}#{}", self.target, fragment).trim().to_string(),
                None => self.target.trim().to_string(),
            },
        }
    }

    /// Parse the label as an image size hint.
    pub fn image_size(&self) -> Option<ImageSize> {
        self.label.as_deref().map(ImageSize::parse)
    }
}

/// Explicit image dimensions from `![[pic.png|WIDTHxHEIGHT]]` or `![[pic.png|WIDTH]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSize {
    pub width: String,
    pub height: Option<String>,
}

impl ImageSize {
    pub fn parse(dims: &str) -> Self {
        match dims.split_once('x') {
            Some((width, height)) => Self {
                width: width.trim().to_string(),
                height: Some(height.trim().to_string()),
            },
            None => Self {
                width: dims.trim().to_string(),
                height: None,
            },
        }
    }

    /// Inline CSS for this size.
    pub fn style(&self) -> String {
        match &self.height {
            Some(height) => format!("width: {}px; height: {}px;", self.width, height),
            None => format!("width: {}px;", self.width),
        }
    }
}
