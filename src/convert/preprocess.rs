//! Obsidian syntax pre-processing.
//!
//! Rewrites note-specific inline syntax into plain markdown and raw HTML
//! before the markdown converter runs. The passes run in a fixed order:
//!
//! 1. `%% comments %%` are removed (may span lines)
//! 2. `==highlights==` become `<mark>`
//! 3. `[[wikilinks]]` become internal anchors
//! 4. `![[embeds]]` become images, media players, file links, or the rendered
//!    content of another note (transclusion)
//!
//! Later passes never see the syntax an earlier pass consumed, so overlapping
//! delimiters resolve in favour of whichever pass runs first.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::document::{Document, LinkKind, LinkReference};
use super::markdown::{Converter, MarkdownError};
use crate::util::{escape_html, slugify};

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)%%(.+?)%%").unwrap());
static HIGHLIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==(.+?)==").unwrap());
/// The optional leading `!` lets the wikilink pass skip embeds without lookbehind.
static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^|\]]+?)(?:\|([^\]]+?))?\]\]").unwrap());
static EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^|\]]+?)(?:\|([^\]]+?))?\]\]").unwrap());
static FILE_EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\w+$").unwrap());
static PRE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<pre\b.*?</pre>").unwrap());

#[derive(thiserror::Error, Debug)]
pub enum PreprocessError {
    #[error("failed to read transcluded note {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render transcluded note {path}: {source}")]
    Render {
        path: PathBuf,
        source: MarkdownError,
    },
}

// =============================================================================
// Text passes
// =============================================================================

/// Remove every `%%...%%` span, including spans that cross lines.
pub fn strip_comments(text: &str) -> String {
    COMMENT_RE.replace_all(text, "").into_owned()
}

/// Wrap `==...==` spans in `<mark>`. Spans do not cross lines.
pub fn highlight(text: &str) -> String {
    HIGHLIGHT_RE.replace_all(text, "<mark>$1</mark>").into_owned()
}

/// Replace `[[target]]` and `[[target|alias]]` with internal anchors.
/// `![[...]]` embeds are left for [`Preprocessor`] to expand.
pub fn wikilinks(text: &str) -> String {
    WIKILINK_RE
        .replace_all(text, |caps: &Captures| {
            if !caps[1].is_empty() {
                return caps[0].to_string();
            }
            let link = LinkReference::wikilink(&caps[2], caps.get(3).map(|m| m.as_str()));
            format!(
                "<a href=\"{}\" class=\"internal-link\">{}</a>",
                escape_html(&link_destination(&link.target)),
                link.display_text()
            )
        })
        .into_owned()
}

/// Where a wikilink points: targets that already carry an extension are used
/// as-is, everything else is treated as a note and becomes `<slug>.html`.
pub fn link_destination(target: &str) -> String {
    if FILE_EXTENSION_RE.is_match(target) {
        target.to_string()
    } else {
        format!("{}.html", slugify(target))
    }
}

/// `regex::Regex::replace_all` with a fallible replacer.
fn try_replace_all<E>(
    re: &Regex,
    text: &str,
    mut replacer: impl FnMut(&Captures) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replacer(&caps)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

// =============================================================================
// Pre-processor
// =============================================================================

/// Result of pre-processing a note.
#[derive(Debug)]
pub struct PreprocessOutput {
    /// Markdown with raw HTML islands, ready for the converter
    pub text: String,
    /// Every note that was successfully transcluded, in the order read
    pub transcluded: Vec<PathBuf>,
}

/// Runs the pre-processing passes, expanding note embeds recursively.
pub struct Preprocessor<'a> {
    converter: &'a dyn Converter,
}

impl<'a> Preprocessor<'a> {
    /// `converter` renders transcluded notes; it should be the same one
    /// used for the including document.
    pub fn new(converter: &'a dyn Converter) -> Self {
        Self { converter }
    }

    /// Pre-process a top-level document.
    pub fn run(&self, doc: &Document) -> Result<PreprocessOutput, PreprocessError> {
        let mut chain = HashSet::new();
        chain.insert(canonical(&doc.source_path));
        let mut transcluded = Vec::new();

        let text = self.process(
            &doc.raw_content,
            &doc.source_path,
            &mut chain,
            &mut transcluded,
        )?;

        Ok(PreprocessOutput { text, transcluded })
    }

    /// Apply all passes to `text`, which was read from `source_path`.
    ///
    /// `chain` holds the canonical paths of the notes currently being
    /// expanded, from the top-level document down to this one.
    fn process(
        &self,
        text: &str,
        source_path: &Path,
        chain: &mut HashSet<PathBuf>,
        transcluded: &mut Vec<PathBuf>,
    ) -> Result<String, PreprocessError> {
        tracing::debug!(path = %source_path.display(), "pre-processing");

        let text = strip_comments(text);
        let text = highlight(&text);
        let text = wikilinks(&text);

        try_replace_all(&EMBED_RE, &text, |caps| {
            let link = LinkReference::embed(&caps[1], caps.get(2).map(|m| m.as_str()));
            self.render_embed(&link, source_path, chain, transcluded)
        })
    }

    fn render_embed(
        &self,
        link: &LinkReference,
        source_path: &Path,
        chain: &mut HashSet<PathBuf>,
        transcluded: &mut Vec<PathBuf>,
    ) -> Result<String, PreprocessError> {
        let target = escape_html(&link.target);
        let html = match link.kind {
            LinkKind::Image => match link.image_size() {
                Some(size) => format!(
                    "<img src=\"{target}\" alt=\"{target}\" style=\"{}\">",
                    size.style()
                ),
                None => format!("<img src=\"{target}\" alt=\"{target}\">"),
            },
            LinkKind::Video => format!("<video src=\"{target}\" controls></video>"),
            LinkKind::Audio => format!("<audio src=\"{target}\" controls></audio>"),
            LinkKind::Note => return self.transclude(link, source_path, chain, transcluded),
            LinkKind::File | LinkKind::Page => {
                format!("<a href=\"{target}\" class=\"internal-embed\">Embed: {target}</a>")
            }
        };
        Ok(html)
    }

    /// Inline the fully rendered content of another note.
    fn transclude(
        &self,
        link: &LinkReference,
        source_path: &Path,
        chain: &mut HashSet<PathBuf>,
        transcluded: &mut Vec<PathBuf>,
    ) -> Result<String, PreprocessError> {
        let path = source_path
            .parent()
            .unwrap_or(Path::new(""))
            .join(&link.target);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "transcluded note not found");
                return Ok(error_marker("File not found", &link.target));
            }
            Err(source) => return Err(PreprocessError::Read { path, source }),
        };

        let key = canonical(&path);
        if chain.contains(&key) {
            tracing::warn!(path = %path.display(), "circular transclusion");
            return Ok(error_marker("Circular transclusion", &link.target));
        }

        tracing::info!(path = %path.display(), "transcluding note");
        transcluded.push(key.clone());
        chain.insert(key.clone());
        let processed = self.process(&content, &path, chain, transcluded);
        chain.remove(&key);

        let html = self
            .converter
            .render(&processed?)
            .map_err(|source| PreprocessError::Render { path, source })?;

        Ok(format!(
            "<div class=\"transclusion\">{}</div>",
            encode_preformatted_newlines(&html)
        ))
    }
}

/// Replace line breaks inside `<pre>` elements with `&#10;`.
///
/// Rendered HTML is spliced back into markdown as a raw HTML block, which a
/// blank line would end early. Outside `<pre>` the converter never emits one.
fn encode_preformatted_newlines(html: &str) -> String {
    PRE_BLOCK_RE
        .replace_all(html, |caps: &Captures| caps[0].replace('\n', "&#10;"))
        .into_owned()
}

fn error_marker(reason: &str, target: &str) -> String {
    format!(
        "<div class=\"transclusion-error\">{reason}: {}</div>",
        escape_html(target)
    )
}

/// Best-effort canonical form of a path, used to recognise the same note
/// reached through different relative references.
fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
