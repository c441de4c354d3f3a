//! Callout post-processing.
//!
//! Obsidian callouts are ordinary blockquotes whose first line is a
//! `[!type] Optional title` marker. They can only be recognised once the
//! markdown has been parsed into blocks, so this pass works on the rendered
//! HTML tree:
//!
//! ```html
//! <blockquote><p>[!warning] Careful
//! Body</p></blockquote>
//! ```
//!
//! becomes
//!
//! ```html
//! <div class="callout callout-warning">
//!   <div class="callout-title">Careful</div>
//!   <div class="callout-content"><p>Body</p></div>
//! </div>
//! ```

use std::sync::LazyLock;

use html5ever::{QualName, local_name, ns};
use kuchikikiki::NodeRef;
use kuchikikiki::traits::*;
use regex::Regex;

use crate::util::capitalize;

static CALLOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[!(\w+)\][ \t]*([^\n]*)").unwrap());

#[derive(thiserror::Error, Debug)]
pub enum CalloutError {
    #[error("failed to serialize HTML: {0}")]
    Serialize(#[from] std::io::Error),
}

/// The attributes of a recognised callout marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callout {
    /// Lowercased type tag, e.g. `warning`
    pub kind: String,
    pub title: String,
}

impl Callout {
    /// Recognise a marker at the start of a paragraph's text.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = CALLOUT_RE.captures(text.trim())?;
        let kind = caps[1].to_lowercase();
        let title = match caps[2].trim() {
            "" => capitalize(&kind),
            title => title.to_string(),
        };
        Some(Self { kind, title })
    }

    /// Build the empty callout container, returning it and its content div.
    fn build(&self) -> Option<(NodeRef, NodeRef)> {
        let snippet = format!(
            "<div class=\"callout callout-{}\"><div class=\"callout-title\"></div>\
             <div class=\"callout-content\"></div></div>",
            self.kind
        );
        let fragment = kuchikikiki::parse_html().one(snippet);

        let container = fragment.select_first("div.callout").ok()?.as_node().clone();
        let title = container.select_first(".callout-title").ok()?.as_node().clone();
        let content = container
            .select_first(".callout-content")
            .ok()?
            .as_node()
            .clone();

        container.detach();
        title.append(NodeRef::new_text(self.title.clone()));
        Some((container, content))
    }
}

/// Rewrite every callout blockquote in an HTML fragment.
///
/// Blockquotes without a marker are left as they are.
pub fn process_callouts(html: &str) -> Result<String, CalloutError> {
    // Parsed in a `<body>` context so nothing is hoisted into `<head>`
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let document = kuchikikiki::parse_fragment(context, Vec::new()).one(html);

    // Collect first to avoid DOM modification during iteration
    let blockquotes: Vec<NodeRef> = match document.select("blockquote") {
        Ok(selection) => selection.map(|bq| bq.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };

    let mut count = 0;
    for blockquote in &blockquotes {
        if restructure(blockquote) {
            count += 1;
        }
    }
    tracing::debug!(blockquotes = blockquotes.len(), callouts = count, "processed callouts");

    serialize_fragment(&document)
}

/// Replace one blockquote with a callout. Returns false if it isn't one.
fn restructure(blockquote: &NodeRef) -> bool {
    let Ok(paragraph) = blockquote.select_first("p") else {
        return false;
    };
    let paragraph = paragraph.as_node().clone();

    let Some(callout) = Callout::parse(&paragraph.text_contents()) else {
        return false;
    };
    let Some((container, content)) = callout.build() else {
        return false;
    };

    strip_marker_line(&paragraph);
    if is_blank(&paragraph) {
        paragraph.detach();
    }

    let children: Vec<NodeRef> = blockquote.children().collect();
    for child in children {
        content.append(child);
    }

    blockquote.insert_after(container);
    blockquote.detach();
    true
}

/// Remove the `[!type] title` line from the first paragraph.
///
/// The title line may span inline elements (`[!tip] Use *this*`), so text is
/// removed node by node until the first newline.
fn strip_marker_line(paragraph: &NodeRef) {
    let mut on_title_line = false;
    let mut title_elements = Vec::new();

    for node in paragraph.descendants() {
        if let Some(text) = node.as_text() {
            let mut text = text.borrow_mut();
            let start = if on_title_line {
                0
            } else {
                match text.find("[!") {
                    Some(start) => start,
                    None => continue,
                }
            };
            on_title_line = true;

            match text[start..].find('\n') {
                Some(end) => {
                    text.replace_range(start..start + end + 1, "");
                    break;
                }
                None => text.truncate(start),
            }
        } else if on_title_line && node.as_element().is_some() {
            title_elements.push(node);
        }
    }

    for element in title_elements {
        if is_blank(&element) {
            element.detach();
        }
    }
}

fn is_blank(node: &NodeRef) -> bool {
    node.text_contents().trim().is_empty()
        && node.descendants().all(|n| n.as_element().is_none())
}

/// Serialize a parsed fragment without the `<html>` root html5ever puts
/// around it.
fn serialize_fragment(document: &NodeRef) -> Result<String, CalloutError> {
    let mut out = Vec::new();
    if let Some(root) = document.first_child() {
        for child in root.children() {
            child.serialize(&mut out)?;
        }
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_marker() {
        assert_eq!(
            Callout::parse("[!warning] Careful"),
            Some(Callout {
                kind: "warning".to_string(),
                title: "Careful".to_string()
            })
        );
        assert_eq!(
            Callout::parse("  [!NOTE]\nbody line"),
            Some(Callout {
                kind: "note".to_string(),
                title: "Note".to_string()
            })
        );
        assert_eq!(Callout::parse("Just a quote"), None);
        assert_eq!(Callout::parse("see [!note] later"), None);
        assert_eq!(Callout::parse("[!] empty"), None);
    }

    #[test]
    fn test_callout_with_title() {
        let html = "<blockquote>\n<p>[!warning] Careful\nDo not touch.</p>\n<p>Second</p>\n</blockquote>\n";

        assert_eq!(
            process_callouts(html).unwrap(),
            "<div class=\"callout callout-warning\"><div class=\"callout-title\">Careful</div>\
             <div class=\"callout-content\">\n<p>Do not touch.</p>\n<p>Second</p>\n</div></div>\n"
        );
    }

    #[test]
    fn test_callout_default_title() {
        let html = "<blockquote>\n<p>[!NOTE]\nBody</p>\n</blockquote>\n";
        let out = process_callouts(html).unwrap();

        assert!(out.contains("<div class=\"callout callout-note\">"));
        assert!(out.contains("<div class=\"callout-title\">Note</div>"));
        assert!(out.contains("<p>Body</p>"));
        assert!(!out.contains("[!NOTE]"));
        assert!(!out.contains("<blockquote>"));
    }

    #[test]
    fn test_marker_only_paragraph_is_dropped() {
        let html = "<blockquote>\n<p>[!info]</p>\n<ul>\n<li>item</li>\n</ul>\n</blockquote>\n";
        let out = process_callouts(html).unwrap();

        assert!(out.contains("<div class=\"callout-title\">Info</div>"));
        assert!(out.contains("<div class=\"callout-content\">\n\n<ul>\n<li>item</li>\n</ul>\n</div>"));
        assert!(!out.contains("<p>"));
    }

    #[test]
    fn test_title_spanning_inline_markup() {
        let html = "<blockquote>\n<p>[!tip] Use <em>this</em> trick\nBody text</p>\n</blockquote>\n";
        let out = process_callouts(html).unwrap();

        assert!(out.contains("<div class=\"callout-title\">Use this trick</div>"));
        assert!(out.contains("<p>Body text</p>"));
        assert!(!out.contains("<em>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = "<blockquote>\n<p>[!note] a &lt;b&gt; &amp; c</p>\n</blockquote>\n";
        let out = process_callouts(html).unwrap();

        assert!(out.contains("<div class=\"callout-title\">a &lt;b&gt; &amp; c</div>"));
    }

    #[test]
    fn test_plain_blockquote_is_untouched() {
        let html = "<blockquote>\n<p>Just a quote</p>\n</blockquote>\n";
        assert_eq!(process_callouts(html).unwrap(), html);
    }

    #[test]
    fn test_blockquote_without_paragraph_is_untouched() {
        let html = "<blockquote>\n<ul>\n<li>[!note] not a paragraph</li>\n</ul>\n</blockquote>\n";
        assert_eq!(process_callouts(html).unwrap(), html);
    }

    #[test]
    fn test_nested_callouts() {
        let html = "<blockquote>\n<p>[!note] Outer</p>\n<blockquote>\n<p>[!tip] Inner\ntext</p>\n</blockquote>\n</blockquote>\n";
        let out = process_callouts(html).unwrap();

        assert!(out.contains("<div class=\"callout callout-note\">"));
        assert!(out.contains("<div class=\"callout callout-tip\">"));
        assert!(out.contains("<div class=\"callout-title\">Inner</div>"));
        assert!(!out.contains("<blockquote>"));
    }

    #[test]
    fn test_leading_raw_html_is_kept_in_place() {
        let html = "<style>.x { color: red }</style>\n<h1>Hi</h1>\n";
        assert_eq!(process_callouts(html).unwrap(), html);

        let html = "<script>var a = 1 < 2;</script>\n<p>Body</p>\n";
        assert_eq!(process_callouts(html).unwrap(), html);

        let html = "<!-- kept -->\n<meta charset=\"utf-8\">\n<title>T</title>\n\
                    <blockquote>\n<p>[!note] N</p>\n</blockquote>\n";
        let out = process_callouts(html).unwrap();
        assert!(out.starts_with("<!-- kept -->\n<meta charset=\"utf-8\">\n<title>T</title>\n"));
        assert!(out.contains("<div class=\"callout-title\">N</div>"));
    }

    #[test]
    fn test_surrounding_content_is_preserved() {
        let html = "<h1>Title</h1>\n<blockquote>\n<p>[!warning] Careful</p>\n</blockquote>\n<p>After</p>\n";
        let out = process_callouts(html).unwrap();

        assert!(out.starts_with("<h1>Title</h1>\n<div class=\"callout callout-warning\">"));
        assert!(out.ends_with("</div></div>\n<p>After</p>\n"));
    }
}
