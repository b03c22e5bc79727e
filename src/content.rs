//! Answer content formatting
//!
//! Turns raw answer text into segments a presentation layer can render
//! without interpreting markup: plain text, explicit line breaks, and inline
//! image references written by the answering service as `[图片:<name>]`.

use crate::ui_text;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// `[图片:<name>]`, name being one or more non-`]` characters (newlines
/// included).
static IMAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[图片:([^\]]+)\]").expect("image marker pattern"));

/// One renderable piece of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    LineBreak,
    /// Bare file name, resolved against the configured image path
    Image { name: String },
}

/// Formatted message content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Rendered {
    segments: Vec<Segment>,
}

/// Format raw message text.
///
/// Image markers are substituted before line breaks, so a marker whose name
/// spans a newline is still recognized. Markers match left to right without
/// nesting; an unterminated marker stays literal text.
pub fn format(raw: &str) -> Rendered {
    let mut rendered = Rendered::default();
    let mut consumed = 0;

    for captures in IMAGE_MARKER.captures_iter(raw) {
        let (Some(marker), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        rendered.push_text(raw.get(consumed..marker.start()).unwrap_or_default());
        rendered.segments.push(Segment::Image {
            name: name.as_str().to_string(),
        });
        consumed = marker.end();
    }
    rendered.push_text(raw.get(consumed..).unwrap_or_default());

    rendered
}

impl Rendered {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Image { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Text with line breaks restored and images dropped
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text { text } => out.push_str(text),
                Segment::LineBreak => out.push('\n'),
                Segment::Image { .. } => {}
            }
        }
        out
    }

    /// HTML fragment for web presentation layers. Text is escaped; image
    /// names are emitted verbatim under `image_path`.
    pub fn to_html(&self, image_path: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text { text } => push_escaped(&mut out, text),
                Segment::LineBreak => out.push_str("<br>"),
                Segment::Image { name } => {
                    out.push_str("<img src=\"");
                    out.push_str(image_path);
                    out.push_str(name);
                    out.push_str("\" style=\"max-width:100%;height:auto;\" alt=\"");
                    out.push_str(ui_text::IMAGE_ALT);
                    out.push_str("\">");
                }
            }
        }
        out
    }

    fn push_text(&mut self, text: &str) {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.segments.push(Segment::LineBreak);
            }
            if !line.is_empty() {
                self.segments.push(Segment::Text {
                    text: line.to_string(),
                });
            }
        }
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
