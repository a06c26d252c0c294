//! Plain-text rendition of a presentation tree
//!
//! Produces styled lines; coloring is left to the caller.

use std::fmt;

use serde::Serialize;
use viz_types::{Message, NodeKey, Severity};

use super::fold::{FoldState, NodePath};
use crate::graph::{FrameView, PresentationNode};

/// Longest type descriptor shown unfolded in a header
pub const TYPE_FOLD_LEN: usize = 50;
/// Longest byte dump or message shown unfolded
pub const BODY_FOLD_LEN: usize = 80;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Frame,
    Header,
    Loop,
    Missing,
    Bytes,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextLine {
    pub depth: usize,
    pub style: LineStyle,
    pub text: String,
}

impl fmt::Display for TextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", INDENT.repeat(self.depth), self.text)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show long text in full instead of folding it, and end each expandable
    /// header with the `#node_...` anchor that loop lines point at
    pub full_text: bool,
}

/// Shorten `text` to `max_len` characters followed by `...`
pub fn fold_text(text: &str, max_len: usize, full: bool) -> String {
    if full || text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut folded: String = text.chars().take(max_len).collect();
    folded.push_str("...");
    folded
}

/// Uppercase two-digit hex, space separated
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn header(key: &NodeKey, options: &RenderOptions) -> String {
    format!(
        "alloc_id: {}, offset: {}, ty: {}",
        key.alloc_id,
        key.offset,
        fold_text(&key.type_descriptor, TYPE_FOLD_LEN, options.full_text)
    )
}

fn message_line(message: &Message, depth: usize, options: &RenderOptions) -> TextLine {
    let style = match message.severity {
        Severity::Info => LineStyle::Info,
        Severity::Error => LineStyle::Error,
    };
    TextLine {
        depth,
        style,
        text: format!(
            "[{}] {}",
            message.severity,
            fold_text(&message.text, BODY_FOLD_LEN, options.full_text)
        ),
    }
}

/// Render all frames, honouring the fold state
pub fn render_frames(
    frames: &[FrameView],
    fold: &FoldState,
    options: &RenderOptions,
) -> Vec<TextLine> {
    let mut lines = Vec::new();
    for (frame_index, frame) in frames.iter().enumerate() {
        let title = if frame.description.is_empty() {
            format!("frame {frame_index}")
        } else {
            format!("frame {frame_index}: {}", frame.description)
        };
        lines.push(TextLine {
            depth: 0,
            style: LineStyle::Frame,
            text: title,
        });
        for (root_index, root) in frame.roots.iter().enumerate() {
            render_node(
                root,
                NodePath::root(frame_index, root_index),
                1,
                fold,
                options,
                &mut lines,
            );
        }
    }
    lines
}

/// Render one subtree starting at `depth`
pub fn render_node(
    node: &PresentationNode,
    path: NodePath,
    depth: usize,
    fold: &FoldState,
    options: &RenderOptions,
    lines: &mut Vec<TextLine>,
) {
    let mut pending = vec![(node, path, depth)];

    while let Some((node, path, depth)) = pending.pop() {
        match node {
            PresentationNode::Reference(reference) => lines.push(TextLine {
                depth,
                style: LineStyle::Loop,
                text: format!(
                    "(loop) {} -> #{}",
                    header(&reference.key, options),
                    reference.target.anchor()
                ),
            }),
            PresentationNode::Unresolved(missing) => lines.push(TextLine {
                depth,
                style: LineStyle::Missing,
                text: format!("(missing) {}", header(&missing.key, options)),
            }),
            PresentationNode::Expandable(expandable) => {
                let expanded = fold.is_expanded(&path);
                let mut text = format!(
                    "{} {}",
                    if expanded { "(-)" } else { "(+)" },
                    header(&expandable.key, options)
                );
                if options.full_text {
                    text.push_str(&format!(" #{}", expandable.anchor.anchor()));
                }
                lines.push(TextLine {
                    depth,
                    style: LineStyle::Header,
                    text,
                });
                if !expanded {
                    continue;
                }

                let bytes = format_bytes(&expandable.bytes);
                lines.push(TextLine {
                    depth: depth + 1,
                    style: LineStyle::Bytes,
                    text: if bytes.is_empty() {
                        "bytes:".to_string()
                    } else {
                        format!("bytes: {}", fold_text(&bytes, BODY_FOLD_LEN, options.full_text))
                    },
                });
                for message in &expandable.messages {
                    lines.push(message_line(message, depth + 1, options));
                }

                // Reversed so the first child is rendered first.
                for (index, child) in expandable.children.iter().enumerate().rev() {
                    pending.push((child, path.child(index), depth + 1));
                }
            }
        }
    }
}
