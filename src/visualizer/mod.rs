//! Visualizer: the consumer side of the presentation tree
//!
//! Holds the loaded document, owns fold state, and renders frames and the
//! allocation listing as text.

pub mod alloc_list;
pub mod fold;
pub mod text;

use crate::error::VizResult;
use crate::graph::{walk_frames, FrameView, GraphContext};
use crate::source::parse_document;

pub use alloc_list::{AllocationReport, AllocationRow};
pub use fold::{FoldState, NodePath};
pub use text::{fold_text, format_bytes, render_frames, LineStyle, RenderOptions, TextLine};

/// The currently displayed document
///
/// Loading replaces the context wholesale; nothing carries over between
/// documents, including fold state.
#[derive(Debug, Default)]
pub struct Viewer {
    loaded: Option<Loaded>,
    fold: FoldState,
}

#[derive(Debug)]
struct Loaded {
    context: GraphContext,
    frames: Vec<FrameView>,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and display `text`. On failure the previous document stays loaded.
    pub fn load_text(&mut self, text: &str) -> VizResult<()> {
        let doc = parse_document(text)?;
        let context = GraphContext::build(doc);
        let frames = walk_frames(&context);
        self.loaded = Some(Loaded { context, frames });
        self.fold = FoldState::new();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.loaded = None;
        self.fold = FoldState::new();
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn context(&self) -> Option<&GraphContext> {
        self.loaded.as_ref().map(|l| &l.context)
    }

    pub fn frames(&self) -> &[FrameView] {
        self.loaded.as_ref().map(|l| l.frames.as_slice()).unwrap_or(&[])
    }

    pub fn fold(&self) -> &FoldState {
        &self.fold
    }

    pub fn fold_mut(&mut self) -> &mut FoldState {
        &mut self.fold
    }

    /// Collapse everything at `depth` or deeper
    pub fn collapse_below(&mut self, depth: usize) {
        self.fold.collapse_below(depth);
    }

    pub fn render(&self, options: &RenderOptions) -> Vec<TextLine> {
        render_frames(self.frames(), &self.fold, options)
    }

    pub fn allocation_report(&self) -> Option<AllocationReport> {
        self.context().map(AllocationReport::from_context)
    }
}
