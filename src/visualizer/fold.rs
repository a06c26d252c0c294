//! Consumer-owned fold state
//!
//! The presentation tree is stateless. Which node instances are collapsed is
//! tracked here, keyed by the instance's position in the tree, so the same
//! key rendered under two parents folds independently. Nothing here walks the
//! tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Position of a node instance: frame index, root index, then child indices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath {
    pub frame: usize,
    pub root: usize,
    pub children: Vec<usize>,
}

impl NodePath {
    pub fn root(frame: usize, root: usize) -> Self {
        Self {
            frame,
            root,
            children: Vec::new(),
        }
    }

    pub fn child(&self, index: usize) -> Self {
        let mut children = self.children.clone();
        children.push(index);
        Self {
            frame: self.frame,
            root: self.root,
            children,
        }
    }

    /// Roots are at depth 0
    pub fn depth(&self) -> usize {
        self.children.len()
    }
}

/// Which node instances are expanded
///
/// Everything starts expanded. `collapse_below` sets a depth from which
/// instances default to collapsed; individual instances can then be toggled
/// either way. Only deviations from the default are recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldState {
    collapse_depth: Option<usize>,
    overrides: HashMap<NodePath, bool>,
}

impl FoldState {
    pub fn new() -> Self {
        Self::default()
    }

    fn default_expanded(&self, path: &NodePath) -> bool {
        self.collapse_depth.map_or(true, |depth| path.depth() < depth)
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        if self.overrides.is_empty() {
            return self.default_expanded(path);
        }
        match self.overrides.get(path) {
            Some(&expanded) => expanded,
            None => self.default_expanded(path),
        }
    }

    pub fn set_expanded(&mut self, path: &NodePath, expanded: bool) {
        if expanded == self.default_expanded(path) {
            self.overrides.remove(path);
        } else {
            self.overrides.insert(path.clone(), expanded);
        }
    }

    /// Flip one instance; returns the new state
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        let expanded = !self.is_expanded(path);
        self.set_expanded(path, expanded);
        expanded
    }

    /// Instances toggled away from the default
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Collapse every instance at `depth` or deeper, dropping earlier toggles
    pub fn collapse_below(&mut self, depth: usize) {
        self.collapse_depth = Some(depth);
        self.overrides.clear();
    }

    pub fn expand_all(&mut self) {
        self.collapse_depth = None;
        self.overrides.clear();
    }
}
