//! Flat wire form of walked frames
//!
//! Serializers recurse once per nesting level, and a presentation tree nests
//! as deep as the longest pointer chain. On the wire every node instance is
//! instead an entry in one arena; children and frame roots are indices into
//! it, listed in preorder.

use serde::{Deserialize, Serialize};
use viz_types::{Message, NodeKey};

use super::key::SerializedKey;
use super::types::{FrameView, PresentationNode};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatForest {
    pub nodes: Vec<FlatNode>,
    pub frames: Vec<FlatFrame>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatFrame {
    pub description: String,
    /// Indices into [`FlatForest::nodes`]
    pub roots: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlatNode {
    Expandable {
        key: NodeKey,
        anchor: SerializedKey,
        bytes: Vec<u8>,
        messages: Vec<Message>,
        children: Vec<usize>,
        expanded: bool,
    },
    Reference {
        key: NodeKey,
        target: SerializedKey,
    },
    Unresolved {
        key: NodeKey,
    },
}

impl FlatNode {
    /// Copy one node without its children
    fn shallow(node: &PresentationNode) -> Self {
        match node {
            PresentationNode::Expandable(node) => Self::Expandable {
                key: node.key.clone(),
                anchor: node.anchor.clone(),
                bytes: node.bytes.clone(),
                messages: node.messages.clone(),
                children: Vec::with_capacity(node.children.len()),
                expanded: node.expanded,
            },
            PresentationNode::Reference(node) => Self::Reference {
                key: node.key.clone(),
                target: node.target.clone(),
            },
            PresentationNode::Unresolved(node) => Self::Unresolved {
                key: node.key.clone(),
            },
        }
    }

    pub fn key(&self) -> &NodeKey {
        match self {
            Self::Expandable { key, .. } | Self::Reference { key, .. } | Self::Unresolved { key } => {
                key
            }
        }
    }

    pub fn children(&self) -> &[usize] {
        match self {
            Self::Expandable { children, .. } => children,
            _ => &[],
        }
    }
}

impl FlatForest {
    pub fn from_frames(frames: &[FrameView]) -> Self {
        let mut nodes = Vec::new();
        let frames = frames
            .iter()
            .map(|frame| FlatFrame {
                description: frame.description.clone(),
                roots: frame
                    .roots
                    .iter()
                    .map(|root| flatten_into(root, &mut nodes))
                    .collect(),
            })
            .collect();
        Self { nodes, frames }
    }

    pub fn node(&self, index: usize) -> Option<&FlatNode> {
        self.nodes.get(index)
    }
}

/// Append `root`'s subtree in preorder and return the root's index
fn flatten_into(root: &PresentationNode, nodes: &mut Vec<FlatNode>) -> usize {
    let root_index = nodes.len();
    let mut pending: Vec<(&PresentationNode, Option<usize>)> = vec![(root, None)];

    while let Some((node, parent)) = pending.pop() {
        let index = nodes.len();
        nodes.push(FlatNode::shallow(node));
        if let Some(FlatNode::Expandable { children, .. }) = parent.and_then(|p| nodes.get_mut(p)) {
            children.push(index);
        }
        // Reversed so the first child is popped first.
        for child in node.children().iter().rev() {
            pending.push((child, Some(index)));
        }
    }
    root_index
}
