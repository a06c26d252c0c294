//! Presentation tree types
//!
//! These types are the walker's output, consumed by the text visualizer and
//! flattened by [`super::flat`] for JSON. They carry no view state beyond the
//! default `expanded` flag; folding is owned by the consumer.
//!
//! A tree is as deep as the longest pointer chain in the dump, so nothing
//! here recurses per level: `subtree_len` and `Drop` use explicit stacks, and
//! there is no `Serialize` on the nested form.

use viz_types::{Message, NodeKey, Severity};

use super::key::SerializedKey;

/// A rendered node
#[derive(Debug, PartialEq, Eq)]
pub enum PresentationNode {
    /// A resolved node with its payload and children
    Expandable(ExpandableNode),
    /// Back-reference to a key already on the ancestor path
    Reference(ReferenceNode),
    /// A key with no entry in the node index
    Unresolved(UnresolvedNode),
}

impl PresentationNode {
    pub fn key(&self) -> &NodeKey {
        match self {
            Self::Expandable(node) => &node.key,
            Self::Reference(node) => &node.key,
            Self::Unresolved(node) => &node.key,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Expandable(_))
    }

    pub fn children(&self) -> &[PresentationNode] {
        match self {
            Self::Expandable(node) => &node.children,
            _ => &[],
        }
    }

    pub fn as_expandable(&self) -> Option<&ExpandableNode> {
        match self {
            Self::Expandable(node) => Some(node),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, this node included
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children());
        }
        count
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ExpandableNode {
    pub key: NodeKey,
    /// Target for `ReferenceNode::target`
    pub anchor: SerializedKey,
    pub bytes: Vec<u8>,
    pub messages: Vec<Message>,
    pub children: Vec<PresentationNode>,
    /// Initial view state. Consumers toggle their own copy.
    pub expanded: bool,
}

impl ExpandableNode {
    /// Messages of one severity, in document order
    pub fn messages_with(&self, severity: Severity) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.severity == severity)
    }

    pub fn has_errors(&self) -> bool {
        self.messages_with(Severity::Error).next().is_some()
    }
}

impl Drop for ExpandableNode {
    fn drop(&mut self) {
        // Detach descendants onto the heap so each node drops with no children.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            if let PresentationNode::Expandable(expandable) = &mut node {
                pending.append(&mut expandable.children);
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReferenceNode {
    pub key: NodeKey,
    pub target: SerializedKey,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnresolvedNode {
    pub key: NodeKey,
}

/// All roots of one frame, rendered
#[derive(Debug, PartialEq, Eq)]
pub struct FrameView {
    pub description: String,
    pub roots: Vec<PresentationNode>,
}
