//! Cycle-safe tree walker
//!
//! Expands the graph context into a presentation tree starting at a root key.
//! The walk is iterative: open nodes live on an explicit stack, and the set of
//! serialized keys currently on the stack is the ancestor path. A child whose
//! key is already on that path becomes a `Reference` and is not expanded, so
//! the depth of the stack is bounded by the number of distinct keys.
//!
//! Shared descendants reached through different parents are expanded once per
//! parent; only repeats along a single ancestor chain are cut.

use std::collections::HashSet;

use viz_types::NodeKey;

use super::context::GraphContext;
use super::key::{serialize, SerializedKey};
use super::types::{
    ExpandableNode, FrameView, PresentationNode, ReferenceNode, UnresolvedNode,
};

/// Render one root with an empty ancestor path
pub fn render(key: &NodeKey, ctx: &GraphContext) -> PresentationNode {
    render_from(key, ctx, &[])
}

/// Render every root of every frame, in frame and root order
pub fn walk_frames(ctx: &GraphContext) -> Vec<FrameView> {
    ctx.frames()
        .iter()
        .map(|frame| FrameView {
            description: frame.description.clone(),
            roots: frame.roots.iter().map(|root| render(root, ctx)).collect(),
        })
        .collect()
}

/// Render `key` as if `ancestors` were already open above it
pub fn render_from(
    key: &NodeKey,
    ctx: &GraphContext,
    ancestors: &[SerializedKey],
) -> PresentationNode {
    let mut path: HashSet<SerializedKey> = ancestors.iter().cloned().collect();
    let mut stack: Vec<OpenNode<'_>> = Vec::new();

    match visit(key, ctx, &path) {
        Visit::Done(node) => return node,
        Visit::Open(open) => {
            path.insert(open.anchor.clone());
            stack.push(open);
        }
    }

    loop {
        let next_child = match stack.last_mut() {
            Some(top) => top.pending.next(),
            None => unreachable!("the walk returns when the root is closed"),
        };

        match next_child {
            Some(child) => match visit(child, ctx, &path) {
                Visit::Done(node) => {
                    if let Some(top) = stack.last_mut() {
                        top.children.push(node);
                    }
                }
                Visit::Open(open) => {
                    path.insert(open.anchor.clone());
                    stack.push(open);
                }
            },
            None => {
                let Some(done) = stack.pop() else {
                    unreachable!("checked non-empty above");
                };
                path.remove(&done.anchor);
                let node = done.close();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return node,
                }
            }
        }
    }
}

enum Visit<'a> {
    Done(PresentationNode),
    Open(OpenNode<'a>),
}

/// An expandable node whose children are still being rendered
struct OpenNode<'a> {
    key: NodeKey,
    anchor: SerializedKey,
    value: &'a viz_types::NodeValue,
    pending: std::slice::Iter<'a, NodeKey>,
    children: Vec<PresentationNode>,
}

impl OpenNode<'_> {
    fn close(self) -> PresentationNode {
        PresentationNode::Expandable(ExpandableNode {
            key: self.key,
            anchor: self.anchor,
            bytes: self.value.bytes.clone(),
            messages: self.value.messages.clone(),
            children: self.children,
            expanded: true,
        })
    }
}

fn visit<'a>(key: &NodeKey, ctx: &'a GraphContext, path: &HashSet<SerializedKey>) -> Visit<'a> {
    let sk = serialize(key);

    // Cycle check runs before the lookup.
    if path.contains(&sk) {
        tracing::trace!(target_key = %sk, "back-reference to ancestor");
        return Visit::Done(PresentationNode::Reference(ReferenceNode {
            key: key.clone(),
            target: sk,
        }));
    }

    let Some(value) = ctx.node(&sk) else {
        tracing::debug!(key = %sk, "unresolved node key");
        return Visit::Done(PresentationNode::Unresolved(UnresolvedNode { key: key.clone() }));
    };

    let pending = ctx.children(&sk).iter();
    Visit::Open(OpenNode {
        key: key.clone(),
        anchor: sk,
        value,
        pending,
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_types::{Document, Frame, Message, NodeValue};

    fn key(name: &str) -> NodeKey {
        NodeKey::new(1, 0, name)
    }

    fn value(byte: u8) -> NodeValue {
        NodeValue::new(vec![byte])
    }

    fn expandable(node: &PresentationNode) -> &ExpandableNode {
        node.as_expandable()
            .unwrap_or_else(|| panic!("expected expandable, got {node:?}"))
    }

    #[test]
    fn test_single_root_without_children() {
        let doc = Document::new()
            .with_node(key("K1"), value(7))
            .with_frame(Frame::new("main", vec![key("K1")]));
        let ctx = GraphContext::build(doc);

        let frames = walk_frames(&ctx);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].description, "main");
        assert_eq!(frames[0].roots.len(), 1);
        let root = expandable(&frames[0].roots[0]);
        assert_eq!(root.key, key("K1"));
        assert_eq!(root.bytes, vec![7]);
        assert!(root.children.is_empty());
        assert!(root.expanded);
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let doc = Document::new()
            .with_node(key("A"), value(1))
            .with_node(key("B"), value(2))
            .with_edge(key("A"), key("B"))
            .with_edge(key("B"), key("A"));
        let ctx = GraphContext::build(doc);

        let a = render(&key("A"), &ctx);

        let a_node = expandable(&a);
        assert_eq!(a_node.children.len(), 1);
        let b_node = expandable(&a_node.children[0]);
        assert_eq!(b_node.key, key("B"));
        assert_eq!(b_node.children.len(), 1);
        match &b_node.children[0] {
            PresentationNode::Reference(reference) => {
                assert_eq!(reference.key, key("A"));
                assert_eq!(reference.target, serialize(&key("A")));
            }
            other => panic!("expected reference, got {other:?}"),
        }
        assert_eq!(a.subtree_len(), 3);
    }

    #[test]
    fn test_self_loop() {
        let doc = Document::new()
            .with_node(key("A"), value(1))
            .with_edge(key("A"), key("A"));
        let ctx = GraphContext::build(doc);

        let a = render(&key("A"), &ctx);

        assert!(matches!(
            expandable(&a).children.as_slice(),
            [PresentationNode::Reference(_)]
        ));
    }

    #[test]
    fn test_dangling_child_is_unresolved() {
        let doc = Document::new()
            .with_node(key("A"), value(1))
            .with_edge(key("A"), key("Z"));
        let ctx = GraphContext::build(doc);

        let a = render(&key("A"), &ctx);

        match expandable(&a).children.as_slice() {
            [PresentationNode::Unresolved(missing)] => assert_eq!(missing.key, key("Z")),
            other => panic!("expected one unresolved child, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_root_is_unresolved() {
        let ctx = GraphContext::build(Document::new());
        assert!(matches!(
            render(&key("nowhere"), &ctx),
            PresentationNode::Unresolved(_)
        ));
    }

    #[test]
    fn test_edge_multiplicity_preserved() {
        let doc = Document::new()
            .with_node(key("P"), value(1))
            .with_node(key("C"), value(2))
            .with_node(key("D"), value(3))
            .with_edge(key("P"), key("C"))
            .with_edge(key("P"), key("D"))
            .with_edge(key("P"), key("C"));
        let ctx = GraphContext::build(doc);

        let p = render(&key("P"), &ctx);

        let child_keys: Vec<&NodeKey> = p.children().iter().map(|c| c.key()).collect();
        assert_eq!(child_keys, vec![&key("C"), &key("D"), &key("C")]);
        assert!(p.children().iter().all(|c| !c.is_terminal()));
    }

    #[test]
    fn test_diamond_expanded_under_each_parent() {
        let doc = Document::new()
            .with_node(key("R"), value(0))
            .with_node(key("L"), value(1))
            .with_node(key("M"), value(2))
            .with_node(key("S"), value(3))
            .with_edge(key("R"), key("L"))
            .with_edge(key("R"), key("M"))
            .with_edge(key("L"), key("S"))
            .with_edge(key("M"), key("S"));
        let ctx = GraphContext::build(doc);

        let r = render(&key("R"), &ctx);

        for branch in r.children() {
            match branch.children() {
                [shared] => assert_eq!(expandable(shared).key, key("S")),
                other => panic!("expected shared child, got {other:?}"),
            }
        }
        assert_eq!(r.subtree_len(), 5);
    }

    #[test]
    fn test_sibling_paths_are_independent() {
        // A -> B, A -> C, C -> B: B under C is not on C's ancestor chain
        // through B, so it expands again rather than becoming a reference.
        let doc = Document::new()
            .with_node(key("A"), value(0))
            .with_node(key("B"), value(1))
            .with_node(key("C"), value(2))
            .with_edge(key("A"), key("B"))
            .with_edge(key("A"), key("C"))
            .with_edge(key("C"), key("B"));
        let ctx = GraphContext::build(doc);

        let a = render(&key("A"), &ctx);

        let c = &a.children()[1];
        assert!(matches!(c.children(), [PresentationNode::Expandable(_)]));
    }

    #[test]
    fn test_preseeded_ancestors() {
        let doc = Document::new()
            .with_node(key("A"), value(0))
            .with_node(key("B"), value(1))
            .with_edge(key("B"), key("A"));
        let ctx = GraphContext::build(doc);

        let b = render_from(&key("B"), &ctx, &[serialize(&key("A"))]);
        assert!(matches!(b.children(), [PresentationNode::Reference(_)]));

        let a = render_from(&key("A"), &ctx, &[serialize(&key("A"))]);
        assert!(matches!(a, PresentationNode::Reference(_)));
    }

    #[test]
    fn test_messages_carried_with_severity() {
        let doc = Document::new().with_node(
            key("A"),
            NodeValue::new(vec![])
                .with_message(Message::info("looks fine"))
                .with_message(Message::error("dangling pointer")),
        );
        let ctx = GraphContext::build(doc);

        let a = render(&key("A"), &ctx);

        let node = expandable(&a);
        assert!(node.has_errors());
        assert_eq!(
            node.messages_with(viz_types::Severity::Info)
                .map(|m| m.text.as_str())
                .collect::<Vec<_>>(),
            vec!["looks fine"]
        );
    }

    fn chain(depth: u64) -> Document {
        let mut doc = Document::new();
        for i in 0..depth {
            doc = doc.with_node(NodeKey::new(i, 0, "Link"), NodeValue::default());
            if i + 1 < depth {
                doc = doc.with_edge(NodeKey::new(i, 0, "Link"), NodeKey::new(i + 1, 0, "Link"));
            }
        }
        doc
    }

    #[test]
    fn test_long_chain_does_not_exhaust_stack() {
        let depth = 100_000u64;
        // Close the loop back to the head.
        let doc = chain(depth)
            .with_edge(NodeKey::new(depth - 1, 0, "Link"), NodeKey::new(0, 0, "Link"));
        let ctx = GraphContext::build(doc);

        let head = render(&NodeKey::new(0, 0, "Link"), &ctx);

        assert_eq!(head.subtree_len() as u64, depth + 1);
        drop(head);
    }

    #[test]
    fn test_long_chain_frames_drop() {
        let doc = chain(100_000).with_frame(Frame::new("main", vec![NodeKey::new(0, 0, "Link")]));
        let ctx = GraphContext::build(doc);

        let mut frames = walk_frames(&ctx);
        assert_eq!(frames[0].roots[0].subtree_len(), 100_000);
        frames.clear();
    }
}
