//! Graph context builder
//!
//! Turns a raw `Document` into the indexed, immutable structure every query
//! and walk runs against. Building is a single linear pass over nodes and
//! edges; cycles only matter at walk time.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use viz_types::{AllocId, Allocation, Document, Frame, NodeKey, NodeValue};

use super::key::{serialize, SerializedKey};

/// Indexed view of one loaded document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphContext {
    node_index: HashMap<SerializedKey, NodeValue>,
    child_index: HashMap<SerializedKey, Vec<NodeKey>>,
    frames: Vec<Frame>,
    allocations: BTreeMap<AllocId, Allocation>,
    reachable_alloc_ids: BTreeSet<AllocId>,
}

impl GraphContext {
    /// Build the context from a raw document
    ///
    /// - Later duplicate node entries overwrite earlier ones.
    /// - Children keep edge-list order; duplicate edges are kept.
    /// - Edges whose parent has no node entry are kept.
    pub fn build(doc: Document) -> Self {
        let Document {
            nodes,
            edges,
            frames,
            allocations,
        } = doc;

        let mut node_index = HashMap::with_capacity(nodes.len());
        let mut reachable_alloc_ids = BTreeSet::new();
        let node_count = nodes.len();
        for (key, value) in nodes {
            reachable_alloc_ids.insert(key.alloc_id);
            node_index.insert(serialize(&key), value);
        }

        let mut child_index: HashMap<SerializedKey, Vec<NodeKey>> = HashMap::new();
        let edge_count = edges.len();
        for edge in edges {
            let viz_types::Edge(parent, child) = edge;
            child_index
                .entry(serialize(&parent))
                .or_default()
                .push(child);
        }

        tracing::debug!(
            nodes = node_count,
            distinct_nodes = node_index.len(),
            edges = edge_count,
            frames = frames.len(),
            allocations = allocations.len(),
            "graph context built"
        );

        Self {
            node_index,
            child_index,
            frames,
            allocations,
            reachable_alloc_ids,
        }
    }

    pub fn node(&self, key: &SerializedKey) -> Option<&NodeValue> {
        self.node_index.get(key)
    }

    /// Children of a key in edge-list order; empty when the key has no edges
    pub fn children(&self, key: &SerializedKey) -> &[NodeKey] {
        self.child_index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_index(&self) -> &HashMap<SerializedKey, NodeValue> {
        &self.node_index
    }

    pub fn child_index(&self) -> &HashMap<SerializedKey, Vec<NodeKey>> {
        &self.child_index
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn allocations(&self) -> &BTreeMap<AllocId, Allocation> {
        &self.allocations
    }

    /// Alloc ids mentioned by any key in the node index
    pub fn reachable_alloc_ids(&self) -> &BTreeSet<AllocId> {
        &self.reachable_alloc_ids
    }
}

impl From<Document> for GraphContext {
    fn from(doc: Document) -> Self {
        Self::build(doc)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_key() -> impl Strategy<Value = NodeKey> {
        (0u64..4, 0u64..4, "[AB]").prop_map(|(a, o, t)| NodeKey::new(a, o, t))
    }

    fn arb_document() -> impl Strategy<Value = Document> {
        (
            prop::collection::vec((arb_key(), prop::collection::vec(any::<u8>(), 0..4)), 0..12),
            prop::collection::vec((arb_key(), arb_key()), 0..24),
        )
            .prop_map(|(nodes, edges)| {
                let mut doc = Document::new();
                for (key, bytes) in nodes {
                    doc = doc.with_node(key, NodeValue::new(bytes));
                }
                for (parent, child) in edges {
                    doc = doc.with_edge(parent, child);
                }
                doc
            })
    }

    proptest! {
        #[test]
        fn build_is_deterministic(doc in arb_document()) {
            prop_assert_eq!(GraphContext::build(doc.clone()), GraphContext::build(doc));
        }

        #[test]
        fn child_counts_match_edge_counts(doc in arb_document()) {
            let edges = doc.edges.len();
            let ctx = GraphContext::build(doc);
            let indexed: usize = ctx.child_index().values().map(Vec::len).sum();
            prop_assert_eq!(indexed, edges);
        }
    }
}
