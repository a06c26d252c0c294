//! Reachability classification for allocations
//!
//! "Reachable" means node-presence: the allocation's id appears in at least
//! one key of the node index. This is not a closure over edges from the frame
//! roots, so an orphan node unreachable from any frame still marks its
//! allocation reachable. [`transitive_alloc_ids`] computes the stricter
//! root-based set for diagnostics; the two can differ.

use std::collections::{BTreeSet, HashSet, VecDeque};

use viz_types::AllocId;

use super::context::GraphContext;
use super::key::{deserialize, serialize, SerializedKey};
use crate::error::KeyDecodeError;

/// Whether any node key mentions `id`
pub fn is_reachable(id: AllocId, ctx: &GraphContext) -> bool {
    ctx.reachable_alloc_ids().contains(&id)
}

/// Allocations no node key mentions, in id order
pub fn unreachable_alloc_ids(ctx: &GraphContext) -> impl Iterator<Item = AllocId> + '_ {
    ctx.allocations()
        .keys()
        .copied()
        .filter(move |id| !is_reachable(*id, ctx))
}

/// Recompute the node-presence set by decoding the node index keys
pub fn alloc_ids_in_index(ctx: &GraphContext) -> Result<BTreeSet<AllocId>, KeyDecodeError> {
    ctx.node_index()
        .keys()
        .map(|sk| deserialize(sk).map(|key| key.alloc_id))
        .collect()
}

/// Alloc ids of resolved nodes reachable from any frame root by following edges
pub fn transitive_alloc_ids(ctx: &GraphContext) -> BTreeSet<AllocId> {
    let mut seen: HashSet<SerializedKey> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut ids = BTreeSet::new();

    for root in ctx.frames().iter().flat_map(|frame| &frame.roots) {
        queue.push_back(root);
    }

    while let Some(key) = queue.pop_front() {
        let sk = serialize(key);
        if !seen.insert(sk.clone()) {
            continue;
        }
        if ctx.node(&sk).is_some() {
            ids.insert(key.alloc_id);
        }
        queue.extend(ctx.children(&sk));
    }

    ids
}
