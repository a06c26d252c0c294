//! Flat allocation listing with reachability flags

use serde::Serialize;
use viz_types::AllocId;

use crate::graph::{is_reachable, transitive_alloc_ids, GraphContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationRow {
    pub id: AllocId,
    pub size: usize,
    /// Some node key mentions this allocation
    pub reachable: bool,
    /// Some node reached from a frame root lives in this allocation
    pub reachable_from_roots: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    pub rows: Vec<AllocationRow>,
    pub reachable: usize,
    pub total: usize,
}

impl AllocationReport {
    pub fn from_context(ctx: &GraphContext) -> Self {
        let from_roots = transitive_alloc_ids(ctx);
        let rows: Vec<AllocationRow> = ctx
            .allocations()
            .values()
            .map(|alloc| AllocationRow {
                id: alloc.id,
                size: alloc.size(),
                reachable: is_reachable(alloc.id, ctx),
                reachable_from_roots: from_roots.contains(&alloc.id),
            })
            .collect();
        let reachable = rows.iter().filter(|row| row.reachable).count();
        Self {
            total: rows.len(),
            reachable,
            rows,
        }
    }

    pub fn header(&self) -> String {
        format!("Alloc list ({}/{} reachable)", self.reachable, self.total)
    }

    /// Allocations nothing in the node table points at
    pub fn suspicious(&self) -> impl Iterator<Item = &AllocationRow> {
        self.rows.iter().filter(|row| !row.reachable)
    }
}
