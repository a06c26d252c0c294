//! Graph model for allocator dumps
//!
//! Raw document -> `GraphContext` (indexed, immutable) -> presentation tree
//! per frame (flattened for the wire), plus the set of allocation ids referenced by node keys.

pub mod context;
pub mod flat;
pub mod key;
pub mod reachability;
pub mod types;
pub mod walker;

pub use context::GraphContext;
pub use flat::{FlatForest, FlatFrame, FlatNode};
pub use key::{deserialize, serialize, SerializedKey};
pub use reachability::{
    alloc_ids_in_index, is_reachable, transitive_alloc_ids, unreachable_alloc_ids,
};
pub use types::*;
pub use walker::{render, render_from, walk_frames};
