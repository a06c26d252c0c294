//! Allocator dump visualizer
//!
//! Loads a dump of an allocator's state (allocations, node bytes, pointer
//! edges between locations, diagnostic messages) and turns it into a tree
//! per execution frame that can be rendered without infinite recursion.
//!
//! # Architecture
//!
//! ```text
//! raw JSON ──parse──▶ Document ──build──▶ GraphContext ──walk──▶ Vec<FrameView>
//!                                              │
//!                                              └──▶ reachable alloc ids ──▶ AllocationReport
//! ```
//!
//! - [`graph::key`] serializes `NodeKey`s into collision-free index keys
//! - [`graph::GraphContext`] indexes nodes and children once per document
//! - [`graph::walker`] expands roots with per-path cycle detection
//! - [`graph::reachability`] classifies allocations
//! - [`source`] lists and fetches raw dumps, locally or over HTTP
//! - [`visualizer`] owns fold state and renders text
//!
//! # Example
//!
//! ```
//! use alloc_viz::graph::{walk_frames, GraphContext, PresentationNode};
//! use alloc_viz::source::parse_document;
//!
//! let doc = parse_document(r#"{
//!     "nodes": [[{"alloc_id": 1, "offset": 0, "ty": "A"}, {"alloc_bytes": [], "messages": []}]],
//!     "edges": [[{"alloc_id": 1, "offset": 0, "ty": "A"}, {"alloc_id": 1, "offset": 0, "ty": "A"}]],
//!     "frames": [{"description": "main", "nodes": [{"alloc_id": 1, "offset": 0, "ty": "A"}]}]
//! }"#).unwrap();
//!
//! let ctx = GraphContext::build(doc);
//! let frames = walk_frames(&ctx);
//! assert!(matches!(frames[0].roots[0].children()[0], PresentationNode::Reference(_)));
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod source;
pub mod visualizer;

pub use viz_types;

pub use config::ServerConfig;
pub use error::{ConfigError, KeyDecodeError, SourceError, VizError, VizResult};
pub use graph::{GraphContext, PresentationNode, SerializedKey};
pub use visualizer::Viewer;
