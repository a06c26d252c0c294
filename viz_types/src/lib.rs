//! Viz Types - Level 1 Foundation Types
//!
//! This crate contains the raw data structures of an allocator state dump, exactly
//! as the tracer writes them. Everything that loads, indexes or renders a dump
//! depends on this crate; this crate depends on nothing else in the workspace.
//!
//! ## Contents
//!
//! - Node identity (`NodeKey`) and payload (`NodeValue`, `Message`, `Severity`)
//! - Graph structure (`Edge`, `Frame`)
//! - Allocation table (`AllocId`, `Allocation`)
//! - The raw `Document` envelope
//!
//! ## Critical Rules
//!
//! 1. **NO BUSINESS LOGIC** - Only data structures, constructors and accessors
//! 2. **NO WORKSPACE DEPENDENCIES**
//! 3. **SERIALIZABLE** - Field names follow the dump's wire format, not Rust naming
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "nodes":  [[{"alloc_id": 1, "offset": 0, "ty": "Node"},
//!               {"alloc_bytes": [1, 2], "messages": [{"severity": "INFO", "message": "ok"}]}]],
//!   "edges":  [],
//!   "frames": [{"description": "main", "nodes": [{"alloc_id": 1, "offset": 0, "ty": "Node"}]}],
//!   "allocations": {"1": {"id": 1, "bytes": [1, 2]}}
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// ALLOCATIONS
// ============================================================================

/// Identifier of a top-level memory region
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AllocId(pub u64);

impl AllocId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for AllocId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AllocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A memory region and its raw contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: AllocId,
    #[serde(default)]
    pub bytes: Vec<u8>,
}

impl Allocation {
    pub fn new(id: impl Into<AllocId>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytes,
        }
    }

    /// Size of the region in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// ============================================================================
// NODE IDENTITY AND PAYLOAD
// ============================================================================

/// Identity of a byte-level location: which allocation, where in it, viewed as what type
///
/// Two keys are equal iff all three fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub alloc_id: AllocId,
    pub offset: u64,
    /// Debug rendering of the type at this location (`ty` on the wire)
    #[serde(rename = "ty")]
    pub type_descriptor: String,
}

impl NodeKey {
    pub fn new(alloc_id: impl Into<AllocId>, offset: u64, type_descriptor: impl Into<String>) -> Self {
        Self {
            alloc_id: alloc_id.into(),
            offset,
            type_descriptor: type_descriptor.into(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alloc_id: {}, offset: {}, ty: {}",
            self.alloc_id, self.offset, self.type_descriptor
        )
    }
}

/// Diagnostic severity attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message produced while the dump was traced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    #[serde(rename = "message", alias = "text")]
    pub text: String,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Payload attached to a `NodeKey`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeValue {
    #[serde(rename = "alloc_bytes", alias = "bytes")]
    pub bytes: Vec<u8>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl NodeValue {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

// ============================================================================
// GRAPH STRUCTURE
// ============================================================================

/// Ordered `(parent, child)` pair. Serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge(pub NodeKey, pub NodeKey);

impl Edge {
    pub fn new(parent: NodeKey, child: NodeKey) -> Self {
        Self(parent, child)
    }

    pub fn parent(&self) -> &NodeKey {
        &self.0
    }

    pub fn child(&self) -> &NodeKey {
        &self.1
    }
}

/// A named entry point into the graph, e.g. a stack frame
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "nodes", alias = "roots")]
    pub roots: Vec<NodeKey>,
}

impl Frame {
    pub fn new(description: impl Into<String>, roots: Vec<NodeKey>) -> Self {
        Self {
            description: description.into(),
            roots,
        }
    }
}

// ============================================================================
// RAW DOCUMENT
// ============================================================================

/// The raw dump as written by the tracer
///
/// `nodes` is a list rather than a map: duplicate keys are possible and
/// resolved later (last entry wins).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<(NodeKey, NodeValue)>,
    pub edges: Vec<Edge>,
    pub frames: Vec<Frame>,
    #[serde(default, alias = "allocs")]
    pub allocations: BTreeMap<AllocId, Allocation>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, key: NodeKey, value: NodeValue) -> Self {
        self.nodes.push((key, value));
        self
    }

    pub fn with_edge(mut self, parent: NodeKey, child: NodeKey) -> Self {
        self.edges.push(Edge::new(parent, child));
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocations.insert(allocation.id, allocation);
        self
    }
}
