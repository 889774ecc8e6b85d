//! Sequence flows
//!
//! A sequence flow is a directed edge between two flow nodes. Flows are
//! kept in declaration order; reachability traversal follows that order
//! and attaches no conditions here — gateway semantics live in the
//! execution engine, which is out of scope for inspection.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// A directed sequence flow between two nodes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceFlow {
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
}

impl SequenceFlow {
    /// Create a new sequence flow
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: NodeId::new(source),
            target: NodeId::new(target),
        }
    }
}

impl std::fmt::Display for SequenceFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
