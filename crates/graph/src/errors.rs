//! Error types for graph construction and validation

use crate::NodeId;

/// Errors raised while building or validating a process graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    #[error("Duplicate sequence flow: {from} -> {to}")]
    DuplicateFlow { from: NodeId, to: NodeId },

    #[error("Node {child} names parent {parent}, which is not a sub-process")]
    InvalidParent { child: NodeId, parent: NodeId },

    #[error("Parent cycle involving node: {0}")]
    ParentCycle(NodeId),

    #[error("Graph validation error: {0}")]
    ValidationError(String),
}

/// Result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
