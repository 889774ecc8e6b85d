//! Flow nodes and lanes
//!
//! Every element of a definition that can sit on a sequence flow is a
//! [`FlowNode`]. The kind is a closed enum: traversal code matches
//! exhaustively, so adding a new kind is a compile-time-checked
//! decision rather than an open-ended type-check chain.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a flow node within one definition
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a flow node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowNodeKind {
    /// Entry point of the process or of a sub-process
    StartEvent,
    /// A node requiring human action — the unit the inspector reasons about
    UserTask,
    /// An embedded sub-process with its own internal start/end events
    SubProcess,
    /// A terminal node of the process or of a sub-process
    EndEvent,
    /// Exclusive/parallel/any gateway — transparent to reachability
    Gateway,
    /// Any other flow node (service task, intermediate event, ...)
    Other,
}

/// A node in the process graph
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowNode {
    /// Unique identifier within this definition
    pub id: NodeId,
    /// Human-readable name, if the definition declares one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Node kind
    pub kind: FlowNodeKind,
    /// Enclosing sub-process, if any (flat containment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    /// Extension properties declared directly on this node
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

impl FlowNode {
    /// Create a new flow node
    pub fn new(id: impl Into<String>, kind: FlowNodeKind) -> Self {
        Self {
            id: NodeId::new(id),
            name: None,
            kind,
            parent: None,
            properties: HashMap::new(),
        }
    }

    /// Create a start event
    pub fn start_event(id: impl Into<String>) -> Self {
        Self::new(id, FlowNodeKind::StartEvent)
    }

    /// Create a user task
    pub fn user_task(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, FlowNodeKind::UserTask).with_name(name)
    }

    /// Create a sub-process
    pub fn sub_process(id: impl Into<String>) -> Self {
        Self::new(id, FlowNodeKind::SubProcess)
    }

    /// Create an end event
    pub fn end_event(id: impl Into<String>) -> Self {
        Self::new(id, FlowNodeKind::EndEvent)
    }

    /// Create a gateway
    pub fn gateway(id: impl Into<String>) -> Self {
        Self::new(id, FlowNodeKind::Gateway)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Place this node inside a sub-process
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(NodeId::new(parent));
        self
    }

    /// Attach an extension property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Extension property declared directly on this node, if any
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Check if this node is a user task
    pub fn is_user_task(&self) -> bool {
        self.kind == FlowNodeKind::UserTask
    }
}

/// A lane: an organizational grouping of nodes
///
/// Lanes have no effect on sequence flow. They exist so that extension
/// properties can be declared once per lane and inherited by every
/// member node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lane {
    /// Human-readable name, if the definition declares one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The nodes this lane owns
    pub node_ids: Vec<NodeId>,
    /// Extension properties declared on the lane
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

impl Lane {
    /// Create a new lane over the given member nodes
    pub fn new<I, S>(node_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            node_ids: node_ids.into_iter().map(NodeId::new).collect(),
            properties: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Check whether the lane owns the given node
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.node_ids.iter().any(|id| id == node_id)
    }

    /// Extension property declared on the lane, if any
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
