//! Process graphs: the deployed shape of a workflow definition
//!
//! A ProcessGraph is immutable once deployed. Redeploying a changed
//! definition produces a new definition id — consumers never see a
//! graph change under the same id.

use crate::{FlowNode, FlowNodeKind, GraphError, GraphResult, Lane, NodeId, SequenceFlow};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a deployed process definition
///
/// Opaque string, not necessarily a UUID — workflow engines commonly use
/// composite `key:version:uuid` strings here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessDefinitionId(pub String);

impl ProcessDefinitionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProcessDefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a running or historical process instance
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessInstanceId(pub String);

impl ProcessInstanceId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ProcessInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Process Graph ────────────────────────────────────────────────────

/// A deployed process definition as a directed graph
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessGraph {
    /// Unique identifier of this deployment
    pub id: ProcessDefinitionId,
    /// Human-readable definition key, shared across versions
    pub key: String,
    /// Display name, if the definition declares one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The flow nodes, in declaration order
    pub nodes: Vec<FlowNode>,
    /// The sequence flows, in declaration order
    pub flows: Vec<SequenceFlow>,
    /// Lanes, used only for extension-property inheritance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lanes: Vec<Lane>,
    /// Extension properties declared at the process level
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

impl ProcessGraph {
    /// Create a new, empty process graph
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: ProcessDefinitionId::new(id),
            key: key.into(),
            name: None,
            nodes: Vec::new(),
            flows: Vec::new(),
            lanes: Vec::new(),
            properties: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a process-level extension property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Add a flow node
    pub fn add_node(&mut self, node: FlowNode) -> GraphResult<()> {
        if self.nodes.iter().any(|n| n.id == node.id) {
            return Err(GraphError::DuplicateNodeId(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Add a sequence flow
    pub fn add_flow(&mut self, flow: SequenceFlow) -> GraphResult<()> {
        if !self.nodes.iter().any(|n| n.id == flow.source) {
            return Err(GraphError::NodeNotFound(flow.source));
        }
        if !self.nodes.iter().any(|n| n.id == flow.target) {
            return Err(GraphError::NodeNotFound(flow.target));
        }
        if self
            .flows
            .iter()
            .any(|f| f.source == flow.source && f.target == flow.target)
        {
            return Err(GraphError::DuplicateFlow {
                from: flow.source,
                to: flow.target,
            });
        }
        self.flows.push(flow);
        Ok(())
    }

    /// Add a lane
    pub fn add_lane(&mut self, lane: Lane) -> GraphResult<()> {
        for node_id in &lane.node_ids {
            if !self.nodes.iter().any(|n| &n.id == node_id) {
                return Err(GraphError::NodeNotFound(node_id.clone()));
            }
        }
        self.lanes.push(lane);
        Ok(())
    }

    /// Get a node by id
    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Outgoing sequence flows of a node, in declaration order
    pub fn outgoing<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a SequenceFlow> {
        self.flows.iter().filter(move |f| &f.source == node_id)
    }

    /// Top-level start events, in declaration order
    pub fn start_events(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes
            .iter()
            .filter(|n| n.kind == FlowNodeKind::StartEvent && n.parent.is_none())
    }

    /// Start events contained in the given sub-process, in declaration order
    pub fn internal_start_events<'a>(
        &'a self,
        sub_process: &'a NodeId,
    ) -> impl Iterator<Item = &'a FlowNode> {
        self.nodes.iter().filter(move |n| {
            n.kind == FlowNodeKind::StartEvent && n.parent.as_ref() == Some(sub_process)
        })
    }

    /// The lane owning the given node, if any (linear scan)
    pub fn lane_containing(&self, node_id: &NodeId) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.contains(node_id))
    }

    /// Process-level extension property, if declared
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of sequence flows
    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }

    /// Validate structural invariants of a fully built graph
    ///
    /// The builder methods already reject duplicates and dangling
    /// endpoints; this re-checks a graph arriving from deserialization.
    pub fn validate(&self) -> GraphResult<()> {
        if self.nodes.is_empty() {
            return Err(GraphError::ValidationError(
                "process graph must have at least one node".into(),
            ));
        }

        let mut seen_ids = HashSet::new();
        for node in &self.nodes {
            if !seen_ids.insert(&node.id) {
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
        }

        for flow in &self.flows {
            if !seen_ids.contains(&flow.source) {
                return Err(GraphError::NodeNotFound(flow.source.clone()));
            }
            if !seen_ids.contains(&flow.target) {
                return Err(GraphError::NodeNotFound(flow.target.clone()));
            }
        }

        // Parent chains must be acyclic: property resolution walks them
        // to the process root.
        for node in &self.nodes {
            let mut seen = HashSet::new();
            let mut current = node;
            while let Some(parent_id) = &current.parent {
                if !seen.insert(&current.id) {
                    return Err(GraphError::ParentCycle(node.id.clone()));
                }
                match self.node(parent_id) {
                    Some(parent) if parent.kind == FlowNodeKind::SubProcess => current = parent,
                    Some(_) => {
                        return Err(GraphError::InvalidParent {
                            child: current.id.clone(),
                            parent: parent_id.clone(),
                        })
                    }
                    None => return Err(GraphError::NodeNotFound(parent_id.clone())),
                }
            }
        }

        for lane in &self.lanes {
            for node_id in &lane.node_ids {
                if !seen_ids.contains(node_id) {
                    return Err(GraphError::NodeNotFound(node_id.clone()));
                }
            }
        }

        Ok(())
    }
}
