//! Process-definition graph model for caseflow
//!
//! A [`ProcessGraph`] is the read-only, in-memory shape of a deployed
//! workflow definition: flow nodes, sequence flows, lanes, and the
//! extension properties that configure UI and authorization behavior.
//! It is produced by the definition parser, consumed by the inspector,
//! and never mutated after deployment.
//!
//! # Key Concepts
//!
//! - **ProcessGraph**: one deployed, versioned definition — nodes,
//!   sequence flows, lanes, and process-level extension properties.
//! - **FlowNode**: a node in the graph. Its [`FlowNodeKind`] is a closed
//!   enum so traversal code matches exhaustively.
//! - **SequenceFlow**: a directed edge between two nodes, in declaration
//!   order.
//! - **Lane**: an organizational grouping of nodes. Lanes matter only
//!   for extension-property inheritance.
//! - **Extension property**: a named string attribute on a node, lane,
//!   or the process itself. Node-level values override ancestors.
//!
//! Sub-process containment is flat: a node inside a sub-process carries
//! the sub-process's id as its `parent`. Node ids are unique per
//! definition, so a user-task id doubles as a globally addressable task
//! key for the definition's lifetime.

#![deny(unsafe_code)]

mod definition;
mod errors;
mod flow;
mod node;

pub use definition::*;
pub use errors::*;
pub use flow::*;
pub use node::*;
