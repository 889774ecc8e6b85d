//! Workflow inspection and task authorization for caseflow
//!
//! The inspector answers three read-only questions about a deployed
//! process definition:
//!
//! - **What is this task?** — [`WorkflowInspector::get_task`] assembles a
//!   [`WorkflowTaskDescriptor`] from a task's extension properties.
//! - **Where can work begin?** — [`WorkflowInspector::first_reachable_tasks`]
//!   walks sequence flows from every start event up to the first user
//!   task on each path.
//! - **May this user act?** — [`WorkflowInspector::is_user_allowed`]
//!   combines the allowed-user-type list with a policy-engine check
//!   behind [`AuthorizationPort`].
//!
//! # Design Principles
//!
//! 1. Inspection never mutates. The inspector owns an immutable
//!    [`ProcessGraph`](caseflow_graph::ProcessGraph) plus prebuilt
//!    indexes and is safe to share across request threads.
//! 2. Configuration degrades, it never fails. A malformed action list
//!    resolves to no actions; a task with no actions gets the synthetic
//!    `Submit` action. Availability of the task UI beats strictness.
//! 3. Dependencies are explicit. The acting user arrives as a
//!    [`UserContext`] parameter, never through ambient state.

#![deny(unsafe_code)]

mod descriptor;
mod inspector;
mod ports;
mod properties;

pub use descriptor::*;
pub use inspector::*;
pub use ports::*;
pub use properties::*;
