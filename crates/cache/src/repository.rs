//! Collaborator seams toward the workflow engine's stores
//!
//! The cache never talks to a database or engine API directly; the
//! surrounding service layer adapts its definition and instance stores
//! to these two traits.

use caseflow_graph::{ProcessDefinitionId, ProcessInstanceId};

/// Source of deployed process definitions
pub trait DefinitionRepository {
    /// The serialized [`ProcessGraph`](caseflow_graph::ProcessGraph)
    /// for a definition id, or `None` if nothing is deployed under it
    fn fetch_definition(&self, id: &ProcessDefinitionId) -> Option<Vec<u8>>;

    /// The latest-version definition id deployed under a definition key
    fn latest_definition_id(&self, key: &str) -> Option<ProcessDefinitionId>;
}

/// Source of instance → definition resolution
///
/// Running instances live in the active store; finished ones only in
/// the historical store. The cache consults both, in that order.
pub trait InstanceRepository {
    /// Definition id of a currently active instance
    fn active_definition_id(&self, instance_id: &ProcessInstanceId)
        -> Option<ProcessDefinitionId>;

    /// Definition id of a historical (finished) instance
    fn historic_definition_id(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Option<ProcessDefinitionId>;
}
