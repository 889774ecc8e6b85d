//! Error types for cache resolution and loading
//!
//! Everything here is fatal to the calling operation and never retried:
//! an unresolvable id indicates a data or deployment problem, not a
//! transient fault.

use caseflow_graph::{GraphError, ProcessDefinitionId, ProcessInstanceId};

/// Errors raised while resolving or loading an inspector
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Process definition not found: {0}")]
    DefinitionNotFound(ProcessDefinitionId),

    #[error("No process definition deployed under key: {0}")]
    UnknownDefinitionKey(String),

    #[error("Process instance not found in active or historical store: {0}")]
    InstanceNotFound(ProcessInstanceId),

    #[error("Process definition {id} could not be parsed")]
    MalformedDefinition {
        id: ProcessDefinitionId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Process definition {id} failed validation")]
    InvalidDefinition {
        id: ProcessDefinitionId,
        #[source]
        source: GraphError,
    },

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
