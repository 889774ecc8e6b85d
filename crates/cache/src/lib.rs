//! Inspector cache for caseflow
//!
//! Parsing a process definition and building its
//! [`WorkflowInspector`](caseflow_inspector::WorkflowInspector) is the
//! expensive step of inspection, and definitions are immutable once
//! deployed — a changed definition gets a new id. [`InspectorCache`]
//! exploits that: inspectors are built at most once per definition id,
//! kept in a bounded LRU map, and evicted only by capacity. There is no
//! TTL and no explicit invalidation; staleness is structurally
//! impossible within the key space.
//!
//! Lookups resolve three kinds of identifier:
//!
//! - a **definition id** (direct key),
//! - a **definition key** (human-readable, resolved to the latest
//!   deployed version),
//! - a **process-instance id** (resolved via the active-instance store,
//!   falling back to the historical store).
//!
//! Concurrent misses on one key coordinate through a per-key load gate,
//! so the parse-and-build runs once no matter how many request threads
//! ask at the same time.

#![deny(unsafe_code)]

mod cache;
mod errors;
mod repository;

pub use cache::*;
pub use errors::*;
pub use repository::*;
