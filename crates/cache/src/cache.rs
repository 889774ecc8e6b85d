//! The inspector cache
//!
//! A bounded LRU map from definition id to a shared inspector, with
//! per-key load gates for single-flight misses. All entries are
//! `Arc`-shared; callers hold an inspector past eviction without issue.

use crate::{CacheError, CacheResult, DefinitionRepository, InstanceRepository};
use caseflow_graph::{ProcessDefinitionId, ProcessGraph, ProcessInstanceId};
use caseflow_inspector::WorkflowInspector;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Entries kept before the least-recently-used one is evicted
pub const DEFAULT_CAPACITY: usize = 1000;

/// Bounded cache of [`WorkflowInspector`]s keyed by definition id
pub struct InspectorCache<D, I> {
    definitions: D,
    instances: I,
    entries: Mutex<LruCache<ProcessDefinitionId, Arc<WorkflowInspector>>>,
    /// Per-key gates serializing concurrent loads of the same id
    loads: Mutex<HashMap<ProcessDefinitionId, Arc<Mutex<()>>>>,
}

impl<D, I> InspectorCache<D, I>
where
    D: DefinitionRepository,
    I: InstanceRepository,
{
    /// Create a cache with the default capacity
    pub fn new(definitions: D, instances: I) -> Self {
        Self::with_capacity(definitions, instances, DEFAULT_CAPACITY)
    }

    /// Create a cache bounded to `capacity` entries (minimum 1)
    pub fn with_capacity(definitions: D, instances: I, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            definitions,
            instances,
            entries: Mutex::new(LruCache::new(capacity)),
            loads: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached inspectors
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Get (or build) the inspector for a definition id
    ///
    /// A hit returns immediately. On a miss the definition is fetched,
    /// parsed, validated, and indexed exactly once per key even under
    /// concurrent access; a failed load propagates to the caller that
    /// ran it and leaves the key unloaded.
    pub fn get_by_definition_id(
        &self,
        id: &ProcessDefinitionId,
    ) -> CacheResult<Arc<WorkflowInspector>> {
        if let Some(inspector) = self.cached(id)? {
            return Ok(inspector);
        }

        let gate = self.load_gate(id)?;
        let _guard = gate.lock().map_err(|_| CacheError::LockPoisoned)?;

        // Another thread may have finished the load while we waited.
        if let Some(inspector) = self.cached(id)? {
            self.release_gate(id, &gate);
            return Ok(inspector);
        }

        tracing::debug!(definition_id = %id, "inspector cache miss");
        let result = self.load(id);

        if let Ok(inspector) = &result {
            let mut entries = self.entries.lock().map_err(|_| CacheError::LockPoisoned)?;
            if let Some((evicted, _)) = entries.push(id.clone(), inspector.clone()) {
                if evicted != *id {
                    tracing::debug!(definition_id = %evicted, "inspector evicted by capacity");
                }
            }
        }

        self.release_gate(id, &gate);
        result
    }

    /// Get the inspector for the definition a process instance runs on
    ///
    /// The active-instance store is consulted first, then the
    /// historical store; an instance known to neither is a fatal
    /// resolution failure.
    pub fn get_by_instance_id(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> CacheResult<Arc<WorkflowInspector>> {
        let definition_id = self
            .instances
            .active_definition_id(instance_id)
            .or_else(|| self.instances.historic_definition_id(instance_id))
            .ok_or_else(|| CacheError::InstanceNotFound(instance_id.clone()))?;

        self.get_by_definition_id(&definition_id)
    }

    /// Get the inspector for the latest version deployed under a key
    pub fn get_by_definition_key(&self, key: &str) -> CacheResult<Arc<WorkflowInspector>> {
        let definition_id = self
            .definitions
            .latest_definition_id(key)
            .ok_or_else(|| CacheError::UnknownDefinitionKey(key.to_owned()))?;

        self.get_by_definition_id(&definition_id)
    }

    // ── Loading ──────────────────────────────────────────────────────

    fn cached(&self, id: &ProcessDefinitionId) -> CacheResult<Option<Arc<WorkflowInspector>>> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries.get(id).cloned())
    }

    fn load_gate(&self, id: &ProcessDefinitionId) -> CacheResult<Arc<Mutex<()>>> {
        let mut loads = self.loads.lock().map_err(|_| CacheError::LockPoisoned)?;
        Ok(loads
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Drop a key's gate once no other thread holds a clone of it
    ///
    /// The map entry must outlive every waiter, or a late arrival would
    /// mint a fresh gate and run a second load alongside a retry of a
    /// failed one. Two strong references mean the map entry plus our own
    /// clone, so we are the last holder; `load_gate` clones only while
    /// holding the `loads` lock, which makes the count check race-free.
    fn release_gate(&self, id: &ProcessDefinitionId, gate: &Arc<Mutex<()>>) {
        if let Ok(mut loads) = self.loads.lock() {
            let last_holder = loads
                .get(id)
                .is_some_and(|entry| Arc::ptr_eq(entry, gate) && Arc::strong_count(entry) <= 2);
            if last_holder {
                loads.remove(id);
            }
        }
    }

    fn load(&self, id: &ProcessDefinitionId) -> CacheResult<Arc<WorkflowInspector>> {
        let bytes = self
            .definitions
            .fetch_definition(id)
            .ok_or_else(|| CacheError::DefinitionNotFound(id.clone()))?;

        let graph: ProcessGraph =
            serde_json::from_slice(&bytes).map_err(|source| CacheError::MalformedDefinition {
                id: id.clone(),
                source,
            })?;
        graph
            .validate()
            .map_err(|source| CacheError::InvalidDefinition {
                id: id.clone(),
                source,
            })?;

        tracing::info!(
            definition_id = %id,
            definition_key = %graph.key,
            nodes = graph.node_count(),
            "process definition loaded"
        );

        Ok(Arc::new(WorkflowInspector::new(graph)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_graph::{FlowNode, SequenceFlow};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // In-memory stand-ins for the engine's definition and instance stores.
    #[derive(Default)]
    struct StubDefinitions {
        graphs: HashMap<ProcessDefinitionId, Vec<u8>>,
        latest_by_key: HashMap<String, ProcessDefinitionId>,
        fetches: AtomicUsize,
        fetch_delay: Option<Duration>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StubDefinitions {
        fn deploy(&mut self, graph: &ProcessGraph) {
            self.latest_by_key
                .insert(graph.key.clone(), graph.id.clone());
            self.graphs
                .insert(graph.id.clone(), serde_json::to_vec(graph).unwrap());
        }

        fn deploy_raw(&mut self, id: &str, bytes: &[u8]) {
            self.graphs
                .insert(ProcessDefinitionId::new(id), bytes.to_vec());
        }
    }

    impl DefinitionRepository for StubDefinitions {
        fn fetch_definition(&self, id: &ProcessDefinitionId) -> Option<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
            if let Some(delay) = self.fetch_delay {
                std::thread::sleep(delay);
            }
            let result = self.graphs.get(id).cloned();
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn latest_definition_id(&self, key: &str) -> Option<ProcessDefinitionId> {
            self.latest_by_key.get(key).cloned()
        }
    }

    #[derive(Default)]
    struct StubInstances {
        active: HashMap<ProcessInstanceId, ProcessDefinitionId>,
        historic: HashMap<ProcessInstanceId, ProcessDefinitionId>,
    }

    impl InstanceRepository for StubInstances {
        fn active_definition_id(
            &self,
            instance_id: &ProcessInstanceId,
        ) -> Option<ProcessDefinitionId> {
            self.active.get(instance_id).cloned()
        }

        fn historic_definition_id(
            &self,
            instance_id: &ProcessInstanceId,
        ) -> Option<ProcessDefinitionId> {
            self.historic.get(instance_id).cloned()
        }
    }

    fn make_graph(id: &str, key: &str) -> ProcessGraph {
        let mut graph = ProcessGraph::new(id, key);
        graph.add_node(FlowNode::start_event("start")).unwrap();
        graph
            .add_node(FlowNode::user_task("review", "Review"))
            .unwrap();
        graph
            .add_flow(SequenceFlow::new("start", "review"))
            .unwrap();
        graph
    }

    fn make_cache(
        definitions: StubDefinitions,
    ) -> InspectorCache<StubDefinitions, StubInstances> {
        InspectorCache::new(definitions, StubInstances::default())
    }

    #[test]
    fn test_miss_loads_and_hit_reuses() {
        let mut definitions = StubDefinitions::default();
        definitions.deploy(&make_graph("d1", "review"));
        let cache = make_cache(definitions);
        let id = ProcessDefinitionId::new("d1");

        let first = cache.get_by_definition_id(&id).unwrap();
        let second = cache.get_by_definition_id(&id).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.definitions.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(first.task_count(), 1);
    }

    #[test]
    fn test_unknown_definition_id_is_fatal_and_not_cached() {
        let cache = make_cache(StubDefinitions::default());
        let id = ProcessDefinitionId::new("ghost");

        let result = cache.get_by_definition_id(&id);
        assert!(matches!(result, Err(CacheError::DefinitionNotFound(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_malformed_definition_is_fatal_and_not_cached() {
        let mut definitions = StubDefinitions::default();
        definitions.deploy_raw("broken", b"not json");
        let cache = make_cache(definitions);

        let result = cache.get_by_definition_id(&ProcessDefinitionId::new("broken"));
        assert!(matches!(
            result,
            Err(CacheError::MalformedDefinition { .. })
        ));
        assert!(cache.is_empty());

        // the key is not wedged; a later fixed deployment would load,
        // and the failed load is retried by the next caller
        let result = cache.get_by_definition_id(&ProcessDefinitionId::new("broken"));
        assert!(matches!(
            result,
            Err(CacheError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn test_get_by_definition_key_resolves_latest() {
        let mut definitions = StubDefinitions::default();
        definitions.deploy(&make_graph("d1", "review"));
        definitions.deploy(&make_graph("d2", "review"));
        let cache = make_cache(definitions);

        let inspector = cache.get_by_definition_key("review").unwrap();
        assert_eq!(inspector.graph().id, ProcessDefinitionId::new("d2"));

        let result = cache.get_by_definition_key("nonexistent");
        assert!(matches!(result, Err(CacheError::UnknownDefinitionKey(_))));
    }

    #[test]
    fn test_get_by_instance_id_falls_back_to_historic_store() {
        let mut definitions = StubDefinitions::default();
        definitions.deploy(&make_graph("d1", "review"));
        definitions.deploy(&make_graph("d2", "appeal"));

        let mut instances = StubInstances::default();
        instances.active.insert(
            ProcessInstanceId::new("running"),
            ProcessDefinitionId::new("d1"),
        );
        instances.historic.insert(
            ProcessInstanceId::new("finished"),
            ProcessDefinitionId::new("d2"),
        );

        let cache = InspectorCache::new(definitions, instances);

        let running = cache
            .get_by_instance_id(&ProcessInstanceId::new("running"))
            .unwrap();
        assert_eq!(running.graph().key, "review");

        let finished = cache
            .get_by_instance_id(&ProcessInstanceId::new("finished"))
            .unwrap();
        assert_eq!(finished.graph().key, "appeal");

        let result = cache.get_by_instance_id(&ProcessInstanceId::new("ghost"));
        assert!(matches!(result, Err(CacheError::InstanceNotFound(_))));
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let mut definitions = StubDefinitions::default();
        definitions.deploy(&make_graph("d1", "a"));
        definitions.deploy(&make_graph("d2", "b"));
        definitions.deploy(&make_graph("d3", "c"));
        let cache = InspectorCache::with_capacity(definitions, StubInstances::default(), 2);

        cache
            .get_by_definition_id(&ProcessDefinitionId::new("d1"))
            .unwrap();
        cache
            .get_by_definition_id(&ProcessDefinitionId::new("d2"))
            .unwrap();
        // touch d1 so d2 is the eviction candidate
        cache
            .get_by_definition_id(&ProcessDefinitionId::new("d1"))
            .unwrap();
        cache
            .get_by_definition_id(&ProcessDefinitionId::new("d3"))
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.definitions.fetches.load(Ordering::SeqCst), 3);

        // d2 was evicted; asking again re-loads it
        cache
            .get_by_definition_id(&ProcessDefinitionId::new("d2"))
            .unwrap();
        assert_eq!(cache.definitions.fetches.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_concurrent_misses_load_once() {
        let mut definitions = StubDefinitions::default();
        definitions.deploy(&make_graph("d1", "review"));
        let cache = Arc::new(make_cache(definitions));
        let id = ProcessDefinitionId::new("d1");

        let inspectors: Vec<Arc<WorkflowInspector>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let cache = Arc::clone(&cache);
                    let id = id.clone();
                    scope.spawn(move || cache.get_by_definition_id(&id).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.definitions.fetches.load(Ordering::SeqCst), 1);
        for inspector in &inspectors[1..] {
            assert!(Arc::ptr_eq(&inspectors[0], inspector));
        }
    }

    #[test]
    fn test_concurrent_failed_loads_never_overlap() {
        let mut definitions = StubDefinitions::default();
        definitions.fetch_delay = Some(Duration::from_millis(20));
        let cache = Arc::new(make_cache(definitions));
        let id = ProcessDefinitionId::new("ghost");

        // Two staggered waves: the second arrives while the first wave's
        // failed loads are still being retried by its waiters.
        std::thread::scope(|scope| {
            for wave in 0..2 {
                for _ in 0..4 {
                    let cache = Arc::clone(&cache);
                    let id = id.clone();
                    scope.spawn(move || {
                        let result = cache.get_by_definition_id(&id);
                        assert!(matches!(result, Err(CacheError::DefinitionNotFound(_))));
                    });
                }
                if wave == 0 {
                    std::thread::sleep(Duration::from_millis(5));
                }
            }
        });

        assert_eq!(cache.definitions.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_gates_do_not_leak() {
        let mut definitions = StubDefinitions::default();
        definitions.deploy(&make_graph("d1", "review"));
        let cache = make_cache(definitions);

        cache
            .get_by_definition_id(&ProcessDefinitionId::new("d1"))
            .unwrap();
        let _ = cache.get_by_definition_id(&ProcessDefinitionId::new("ghost"));

        assert!(cache.loads.lock().unwrap().is_empty());
    }
}
