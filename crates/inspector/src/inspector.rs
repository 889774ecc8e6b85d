//! The workflow inspector
//!
//! Built once per process definition, then shared read-only across
//! request threads. Construction indexes every user task by id (the
//! task key) and every node by its owning lane; both indexes are
//! immutable afterwards.

use crate::{
    action_property, split_list, AuthorizationPort, UiClass, UserContext, WorkflowActionDescriptor,
    WorkflowTaskDescriptor, DEFAULT_ALLOWED_USER_TYPES, PROP_ACTIONS, PROP_ALLOWED_ACTION,
    PROP_ALLOWED_USER_TYPES,
};
use caseflow_graph::{FlowNode, FlowNodeKind, NodeId, ProcessGraph};
use std::collections::{HashMap, HashSet};

/// Read-only inspector over one deployed process definition
#[derive(Debug)]
pub struct WorkflowInspector {
    graph: ProcessGraph,
    /// Task key → position in `graph.nodes`
    task_index: HashMap<String, usize>,
    /// Node id → position in `graph.lanes`
    lane_index: HashMap<NodeId, usize>,
}

impl WorkflowInspector {
    /// Build an inspector over the given graph
    pub fn new(graph: ProcessGraph) -> Self {
        let task_index = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_user_task())
            .map(|(position, node)| (node.id.as_str().to_owned(), position))
            .collect::<HashMap<_, _>>();

        let mut lane_index = HashMap::new();
        for (position, lane) in graph.lanes.iter().enumerate() {
            for node_id in &lane.node_ids {
                lane_index.entry(node_id.clone()).or_insert(position);
            }
        }

        tracing::debug!(
            definition_id = %graph.id,
            user_tasks = task_index.len(),
            "workflow inspector built"
        );

        Self {
            graph,
            task_index,
            lane_index,
        }
    }

    /// The definition graph this inspector reads
    pub fn graph(&self) -> &ProcessGraph {
        &self.graph
    }

    /// Number of user tasks in the definition
    pub fn task_count(&self) -> usize {
        self.task_index.len()
    }

    // ── Task lookup ──────────────────────────────────────────────────

    /// Look up a user task by its key
    ///
    /// Returns `None` for an unknown key — never an error. The
    /// descriptor is assembled fresh on every call.
    pub fn get_task(&self, task_key: &str) -> Option<WorkflowTaskDescriptor> {
        let node = self.task_node(task_key)?;
        Some(self.describe(node))
    }

    fn task_node(&self, task_key: &str) -> Option<&FlowNode> {
        self.task_index
            .get(task_key)
            .map(|&position| &self.graph.nodes[position])
    }

    /// Assemble a descriptor from a user-task node's extension properties
    fn describe(&self, node: &FlowNode) -> WorkflowTaskDescriptor {
        let keys = split_list(self.resolve_property(node, PROP_ACTIONS));

        let mut first_unclassed = true;
        let mut actions: Vec<WorkflowActionDescriptor> = keys
            .into_iter()
            .map(|key| {
                let explicit_class = self
                    .resolve_property(node, &action_property(&key, "class"))
                    .map(UiClass::parse);
                // First action without an explicit class is the primary
                // one; every later class-less action renders secondary.
                let ui_class = match explicit_class {
                    Some(class) => class,
                    None => {
                        let class = if first_unclassed {
                            UiClass::Primary
                        } else {
                            UiClass::Secondary
                        };
                        first_unclassed = false;
                        class
                    }
                };

                WorkflowActionDescriptor {
                    ui_label: self
                        .resolve_property(node, &action_property(&key, "label"))
                        .map(str::to_owned),
                    ui_class,
                    modal_context: self
                        .resolve_property(node, &action_property(&key, "modal"))
                        .map(str::to_owned),
                    modal_button_label: self
                        .resolve_property(node, &action_property(&key, "modal.button.label"))
                        .map(str::to_owned),
                    key,
                }
            })
            .collect();

        if actions.is_empty() {
            actions.push(WorkflowActionDescriptor::default_action());
        }

        WorkflowTaskDescriptor {
            key: node.id.as_str().to_owned(),
            name: node.name.clone(),
            actions,
        }
    }

    // ── Property resolution ──────────────────────────────────────────

    /// Resolve an extension property through the inheritance hierarchy
    ///
    /// Order: the node itself, then its enclosing lane, then the
    /// structural parent chain (sub-processes, each with its own lane),
    /// finally the process level. The nearest declaration wins.
    ///
    /// A visited set bounds the walk: a malformed parent cycle degrades
    /// to the process-level value instead of looping.
    pub fn resolve_property<'a>(&'a self, node: &'a FlowNode, key: &str) -> Option<&'a str> {
        let mut visited = HashSet::new();
        let mut current = node;
        while visited.insert(current.id.clone()) {
            if let Some(value) = current.property(key) {
                return Some(value);
            }
            if let Some(&position) = self.lane_index.get(&current.id) {
                if let Some(value) = self.graph.lanes[position].property(key) {
                    return Some(value);
                }
            }
            match current.parent.as_ref().and_then(|id| self.graph.node(id)) {
                Some(parent) => current = parent,
                None => return self.graph.property(key),
            }
        }
        self.graph.property(key)
    }

    // ── Reachability ─────────────────────────────────────────────────

    /// The first user tasks reachable from the definition's start events
    ///
    /// A user task is a traversal boundary: nothing beyond it is
    /// reported. Sub-processes whose internal flow reaches an end event
    /// complete silently and the walk continues past them. A task
    /// reachable via two distinct paths appears once per path; callers
    /// de-duplicate downstream where they care.
    pub fn first_reachable_tasks(&self) -> Vec<WorkflowTaskDescriptor> {
        let mut discovered = Vec::new();
        for start in self.graph.start_events() {
            let mut path = HashSet::new();
            discovered.extend(self.walk_from(start, &mut path).tasks);
        }

        discovered
            .iter()
            .filter_map(|task_id| self.graph.node(task_id))
            .map(|node| self.describe(node))
            .collect()
    }

    /// Walk forward from `node`, collecting user tasks on each path
    ///
    /// `path` holds the nodes on the current recursion path only, so a
    /// malformed cycle terminates without suppressing tasks reachable
    /// via several distinct paths.
    fn walk_from(&self, node: &FlowNode, path: &mut HashSet<NodeId>) -> Discovery {
        let mut discovery = Discovery::default();
        if !path.insert(node.id.clone()) {
            return discovery;
        }

        for flow in self.graph.outgoing(&node.id) {
            let Some(target) = self.graph.node(&flow.target) else {
                continue;
            };
            match target.kind {
                FlowNodeKind::UserTask => discovery.tasks.push(target.id.clone()),
                FlowNodeKind::EndEvent => discovery.reached_end = true,
                FlowNodeKind::SubProcess => {
                    let inner = self.walk_into_sub_process(target, path);
                    let completes = inner.reached_end;
                    discovery.tasks.extend(inner.tasks);
                    if completes {
                        // Sub-process completes silently; flow proceeds
                        // past it in the outer graph.
                        discovery.merge(self.walk_from(target, path));
                    }
                }
                FlowNodeKind::StartEvent | FlowNodeKind::Gateway | FlowNodeKind::Other => {
                    discovery.merge(self.walk_from(target, path));
                }
            }
        }

        path.remove(&node.id);
        discovery
    }

    fn walk_into_sub_process(&self, sub_process: &FlowNode, path: &mut HashSet<NodeId>) -> Discovery {
        let mut inner = Discovery::default();
        for start in self.graph.internal_start_events(&sub_process.id) {
            inner.merge(self.walk_from(start, path));
        }
        inner
    }

    // ── Authorization ────────────────────────────────────────────────

    /// Decide whether the given user may act on the given task
    ///
    /// The decision is the conjunction of two checks resolved through
    /// the property hierarchy:
    ///
    /// - `workflow.allowed.userTypes` — the user's type must appear in
    ///   the list (default `agency,public` when the property is unset
    ///   anywhere in the hierarchy; a declared list with no valid
    ///   entries admits no one).
    /// - `workflow.allowed.action` — when set, the policy engine must
    ///   allow that action for the subject; when unset, the check
    ///   passes without consulting the engine.
    ///
    /// An unknown task key denies outright.
    pub fn is_user_allowed<A: AuthorizationPort>(
        &self,
        task_key: &str,
        authorization: &A,
        user: &UserContext,
        subject: &A::Subject,
    ) -> bool {
        let Some(node) = self.task_node(task_key) else {
            return false;
        };

        let user_type = user.user_type_or_unknown();
        // The default applies only when the property is absent; a
        // declared-but-blank list denies rather than widening access.
        let type_allowed = match self.resolve_property(node, PROP_ALLOWED_USER_TYPES) {
            Some(declared) => split_list(Some(declared)).iter().any(|t| t == user_type),
            None => DEFAULT_ALLOWED_USER_TYPES.contains(&user_type),
        };
        if !type_allowed {
            return false;
        }

        match self.resolve_property(node, PROP_ALLOWED_ACTION) {
            Some(action) => authorization.is_allowed_for_instance(action, subject),
            None => true,
        }
    }
}

/// Outcome of walking one stretch of the graph
#[derive(Debug, Default)]
struct Discovery {
    /// User tasks found, in traversal order
    tasks: Vec<NodeId>,
    /// Whether any path reached an end event of the walked container
    reached_end: bool,
}

impl Discovery {
    fn merge(&mut self, other: Discovery) {
        self.tasks.extend(other.tasks);
        self.reached_end |= other.reached_end;
    }
}
