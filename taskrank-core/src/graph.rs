//! TaskGraph: dependency analysis for one scoring call.
//!
//! Nodes are held in a flat index (batch tasks first, in submission order,
//! then store-resolved dependencies). Edges run dependency -> dependent.
//!
//! Per call:
//! - distinct external ids are resolved through the store in one lookup
//! - strongly connected components are found with an iterative Tarjan pass
//!   (explicit stack, no recursion)
//! - edges inside a cycle are kept for reporting but ignored by every
//!   derived metric, which keeps those metrics finite and deterministic

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::task::{Task, TaskId};

/// Read-only lookup of stored tasks by id.
///
/// Ids the store does not know are simply absent from the returned map.
pub trait TaskResolver {
    fn resolve(&self, ids: &[TaskId]) -> Result<HashMap<TaskId, Task>, StoreError>;
}

impl<R: TaskResolver + ?Sized> TaskResolver for &R {
    fn resolve(&self, ids: &[TaskId]) -> Result<HashMap<TaskId, Task>, StoreError> {
        (**self).resolve(ids)
    }
}

/// Resolver for callers without a task store: every external id is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStore;

impl TaskResolver for NoStore {
    fn resolve(&self, _ids: &[TaskId]) -> Result<HashMap<TaskId, Task>, StoreError> {
        Ok(HashMap::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOrigin {
    Batch,
    Store,
}

#[derive(Debug, Clone)]
struct Node {
    id: Option<TaskId>,
    completed: bool,
    origin: NodeOrigin,
}

/// Graph-derived facts for a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyFacts {
    /// Direct dependencies not known to be complete (missing ids included).
    pub unresolved_count: usize,
    /// Tasks that transitively cannot start until this one finishes.
    pub blocking_factor: usize,
    /// Longest chain of prerequisites behind this task.
    pub depth: usize,
    pub in_cycle: bool,
    /// Other task ids sharing the cycle, ascending.
    pub cycle_peers: Vec<TaskId>,
    /// Dependency ids found neither in the batch nor the store, ascending.
    pub missing: Vec<TaskId>,
    /// This task reuses an id claimed earlier in the batch.
    pub duplicate_id: bool,
}

#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: Vec<Node>,
    index: HashMap<TaskId, usize>,
    /// Raw edges, dependency -> dependents.
    dependents: Vec<Vec<usize>>,
    batch_len: usize,
    facts: Vec<DependencyFacts>,
}

impl TaskGraph {
    /// Build the graph for a batch, resolving out-of-batch dependencies once.
    ///
    /// Only a failing store lookup is an error; ids the store does not know
    /// become `missing` entries on the tasks that reference them.
    pub fn build<R: TaskResolver + ?Sized>(tasks: &[Task], resolver: &R) -> Result<Self, StoreError> {
        let mut nodes: Vec<Node> = Vec::with_capacity(tasks.len());
        let mut index: HashMap<TaskId, usize> = HashMap::new();
        let mut duplicates = vec![false; tasks.len()];

        for (i, task) in tasks.iter().enumerate() {
            nodes.push(Node {
                id: task.id,
                completed: task.completed,
                origin: NodeOrigin::Batch,
            });
            if let Some(id) = task.id {
                if index.contains_key(&id) {
                    duplicates[i] = true;
                } else {
                    index.insert(id, i);
                }
            }
        }

        let external: BTreeSet<TaskId> = tasks
            .iter()
            .flat_map(|t| t.dependencies.iter().copied())
            .filter(|id| !index.contains_key(id))
            .collect();

        let mut resolved = if external.is_empty() {
            HashMap::new()
        } else {
            let ids: Vec<TaskId> = external.iter().copied().collect();
            debug!(count = ids.len(), "resolving external dependencies");
            resolver.resolve(&ids)?
        };

        // Store nodes in ascending id order so node layout is deterministic.
        let mut store_deps: Vec<(usize, BTreeSet<TaskId>)> = Vec::new();
        for id in &external {
            if let Some(task) = resolved.remove(id) {
                let n = nodes.len();
                nodes.push(Node {
                    id: Some(*id),
                    completed: task.completed,
                    origin: NodeOrigin::Store,
                });
                index.insert(*id, n);
                store_deps.push((n, task.dependencies));
            }
        }

        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut missing: Vec<Vec<TaskId>> = vec![Vec::new(); nodes.len()];

        for (n, task) in tasks.iter().enumerate() {
            for dep in &task.dependencies {
                match index.get(dep) {
                    Some(&d) => dependents[d].push(n),
                    None => missing[n].push(*dep),
                }
            }
        }
        // One resolution level: store tasks only link to nodes we already hold.
        for (n, deps) in &store_deps {
            for dep in deps {
                if let Some(&d) = index.get(dep) {
                    dependents[d].push(*n);
                }
            }
        }

        let mut graph = Self {
            nodes,
            index,
            dependents,
            batch_len: tasks.len(),
            facts: Vec::new(),
        };
        graph.facts = graph.derive_facts(missing, duplicates);
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of batch tasks (node indices `0..batch_len`).
    pub fn batch_len(&self) -> usize {
        self.batch_len
    }

    pub fn origin(&self, node: usize) -> Option<NodeOrigin> {
        self.nodes.get(node).map(|n| n.origin)
    }

    /// Node index owning `id`, if any.
    pub fn node_of(&self, id: TaskId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Facts for the node at `node` (batch tasks use their submission position).
    pub fn facts(&self, node: usize) -> &DependencyFacts {
        &self.facts[node]
    }

    /// All raw edges as (dependency, dependent) node pairs, cycle edges included.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.dependents
            .iter()
            .enumerate()
            .flat_map(|(d, outs)| outs.iter().map(move |&n| (d, n)))
    }

    fn derive_facts(&self, missing: Vec<Vec<TaskId>>, duplicates: Vec<bool>) -> Vec<DependencyFacts> {
        let n = self.nodes.len();
        let component = strongly_connected(&self.dependents);

        let mut component_size: HashMap<usize, usize> = HashMap::new();
        for c in &component {
            *component_size.entry(*c).or_default() += 1;
        }

        let mut in_cycle = vec![false; n];
        for (v, c) in component.iter().enumerate() {
            if component_size[c] > 1 || self.dependents[v].contains(&v) {
                in_cycle[v] = true;
            }
        }

        // Acyclic view: drop every edge whose endpoints share a cycle.
        let mut forward: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut backward: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (d, dependent) in self.edges() {
            if in_cycle[d] && component[d] == component[dependent] {
                continue;
            }
            forward[d].push(dependent);
            backward[dependent].push(d);
        }

        let order = topological_order(&forward, &backward);
        let depth = longest_chains(&forward, &order);
        let blocking = descendant_counts(&forward, &order);

        let mut facts = Vec::with_capacity(n);
        for (v, missing) in missing.into_iter().enumerate() {
            let unresolved_count =
                missing.len() + backward[v].iter().filter(|&&p| !self.nodes[p].completed).count();

            let cycle_peers: Vec<TaskId> = if in_cycle[v] {
                let mut peers: Vec<TaskId> = (0..n)
                    .filter(|&w| w != v && component[w] == component[v])
                    .filter_map(|w| self.nodes[w].id)
                    .collect();
                peers.sort_unstable();
                peers.dedup();
                peers
            } else {
                Vec::new()
            };

            if in_cycle[v] && self.nodes[v].origin == NodeOrigin::Batch {
                warn!(id = ?self.nodes[v].id, peers = ?cycle_peers, "task is part of a dependency cycle");
            }
            if !missing.is_empty() {
                warn!(id = ?self.nodes[v].id, missing = ?missing, "unresolved dependencies");
            }

            facts.push(DependencyFacts {
                unresolved_count,
                blocking_factor: blocking[v],
                depth: depth[v],
                in_cycle: in_cycle[v],
                cycle_peers,
                missing,
                duplicate_id: duplicates.get(v).copied().unwrap_or(false),
            });
        }
        facts
    }
}

/// Tarjan's SCC with an explicit work stack. Returns a component id per node.
fn strongly_connected(adj: &[Vec<usize>]) -> Vec<usize> {
    const UNVISITED: usize = usize::MAX;

    let n = adj.len();
    let mut order = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut component = vec![UNVISITED; n];
    let mut next_order = 0usize;
    let mut next_component = 0usize;

    for root in 0..n {
        if order[root] != UNVISITED {
            continue;
        }
        order[root] = next_order;
        low[root] = next_order;
        next_order += 1;
        stack.push(root);
        on_stack[root] = true;

        // (node, position of the next child to visit)
        let mut work: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = work.last_mut() {
            let v = frame.0;
            if let Some(&w) = adj[v].get(frame.1) {
                frame.1 += 1;
                if order[w] == UNVISITED {
                    order[w] = next_order;
                    low[w] = next_order;
                    next_order += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    work.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(order[w]);
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                low[parent] = low[parent].min(low[v]);
            }
            if low[v] == order[v] {
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component[w] = next_component;
                    if w == v {
                        break;
                    }
                }
                next_component += 1;
            }
        }
    }

    component
}

/// Kahn order over an acyclic edge set. Every node appears exactly once.
fn topological_order(forward: &[Vec<usize>], backward: &[Vec<usize>]) -> Vec<usize> {
    let n = forward.len();
    let mut indegree: Vec<usize> = backward.iter().map(Vec::len).collect();
    let mut order = Vec::with_capacity(n);
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();

    while let Some(v) = queue.pop_front() {
        order.push(v);
        for &w in &forward[v] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }
    order
}

/// Longest prerequisite chain per node, walking `order` front to back.
fn longest_chains(forward: &[Vec<usize>], order: &[usize]) -> Vec<usize> {
    let mut depth = vec![0usize; forward.len()];
    for &v in order {
        for &w in &forward[v] {
            depth[w] = depth[w].max(depth[v] + 1);
        }
    }
    depth
}

/// Distinct nodes reachable from each node along `forward` edges.
///
/// Targets are handled 64 at a time: each block is one reverse-topological
/// sweep that ORs a node's children into a single word, so the whole pass
/// costs O(n/64 * (n + e)) time and O(n) memory.
fn descendant_counts(forward: &[Vec<usize>], order: &[usize]) -> Vec<usize> {
    const WORD: usize = u64::BITS as usize;

    let n = forward.len();
    let mut counts = vec![0usize; n];
    let mut mask = vec![0u64; n];
    for block in (0..n).step_by(WORD) {
        let targets = block..(block + WORD).min(n);
        for &v in order.iter().rev() {
            let mut m = 0u64;
            for &w in &forward[v] {
                m |= mask[w];
                if targets.contains(&w) {
                    m |= 1u64 << (w - block);
                }
            }
            mask[v] = m;
            counts[v] += m.count_ones() as usize;
        }
    }
    counts
}
