// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};

use crate::model::Edge;
use crate::types::{DependencyType, TaskId};

/// Edge payload kept in the adjacency snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeWeight {
    pub dependency_type: DependencyType,
    pub lag_days: i32,
}

/// In-memory adjacency snapshot of one schedule's edge set.
///
/// Built once per operation from a single bounded fetch so that traversals
/// never go back to the store. Nodes are only the tasks that appear in at
/// least one edge.
#[derive(Debug, Clone, Default)]
pub struct ScheduleGraph {
    graph: DiGraph<TaskId, EdgeWeight>,
    index: HashMap<TaskId, NodeIndex>,
}

impl ScheduleGraph {
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut snapshot = Self::default();
        for edge in edges {
            snapshot.add_edge(edge);
        }
        snapshot
    }

    fn node(&mut self, id: &TaskId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        idx
    }

    pub fn add_edge(&mut self, edge: &Edge) {
        let source = self.node(&edge.source);
        let target = self.node(&edge.target);
        self.graph.add_edge(
            source,
            target,
            EdgeWeight {
                dependency_type: edge.dependency_type,
                lag_days: edge.lag_days,
            },
        );
    }

    /// Immediate successors (dependents) of a task with the linking edge.
    pub fn successors(&self, id: &TaskId) -> Vec<(&TaskId, EdgeWeight)> {
        self.neighbours(id, Direction::Outgoing)
    }

    /// Immediate predecessors (prerequisites) of a task with the linking edge.
    pub fn predecessors(&self, id: &TaskId) -> Vec<(&TaskId, EdgeWeight)> {
        self.neighbours(id, Direction::Incoming)
    }

    fn neighbours(&self, id: &TaskId, direction: Direction) -> Vec<(&TaskId, EdgeWeight)> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (&self.graph[other], *e.weight())
            })
            .collect()
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Tasks transitively downstream of `root` (excluding `root`), in
    /// topological order.
    ///
    /// Returns `Err(task)` naming a task on a cycle if the snapshot is not a DAG.
    pub fn downstream_in_topological_order(&self, root: &TaskId) -> Result<Vec<TaskId>, TaskId> {
        let Some(&root_idx) = self.index.get(root) else {
            return Ok(Vec::new());
        };

        let mut reachable = vec![false; self.graph.node_count()];
        let mut dfs = Dfs::new(&self.graph, root_idx);
        while let Some(idx) = dfs.next(&self.graph) {
            reachable[idx.index()] = true;
        }

        let order = toposort(&self.graph, None).map_err(|cycle| self.graph[cycle.node_id()].clone())?;

        Ok(order
            .into_iter()
            .filter(|idx| *idx != root_idx && reachable[idx.index()])
            .map(|idx| self.graph[idx].clone())
            .collect())
    }
}
