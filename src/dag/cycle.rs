// src/dag/cycle.rs

//! Cycle check for a proposed dependency edge.

use std::collections::HashSet;

use tracing::trace;

use crate::dag::graph::ScheduleGraph;
use crate::types::TaskId;

/// Whether adding `source -> target` to `graph` would close a cycle.
///
/// Walks successor edges depth-first from `target`; reaching `source` means
/// `source` is already downstream of `target`. The visited set keeps the walk
/// finite even if the snapshot already contains an unrelated cycle.
pub fn would_create_cycle(graph: &ScheduleGraph, source: &TaskId, target: &TaskId) -> bool {
    if source == target {
        return true;
    }

    let mut stack: Vec<&TaskId> = vec![target];
    let mut visited: HashSet<&TaskId> = HashSet::new();

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }

        for (next, _) in graph.successors(current) {
            if next == source {
                trace!(%source, %target, via = %current, "proposed edge closes a cycle");
                return true;
            }
            if !visited.contains(next) {
                stack.push(next);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;
    use crate::types::DependencyType;

    fn graph(pairs: &[(&str, &str)]) -> ScheduleGraph {
        let edges: Vec<Edge> = pairs
            .iter()
            .map(|(s, t)| Edge {
                schedule_id: "s".into(),
                source: (*s).into(),
                target: (*t).into(),
                dependency_type: DependencyType::FinishToStart,
                lag_days: 0,
            })
            .collect();
        ScheduleGraph::from_edges(&edges)
    }

    #[test]
    fn closing_a_chain_is_a_cycle() {
        let g = graph(&[("a", "b"), ("b", "c")]);
        assert!(would_create_cycle(&g, &"c".into(), &"a".into()));
        assert!(!would_create_cycle(&g, &"a".into(), &"c".into()));
    }

    #[test]
    fn unknown_tasks_never_cycle() {
        let g = graph(&[("a", "b")]);
        assert!(!would_create_cycle(&g, &"x".into(), &"y".into()));
        assert!(!would_create_cycle(&g, &"b".into(), &"x".into()));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let g = graph(&[("a", "b"), ("a", "c"), ("b", "d")]);
        assert!(!would_create_cycle(&g, &"c".into(), &"d".into()));
    }

    #[test]
    fn terminates_on_existing_unrelated_cycle() {
        let g = graph(&[("a", "b"), ("b", "c"), ("c", "b")]);
        assert!(!would_create_cycle(&g, &"z".into(), &"a".into()));
        assert!(would_create_cycle(&g, &"c".into(), &"a".into()));
    }
}
