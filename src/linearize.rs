//! Order a [`Graph`] so every node comes after its parents.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::graph::Graph;

/// One node in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: char,
    /// First parent first.
    pub parents: Vec<char>,
}

/// Produce a creation order for `graph`.
///
/// Each step places the first pending node, in graph order, whose parents
/// are all placed, then starts looking from the front again. The result
/// only depends on the graph, including its node order.
pub fn linearize(graph: &Graph) -> Result<Vec<NodeRecord>, Error> {
    let mut pending: Vec<(char, &[char])> = graph.iter().collect();
    let mut placed: HashSet<char> = HashSet::with_capacity(pending.len());
    let mut order = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let Some(next) = pending
            .iter()
            .position(|(_, parents)| parents.iter().all(|p| placed.contains(p)))
        else {
            return Err(Error::Unresolvable {
                remaining: pending.iter().map(|&(id, _)| id).collect(),
            });
        };

        let (id, parents) = pending.remove(next);
        debug!(node = %id, position = order.len(), "placed node");
        placed.insert(id);
        order.push(NodeRecord {
            id,
            parents: parents.to_vec(),
        });
    }

    Ok(order)
}

/// Errors from linearizing a graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No pending node has all of its parents placed: there is a cycle, or a
    /// parent that is not a node of the graph.
    #[error("cannot order nodes {}: cycle or unknown parent", display_ids(.remaining))]
    Unresolvable { remaining: Vec<char> },
}

fn display_ids(ids: &[char]) -> String {
    ids.iter()
        .map(|id| format!("'{id}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(order: &[NodeRecord]) -> String {
        order.iter().map(|r| r.id).collect()
    }

    #[test]
    fn chain_is_kept_in_order() {
        let graph = Graph::from([('1', vec![]), ('2', vec!['1']), ('3', vec!['2'])]);
        let order = linearize(&graph).unwrap();
        assert_eq!(ids(&order), "123");
        assert_eq!(
            order[2],
            NodeRecord {
                id: '3',
                parents: vec!['2']
            }
        );
    }

    #[test]
    fn first_eligible_node_wins() {
        let graph = Graph::from([
            ('1', vec![]),
            ('2', vec!['1']),
            ('3', vec!['2']),
            ('B', vec!['3', 'b']),
            ('5', vec!['B']),
            ('a', vec![]),
            ('b', vec!['a']),
        ]);
        assert_eq!(ids(&linearize(&graph).unwrap()), "123abB5");
    }

    #[test]
    fn parent_order_is_preserved() {
        let graph = Graph::from([('m', vec!['y', 'x']), ('x', vec![]), ('y', vec![])]);
        let order = linearize(&graph).unwrap();
        assert_eq!(ids(&order), "xym");
        assert_eq!(order[2].parents, vec!['y', 'x']);
    }

    #[test]
    fn cycle_is_reported() {
        let graph = Graph::from([('x', vec!['y']), ('y', vec!['x'])]);
        assert_eq!(
            linearize(&graph).unwrap_err(),
            Error::Unresolvable {
                remaining: vec!['x', 'y']
            }
        );
    }

    #[test]
    fn cycle_after_progress_names_only_the_rest() {
        let graph = Graph::from([
            ('a', vec![]),
            ('x', vec!['a', 'y']),
            ('y', vec!['x']),
        ]);
        let err = linearize(&graph).unwrap_err();
        assert_eq!(
            err,
            Error::Unresolvable {
                remaining: vec!['x', 'y']
            }
        );
        assert_eq!(
            err.to_string(),
            "cannot order nodes 'x', 'y': cycle or unknown parent"
        );
    }

    #[test]
    fn unknown_parent_is_reported() {
        let graph = Graph::from([('a', vec![]), ('b', vec!['q'])]);
        assert_eq!(
            linearize(&graph).unwrap_err(),
            Error::Unresolvable {
                remaining: vec!['b']
            }
        );
    }

    #[test]
    fn empty_graph_is_empty_order() {
        assert!(linearize(&Graph::new()).unwrap().is_empty());
    }
}
