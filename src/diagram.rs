//! Turn an ASCII commit diagram into a [`Graph`].
//!
//! Nodes are single ASCII alphanumerics. Edges are inferred from the
//! connectors around each node:
//!
//! ```text
//!     3-4          4 is the parent of 5 (fork, `\` above-left)
//!        \
//!   1-2-D-5        2 is the parent of D (same row, through `-`)
//!      /
//!   c-d            d is the parent of D (merge, `/` below-left)
//! ```
//!
//! A diagonal connector always reaches two rows and two columns away, so a
//! parent is strictly to the left of its child and the result is acyclic.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::graph::Graph;
use crate::grid::{Grid, Position};

/// Parse a diagram into a graph of node → parents.
///
/// Parents are recorded same-row first, then fork, then merge.
pub fn parse(text: &str) -> Result<Graph, Error> {
    let grid = Grid::new(text);
    let mut graph = Graph::new();
    let mut defined_at: HashMap<char, Position> = HashMap::new();

    for (pos, ch) in grid.cells() {
        if !is_identifier(ch) {
            continue;
        }

        if let Some(&first) = defined_at.get(&ch) {
            return Err(Error::DuplicateIdentifier {
                id: ch,
                first,
                second: pos,
            });
        }
        defined_at.insert(ch, pos);

        let parents = infer_parents(&grid, ch, pos)?;
        debug!(node = %ch, at = %pos, ?parents, "parsed node");
        graph.insert(ch, parents);
    }

    Ok(graph)
}

/// Whether `ch` names a node.
pub fn is_identifier(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

/// A diagonal connector and the direction it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// `\` in the row above: the parent is up and to the left.
    Fork,
    /// `/` in the row below: the parent is down and to the left.
    Merge,
}

impl Connector {
    fn symbol(self) -> char {
        match self {
            Connector::Fork => '\\',
            Connector::Merge => '/',
        }
    }

    fn row_step(self) -> isize {
        match self {
            Connector::Fork => -1,
            Connector::Merge => 1,
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.symbol())
    }
}

fn infer_parents(grid: &Grid, node: char, at: Position) -> Result<Vec<char>, Error> {
    let mut parents = Vec::with_capacity(2);

    if let Some(parent) = same_row_parent(grid.row(at.row), at.col) {
        parents.push(parent);
    }

    for connector in [Connector::Fork, Connector::Merge] {
        let step = connector.row_step();
        if grid.get_offset(at, step, -1) == Some(connector.symbol()) {
            parents.push(diagonal_parent(grid, node, at, connector)?);
        }
    }

    Ok(parents)
}

/// Walk left over `-` and return the identifier the run ends at, if any.
fn same_row_parent(row: &[char], col: usize) -> Option<char> {
    row[..col]
        .iter()
        .rev()
        .find(|&&ch| ch != '-')
        .copied()
        .filter(|&ch| is_identifier(ch))
}

fn diagonal_parent(
    grid: &Grid,
    node: char,
    at: Position,
    connector: Connector,
) -> Result<char, Error> {
    let target = at.offset(2 * connector.row_step(), -2);
    match target.and_then(|t| grid.get(t).map(|found| (t, found))) {
        Some((_, found)) if is_identifier(found) => {
            debug!(%node, parent = %found, %connector, "diagonal edge");
            Ok(found)
        }
        Some((target, found)) => Err(Error::NotAnIdentifier {
            node,
            at,
            connector,
            target,
            found,
        }),
        None => Err(Error::MissingParent {
            node,
            at,
            connector,
        }),
    }
}

/// Errors from parsing a diagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("connector {connector} next to node '{node}' at {at} points outside the diagram")]
    MissingParent {
        node: char,
        at: Position,
        connector: Connector,
    },

    #[error(
        "connector {connector} next to node '{node}' at {at} points at {found:?} ({target}), not a node"
    )]
    NotAnIdentifier {
        node: char,
        at: Position,
        connector: Connector,
        target: Position,
        found: char,
    },

    #[error("node '{id}' appears at {first} and again at {second}")]
    DuplicateIdentifier {
        id: char,
        first: Position,
        second: Position,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parents(graph: &Graph, id: char) -> Vec<char> {
        graph.parents_of(id).expect("node exists").to_vec()
    }

    #[test]
    fn single_row_chain() {
        let graph = parse("1-2-3").unwrap();
        assert_eq!(
            graph,
            Graph::from([('1', vec![]), ('2', vec!['1']), ('3', vec!['2'])])
        );
    }

    #[test]
    fn merge_from_below() {
        let graph = parse("1-2-3-B-5\n     /\n  a-b").unwrap();
        assert_eq!(parents(&graph, 'B'), vec!['3', 'b']);
        assert_eq!(parents(&graph, '5'), vec!['B']);
        assert_eq!(parents(&graph, 'a'), Vec::<char>::new());
        assert_eq!(parents(&graph, 'b'), vec!['a']);
        let ids: String = graph.ids().collect();
        assert_eq!(ids, "123B5ab");
    }

    #[test]
    fn fork_and_merge_on_one_node() {
        let text = "x-y\n   \\\n1-2-B\n   /\na-b";
        let graph = parse(text).unwrap();
        assert_eq!(parents(&graph, 'B'), vec!['2', 'y', 'b']);

        let text = "x\n \\\n  B\n /\na";
        let graph = parse(text).unwrap();
        assert_eq!(parents(&graph, 'B'), vec!['x', 'a']);
    }

    #[test]
    fn long_dash_runs_are_skipped() {
        let graph = parse("a-b--c---d").unwrap();
        assert_eq!(parents(&graph, 'c'), vec!['b']);
        assert_eq!(parents(&graph, 'd'), vec!['c']);
    }

    #[test]
    fn dashes_to_start_of_row_give_no_parent() {
        let graph = parse("--a").unwrap();
        assert_eq!(parents(&graph, 'a'), Vec::<char>::new());
    }

    #[test]
    fn blank_before_node_gives_no_parent() {
        let graph = parse("a - b").unwrap();
        assert_eq!(parents(&graph, 'b'), Vec::<char>::new());
    }

    #[test]
    fn non_ascii_is_background() {
        let graph = parse("é-a").unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(parents(&graph, 'a'), Vec::<char>::new());
    }

    #[test]
    fn fork_off_the_top_is_malformed() {
        let err = parse("  \\\n   a").unwrap_err();
        assert_eq!(
            err,
            Error::MissingParent {
                node: 'a',
                at: Position::new(1, 3),
                connector: Connector::Fork,
            }
        );
    }

    #[test]
    fn merge_off_the_bottom_is_malformed() {
        let err = parse("1-A\n /").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingParent {
                node: 'A',
                connector: Connector::Merge,
                ..
            }
        ));
    }

    #[test]
    fn merge_onto_blank_is_malformed() {
        let err = parse("1-A\n /\n  a").unwrap_err();
        assert_eq!(
            err,
            Error::NotAnIdentifier {
                node: 'A',
                at: Position::new(0, 2),
                connector: Connector::Merge,
                target: Position::new(2, 0),
                found: ' ',
            }
        );
        assert_eq!(
            err.to_string(),
            "connector '/' next to node 'A' at 1:3 points at ' ' (3:1), not a node"
        );
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let err = parse("a-b\n\nb").unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateIdentifier {
                id: 'b',
                first: Position::new(0, 2),
                second: Position::new(2, 0),
            }
        );
    }

    #[test]
    fn empty_diagram_is_empty_graph() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n  \n").unwrap().is_empty());
    }
}
