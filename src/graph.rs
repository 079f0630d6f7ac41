//! Commit graph keyed by node identifier.

use indexmap::IndexMap;

/// Node identifier → parents, in the order nodes were first seen.
///
/// The order matters: the linearizer scans nodes in this order, so two
/// graphs built the same way always linearize the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: IndexMap<char, Vec<char>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning the parents it previously had, if any.
    ///
    /// Replacing keeps the node's original position in the scan order.
    pub fn insert(&mut self, id: char, parents: Vec<char>) -> Option<Vec<char>> {
        self.nodes.insert(id, parents)
    }

    pub fn contains(&self, id: char) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Parents of `id`, first parent first. `None` if `id` is not a node.
    pub fn parents_of(&self, id: char) -> Option<&[char]> {
        self.nodes.get(&id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = char> + '_ {
        self.nodes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &[char])> + '_ {
        self.nodes.iter().map(|(&id, parents)| (id, parents.as_slice()))
    }
}

/// Later entries replace earlier ones with the same id.
impl<const N: usize> From<[(char, Vec<char>); N]> for Graph {
    fn from(nodes: [(char, Vec<char>); N]) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }
}
