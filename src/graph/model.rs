//! Graph and node value types with validated, index-based adjacency.
//!
//! Adjacency is stored as node indices into the owning [`Graph`], so a
//! [`Graph::deep_copy`] re-resolves every reference into the copy for free and
//! two runs never alias a node.
//!
//! ### Invariants (checked by [`GraphBuilder::build`])
//! - **undirected**: `a` lists `b` iff `b` lists `a`
//! - **degree**: no node has more than `max_degree` neighbors
//! - **uniqueness**: node names are unique
//! - no self loops, no repeated neighbor entries

use std::collections::{HashMap, HashSet};

use crate::error::GraphError;

/// A vertex color. Domains are phase dependent.
pub type Color = usize;

/// A vertex of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    index: usize,
    color: Option<Color>,
    neighbors: Vec<usize>,
}

impl Node {
    /// Unique name within the graph.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable position in [`Graph::nodes`], used for work partitioning.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current color, `None` when unset.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Indices of the adjacent nodes.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Number of neighbors.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// An undirected graph with a declared degree bound.
///
/// A graph is exclusively owned by the run holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    name: String,
    description: String,
    max_degree: usize,
    nodes: Vec<Node>,
}

impl Graph {
    /// Starts a builder for a graph called `name` with degree bound `max_degree`.
    pub fn builder(name: impl Into<String>, max_degree: usize) -> GraphBuilder {
        GraphBuilder::new(name, max_degree)
    }

    /// Builds a graph over nodes `N0..N{node_count}` from an undirected edge list.
    ///
    /// Each edge is recorded on both endpoints.
    pub fn from_edges(
        name: impl Into<String>,
        max_degree: usize,
        node_count: usize,
        edges: &[(usize, usize)],
    ) -> Result<Self, GraphError> {
        let mut adjacency = vec![Vec::new(); node_count];
        for &(a, b) in edges {
            for (from, to) in [(a, b), (b, a)] {
                let list = adjacency.get_mut(from).ok_or_else(|| GraphError::UnknownNeighbor {
                    node: format!("N{to}"),
                    neighbor: format!("N{from}"),
                })?;
                list.push(format!("N{to}"));
            }
        }
        let mut builder = GraphBuilder::new(name, max_degree);
        for (i, neighbors) in adjacency.into_iter().enumerate() {
            builder = builder.node(format!("N{i}"), neighbors);
        }
        builder.build()
    }

    /// Graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Declared degree bound (Δ).
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Nodes in index order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The node at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Looks a node up by name.
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Neighbor indices of node `index`.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.nodes[index].neighbors
    }

    /// Neighbor names of node `index`.
    pub fn neighbor_names(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.nodes[index]
            .neighbors
            .iter()
            .map(move |&n| self.nodes[n].name.as_str())
    }

    /// Every undirected edge once, as `(lower, higher)` index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.neighbors
                .iter()
                .filter(move |&&n| n < node.index)
                .map(move |&n| (n, node.index))
        })
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::degree).sum::<usize>() / 2
    }

    /// Color of node `index`.
    pub fn color(&self, index: usize) -> Option<Color> {
        self.nodes[index].color
    }

    /// Sets the color of node `index`.
    pub fn set_color(&mut self, index: usize, color: Option<Color>) {
        self.nodes[index].color = color;
    }

    /// Assigns colors in node order; extra colors are ignored, missing ones
    /// leave the remaining nodes untouched.
    pub fn set_colors(&mut self, colors: impl IntoIterator<Item = Color>) {
        for (node, color) in self.nodes.iter_mut().zip(colors) {
            node.color = Some(color);
        }
    }

    /// All colors in node order.
    pub fn colors(&self) -> Vec<Option<Color>> {
        self.nodes.iter().map(|n| n.color).collect()
    }

    /// Unsets every color.
    pub fn clear_colors(&mut self) {
        for node in &mut self.nodes {
            node.color = None;
        }
    }

    /// Colors every node with its own index: the trivial n-coloring runs
    /// start from.
    pub fn seed_identity(&mut self) {
        for node in &mut self.nodes {
            node.color = Some(node.index);
        }
    }

    /// A fully independent copy; mutating it never affects `self`.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Number of distinct colors in use (unset nodes are not counted).
    pub fn count_colors(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| n.color)
            .collect::<HashSet<_>>()
            .len()
    }

    /// `true` iff every node is colored and no edge joins equal colors.
    pub fn is_safe(&self) -> bool {
        self.nodes.iter().all(|node| {
            node.color.is_some()
                && node
                    .neighbors
                    .iter()
                    .all(|&n| self.nodes[n].color != node.color)
        })
    }
}

/// Collects named adjacency entries and validates them into a [`Graph`].
///
/// ```
/// use distcolor::graph::Graph;
///
/// let graph = Graph::builder("pair", 1)
///     .node("A", ["B"])
///     .node("B", ["A"])
///     .build()
///     .unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    name: String,
    description: String,
    max_degree: usize,
    entries: Vec<(String, Vec<String>)>,
}

impl GraphBuilder {
    /// An empty builder.
    pub fn new(name: impl Into<String>, max_degree: usize) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            max_degree,
            entries: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a node with its neighbor names. Node order is index order.
    #[must_use]
    pub fn node<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        neighbors: impl IntoIterator<Item = S>,
    ) -> Self {
        self.entries
            .push((name.into(), neighbors.into_iter().map(Into::into).collect()));
        self
    }

    /// Validates the entries and resolves names into indices.
    pub fn build(self) -> Result<Graph, GraphError> {
        let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(self.entries.len());
        for (i, (name, _)) in self.entries.iter().enumerate() {
            if index_of.insert(name.as_str(), i).is_some() {
                return Err(GraphError::DuplicateNode { name: name.clone() });
            }
        }

        let mut nodes = Vec::with_capacity(self.entries.len());
        for (index, (name, neighbor_names)) in self.entries.iter().enumerate() {
            if neighbor_names.len() > self.max_degree {
                return Err(GraphError::DegreeExceeded {
                    node: name.clone(),
                    degree: neighbor_names.len(),
                    max_degree: self.max_degree,
                });
            }
            let mut neighbors = Vec::with_capacity(neighbor_names.len());
            for neighbor in neighbor_names {
                let &n = index_of.get(neighbor.as_str()).ok_or_else(|| GraphError::UnknownNeighbor {
                    node: name.clone(),
                    neighbor: neighbor.clone(),
                })?;
                if n == index {
                    return Err(GraphError::SelfLoop { node: name.clone() });
                }
                if neighbors.contains(&n) {
                    return Err(GraphError::RepeatedNeighbor {
                        node: name.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
                neighbors.push(n);
            }
            nodes.push(Node {
                name: name.clone(),
                index,
                color: None,
                neighbors,
            });
        }

        for node in &nodes {
            for &n in &node.neighbors {
                if !nodes[n].neighbors.contains(&node.index) {
                    return Err(GraphError::AsymmetricEdge {
                        from: node.name.clone(),
                        to: nodes[n].name.clone(),
                    });
                }
            }
        }

        Ok(Graph {
            name: self.name,
            description: self.description,
            max_degree: self.max_degree,
            nodes,
        })
    }
}
