//! `Forest`: an edge-class subgraph oriented into rooted trees.
//!
//! Forest nodes live in an arena and refer to each other by [`Slot`]. Each
//! node carries two atomic color buffers so one round can read the colors
//! the previous round settled while workers write the next ones; which buffer
//! is current is decided by the caller (see [`Buffer`]), never by the forest.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Position of a [`ForestNode`] in its forest's arena.
pub type Slot = usize;

/// Names one of the two per-node color buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Buffer {
    /// Buffer 0.
    Primary,
    /// Buffer 1.
    Scratch,
}

impl Buffer {
    /// The opposite buffer.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Primary => Self::Scratch,
            Self::Scratch => Self::Primary,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Scratch => 1,
        }
    }
}

/// A vertex of a [`Forest`], standing in for one original graph node.
#[derive(Debug)]
pub struct ForestNode {
    origin: usize,
    colors: [AtomicUsize; 2],
    parent: Option<Slot>,
    neighbors: Vec<Slot>,
}

impl ForestNode {
    fn new(origin: usize, color: usize) -> Self {
        Self {
            origin,
            colors: [AtomicUsize::new(color), AtomicUsize::new(color)],
            parent: None,
            neighbors: Vec::new(),
        }
    }

    /// Index of the originating graph node.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Parent slot; `None` iff this node roots its tree.
    pub fn parent(&self) -> Option<Slot> {
        self.parent
    }

    /// Whether this node roots its tree.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Tree adjacency: parent and children.
    pub fn neighbors(&self) -> &[Slot] {
        &self.neighbors
    }

    /// Tree neighbors other than the parent.
    pub fn children(&self) -> impl Iterator<Item = Slot> + '_ {
        self.neighbors
            .iter()
            .copied()
            .filter(move |&s| Some(s) != self.parent)
    }

    /// Reads the color held in `buffer`.
    #[inline]
    pub fn color(&self, buffer: Buffer) -> usize {
        self.colors[buffer.index()].load(Ordering::Acquire)
    }

    /// Writes `color` into `buffer`.
    #[inline]
    pub fn store(&self, buffer: Buffer, color: usize) {
        self.colors[buffer.index()].store(color, Ordering::Release);
    }
}

/// A spanning subgraph restricted to one edge class.
#[derive(Debug)]
pub struct Forest {
    id: usize,
    root: Option<Slot>,
    nodes: Vec<ForestNode>,
    slots: HashMap<usize, Slot>,
}

impl Forest {
    /// An empty forest.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            root: None,
            nodes: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Edge class this forest covers.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Slot of the first root materialized.
    pub fn root(&self) -> Option<Slot> {
        self.root
    }

    /// Number of forest nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Forests with fewer than two nodes have nothing to reduce.
    pub fn needs_reduction(&self) -> bool {
        self.nodes.len() >= 2
    }

    /// The arena.
    pub fn nodes(&self) -> &[ForestNode] {
        &self.nodes
    }

    /// The node in `slot`.
    ///
    /// # Panics
    /// Panics if `slot` is out of bounds.
    pub fn node(&self, slot: Slot) -> &ForestNode {
        &self.nodes[slot]
    }

    /// Slot standing in for graph node `origin`, if it joined this forest.
    pub fn slot_of(&self, origin: usize) -> Option<Slot> {
        self.slots.get(&origin).copied()
    }

    fn materialize(&mut self, origin: usize) -> Slot {
        if let Some(&slot) = self.slots.get(&origin) {
            return slot;
        }
        let slot = self.nodes.len();
        // Arena positions are distinct, so they form a proper initial coloring.
        self.nodes.push(ForestNode::new(origin, slot));
        self.slots.insert(origin, slot);
        slot
    }

    /// Records the edge between graph nodes `lower` and `upper`.
    ///
    /// `lower` is materialized first. The first `upper` seen becomes the root.
    pub fn add_edge(&mut self, lower: usize, upper: usize) {
        let a = self.materialize(lower);
        let b = self.materialize(upper);
        self.nodes[a].neighbors.push(b);
        self.nodes[b].neighbors.push(a);
        if self.root.is_none() {
            self.root = Some(b);
        }
    }

    /// Orients every tree breadth-first: from the root, then from each node
    /// not yet reached, which roots its own tree.
    pub fn orient(&mut self) {
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        let starts: Vec<Slot> = self.root.into_iter().chain(0..self.nodes.len()).collect();
        for start in starts {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            self.nodes[start].parent = None;
            queue.push_back(start);
            while let Some(slot) = queue.pop_front() {
                for i in 0..self.nodes[slot].neighbors.len() {
                    let next = self.nodes[slot].neighbors[i];
                    if !visited[next] {
                        visited[next] = true;
                        self.nodes[next].parent = Some(slot);
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    /// Number of trees (roots) after orientation.
    pub fn tree_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_root()).count()
    }

    /// Each forest edge once, as `(origin, origin)` with the lower index first.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.iter().enumerate().flat_map(move |(slot, node)| {
            node.neighbors
                .iter()
                .filter(move |&&n| slot < n)
                .map(move |&n| {
                    let (a, b) = (node.origin, self.nodes[n].origin);
                    (a.min(b), a.max(b))
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_upper_becomes_root_and_slots_color() {
        let mut f = Forest::new(0);
        f.add_edge(1, 4);
        f.add_edge(2, 4);
        f.add_edge(0, 2);
        assert_eq!(f.root(), f.slot_of(4));
        assert_eq!(f.slot_of(1), Some(0));
        assert_eq!(f.len(), 4);
        for (slot, node) in f.nodes().iter().enumerate() {
            assert_eq!(node.color(Buffer::Primary), slot);
        }
    }

    #[test]
    fn orientation_points_every_non_root_inward() {
        let mut f = Forest::new(0);
        f.add_edge(1, 4);
        f.add_edge(2, 4);
        f.add_edge(0, 2);
        f.add_edge(7, 9);
        f.orient();
        assert_eq!(f.tree_count(), 2);
        let root = f.root().unwrap();
        assert!(f.node(root).is_root());
        let zero = f.slot_of(0).unwrap();
        assert_eq!(f.node(zero).parent(), f.slot_of(2));
        assert_eq!(f.node(f.slot_of(2).unwrap()).parent(), Some(root));
        assert_eq!(f.edges().count(), 4);
    }

    #[test]
    fn buffers_are_independent() {
        let mut f = Forest::new(3);
        f.add_edge(0, 1);
        let n = f.node(0);
        n.store(Buffer::Scratch, 9);
        assert_eq!(n.color(Buffer::Primary), 0);
        assert_eq!(n.color(Buffer::Scratch), 9);
        assert_eq!(Buffer::Primary.flip(), Buffer::Scratch);
    }
}
