//! Graph store: id-keyed node table with per-level adjacency.
//!
//! Adjacency lists hold ids, never references, so the cyclic neighbor
//! structure has no ownership cycles and exports trivially.

use std::collections::HashMap;

/// Caller-supplied node id.
pub type NodeId = u64;

/// A stored vector with its layered adjacency.
#[derive(Debug, Clone)]
pub struct Node<P> {
    pub(crate) id: NodeId,
    pub(crate) vector: Box<[f32]>,
    pub(crate) level: usize,
    /// One ordered neighbor list per level in `0..=level`
    pub(crate) connections: Vec<Vec<NodeId>>,
    pub(crate) payload: P,
}

impl<P> Node<P> {
    pub(crate) fn new(id: NodeId, vector: Box<[f32]>, level: usize, payload: P) -> Self {
        Self {
            id,
            vector,
            level,
            connections: vec![Vec::new(); level + 1],
            payload,
        }
    }

    pub(crate) fn from_parts(
        id: NodeId,
        vector: Box<[f32]>,
        connections: Vec<Vec<NodeId>>,
        payload: P,
    ) -> Self {
        Self {
            id,
            vector,
            level: connections.len().saturating_sub(1),
            connections,
            payload,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Neighbors at `level`; empty above the node's own level.
    pub fn neighbors(&self, level: usize) -> &[NodeId] {
        self.connections
            .get(level)
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }
}

/// Node table plus entry point bookkeeping.
#[derive(Debug, Clone)]
pub struct Graph<P> {
    nodes: HashMap<NodeId, Node<P>>,
    entry_point: Option<NodeId>,
    max_level: usize,
}

impl<P> Default for Graph<P> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            entry_point: None,
            max_level: 0,
        }
    }
}

impl<P> Graph<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<P>> {
        self.nodes.values()
    }

    pub fn entry_point(&self) -> Option<NodeId> {
        self.entry_point
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Neighbors of `id` at `level`; empty for unknown ids or levels above the node.
    pub fn neighbors(&self, id: NodeId, level: usize) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.neighbors(level))
            .unwrap_or(&[])
    }

    /// Total adjacency entries across all nodes and levels.
    pub fn total_connections(&self) -> usize {
        self.nodes
            .values()
            .map(|n| n.connections.iter().map(Vec::len).sum::<usize>())
            .sum()
    }

    pub(crate) fn insert_node(&mut self, node: Node<P>) {
        self.nodes.insert(node.id, node);
    }

    pub(crate) fn set_entry_point(&mut self, id: NodeId, level: usize) {
        self.entry_point = Some(id);
        self.max_level = level;
    }

    /// Add a symmetric edge at `level`. Both nodes must hold that level.
    pub(crate) fn connect(&mut self, a: NodeId, b: NodeId, level: usize) {
        if a == b {
            return;
        }
        self.link(a, b, level);
        self.link(b, a, level);
    }

    /// Drop the edge between `a` and `b` at `level` in both directions.
    pub(crate) fn disconnect(&mut self, a: NodeId, b: NodeId, level: usize) {
        self.unlink(a, b, level);
        self.unlink(b, a, level);
    }

    fn link(&mut self, from: NodeId, to: NodeId, level: usize) {
        if let Some(list) = self
            .nodes
            .get_mut(&from)
            .and_then(|n| n.connections.get_mut(level))
        {
            if !list.contains(&to) {
                list.push(to);
            }
        }
    }

    fn unlink(&mut self, from: NodeId, to: NodeId, level: usize) {
        if let Some(list) = self
            .nodes
            .get_mut(&from)
            .and_then(|n| n.connections.get_mut(level))
        {
            list.retain(|&n| n != to);
        }
    }

    /// Remove a node, unlink it from every neighbor, and recover the entry
    /// point if it was the one removed. Returns the detached node.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> Option<Node<P>> {
        let node = self.nodes.remove(&id)?;

        for (level, neighbors) in node.connections.iter().enumerate() {
            for &neighbor in neighbors {
                self.unlink(neighbor, id, level);
            }
        }

        if self.entry_point == Some(id) {
            self.recompute_entry_point();
        }

        Some(node)
    }

    /// Pick the highest-level node as entry point, lowest id on ties.
    pub(crate) fn recompute_entry_point(&mut self) {
        let best = self
            .nodes
            .values()
            .max_by(|a, b| a.level.cmp(&b.level).then_with(|| b.id.cmp(&a.id)));

        match best {
            Some(node) => {
                self.entry_point = Some(node.id);
                self.max_level = node.level;
            }
            None => {
                self.entry_point = None;
                self.max_level = 0;
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.entry_point = None;
        self.max_level = 0;
    }
}
