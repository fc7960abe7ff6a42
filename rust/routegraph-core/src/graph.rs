//! Weighted directed graph with shortest-path and spanning-tree queries.
//!
//! Vertices are arbitrary hashable values; each ordered pair of vertices
//! carries at most one edge. Weights are assumed non-negative.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::ops::Add;

use num_traits::Zero;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("cannot insert edge {from} -> {to}: both endpoints must be vertices of the graph")]
    InvalidEndpoint { from: String, to: String },
    #[error("unknown vertex '{0}'")]
    UnknownVertex(String),
    #[error("no path from '{from}' to '{to}'")]
    NoPath { from: String, to: String },
}

// ---------------------------------------------------------------------------
// Internal storage
// ---------------------------------------------------------------------------

/// Dense index of a vertex in insertion order.
type VertexId = usize;

#[derive(Debug, Clone)]
struct EdgeEntry<W> {
    to: VertexId,
    weight: W,
}

/// Frontier entry ordered by `(key, seq)`. `seq` grows with every push, so
/// entries with equal keys come out in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier<W> {
    key: W,
    seq: u64,
    from: VertexId,
    to: VertexId,
}

impl<W: Ord> Ord for Frontier<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<W: Ord> PartialOrd for Frontier<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of frontier entries with a push counter for stable tie-breaking.
struct MinFrontier<W> {
    heap: BinaryHeap<Reverse<Frontier<W>>>,
    next_seq: u64,
}

impl<W: Ord> MinFrontier<W> {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, key: W, from: VertexId, to: VertexId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Frontier { key, seq, from, to }));
    }

    fn pop(&mut self) -> Option<Frontier<W>> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }
}

// ---------------------------------------------------------------------------
// Spanning tree
// ---------------------------------------------------------------------------

/// One edge of a spanning tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEdge<V, W> {
    pub from: V,
    pub to: V,
    pub weight: W,
}

/// A minimum spanning tree rooted at `root`, covering the vertices reachable
/// from it. Edges are listed in the order Prim's algorithm selected them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanningTree<V, W> {
    pub root: V,
    pub edges: Vec<TreeEdge<V, W>>,
}

impl<V, W> SpanningTree<V, W>
where
    V: PartialEq,
    W: Copy + Add<Output = W> + Zero,
{
    /// Sum of all tree edge weights.
    pub fn cost(&self) -> W {
        self.edges
            .iter()
            .fold(W::zero(), |acc, edge| acc + edge.weight)
    }

    /// Number of vertices spanned, the root included.
    pub fn vertex_count(&self) -> usize {
        self.edges.len() + 1
    }

    pub fn contains_vertex(&self, v: &V) -> bool {
        self.root == *v || self.edges.iter().any(|e| e.to == *v)
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed graph keyed by vertex value, with one weight per ordered pair.
#[derive(Debug, Clone)]
pub struct WeightedGraph<V, W> {
    vertices: Vec<V>,
    /// Maps vertex value → dense id.
    index: HashMap<V, VertexId>,
    /// Outgoing edges per vertex, in insertion order.
    outgoing: Vec<Vec<EdgeEntry<W>>>,
    edge_count: usize,
}

impl<V, W> WeightedGraph<V, W>
where
    V: Eq + Hash + Clone + fmt::Display,
    W: Copy + Ord + Add<Output = W> + Zero,
{
    // -- Construction -------------------------------------------------------

    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            outgoing: Vec::new(),
            edge_count: 0,
        }
    }

    // -- Vertex operations --------------------------------------------------

    /// Add `v` if it is not yet a vertex. Returns `true` if it was added.
    pub fn insert_vertex(&mut self, v: V) -> bool {
        if self.index.contains_key(&v) {
            return false;
        }
        let id = self.vertices.len();
        self.index.insert(v.clone(), id);
        self.vertices.push(v);
        self.outgoing.push(Vec::new());
        true
    }

    pub fn contains_vertex(&self, v: &V) -> bool {
        self.index.contains_key(v)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter()
    }

    // -- Edge operations ----------------------------------------------------

    /// Insert the directed edge `from -> to`, or overwrite its weight if it
    /// already exists. Returns `true` if the pair had no edge before.
    ///
    /// Both endpoints must already be vertices.
    pub fn insert_edge(&mut self, from: &V, to: &V, weight: W) -> Result<bool, GraphError> {
        let (Some(&u), Some(&v)) = (self.index.get(from), self.index.get(to)) else {
            return Err(GraphError::InvalidEndpoint {
                from: from.to_string(),
                to: to.to_string(),
            });
        };
        let edges = &mut self.outgoing[u];
        if let Some(existing) = edges.iter_mut().find(|e| e.to == v) {
            existing.weight = weight;
            return Ok(false);
        }
        edges.push(EdgeEntry { to: v, weight });
        self.edge_count += 1;
        Ok(true)
    }

    pub fn contains_edge(&self, from: &V, to: &V) -> bool {
        self.edge_weight(from, to).is_some()
    }

    /// Weight of the edge `from -> to`, if there is one.
    pub fn edge_weight(&self, from: &V, to: &V) -> Option<W> {
        let u = *self.index.get(from)?;
        let v = *self.index.get(to)?;
        self.outgoing[u]
            .iter()
            .find(|e| e.to == v)
            .map(|e| e.weight)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Outgoing neighbours of `v` with their edge weights, in insertion
    /// order. Empty if `v` is not a vertex.
    pub fn neighbors<'a>(&'a self, v: &V) -> impl Iterator<Item = (&'a V, W)> + 'a {
        let edges: &[EdgeEntry<W>] = match self.index.get(v) {
            Some(&id) => self.outgoing[id].as_slice(),
            None => &[],
        };
        edges.iter().map(move |e| (&self.vertices[e.to], e.weight))
    }

    // -- Shortest paths -----------------------------------------------------

    /// Total weight of the cheapest directed path from `src` to `dst`.
    pub fn path_cost(&self, src: &V, dst: &V) -> Result<W, GraphError> {
        self.cheapest_path(src, dst).map(|(cost, _)| cost)
    }

    /// Vertices along the cheapest directed path from `src` to `dst`, both
    /// endpoints included.
    pub fn shortest_path(&self, src: &V, dst: &V) -> Result<Vec<V>, GraphError> {
        self.cheapest_path(src, dst).map(|(_, path)| path)
    }

    /// Cost and vertices of the cheapest path, from a single search.
    pub fn cheapest_path(&self, src: &V, dst: &V) -> Result<(W, Vec<V>), GraphError> {
        self.dijkstra(src, dst)
    }

    fn dijkstra(&self, src: &V, dst: &V) -> Result<(W, Vec<V>), GraphError> {
        let source = self.vertex_id(src)?;
        let target = self.vertex_id(dst)?;

        let n = self.vertices.len();
        let mut dist: Vec<Option<W>> = vec![None; n];
        let mut prev: Vec<Option<VertexId>> = vec![None; n];
        let mut done = vec![false; n];
        let mut frontier = MinFrontier::new();

        dist[source] = Some(W::zero());
        frontier.push(W::zero(), source, source);

        while let Some(Frontier { key: cost, to: u, .. }) = frontier.pop() {
            if done[u] {
                continue;
            }
            done[u] = true;
            if u == target {
                return Ok((cost, self.reconstruct_path(&prev, source, target)));
            }
            for edge in &self.outgoing[u] {
                let candidate = cost + edge.weight;
                let improves = match dist[edge.to] {
                    Some(known) => candidate < known,
                    None => true,
                };
                if improves && !done[edge.to] {
                    dist[edge.to] = Some(candidate);
                    prev[edge.to] = Some(u);
                    frontier.push(candidate, u, edge.to);
                }
            }
        }

        Err(GraphError::NoPath {
            from: src.to_string(),
            to: dst.to_string(),
        })
    }

    /// Walk the predecessor chain from `target` back to `source`.
    fn reconstruct_path(&self, prev: &[Option<VertexId>], source: VertexId, target: VertexId) -> Vec<V> {
        let mut path = vec![self.vertices[target].clone()];
        let mut current = target;
        while current != source {
            match prev[current] {
                Some(p) => {
                    current = p;
                    path.push(self.vertices[current].clone());
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    // -- Spanning trees -----------------------------------------------------

    /// Minimum spanning tree of the vertices reachable from `root`, grown by
    /// Prim's algorithm along outgoing edges.
    pub fn min_spanning_tree(&self, root: &V) -> Result<SpanningTree<V, W>, GraphError> {
        let start = self.vertex_id(root)?;
        let mut in_tree = vec![false; self.vertices.len()];
        let mut frontier = MinFrontier::new();
        let mut edges = Vec::new();

        in_tree[start] = true;
        self.push_outgoing(&mut frontier, start, &in_tree);

        while let Some(Frontier { key, from, to, .. }) = frontier.pop() {
            if in_tree[to] {
                continue;
            }
            in_tree[to] = true;
            edges.push(TreeEdge {
                from: self.vertices[from].clone(),
                to: self.vertices[to].clone(),
                weight: key,
            });
            self.push_outgoing(&mut frontier, to, &in_tree);
        }

        Ok(SpanningTree {
            root: root.clone(),
            edges,
        })
    }

    /// Total weight of [`min_spanning_tree`](Self::min_spanning_tree).
    pub fn min_spanning_tree_cost(&self, root: &V) -> Result<W, GraphError> {
        self.min_spanning_tree(root).map(|tree| tree.cost())
    }

    fn push_outgoing(&self, frontier: &mut MinFrontier<W>, from: VertexId, in_tree: &[bool]) {
        for edge in &self.outgoing[from] {
            if !in_tree[edge.to] {
                frontier.push(edge.weight, from, edge.to);
            }
        }
    }

    fn vertex_id(&self, v: &V) -> Result<VertexId, GraphError> {
        self.index
            .get(v)
            .copied()
            .ok_or_else(|| GraphError::UnknownVertex(v.to_string()))
    }
}

impl<V, W> Default for WeightedGraph<V, W>
where
    V: Eq + Hash + Clone + fmt::Display,
    W: Copy + Ord + Add<Output = W> + Zero,
{
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
