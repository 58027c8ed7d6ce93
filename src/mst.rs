//! Minimum spanning tree algorithms driven by the Fibonacci heap
//!
//! Three drivers, each exercising a different part of the heap API:
//!
//! - [`prim`] grows one tree per component with a vertex-keyed heap and
//!   `decrease_key`.
//! - [`boruvka_step`] runs a single Boruvka phase over per-component
//!   candidate-edge heaps, using O(1) `merge` when components unify.
//! - [`fredman_tarjan`] repeats multi-heap phases until one component remains,
//!   carrying the candidate heaps across phases.
//!
//! # Example
//!
//! ```rust
//! use fibonacci_mst::mst::{Graph, prim};
//!
//! let mut graph = Graph::new(4);
//! graph.add_edge(0, 1, 1u32);
//! graph.add_edge(1, 2, 2);
//! graph.add_edge(2, 3, 3);
//! graph.add_edge(3, 0, 4);
//!
//! let tree = prim(&graph);
//! assert_eq!(tree.total_weight, 6);
//! assert_eq!(tree.edges.len(), 3);
//! ```

use crate::arena::{NodeArena, NodeHandle};
use crate::fibonacci::FibonacciHeap;
use crate::union_find::UnionFind;
use rustc_hash::FxHashMap;
use std::ops::Add;

/// Trait for edge weights.
///
/// Requires ordering, copying, addition, and a zero value for totals.
pub trait Weight: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Weight for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// An undirected weighted edge between vertices `u` and `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<W> {
    pub u: usize,
    pub v: usize,
    pub weight: W,
}

impl<W> Edge<W> {
    /// The endpoint that is not `vertex`. For a self-loop this is `vertex`
    /// itself.
    fn other(&self, vertex: usize) -> usize {
        if self.u == vertex {
            self.v
        } else {
            self.u
        }
    }
}

/// An undirected graph over vertices `0..vertex_count`, stored as an edge
/// list with per-vertex adjacency into it.
#[derive(Debug, Clone)]
pub struct Graph<W> {
    vertex_count: usize,
    edges: Vec<Edge<W>>,
    /// Per vertex, the indices into `edges` of its incident edges.
    adjacency: Vec<Vec<usize>>,
}

impl<W: Weight> Graph<W> {
    /// Creates a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Adds an undirected edge. Parallel edges and self-loops are allowed;
    /// the drivers simply never pick a useless one.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: W) {
        debug_assert!(u < self.vertex_count && v < self.vertex_count);
        let index = self.edges.len();
        self.edges.push(Edge { u, v, weight });
        self.adjacency[u].push(index);
        if u != v {
            self.adjacency[v].push(index);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge<W>] {
        &self.edges
    }

    /// Indices into [`edges`](Self::edges) of the edges incident to `vertex`.
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.adjacency[vertex]
    }
}

/// Result of a spanning tree computation.
///
/// For a disconnected graph this is a spanning forest: one tree per
/// component, `vertex_count - component_count` edges in total.
#[derive(Debug, Clone)]
pub struct SpanningTree<W> {
    pub edges: Vec<Edge<W>>,
    pub total_weight: W,
}

impl<W: Weight> SpanningTree<W> {
    fn new() -> Self {
        Self {
            edges: Vec::new(),
            total_weight: W::default(),
        }
    }
}

/// Tentative distance of a vertex from the growing tree. Generic weights
/// have no infinity, so the sentinel is a dedicated variant that orders
/// above every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Dist<W> {
    Finite(W),
    Infinite,
}

/// Prim's algorithm over a vertex-keyed Fibonacci heap.
///
/// Every vertex starts in the heap at `Dist::Infinite`; vertex 0 is
/// decreased to zero and extraction proceeds from there. A vertex extracted
/// while still infinite is unreachable from everything processed so far and
/// seeds a new tree in the forest. Each vertex's heap handle lives in a
/// `Vec<Option<NodeHandle>>` slot that is cleared on extraction, so "still
/// in the heap" is exactly "slot is `Some`".
pub fn prim<W: Weight>(graph: &Graph<W>) -> SpanningTree<W> {
    let n = graph.vertex_count();
    let mut tree = SpanningTree::new();
    if n == 0 {
        return tree;
    }

    let mut arena: NodeArena<usize, Dist<W>> = NodeArena::new();
    let mut heap: FibonacciHeap<usize, Dist<W>> = FibonacciHeap::new();
    let mut handles: Vec<Option<NodeHandle>> = Vec::with_capacity(n);
    let mut dist: Vec<Dist<W>> = vec![Dist::Infinite; n];
    let mut best_edge: Vec<Option<usize>> = vec![None; n];

    for v in 0..n {
        handles.push(Some(heap.insert(&mut arena, Dist::Infinite, v)));
    }
    dist[0] = Dist::Finite(W::default());
    if let Some(h) = handles[0] {
        let _ = heap.decrease_key(&mut arena, h, dist[0]);
    }

    while let Some((d, u)) = heap.extract_min(&mut arena) {
        handles[u] = None;
        if let (Dist::Finite(_), Some(index)) = (d, best_edge[u]) {
            let edge = graph.edges()[index];
            tree.edges.push(edge);
            tree.total_weight = tree.total_weight + edge.weight;
        }
        for &index in graph.neighbors(u) {
            let edge = graph.edges()[index];
            let v = edge.other(u);
            if let Some(h) = handles[v] {
                let candidate = Dist::Finite(edge.weight);
                if candidate < dist[v] {
                    dist[v] = candidate;
                    best_edge[v] = Some(index);
                    let _ = heap.decrease_key(&mut arena, h, candidate);
                }
            }
        }
    }
    tree
}

/// Edges chosen by one Boruvka phase.
#[derive(Debug, Clone)]
pub struct BoruvkaStep<W> {
    /// Indices into the graph's edge list of the edges added this phase.
    pub edges: Vec<usize>,
    pub added_weight: W,
}

/// Runs a single Boruvka phase over the components of `components`.
///
/// Each component gets a candidate heap holding its incident cross-component
/// edges, keyed by component root in a hash map. For each component in turn,
/// its heap is drained until a still-valid edge emerges (edges that went
/// internal during this phase are discarded), the edge is taken, the two
/// components are unioned immediately, and the loser's heap is merged into
/// the winner's entry in O(1). Interleaving the union with the selection
/// means an edge taken by one side is already internal by the time the other
/// side sees its copy, so no edge is ever added twice.
pub fn boruvka_step<W: Weight>(graph: &Graph<W>, components: &mut UnionFind) -> BoruvkaStep<W> {
    let mut step = BoruvkaStep {
        edges: Vec::new(),
        added_weight: W::default(),
    };

    let mut arena: NodeArena<usize, W> = NodeArena::new();
    let mut heaps: FxHashMap<usize, FibonacciHeap<usize, W>> = FxHashMap::default();
    for (index, edge) in graph.edges().iter().enumerate() {
        let ru = components.find(edge.u);
        let rv = components.find(edge.v);
        if ru == rv {
            continue;
        }
        heaps
            .entry(ru)
            .or_default()
            .insert(&mut arena, edge.weight, index);
        heaps
            .entry(rv)
            .or_default()
            .insert(&mut arena, edge.weight, index);
    }

    let roots: Vec<usize> = heaps.keys().copied().collect();
    for root in roots {
        let live = components.find(root);
        let mut heap = match heaps.remove(&live) {
            Some(heap) => heap,
            // this component's heap was already consumed and rehomed
            None => continue,
        };

        let mut chosen = None;
        while let Some((weight, index)) = heap.extract_min(&mut arena) {
            let edge = graph.edges()[index];
            if components.connected(edge.u, edge.v) {
                continue;
            }
            chosen = Some((weight, index, edge));
            break;
        }

        match chosen {
            Some((weight, index, edge)) => {
                step.edges.push(index);
                step.added_weight = step.added_weight + weight;

                let ru = components.find(edge.u);
                let rv = components.find(edge.v);
                let other_root = if live == ru { rv } else { ru };
                let other = heaps.remove(&other_root);
                if let Some(winner) = components.union(ru, rv) {
                    if let Some(mut other) = other {
                        heap.merge(&mut arena, &mut other);
                    }
                    heaps.insert(winner, heap);
                }
            }
            // no outgoing edge left: the component is finished
            None => {}
        }
    }

    for heap in heaps.values_mut() {
        heap.clear(&mut arena);
    }
    step
}

/// Boruvka-style MST via repeated multi-heap phases, melding candidate heaps
/// whenever components unify.
///
/// Unlike [`boruvka_step`], the per-component heaps persist across phases:
/// an edge discarded as internal can never become useful again, so nothing
/// is rebuilt between phases. Terminates when one component remains, or when
/// a phase selects no edge at all, which happens exactly when the remaining
/// components are mutually disconnected.
pub fn fredman_tarjan<W: Weight>(graph: &Graph<W>) -> SpanningTree<W> {
    let n = graph.vertex_count();
    let mut tree = SpanningTree::new();
    if n == 0 {
        return tree;
    }

    let mut components = UnionFind::new(n);
    let mut arena: NodeArena<usize, W> = NodeArena::new();
    let mut heaps: FxHashMap<usize, FibonacciHeap<usize, W>> = FxHashMap::default();
    for v in 0..n {
        heaps.insert(v, FibonacciHeap::new());
    }
    for (index, edge) in graph.edges().iter().enumerate() {
        if edge.u == edge.v {
            continue;
        }
        if let Some(heap) = heaps.get_mut(&edge.u) {
            heap.insert(&mut arena, edge.weight, index);
        }
        if let Some(heap) = heaps.get_mut(&edge.v) {
            heap.insert(&mut arena, edge.weight, index);
        }
    }

    while components.components() > 1 {
        let mut progressed = false;
        let roots: Vec<usize> = heaps.keys().copied().collect();
        for root in roots {
            let live = components.find(root);
            let mut heap = match heaps.remove(&live) {
                Some(heap) => heap,
                None => continue,
            };

            let mut chosen = None;
            while let Some((_, index)) = heap.extract_min(&mut arena) {
                let edge = graph.edges()[index];
                if components.connected(edge.u, edge.v) {
                    continue;
                }
                chosen = Some((index, edge));
                break;
            }

            match chosen {
                Some((_, edge)) => {
                    tree.edges.push(edge);
                    tree.total_weight = tree.total_weight + edge.weight;
                    progressed = true;

                    let ru = components.find(edge.u);
                    let rv = components.find(edge.v);
                    let other_root = if live == ru { rv } else { ru };
                    let other = heaps.remove(&other_root);
                    if let Some(winner) = components.union(ru, rv) {
                        if let Some(mut other) = other {
                            heap.merge(&mut arena, &mut other);
                        }
                        heaps.insert(winner, heap);
                    }
                }
                // exhausted: isolated from everything still separate
                None => {}
            }
        }
        if !progressed {
            break;
        }
    }
    tree
}
