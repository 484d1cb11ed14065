//! k-mer lift (C3): the overlap graph `K` of length-`k` walks in `G`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::AssembleError;
use crate::graph::{TranscriptGraph, VertexId};

/// Opaque handle into [`KmerGraph`]'s vertex arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KmerId(pub usize);

/// A vertex of the k-mer graph `K`: attributed evidence density plus
/// the smoothing accumulators used by [`crate::smooth`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KmerVertex {
    pub density: f64,
    pub smooth_fwd: f64,
    pub smooth_rev: f64,
    pub smooth_tmp: f64,
}

/// Resource limits guarding against a combinatorial blow-up of `K`
/// during the lift.
#[derive(Debug, Clone, Copy)]
pub struct KmerGraphLimits {
    pub max_vertices: usize,
}

impl Default for KmerGraphLimits {
    fn default() -> Self {
        Self {
            max_vertices: 8_000_000,
        }
    }
}

/// The k-mer overlap graph `K`. Vertices are interned length-`k`
/// tuples of [`VertexId`]; an edge `u -> v` exists iff the `(k-1)`
/// suffix of `u` equals the `(k-1)` prefix of `v`.
#[derive(Debug, Clone)]
pub struct KmerGraph {
    k: usize,
    tuples: Vec<Vec<VertexId>>,
    vertices: Vec<KmerVertex>,
    successors: Vec<Vec<KmerId>>,
    predecessors: Vec<Vec<KmerId>>,
    index: HashMap<Vec<VertexId>, KmerId>,
}

impl KmerGraph {
    fn new(k: usize) -> Self {
        Self {
            k,
            tuples: Vec::new(),
            vertices: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Look up the k-mer vertex for a given tuple, if it was lifted.
    /// Used by [`crate::attribute`] for sliding-window and
    /// extrapolated lookups; the interning map is otherwise private
    /// to the lift (C3), per the design's "hash map only as the
    /// tuple-to-index interning table" note.
    pub fn find(&self, tuple: &[VertexId]) -> Option<KmerId> {
        self.index.get(tuple).copied()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn tuple(&self, id: KmerId) -> &[VertexId] {
        &self.tuples[id.0]
    }

    pub fn vertex(&self, id: KmerId) -> &KmerVertex {
        &self.vertices[id.0]
    }

    pub fn vertex_mut(&mut self, id: KmerId) -> &mut KmerVertex {
        &mut self.vertices[id.0]
    }

    pub fn successors(&self, id: KmerId) -> &[KmerId] {
        &self.successors[id.0]
    }

    pub fn predecessors(&self, id: KmerId) -> &[KmerId] {
        &self.predecessors[id.0]
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = KmerId> + Clone {
        (0..self.vertices.len()).map(KmerId)
    }

    fn add_vertex(&mut self, tuple: Vec<VertexId>) -> KmerId {
        let id = KmerId(self.tuples.len());
        self.tuples.push(tuple);
        self.vertices.push(KmerVertex::default());
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        id
    }

    fn add_edge(&mut self, from: KmerId, to: KmerId) {
        if !self.successors[from.0].contains(&to) {
            self.successors[from.0].push(to);
            self.predecessors[to.0].push(from);
        }
    }

    /// Topological order over `K`, vertices broken by ascending
    /// [`KmerId`] for determinism. `K` is a DAG by construction
    /// (inherited from `G`), so this always succeeds.
    pub fn topological_order(&self) -> Vec<KmerId> {
        let n = self.vertices.len();
        let mut indegree: Vec<usize> = (0..n).map(|i| self.predecessors[i].len()).collect();
        let mut ready: BTreeSet<usize> = indegree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();
        let mut order = Vec::with_capacity(n);
        while let Some(&u) = ready.iter().next() {
            ready.remove(&u);
            order.push(KmerId(u));
            for &v in &self.successors[u] {
                indegree[v.0] -= 1;
                if indegree[v.0] == 0 {
                    ready.insert(v.0);
                }
            }
        }
        debug_assert_eq!(order.len(), n, "K must be a DAG");
        order
    }

    /// The unique vertex with in-degree 0, if any.
    pub fn unique_source(&self) -> Option<KmerId> {
        let mut it = self
            .vertex_ids()
            .filter(|&id| self.predecessors[id.0].is_empty());
        let first = it.next()?;
        if it.next().is_some() {
            None
        } else {
            Some(first)
        }
    }

    /// The unique vertex with out-degree 0, if any.
    pub fn unique_sink(&self) -> Option<KmerId> {
        let mut it = self
            .vertex_ids()
            .filter(|&id| self.successors[id.0].is_empty());
        let first = it.next()?;
        if it.next().is_some() {
            None
        } else {
            Some(first)
        }
    }
}

/// Enumerate all forward walks of length `k` in `g` starting at
/// `start`, via an explicit stack (not recursion) to bound memory.
fn forward_kmers_from(g: &TranscriptGraph, start: VertexId, k: usize) -> Vec<Vec<VertexId>> {
    let mut results = Vec::new();
    let mut stack: Vec<Vec<VertexId>> = vec![vec![start]];
    while let Some(path) = stack.pop() {
        if path.len() == k {
            results.push(path);
        } else {
            let tail = *path.last().unwrap();
            for &succ in g.successors(tail) {
                let mut next = path.clone();
                next.push(succ);
                stack.push(next);
            }
        }
    }
    results
}

/// Build the k-mer overlap graph `K` from the (already anchored)
/// transcript graph `G` (C3, `build_kmer_graph(G, k) -> K`).
///
/// Edges are built without an `O(|K|^2)` pairing: a map from each
/// `(k-1)`-mer to its reverse-extension and forward-extension vertex
/// sets is built in one pass, then the cross product of those sets
/// yields the edge list for that `(k-1)`-mer.
///
/// Requires `k >= 2`: with `k == 1` the `(k-1)`-mer overlap key is
/// empty for every vertex, collapsing the interning scheme and
/// producing spurious edges between unrelated vertices. The driver
/// (`assemble::clamp_params`) never selects a `k` below 2, so this is
/// a precondition rather than a runtime-checked case here.
pub fn build_kmer_graph(
    g: &TranscriptGraph,
    k: usize,
    limits: &KmerGraphLimits,
) -> Result<KmerGraph, AssembleError> {
    debug_assert!(k >= 2, "build_kmer_graph requires k >= 2");
    let mut kg = KmerGraph::new(k);
    // (k-1)-mer -> (forward-extension vertices, reverse-extension vertices)
    let mut kminus1: BTreeMap<Vec<VertexId>, (BTreeSet<VertexId>, BTreeSet<VertexId>)> =
        BTreeMap::new();

    for n in g.vertex_ids() {
        for kmer in forward_kmers_from(g, n, k) {
            if !kg.index.contains_key(&kmer) {
                if kg.len() >= limits.max_vertices {
                    return Err(AssembleError::ResourceExhausted {
                        limit: limits.max_vertices,
                        reached: kg.len(),
                    });
                }
                let id = kg.add_vertex(kmer.clone());
                kg.index.insert(kmer.clone(), id);

                let prefix = kmer[..k - 1].to_vec();
                let suffix = kmer[1..].to_vec();
                kminus1.entry(prefix).or_default().0.insert(kmer[k - 1]);
                kminus1.entry(suffix).or_default().1.insert(kmer[0]);
            }
        }
    }

    for (kminus1mer, (fwd_set, rev_set)) in &kminus1 {
        for (&rev_node, &fwd_node) in itertools::iproduct!(rev_set, fwd_set) {
            let mut from_kmer = Vec::with_capacity(k);
            from_kmer.push(rev_node);
            from_kmer.extend_from_slice(kminus1mer);
            let mut to_kmer = kminus1mer.clone();
            to_kmer.push(fwd_node);

            if let (Some(&from_id), Some(&to_id)) =
                (kg.index.get(&from_kmer), kg.index.get(&to_kmer))
            {
                kg.add_edge(from_id, to_id);
            }
        }
    }

    tracing::debug!(k, vertices = kg.len(), "built k-mer graph");
    Ok(kg)
}
