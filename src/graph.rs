//! Graph primitives: the transcript DAG `G`.
//!
//! Vertices are stored in a flat `Vec` and referenced by [`VertexId`]
//! handles; adjacency is kept as index-keyed successor/predecessor
//! arrays rather than a hash map, per the memory discipline in the
//! design notes.

use std::fmt;

/// A half-open interval `[start, end)` on a linear coordinate axis.
///
/// Dummy exons (introduced by anchoring, see [`crate::anchor`]) use
/// `start < 0` so they sort distinctly from real exons and can be
/// identified and stripped during reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Exon {
    pub start: i64,
    pub end: i64,
}

impl Exon {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Whether this exon is a dummy (anchor) exon.
    pub fn is_dummy(&self) -> bool {
        self.start < 0
    }
}

impl fmt::Display for Exon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Strand of a transcript graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// Opaque handle into [`TranscriptGraph`]'s vertex arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

/// A vertex of the transcript graph `G`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The exonic interval this vertex represents.
    pub exon: Exon,
    /// Length in bases; `0` for dummy (anchor) vertices.
    pub length: u32,
    /// Non-negative read coverage density per unit length.
    pub density: f64,
    /// Transcription-start-site identifier; only meaningful for
    /// in-degree-0 (TSS candidate) vertices.
    pub tss_id: i64,
    /// Child exons collapsed into this vertex by upstream
    /// pre-processing (possibly just `[self]`).
    pub chain: Vec<Exon>,
}

impl Vertex {
    /// A non-dummy vertex with a one-element chain of itself.
    pub fn real(exon: Exon, length: u32, density: f64, tss_id: i64) -> Self {
        Self {
            exon,
            length,
            density,
            tss_id,
            chain: vec![exon],
        }
    }

    /// A zero-length, zero-density dummy (anchor) vertex.
    pub fn dummy(exon: Exon) -> Self {
        debug_assert!(exon.is_dummy());
        Self {
            exon,
            length: 0,
            density: 0.0,
            tss_id: -1,
            chain: vec![exon],
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.exon.is_dummy()
    }
}

/// The transcript DAG `G`: exonic vertices with splice/adjacency edges.
#[derive(Debug, Clone, Default)]
pub struct TranscriptGraph {
    vertices: Vec<Vertex>,
    successors: Vec<Vec<VertexId>>,
    predecessors: Vec<Vec<VertexId>>,
}

impl TranscriptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its handle.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(vertex);
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        id
    }

    /// Add a directed edge `from -> to`. Idempotent: adding the same
    /// edge twice is a no-op.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) {
        if !self.successors[from.0].contains(&to) {
            self.successors[from.0].push(to);
            self.predecessors[to.0].push(from);
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0]
    }

    pub fn successors(&self, id: VertexId) -> &[VertexId] {
        &self.successors[id.0]
    }

    pub fn predecessors(&self, id: VertexId) -> &[VertexId] {
        &self.predecessors[id.0]
    }

    pub fn in_degree(&self, id: VertexId) -> usize {
        self.predecessors[id.0].len()
    }

    pub fn out_degree(&self, id: VertexId) -> usize {
        self.successors[id.0].len()
    }

    /// All vertex ids in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + Clone {
        (0..self.vertices.len()).map(VertexId)
    }

    /// Vertices with in-degree 0, in insertion order.
    pub fn sources(&self) -> Vec<VertexId> {
        self.vertex_ids()
            .filter(|&id| self.in_degree(id) == 0)
            .collect()
    }

    /// Vertices with out-degree 0, in insertion order.
    pub fn sinks(&self) -> Vec<VertexId> {
        self.vertex_ids()
            .filter(|&id| self.out_degree(id) == 0)
            .collect()
    }

    /// Validate the structural invariants of `G`: no cycles,
    /// non-negative lengths/densities on real vertices, no `NaN`
    /// densities anywhere.
    pub fn check_invariants(&self) -> Result<(), crate::error::AssembleError> {
        for id in self.vertex_ids() {
            let v = self.vertex(id);
            if v.density.is_nan() || v.density < 0.0 {
                return Err(crate::error::AssembleError::InvalidInput(format!(
                    "vertex {:?} has invalid density {}",
                    id, v.density
                )));
            }
            if !v.is_dummy() && v.length == 0 {
                return Err(crate::error::AssembleError::InvalidInput(format!(
                    "non-dummy vertex {:?} has length 0",
                    id
                )));
            }
        }
        if self.has_cycle() {
            return Err(crate::error::AssembleError::InvalidInput(
                "graph is not a DAG".to_string(),
            ));
        }
        Ok(())
    }

    /// Kahn's algorithm cycle check; also used to derive topological
    /// order elsewhere (e.g. [`crate::smooth`]).
    fn has_cycle(&self) -> bool {
        self.topological_order().is_none()
    }

    /// A topological order over all vertices, or `None` if a cycle is
    /// present. Ties are broken by ascending [`VertexId`] (insertion
    /// order) to keep iteration deterministic, per the design's
    /// floating-point determinism requirement.
    pub fn topological_order(&self) -> Option<Vec<VertexId>> {
        let n = self.vertices.len();
        let mut indegree: Vec<usize> = (0..n).map(|i| self.predecessors[i].len()).collect();
        let mut ready: std::collections::BTreeSet<usize> = indegree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();
        let mut order = Vec::with_capacity(n);
        while let Some(&u) = ready.iter().next() {
            ready.remove(&u);
            order.push(VertexId(u));
            for &v in &self.successors[u] {
                indegree[v.0] -= 1;
                if indegree[v.0] == 0 {
                    ready.insert(v.0);
                }
            }
        }
        if order.len() == n {
            Some(order)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_graph() -> TranscriptGraph {
        let mut g = TranscriptGraph::new();
        let a = g.add_vertex(Vertex::real(Exon::new(0, 100), 100, 10.0, 0));
        let b = g.add_vertex(Vertex::real(Exon::new(100, 200), 100, 10.0, -1));
        let c = g.add_vertex(Vertex::real(Exon::new(200, 300), 100, 10.0, -1));
        g.add_edge(a, b);
        g.add_edge(b, c);
        g
    }

    #[test]
    fn sources_and_sinks() {
        let g = linear_graph();
        assert_eq!(g.sources(), vec![VertexId(0)]);
        assert_eq!(g.sinks(), vec![VertexId(2)]);
    }

    #[test]
    fn topological_order_is_deterministic() {
        let g = linear_graph();
        assert_eq!(
            g.topological_order().unwrap(),
            vec![VertexId(0), VertexId(1), VertexId(2)]
        );
    }

    #[test]
    fn check_invariants_accepts_dag() {
        let g = linear_graph();
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn check_invariants_rejects_cycle() {
        let mut g = linear_graph();
        g.add_edge(VertexId(2), VertexId(0));
        assert!(g.check_invariants().is_err());
    }

    #[test]
    fn check_invariants_rejects_negative_density() {
        let mut g = TranscriptGraph::new();
        g.add_vertex(Vertex::real(Exon::new(0, 100), 100, -1.0, 0));
        assert!(g.check_invariants().is_err());
    }

    #[test]
    fn check_invariants_rejects_nan_density() {
        let mut g = TranscriptGraph::new();
        g.add_vertex(Vertex::real(Exon::new(0, 100), 100, f64::NAN, 0));
        assert!(g.check_invariants().is_err());
    }
}
