//! Dummy anchoring (C2): prepend/append `k` synthetic source/sink
//! vertices so the lifted k-mer graph has a unique source and sink
//! and every source-to-sink path has length at least `k`.

use crate::graph::{Exon, TranscriptGraph, Vertex, VertexId};

/// The two dummy blocks added by [`add_dummy_start_end_nodes`], each
/// ordered from the outermost dummy to the one adjacent to real
/// vertices (i.e. `source[k-1]` fans out into `G`, `sink[0]` is fanned
/// into from `G`).
#[derive(Debug, Clone)]
pub struct DummyBlocks {
    pub source: Vec<VertexId>,
    pub sink: Vec<VertexId>,
}

/// Mutates `g` in place, adding `k` source dummies and `k` sink
/// dummies. Returns both blocks as ordered tuples.
///
/// The source block is a linear chain `s1 -> s2 -> ... -> sk`; `sk`
/// fans out to every vertex that had in-degree 0 before anchoring.
/// The sink block is symmetric: `t1 -> ... -> tk`, and every vertex
/// that had out-degree 0 before anchoring fans into `t1`.
pub fn add_dummy_start_end_nodes(g: &mut TranscriptGraph, k: usize) -> DummyBlocks {
    let start_nodes = g.sources();
    let end_nodes = g.sinks();

    // Dummy exons use strictly negative, mutually distinct coordinates
    // so they sort distinctly from real exons and from each other.
    let mut next_coord: i64 = -1;
    let mut alloc_dummy = |g: &mut TranscriptGraph| -> VertexId {
        let id = g.add_vertex(Vertex::dummy(Exon::new(next_coord, next_coord)));
        next_coord -= 1;
        id
    };

    let source: Vec<VertexId> = (0..k).map(|_| alloc_dummy(g)).collect();
    for w in source.windows(2) {
        g.add_edge(w[0], w[1]);
    }

    let sink: Vec<VertexId> = (0..k).map(|_| alloc_dummy(g)).collect();
    for w in sink.windows(2) {
        g.add_edge(w[0], w[1]);
    }

    if let Some(&last_source) = source.last() {
        for &n in &start_nodes {
            g.add_edge(last_source, n);
        }
    }
    if let Some(&first_sink) = sink.first() {
        for &n in &end_nodes {
            g.add_edge(n, first_sink);
        }
    }

    DummyBlocks { source, sink }
}
