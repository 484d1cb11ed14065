//! Path reconstruction (C7): convert a k-mer path back into an
//! exon-interval path, stripping dummies, expanding chains, and
//! merging adjacent exons.

use crate::graph::{Exon, Strand, TranscriptGraph, VertexId};
use crate::kmer::{KmerGraph, KmerId};

/// Unroll a k-mer path into the underlying `G`-vertex walk: the first
/// k-mer contributes all `k` of its vertices, every subsequent k-mer
/// contributes only its trailing vertex.
fn unroll(kg: &KmerGraph, kmer_path: &[KmerId]) -> Vec<VertexId> {
    let mut verts = Vec::new();
    if let Some((first, rest)) = kmer_path.split_first() {
        verts.extend_from_slice(kg.tuple(*first));
        for kid in rest {
            verts.push(*kg.tuple(*kid).last().expect("k-mer tuple is non-empty"));
        }
    }
    verts
}

/// Convert a k-mer path to an exon-interval path (C7,
/// `reconstruct(G, strand, kmer_path) -> exon_list`).
///
/// Returns the TSS id read from the first non-dummy vertex of the
/// dummy-stripped walk (before strand normalization, matching the
/// order of operations in the upstream assembler this engine is
/// modeled on), plus the final, adjacent-merged exon list. Both are
/// empty/`-1` for a path that strips down to no real vertices at all
/// (should not occur for a well-formed, anchored `G`).
pub fn reconstruct(
    g: &TranscriptGraph,
    strand: Strand,
    kmer_path: &[KmerId],
    kg: &KmerGraph,
) -> (i64, Vec<Exon>) {
    let verts = unroll(kg, kmer_path);
    let stripped: Vec<VertexId> = verts
        .into_iter()
        .filter(|&v| !g.vertex(v).is_dummy())
        .collect();

    let Some(&first) = stripped.first() else {
        return (-1, Vec::new());
    };
    let tss_id = g.vertex(first).tss_id;

    let mut ordered = stripped;
    if strand == Strand::Reverse {
        ordered.reverse();
    }

    let mut exons: Vec<Exon> = Vec::new();
    for v in ordered {
        exons.extend(g.vertex(v).chain.iter().copied());
    }

    (tss_id, merge_adjacent(exons))
}

/// Collapse consecutive exons where the previous `end` equals the
/// next `start` into a single spanning exon.
fn merge_adjacent(exons: Vec<Exon>) -> Vec<Exon> {
    let mut merged: Vec<Exon> = Vec::with_capacity(exons.len());
    for e in exons {
        match merged.last_mut() {
            Some(last) if last.end == e.start => {
                last.end = e.end;
            }
            _ => merged.push(e),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Vertex;
    use crate::kmer::{build_kmer_graph, KmerGraphLimits};

    #[test]
    fn strips_dummies_and_merges_adjacent_exons() {
        let mut g = TranscriptGraph::new();
        let a = g.add_vertex(Vertex::real(Exon::new(0, 100), 100, 10.0, 0));
        let b = g.add_vertex(Vertex::real(Exon::new(100, 200), 100, 10.0, -1));
        let c = g.add_vertex(Vertex::real(Exon::new(200, 300), 100, 10.0, -1));
        g.add_edge(a, b);
        g.add_edge(b, c);
        let k = 3;
        let blocks = crate::anchor::add_dummy_start_end_nodes(&mut g, k);
        let _ = &blocks;
        let kg = build_kmer_graph(&g, k, &KmerGraphLimits::default()).unwrap();

        let source = kg.unique_source().unwrap();
        let sink = kg.unique_sink().unwrap();
        let finder = crate::path_finder::BottleneckPathFinder::new();
        use crate::path_finder::PathFinder;
        let paths = finder.find_suboptimal_paths(&kg, 0.0, 1);
        let (path, _density) = &paths[0];
        assert_eq!(*path.first().unwrap(), source);
        assert_eq!(*path.last().unwrap(), sink);

        let (tss_id, exons) = reconstruct(&g, Strand::Forward, path, &kg);
        assert_eq!(tss_id, 0);
        assert_eq!(exons, vec![Exon::new(0, 300)]);
    }

    #[test]
    fn expands_chains() {
        let mut g = TranscriptGraph::new();
        let mut collapsed = Vertex::real(Exon::new(0, 300), 300, 10.0, 0);
        collapsed.chain = vec![Exon::new(0, 100), Exon::new(150, 300)];
        let a = g.add_vertex(collapsed);
        let b = g.add_vertex(Vertex::real(Exon::new(300, 400), 100, 10.0, -1));
        g.add_edge(a, b);
        let k = 2;
        add_dummies_for_test(&mut g, k);
        let kg = build_kmer_graph(&g, k, &KmerGraphLimits::default()).unwrap();
        use crate::path_finder::PathFinder;
        let finder = crate::path_finder::BottleneckPathFinder::new();
        let paths = finder.find_suboptimal_paths(&kg, 0.0, 1);
        let (path, _) = &paths[0];
        let (_tss, exons) = reconstruct(&g, Strand::Forward, path, &kg);
        assert_eq!(exons, vec![Exon::new(0, 100), Exon::new(150, 400)]);
    }

    fn add_dummies_for_test(g: &mut TranscriptGraph, k: usize) {
        crate::anchor::add_dummy_start_end_nodes(g, k);
    }
}
