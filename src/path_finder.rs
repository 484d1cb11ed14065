//! Path finder (C6): an external-collaborator contract, not a pinned
//! algorithm. The crate ships one concrete implementation,
//! [`BottleneckPathFinder`], which resolves the open question on path
//! aggregation in favor of bottleneck density.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::kmer::{KmerGraph, KmerId};

/// Enumerates up to `max_paths` source-to-sink paths in `K`, subject
/// to a fractional cutoff relative to the top path. Implementations
/// must guarantee:
///
/// 1. The first returned path has the highest density among all
///    source-to-sink paths for a well-defined, monotone aggregation.
/// 2. Every subsequent path's density is `>= fraction_major_path *`
///    the first path's density.
/// 3. Paths are emitted in non-increasing density order.
/// 4. No path is emitted twice.
///
/// Callers (see [`crate::assemble`]) are responsible for clamping
/// `fraction_major_path` into `[0.0, 1.0]` and treating `kmax < 2` as
/// `2` before reaching this contract; implementations may additionally
/// clamp defensively.
pub trait PathFinder {
    fn find_suboptimal_paths(
        &self,
        kg: &KmerGraph,
        fraction_major_path: f64,
        max_paths: usize,
    ) -> Vec<(Vec<KmerId>, f64)>;
}

/// Best-first search over source-to-sink paths, scoring each path by
/// the **minimum vertex density along it** (bottleneck aggregation).
///
/// The search is admissible: for every partial path ending at vertex
/// `v` with running bottleneck `m`, `min(m, best_suffix(v))` is an
/// exact (not merely approximate) upper bound on the best completion
/// reachable from `v`, where `best_suffix(v)` is the best achievable
/// bottleneck from `v` to the sink (computed once via a reverse
/// topological pass). Expanding a max-heap ordered by that bound
/// therefore yields completed paths in true non-increasing density
/// order, matching the path-finder contract exactly rather than
/// approximately.
#[derive(Debug, Clone, Copy)]
pub struct BottleneckPathFinder {
    /// Safety bound on the number of search-heap pops, guarding
    /// against pathological branching factors. Not part of the
    /// public contract; raise it if legitimate graphs are truncated.
    pub max_expansions: usize,
}

impl BottleneckPathFinder {
    pub fn new() -> Self {
        Self {
            max_expansions: 500_000,
        }
    }
}

impl Default for BottleneckPathFinder {
    /// Delegates to [`BottleneckPathFinder::new`] so that
    /// `BottleneckPathFinder::default()` carries the same expansion
    /// budget as `new()`, rather than a derived all-zero struct that
    /// would make the very first heap pop exceed `max_expansions` and
    /// return no paths for every input.
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct HeapEntry {
    bound: f64,
    running_min: f64,
    path: Vec<KmerId>,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.bound == other.bound
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bound
            .partial_cmp(&other.bound)
            .unwrap_or(Ordering::Equal)
    }
}

/// For every vertex, the best bottleneck density achievable by a path
/// from that vertex to `sink`, or `None` if `sink` is unreachable.
fn best_suffix_to_sink(kg: &KmerGraph, sink: KmerId) -> Vec<Option<f64>> {
    let order = kg.topological_order();
    let mut best: Vec<Option<f64>> = vec![None; kg.len()];
    for &v in order.iter().rev() {
        if v == sink {
            best[v.0] = Some(kg.vertex(v).density);
            continue;
        }
        let mut acc: Option<f64> = None;
        for &w in kg.successors(v) {
            if let Some(bw) = best[w.0] {
                let candidate = kg.vertex(v).density.min(bw);
                acc = Some(acc.map_or(candidate, |cur: f64| cur.max(candidate)));
            }
        }
        best[v.0] = acc;
    }
    best
}

impl PathFinder for BottleneckPathFinder {
    fn find_suboptimal_paths(
        &self,
        kg: &KmerGraph,
        fraction_major_path: f64,
        max_paths: usize,
    ) -> Vec<(Vec<KmerId>, f64)> {
        let fraction_major_path = fraction_major_path.clamp(0.0, 1.0);
        let max_paths = max_paths.max(1);

        let (Some(source), Some(sink)) = (kg.unique_source(), kg.unique_sink()) else {
            return Vec::new();
        };

        let best_suffix = best_suffix_to_sink(kg, sink);
        let Some(source_best) = best_suffix[source.0] else {
            // sink unreachable from source: disconnected K.
            return Vec::new();
        };

        let mut heap = BinaryHeap::new();
        let source_density = kg.vertex(source).density;
        heap.push(HeapEntry {
            bound: source_density.min(source_best),
            running_min: source_density,
            path: vec![source],
        });

        let mut results = Vec::new();
        let mut first_density: Option<f64> = None;
        let mut expansions = 0usize;

        while let Some(entry) = heap.pop() {
            expansions += 1;
            if expansions > self.max_expansions {
                tracing::warn!(
                    expansions,
                    "path finder hit its expansion safety cap before exhausting the search"
                );
                break;
            }
            if let Some(fd) = first_density {
                if entry.bound < fraction_major_path * fd {
                    // Heap pops in non-increasing bound order, so every
                    // remaining entry also falls below the cutoff.
                    break;
                }
            }

            let v = *entry.path.last().expect("path is never empty");
            if v == sink {
                if first_density.is_none() {
                    first_density = Some(entry.running_min);
                }
                results.push((entry.path, entry.running_min));
                if results.len() >= max_paths {
                    break;
                }
                continue;
            }

            for &w in kg.successors(v) {
                if let Some(bw) = best_suffix[w.0] {
                    let running_min = entry.running_min.min(kg.vertex(w).density);
                    let mut path = entry.path.clone();
                    path.push(w);
                    heap.push(HeapEntry {
                        bound: running_min.min(bw),
                        running_min,
                        path,
                    });
                }
            }
        }

        tracing::debug!(paths = results.len(), "path finder done");
        results
    }
}
