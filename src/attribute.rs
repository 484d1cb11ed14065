//! Partial-path attribution (C4): project partial-path densities onto
//! the k-mer vertices they are consistent with, extrapolating when a
//! path is shorter than `k`.

use crate::error::AssembleError;
use crate::graph::{TranscriptGraph, VertexId};
use crate::kmer::KmerGraph;
use crate::path::PartialPath;

/// Step A: extend a path backward/forward while the edge degree at
/// its endpoint is exactly one. Lengthens paths through unambiguous
/// chains before binning, avoiding spurious over-extrapolation.
fn extend_through_unambiguous_chains(g: &TranscriptGraph, walk: &[VertexId]) -> Vec<VertexId> {
    let mut path: Vec<VertexId> = walk.to_vec();
    loop {
        let preds = g.predecessors(path[0]);
        if preds.len() == 1 {
            path.insert(0, preds[0]);
        } else {
            break;
        }
    }
    loop {
        let succs = g.successors(*path.last().unwrap());
        if succs.len() == 1 {
            path.push(succs[0]);
        } else {
            break;
        }
    }
    path
}

/// Enumerate all `length`-vertex reverse extensions of `seed` in `g`
/// (i.e. all walks of `length` vertices immediately preceding `seed`),
/// ordered from earliest to latest. `length == 0` yields a single
/// empty extension.
fn extend_reverse(g: &TranscriptGraph, seed: VertexId, length: usize) -> Vec<Vec<VertexId>> {
    if length == 0 {
        return vec![Vec::new()];
    }
    let mut results = Vec::new();
    let mut stack: Vec<Vec<VertexId>> = vec![vec![seed]];
    while let Some(path) = stack.pop() {
        if path.len() == length + 1 {
            results.push(path[..path.len() - 1].to_vec());
        } else {
            let head = path[0];
            for &pred in g.predecessors(head) {
                let mut next = Vec::with_capacity(path.len() + 1);
                next.push(pred);
                next.extend_from_slice(&path);
                stack.push(next);
            }
        }
    }
    results
}

/// Enumerate all `length`-vertex forward extensions of `seed` in `g`,
/// ordered earliest to latest. `length == 0` yields a single empty
/// extension.
fn extend_forward(g: &TranscriptGraph, seed: VertexId, length: usize) -> Vec<Vec<VertexId>> {
    if length == 0 {
        return vec![Vec::new()];
    }
    let mut results = Vec::new();
    let mut stack: Vec<Vec<VertexId>> = vec![vec![seed]];
    while let Some(path) = stack.pop() {
        if path.len() == length + 1 {
            results.push(path[1..].to_vec());
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

/// All k-mers consistent with a sub-`k` seed path: the Cartesian
/// product of reverse extensions of `seed[0]` and forward extensions
/// of `seed[-1]`, with `seed` spliced in the middle (the
/// shorter-than-`k` attribution case).
fn candidate_kmers(g: &TranscriptGraph, seed: &[VertexId], k: usize) -> Vec<Vec<VertexId>> {
    let l = k - seed.len();
    let l_rev = l.div_ceil(2);
    let l_fwd = l / 2;
    let rev_paths = extend_reverse(g, seed[0], l_rev);
    let fwd_paths = extend_forward(g, *seed.last().unwrap(), l_fwd);

    let mut kmers = Vec::with_capacity(rev_paths.len() * fwd_paths.len());
    for rp in &rev_paths {
        for fp in &fwd_paths {
            let mut kmer = Vec::with_capacity(k);
            kmer.extend_from_slice(rp);
            kmer.extend_from_slice(seed);
            kmer.extend_from_slice(fp);
            kmers.push(kmer);
        }
    }
    kmers
}

/// Attribute the density of a single (already collapsed) path `p`
/// onto `kg`: a sliding-window pass when `path.len() >= k`, and a
/// reverse/forward Cartesian-product extrapolation otherwise.
fn attribute_one(
    g: &TranscriptGraph,
    kg: &mut KmerGraph,
    path: &[VertexId],
    density: f64,
    k: usize,
) -> Result<(), AssembleError> {
    if path.len() >= k {
        let windows: Vec<&[VertexId]> = path.windows(k).collect();
        let n = windows.len();
        for (i, window) in windows.iter().enumerate() {
            let id = kg.find(window).ok_or_else(|| {
                AssembleError::InvalidInput(format!(
                    "partial path window {:?} is not a valid k-mer of the lifted graph",
                    window
                ))
            })?;
            let kv = kg.vertex_mut(id);
            kv.density += density;
            if i == 0 {
                kv.smooth_rev += density;
            }
            if i == n - 1 {
                kv.smooth_fwd += density;
            }
        }
    } else {
        let candidates = candidate_kmers(g, path, k);
        let mut ids = Vec::with_capacity(candidates.len());
        for kmer in &candidates {
            let id = kg.find(kmer).ok_or_else(|| {
                AssembleError::InvalidInput(format!(
                    "extrapolated k-mer {:?} is not present in the lifted graph",
                    kmer
                ))
            })?;
            ids.push(id);
        }
        let total: f64 = ids.iter().map(|&id| kg.vertex(id).density).sum();
        if total == 0.0 {
            let share = density / (ids.len() as f64);
            for &id in &ids {
                let kv = kg.vertex_mut(id);
                kv.density += share;
                kv.smooth_fwd += share;
                kv.smooth_rev += share;
            }
        } else {
            for &id in &ids {
                let frac = kg.vertex(id).density / total;
                let adj = frac * density;
                let kv = kg.vertex_mut(id);
                kv.density += adj;
                kv.smooth_fwd += adj;
                kv.smooth_rev += adj;
            }
        }
    }
    Ok(())
}

/// Extend, bin, and inject partial-path densities into `kg`,
/// including sub-`k` extrapolation (C4, `attribute(G, K, partial_paths, k)`).
pub fn attribute(
    g: &TranscriptGraph,
    kg: &mut KmerGraph,
    partial_paths: &[PartialPath],
    k: usize,
) -> Result<(), AssembleError> {
    // Step A: collapse linear extensions.
    let extended: Vec<(Vec<VertexId>, f64)> = partial_paths
        .iter()
        .map(|pp| {
            (
                extend_through_unambiguous_chains(g, &pp.walk),
                pp.density,
            )
        })
        .collect();

    // Step B: bin by min(len(p), k), sorted descending by density
    // within each bin (ties broken by original order for determinism).
    let mut bins: std::collections::BTreeMap<usize, Vec<(Vec<VertexId>, f64)>> =
        std::collections::BTreeMap::new();
    for (path, density) in extended {
        let bin = path.len().min(k);
        bins.entry(bin).or_default().push((path, density));
    }
    for bucket in bins.values_mut() {
        bucket.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    }

    // Step C: process bins longest to shortest, density-descending
    // within each bin.
    for (_, bucket) in bins.iter().rev() {
        for (path, density) in bucket {
            attribute_one(g, kg, path, *density, k)?;
        }
    }

    Ok(())
}
