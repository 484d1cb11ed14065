//! The assembly driver: wires C2 through C7 into
//! `assemble(G, strand, partial_paths, kmax, fraction_major_path,
//! max_paths) -> [PathInfo]`.

use crate::anchor::add_dummy_start_end_nodes;
use crate::attribute::attribute;
use crate::error::AssembleError;
use crate::graph::{Strand, TranscriptGraph, VertexId};
use crate::kmer::{build_kmer_graph, KmerGraphLimits};
use crate::path::{PartialPath, PathInfo};
use crate::path_finder::PathFinder;
use crate::smooth::smooth;

/// Caller-configured parameters for one `assemble` call.
///
/// Deliberately a plain struct, not `clap`- or `serde`-derived: no CLI
/// or config file is part of this crate's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssembleParams {
    /// Upper bound on k-mer length. Clamped to `>= 2`.
    pub kmax: usize,
    /// Lower cutoff for reported isoforms, as a fraction of the top
    /// path's density. Clamped to `[0.0, 1.0]`.
    pub fraction_major_path: f64,
    /// Hard cap on reported isoforms for this locus. Clamped to `>= 1`.
    pub max_paths: usize,
    /// Resource cap on the lifted k-mer graph's vertex count.
    pub kmer_graph_limits: KmerGraphLimits,
}

impl Default for AssembleParams {
    fn default() -> Self {
        Self {
            kmax: 2,
            fraction_major_path: 0.0,
            max_paths: 1,
            kmer_graph_limits: KmerGraphLimits::default(),
        }
    }
}

impl AssembleParams {
    /// Clamp `kmax` to `>= 2`, `fraction_major_path` to `[0.0, 1.0]`,
    /// and `max_paths` to `>= 1`. Out-of-range values are silently
    /// clamped with a diagnostic log line, not rejected as an error.
    pub fn clamped(mut self) -> Self {
        if self.kmax < 2 {
            tracing::debug!(kmax = self.kmax, "kmax clamped to 2");
            self.kmax = 2;
        }
        if !(0.0..=1.0).contains(&self.fraction_major_path) {
            let clamped = self.fraction_major_path.clamp(0.0, 1.0);
            tracing::debug!(
                requested = self.fraction_major_path,
                clamped,
                "fraction_major_path clamped into [0, 1]"
            );
            self.fraction_major_path = clamped;
        }
        if self.max_paths < 1 {
            tracing::debug!(max_paths = self.max_paths, "max_paths clamped to 1");
            self.max_paths = 1;
        }
        self
    }
}

/// Reject a partial path that is not a valid walk in `g` (consecutive
/// vertices must be joined by a `G`-edge) or that carries a negative
/// or `NaN` density.
fn validate_partial_path(g: &TranscriptGraph, pp: &PartialPath) -> Result<(), AssembleError> {
    if pp.density.is_nan() || pp.density < 0.0 {
        return Err(AssembleError::InvalidInput(format!(
            "partial path has invalid density {}",
            pp.density
        )));
    }
    if pp.is_empty() {
        return Err(AssembleError::InvalidInput(
            "partial path is empty".to_string(),
        ));
    }
    for v in &pp.walk {
        if v.0 >= g.len() {
            return Err(AssembleError::InvalidInput(format!(
                "partial path references out-of-range vertex {:?}",
                v
            )));
        }
    }
    for w in pp.walk.windows(2) {
        if !g.successors(w[0]).contains(&w[1]) {
            return Err(AssembleError::InvalidInput(format!(
                "partial path step {:?} -> {:?} is not an edge of G",
                w[0], w[1]
            )));
        }
    }
    Ok(())
}

/// Choose `k = max(2, min(kmax, L*))` where `L*` is the longest
/// partial path. Assumes `partial_paths` is non-empty and `kmax`
/// already clamped to `>= 2`.
fn choose_k(partial_paths: &[PartialPath], kmax: usize) -> usize {
    let l_star = partial_paths.iter().map(|pp| pp.len()).max().unwrap_or(0);
    kmax.min(l_star).max(2)
}

/// Run the full pipeline (C2 through C7) over `g`, returning a ranked
/// list of isoforms (C7's `PathInfo`).
///
/// `g` is mutated in place by dummy anchoring (C2) unless
/// `partial_paths` is empty, in which case this returns `Ok(vec![])`
/// immediately and leaves `g` untouched (empty evidence is promoted
/// to an empty success rather than treated as an error).
#[allow(clippy::too_many_arguments)]
pub fn assemble(
    g: &mut TranscriptGraph,
    strand: Strand,
    partial_paths: &[PartialPath],
    params: AssembleParams,
    finder: &dyn PathFinder,
    tx_ids: &crate::counter::TxIdAllocator,
) -> Result<Vec<PathInfo>, AssembleError> {
    if partial_paths.is_empty() {
        tracing::debug!("no partial-path evidence; returning empty isoform list");
        return Ok(Vec::new());
    }

    g.check_invariants()?;
    for pp in partial_paths {
        validate_partial_path(g, pp)?;
    }

    let params = params.clamped();
    let k = choose_k(partial_paths, params.kmax);
    tracing::debug!(k, vertices_before_anchor = g.len(), "assemble: chosen k");

    add_dummy_start_end_nodes(g, k);

    let mut kg = build_kmer_graph(g, k, &params.kmer_graph_limits)?;
    attribute(g, &mut kg, partial_paths, k)?;
    smooth(&mut kg);

    let found = finder.find_suboptimal_paths(&kg, params.fraction_major_path, params.max_paths);
    tracing::debug!(paths = found.len(), "assemble: path finder returned");

    let mut out = Vec::with_capacity(found.len());
    for (kmer_path, density) in found {
        let (tss_id, path) = crate::reconstruct::reconstruct(g, strand, &kmer_path, &kg);
        let tx_id = tx_ids.alloc();
        out.push(PathInfo {
            density,
            tss_id,
            tx_id,
            path,
        });
    }
    Ok(out)
}
