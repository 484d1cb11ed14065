//! Partial-path evidence and reconstructed path output types.

use crate::graph::{Exon, VertexId};

/// An observed walk in `G` with a density weight.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialPath {
    pub walk: Vec<VertexId>,
    pub density: f64,
}

impl PartialPath {
    pub fn new(walk: Vec<VertexId>, density: f64) -> Self {
        Self { walk, density }
    }

    pub fn len(&self) -> usize {
        self.walk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walk.is_empty()
    }
}

/// One enumerated isoform, ready for downstream consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct PathInfo {
    pub density: f64,
    pub tss_id: i64,
    pub tx_id: u64,
    pub path: Vec<Exon>,
}
