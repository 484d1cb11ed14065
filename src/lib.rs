//! Transcript isoform assembly engine.
//!
//! Turns one strand-specific transcript graph plus its partial-path
//! read-density evidence into a ranked list of full-length isoform
//! paths, via a k-mer graph lift, evidence attribution, bidirectional
//! density smoothing, and suboptimal path enumeration.
//!
//! Reading annotation/alignment files, building the input transcript
//! graph, strand splitting, trimming, and any CLI or output formatting
//! are out of scope: those are the job of upstream/downstream
//! collaborators.

pub mod anchor;
pub mod assemble;
pub mod attribute;
pub mod counter;
pub mod error;
pub mod graph;
pub mod kmer;
pub mod path;
pub mod path_finder;
pub mod reconstruct;
pub mod smooth;

pub use assemble::{assemble, AssembleParams};
pub use counter::TxIdAllocator;
pub use error::AssembleError;
pub use graph::{Exon, Strand, TranscriptGraph, Vertex, VertexId};
pub use kmer::{KmerGraph, KmerGraphLimits, KmerId, KmerVertex};
pub use path::{PartialPath, PathInfo};
pub use path_finder::{BottleneckPathFinder, PathFinder};
