//! Error kinds surfaced by the assembly engine.

/// Errors that can occur while assembling isoforms from a transcript graph.
///
/// Empty evidence and out-of-range parameters are not variants here:
/// an empty `partial_paths` list is promoted to `Ok(vec![])` by
/// [`crate::assemble::assemble`], and out-of-range parameters are
/// silently clamped with a `tracing::debug!` event rather than
/// rejected (see `AssembleParams::clamped`).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AssembleError {
    /// `G` is not a DAG, a partial path is not a valid walk in `G`, or a
    /// density is negative or `NaN`.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The lifted k-mer graph would exceed the configured vertex cap.
    #[error("k-mer graph would exceed resource cap of {limit} vertices (reached {reached})")]
    ResourceExhausted {
        /// Configured vertex cap.
        limit: usize,
        /// Vertex count at which the cap was hit.
        reached: usize,
    },
}
