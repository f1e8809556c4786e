use thiserror::Error;

#[derive(Error, Debug)]
pub enum HashquineError {
    /// A template image is not in the constrained GIF subset.
    #[error("template format error in {file}: {reason}")]
    TemplateFormat { file: String, reason: String },

    /// Configuration file, mask or layout problem.
    #[error("config error: {0}")]
    Config(String),

    /// The collision generator could not be run or returned nothing usable.
    #[error("collision oracle error: {0}")]
    Oracle(String),

    /// Every collision obtained for a slot was rejected.
    #[error("no usable collision for position {position} digit {digit:x} after {attempts} attempts")]
    CollisionRetriesExhausted {
        position: usize,
        digit: u8,
        attempts: u32,
    },

    /// No trailer value in the counter space produced a matching digest.
    #[error("no trailer value below {limit} gives a digest matching mask '{mask}'")]
    TrailerSearchExhausted { limit: u64, mask: String },

    /// Malformed GIF stream found by the structural walker.
    #[error("GIF structure error: {0}")]
    GifStructure(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch all for broken internal invariants.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Reasons a collision pair is discarded. These are retried by the
/// assembler and never returned to callers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRejection {
    #[error("blocks have different or unexpected lengths")]
    LengthMismatch,
    #[error("blocks are identical")]
    Identical,
    #[error("blocks do not differ at the length byte")]
    SameDiffByte,
    #[error("visible block is not smaller at the length byte")]
    Misordered,
    #[error("blocks do not produce the same digest")]
    DigestMismatch,
    #[error("glyph record does not fit between the two skip lengths")]
    Infeasible,
}
