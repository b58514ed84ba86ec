//! Error taxonomy for the strength_core decision pipeline.
//!
//! The engine never panics. Every entry point returns a `Result` whose
//! `Error` variants match the taxonomy the caller needs to decide whether
//! to surface or recover from a malformed input.

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for strength_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input: negative load, inverted rep range, unit mismatch.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Exercise id not present in the catalog and no family fallback exists.
    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    /// A progression strategy was asked to run without the history it
    /// needs (e.g. percentage-of-e1RM with `rollingE1RM == 0`). The
    /// engine recovers from this by falling back to `lastWorkingWeight`;
    /// this variant is only surfaced when no such fallback exists.
    #[error("insufficient history for strategy: {0}")]
    InsufficientHistoryForStrategy(String),

    /// Caller-supplied state violates an invariant that should be
    /// unreachable from a non-corrupted caller (e.g. negative counters).
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    /// Catalog validation error (duplicate/dangling ids, empty fields).
    #[error("catalog validation error: {0}")]
    CatalogValidation(String),

    /// TOML configuration parsing error.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML configuration serialization error (writing a `Config` back
    /// to disk). Distinct from `Config` since `toml::ser::Error` and
    /// `toml::de::Error` are unrelated types upstream.
    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Filesystem error loading or saving configuration. Only the CLI
    /// and config layers touch disk; the decision pipeline itself never
    /// performs I/O.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error. Surfaced by the CLI's history
    /// store; the decision pipeline itself never serializes anything.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
