//! Error types for construction-time validation and I/O surfaces.
//!
//! Hot-path functions return plain values or booleans and never unwind;
//! everything that can fail does so at construction or export time.

/// Errors surfaced by `tick-core` constructors and exporters.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A constructor was handed a configuration it cannot honor
    /// (non-power-of-two ring capacity, alpha outside (0, 1],
    /// non-positive risk limit). Fatal at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O failure on logger open or JSON/CSV export. Never raised
    /// on the hot path.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
