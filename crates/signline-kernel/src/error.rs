//! Error types for binding construction.
//!
//! Reads and writes never fail; everything here is raised while a binding is
//! being built or configured.

use crate::property::ChangeMode;

/// Errors raised when a sign text binding cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum SignLineError {
    /// The change mode has no meaning for sign lines.
    #[error("unsupported change mode for sign lines: {mode}")]
    UnsupportedChange { mode: ChangeMode },

    /// A timing hint was attached where no transient view can exist.
    #[error("timing hint not applicable: {reason}")]
    TimingNotApplicable { reason: String },

    /// An ordinal line literal outside first..fourth.
    #[error("ordinal line {0} is outside 1..=4")]
    InvalidOrdinal(i64),

    /// The binding configuration could not be parsed or is inconsistent.
    #[error("invalid binding config: {0}")]
    Config(String),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
