//! Error types for parser configuration and parsing.

use std::fmt;

/// Parser errors.
///
/// Configuration errors leave the parser exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `parse` was called before a language was assigned.
    #[error("no language assigned to the parser")]
    NoGrammar,

    /// The language tables were compiled for an unsupported format version.
    #[error("incompatible language version {version}, expected {min}..={max}")]
    VersionMismatch { version: u32, min: u32, max: u32 },

    /// Included ranges overlap, are out of order, or end before they start.
    #[error("included range {index} is out of order or inverted")]
    InvalidRanges { index: usize },

    /// The parse stopped early. Calling `parse` again with the same input resumes it.
    #[error("parse halted: {0}")]
    Cancelled(HaltReason),
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Why a parse stopped before finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaltReason {
    Timeout,
    Flag,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout exceeded"),
            Self::Flag => f.write_str("cancellation flag set"),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
