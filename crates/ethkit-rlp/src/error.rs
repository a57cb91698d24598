//! RLP errors

use thiserror::Error;

/// RLP decoding error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RlpError {
    /// Input is truncated, non-canonical, or otherwise not valid RLP
    #[error("malformed RLP input: {0}")]
    MalformedInput(&'static str),

    /// Well-formed item of the wrong shape for the requested interpretation
    #[error("unexpected RLP item: expected {expected}")]
    UnexpectedItem {
        /// What the caller asked for
        expected: &'static str,
    },
}
