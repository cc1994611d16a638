//! Error types and result handling
//!
//! This module provides the error types used throughout the library:
//! - [`Error`] - The main error type
//! - [`Result`] - Type alias for `Result<T, Error>`
//!
//! Every fallible decoding operation returns [`Result`]; the variants map
//! onto the three failure classes a symbol decode can hit.

use std::fmt;

/// Decoding failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The symbol's structure is violated: bad mode bits, a character count
    /// that overruns the bitstream, an invalid ECI prefix, or an impossible
    /// value inside a segment.
    Format,
    /// Reed-Solomon correction failed for a data block, i.e. the block holds
    /// more errors than its error-correction codewords can repair.
    Checksum,
    /// No QR version could be inferred from the matrix dimension or the
    /// version-information pattern.
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => write!(f, "format violation in symbol data"),
            Self::Checksum => write!(f, "error correction capacity exceeded"),
            Self::NotFound => write!(f, "no valid QR version detected"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
