//! zedqr - QR Code symbol decoder core
//!
//! Decodes the payload of a QR symbol from a pre-sampled module matrix:
//! format and version parsing, data-mask removal, codeword extraction,
//! Reed-Solomon error correction over GF(256), and multi-segment bitstream
//! decoding (numeric, alphanumeric, byte, Kanji, Hanzi, ECI, FNC1,
//! structured append). Mirrored symbols are detected and decoded through a
//! transposed retry.
//!
//! Image handling is out of scope: locating the symbol, correcting
//! perspective and thresholding modules happen upstream, and this crate
//! takes the resulting [`BitMatrix`].
//!
//! # Quick Start
//!
//! ```no_run
//! use zedqr::{decode, BitMatrix, DecodeConfig};
//!
//! // One bit per module, true = dark, from your grid sampler.
//! let mut modules = BitMatrix::new(21);
//! // ... fill the matrix ...
//!
//! let result = decode(&modules, &DecodeConfig::new())?;
//! println!("{} (level {})", result.text(), result.ec_level());
//! # Ok::<(), zedqr::Error>(())
//! ```

// Public modules
pub mod config;
pub mod error;

// Internal modules
pub(crate) mod bit_matrix;
pub(crate) mod bit_source;
pub(crate) mod data_block;
pub(crate) mod data_mask;
pub(crate) mod decoder;
pub(crate) mod format;
pub(crate) mod function_pattern;
pub(crate) mod galois;
pub(crate) mod parser;
pub(crate) mod reed_solomon;
pub(crate) mod segments;
pub(crate) mod text;
pub(crate) mod version;

// Re-export main types
pub use bit_matrix::BitMatrix;
pub use config::DecodeConfig;
pub use decoder::{decode, Decoded};
pub use error::{Error, Result};
pub use format::EcLevel;
pub use version::{EcBlocks, Version};

#[cfg(test)]
mod proptest_roundtrip;
