//! Static catalog of the 40 QR versions
//!
//! Geometry (dimension, alignment pattern centers), codeword capacity and
//! the per-level error-correction block layout are all derived from the
//! version number; the only tabulated data are the per-version parity
//! count and block count from the ISO/IEC 18004 tables. Versions 7 and up
//! additionally carry an 18-bit BCH-protected version pattern in the
//! symbol, decoded here by nearest-codeword matching.

use crate::error::{Error, Result};
use crate::format::EcLevel;

/// Smallest and largest module dimensions a symbol can have.
pub(crate) const MIN_DIMENSION: usize = 21;
pub(crate) const MAX_DIMENSION: usize = 177;

/// Error-correction codewords per block, indexed `[level][version]`
/// (index 0 unused). ISO/IEC 18004 table 13.
#[rustfmt::skip]
const EC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    // L
    [0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28,
     28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
    // M
    [0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26,
     26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28],
    // Q
    [0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26,
     30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
    // H
    [0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26,
     28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
];

/// Number of error-correction blocks, indexed `[level][version]`.
#[rustfmt::skip]
const NUM_BLOCKS: [[u8; 41]; 4] = [
    // L
    [0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7,
     8, 8, 9, 9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25],
    // M
    [0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14,
     16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49],
    // Q
    [0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21,
     20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68],
    // H
    [0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25,
     25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81],
];

/// BCH(18,6) generator for the version-information pattern.
const VERSION_INFO_GENERATOR: u32 = 0x1F25;

/// Error-correction block layout for one version and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlocks {
    /// Number of Reed-Solomon blocks the codewords are split into.
    pub num_blocks: usize,
    /// Parity codewords in every block.
    pub ec_codewords_per_block: usize,
}

/// One entry of the version catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    number: u8,
    total_codewords: usize,
    alignment_centers: Vec<usize>,
}

impl Version {
    /// Look up a version by its number (1..=40).
    pub fn by_number(number: u8) -> Result<Self> {
        if !(1..=40).contains(&number) {
            return Err(Error::NotFound);
        }
        Ok(Self {
            number,
            total_codewords: raw_data_modules(number) / 8,
            alignment_centers: alignment_centers(number),
        })
    }

    /// Infer the version from a matrix dimension. For dimensions of
    /// versions 7 and up the result is provisional until confirmed against
    /// the symbol's version-information pattern.
    pub fn provisional_for_dimension(dimension: usize) -> Result<Self> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&dimension) || dimension % 4 != 1 {
            return Err(Error::NotFound);
        }
        Self::by_number(((dimension - 17) / 4) as u8)
    }

    /// Version number, 1..=40.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Modules along one side: 17 + 4 * version.
    pub fn dimension(&self) -> usize {
        17 + 4 * self.number as usize
    }

    /// Total codewords in the symbol, data and parity together.
    pub fn total_codewords(&self) -> usize {
        self.total_codewords
    }

    /// Row/column coordinates of the alignment pattern centers. Empty for
    /// version 1.
    pub fn alignment_pattern_centers(&self) -> &[usize] {
        &self.alignment_centers
    }

    /// Error-correction block layout for one level.
    pub fn ec_blocks(&self, level: EcLevel) -> EcBlocks {
        let v = self.number as usize;
        EcBlocks {
            num_blocks: NUM_BLOCKS[level.index()][v] as usize,
            ec_codewords_per_block: EC_CODEWORDS_PER_BLOCK[level.index()][v] as usize,
        }
    }

    /// Match an 18-bit version-information field against all valid
    /// codewords, tolerating up to 3 flipped bits.
    pub(crate) fn decode_version_bits(bits: u32) -> Option<Self> {
        let mut best: Option<(u32, u8)> = None;
        for number in 7..=40u8 {
            let distance = (encoded_version_bits(number) ^ bits).count_ones();
            if distance == 0 {
                return Version::by_number(number).ok();
            }
            match best {
                Some((best_distance, _)) if distance >= best_distance => {}
                _ => best = Some((distance, number)),
            }
        }
        match best {
            Some((distance, number)) if distance <= 3 => Version::by_number(number).ok(),
            _ => None,
        }
    }
}

/// Modules available for codewords once every function pattern is placed.
pub(crate) fn raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut modules = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        modules -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            modules -= 36;
        }
    }
    modules
}

/// The 18-bit version pattern: 6 data bits followed by 12 BCH parity bits.
pub(crate) fn encoded_version_bits(version: u8) -> u32 {
    let mut remainder = version as u32;
    for _ in 0..12 {
        remainder = (remainder << 1) ^ (((remainder >> 11) & 1) * VERSION_INFO_GENERATOR);
    }
    ((version as u32) << 12) | remainder
}

fn alignment_centers(version: u8) -> Vec<usize> {
    if version == 1 {
        return Vec::new();
    }
    let v = version as usize;
    let num_align = v / 7 + 2;
    let step = (v * 8 + num_align * 3 + 5) / (num_align * 4 - 4) * 2;
    let dimension = 17 + 4 * v;

    let mut centers = vec![6usize; num_align];
    let mut position = dimension - 7;
    for slot in centers.iter_mut().skip(1).rev() {
        *slot = position;
        position -= step;
    }
    centers
}
