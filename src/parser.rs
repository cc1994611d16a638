//! Reads the structured fields out of a sampled module matrix
//!
//! Three readers live here: the 15-bit format field (two copies), the
//! 18-bit version pattern of versions 7+ (two copies), and the codeword
//! stream itself, walked in the zig-zag order the standard prescribes.
//! Every read can run in mirrored mode, which swaps x and y so a transposed
//! symbol parses without copying the matrix first.

use crate::bit_matrix::BitMatrix;
use crate::error::{Error, Result};
use crate::format::FormatInformation;
use crate::function_pattern::FunctionPattern;
use crate::version::Version;

#[inline]
fn copy_bit(matrix: &BitMatrix, x: usize, y: usize, mirrored: bool, acc: u32) -> u32 {
    let bit = if mirrored {
        matrix.get(y, x)
    } else {
        matrix.get(x, y)
    };
    (acc << 1) | u32::from(bit)
}

/// Version and format information for one parsing orientation.
pub(crate) fn parse_version_info(
    matrix: &BitMatrix,
    mirrored: bool,
) -> Result<(Version, FormatInformation)> {
    let version = read_version(matrix, mirrored)?;
    let format = read_format_information(matrix, mirrored)?;
    Ok((version, format))
}

/// Infer the version from the dimension, confirmed against the version
/// pattern for versions 7 and up.
pub(crate) fn read_version(matrix: &BitMatrix, mirrored: bool) -> Result<Version> {
    let dimension = matrix.dimension();
    let provisional = Version::provisional_for_dimension(dimension)?;
    if provisional.number() <= 6 {
        return Ok(provisional);
    }

    // Top-right block: columns dimension-11..dimension-9, read bottom row
    // first, rightmost column first.
    let ij_min = dimension - 11;
    let mut bits = 0u32;
    for y in (0..6).rev() {
        for x in (ij_min..dimension - 8).rev() {
            bits = copy_bit(matrix, x, y, mirrored, bits);
        }
    }
    if let Some(version) = Version::decode_version_bits(bits) {
        if version.dimension() == dimension {
            return Ok(version);
        }
    }

    // Bottom-left block, the transpose of the first.
    let mut bits = 0u32;
    for x in (0..6).rev() {
        for y in (ij_min..dimension - 8).rev() {
            bits = copy_bit(matrix, x, y, mirrored, bits);
        }
    }
    if let Some(version) = Version::decode_version_bits(bits) {
        if version.dimension() == dimension {
            return Ok(version);
        }
    }

    Err(Error::NotFound)
}

/// Read and decode both copies of the format field.
pub(crate) fn read_format_information(
    matrix: &BitMatrix,
    mirrored: bool,
) -> Result<FormatInformation> {
    // Copy 1 wraps around the top-left finder.
    let mut raw1 = 0u32;
    for x in 0..6 {
        raw1 = copy_bit(matrix, x, 8, mirrored, raw1);
    }
    raw1 = copy_bit(matrix, 7, 8, mirrored, raw1);
    raw1 = copy_bit(matrix, 8, 8, mirrored, raw1);
    raw1 = copy_bit(matrix, 8, 7, mirrored, raw1);
    for y in (0..6).rev() {
        raw1 = copy_bit(matrix, 8, y, mirrored, raw1);
    }

    // Copy 2 is split between the other two finders.
    let dimension = matrix.dimension();
    let mut raw2 = 0u32;
    for y in (dimension - 7..dimension).rev() {
        raw2 = copy_bit(matrix, 8, y, mirrored, raw2);
    }
    for x in dimension - 8..dimension {
        raw2 = copy_bit(matrix, x, 8, mirrored, raw2);
    }

    FormatInformation::decode(raw1, raw2).ok_or(Error::Format)
}

/// Extract the codeword stream: column pairs right to left, alternating
/// upward and downward, skipping the vertical timing column and every
/// function module. Remainder bits that do not fill a codeword are dropped.
pub(crate) fn read_codewords(
    matrix: &BitMatrix,
    version: &Version,
    pattern: &FunctionPattern,
) -> Result<Vec<u8>> {
    let dimension = matrix.dimension();
    let mut codewords = Vec::with_capacity(version.total_codewords());
    let mut current: u32 = 0;
    let mut bits_read = 0;
    let mut reading_up = true;

    let mut x = dimension as isize - 1;
    while x > 0 {
        if x == 6 {
            // The vertical timing column; shift over to stay on pairs.
            x -= 1;
        }
        for counter in 0..dimension {
            let y = if reading_up {
                dimension - 1 - counter
            } else {
                counter
            };
            for col in 0..2 {
                let xx = (x as usize) - col;
                if pattern.is_function(xx, y) {
                    continue;
                }
                bits_read += 1;
                current = (current << 1) | u32::from(matrix.get(xx, y));
                if bits_read == 8 {
                    codewords.push(current as u8);
                    current = 0;
                    bits_read = 0;
                }
            }
        }
        reading_up = !reading_up;
        x -= 2;
    }

    if codewords.len() != version.total_codewords() {
        return Err(Error::Format);
    }
    Ok(codewords)
}
