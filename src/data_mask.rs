//! The eight data mask patterns
//!
//! A mask is XORed over the data modules at encode time to balance module
//! density; decoding applies the same predicate again to strip it. Function
//! modules are never touched, so applying a mask twice is the identity on
//! the symbol.

use crate::bit_matrix::BitMatrix;
use crate::function_pattern::FunctionPattern;

/// Whether mask pattern `mask` (0..=7) darkens the module at (`row`, `col`).
#[inline]
pub(crate) fn is_masked(mask: u8, row: usize, col: usize) -> bool {
    let (i, j) = (row, col);
    match mask {
        0 => (i + j) % 2 == 0,
        1 => i % 2 == 0,
        2 => j % 3 == 0,
        3 => (i + j) % 3 == 0,
        4 => (i / 2 + j / 3) % 2 == 0,
        5 => (i * j) % 2 + (i * j) % 3 == 0,
        6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
        7 => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        _ => unreachable!("mask index is a 3-bit field"),
    }
}

/// Toggle every data module selected by the mask predicate.
pub(crate) fn unmask(matrix: &mut BitMatrix, mask: u8, pattern: &FunctionPattern) {
    let dimension = matrix.dimension();
    for row in 0..dimension {
        for col in 0..dimension {
            if !pattern.is_function(col, row) && is_masked(mask, row, col) {
                matrix.flip(col, row);
            }
        }
    }
}
