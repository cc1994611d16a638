//! Function-module map for one QR version
//!
//! Marks every module that belongs to a function pattern (finders with
//! separators, timing, alignment, format and version information, dark
//! module) so the codeword reader and the unmasker touch only data modules.

use crate::bit_matrix::BitMatrix;
use crate::version::Version;

pub(crate) struct FunctionPattern {
    mask: BitMatrix,
}

impl FunctionPattern {
    pub(crate) fn new(version: &Version) -> Self {
        let dimension = version.dimension();
        let mut mask = BitMatrix::new(dimension);

        // Finder patterns, separators, format areas and the dark module.
        set_region(&mut mask, 0, 0, 9, 9);
        set_region(&mut mask, dimension - 8, 0, 8, 9);
        set_region(&mut mask, 0, dimension - 8, 9, 8);

        // Timing patterns; the stretches inside the corner regions are
        // already marked.
        for i in 0..dimension {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        // Alignment patterns, skipping the three combinations that would
        // sit on top of finder patterns.
        let centers = version.alignment_pattern_centers();
        if !centers.is_empty() {
            let last = centers.len() - 1;
            for (yi, &cy) in centers.iter().enumerate() {
                for (xi, &cx) in centers.iter().enumerate() {
                    let on_finder = (xi == 0 && yi == 0)
                        || (xi == 0 && yi == last)
                        || (xi == last && yi == 0);
                    if !on_finder {
                        set_region(&mut mask, cx - 2, cy - 2, 5, 5);
                    }
                }
            }
        }

        // Version information blocks.
        if version.number() >= 7 {
            set_region(&mut mask, dimension - 11, 0, 3, 6);
            set_region(&mut mask, 0, dimension - 11, 6, 3);
        }

        Self { mask }
    }

    #[inline]
    pub(crate) fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    #[cfg(test)]
    pub(crate) fn data_module_count(&self) -> usize {
        let dimension = self.mask.dimension();
        let mut count = 0;
        for y in 0..dimension {
            for x in 0..dimension {
                if !self.mask.get(x, y) {
                    count += 1;
                }
            }
        }
        count
    }
}

fn set_region(mask: &mut BitMatrix, left: usize, top: usize, width: usize, height: usize) {
    for y in top..top + height {
        for x in left..left + width {
            mask.set(x, y, true);
        }
    }
}
