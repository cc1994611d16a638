//! De-interleaving of the raw codeword stream into error-correction blocks
//!
//! The encoder splits data codewords into blocks (shorter blocks first),
//! pads each with its parity, and interleaves everything codeword by
//! codeword. This module runs that shuffle backwards: each returned block
//! holds its data codewords followed by its parity tail, ready for
//! Reed-Solomon correction.

use crate::error::{Error, Result};
use crate::format::EcLevel;
use crate::version::Version;

/// One Reed-Solomon block: data codewords followed by parity.
#[derive(Debug)]
pub(crate) struct DataBlock {
    pub(crate) num_data_codewords: usize,
    pub(crate) codewords: Vec<u8>,
}

/// Split the interleaved codeword stream into blocks in canonical order.
pub(crate) fn into_blocks(
    raw_codewords: &[u8],
    version: &Version,
    ec_level: EcLevel,
) -> Result<Vec<DataBlock>> {
    if raw_codewords.len() != version.total_codewords() {
        return Err(Error::Format);
    }

    let layout = version.ec_blocks(ec_level);
    let num_blocks = layout.num_blocks;
    let ec_per_block = layout.ec_codewords_per_block;
    let total_data = version.total_codewords() - num_blocks * ec_per_block;

    // Shorter blocks come first; the trailing blocks carry one extra data
    // codeword when the split is uneven.
    let short_data_len = total_data / num_blocks;
    let num_long_blocks = total_data % num_blocks;

    let mut blocks: Vec<DataBlock> = (0..num_blocks)
        .map(|i| {
            let data_len = if i < num_blocks - num_long_blocks {
                short_data_len
            } else {
                short_data_len + 1
            };
            DataBlock {
                num_data_codewords: data_len,
                codewords: Vec::with_capacity(data_len + ec_per_block),
            }
        })
        .collect();

    let mut cursor = raw_codewords.iter();

    // Data codewords round-robin; short blocks sit out the final round.
    for round in 0..short_data_len + 1 {
        for block in &mut blocks {
            if round < block.num_data_codewords {
                let &codeword = cursor.next().ok_or(Error::Format)?;
                block.codewords.push(codeword);
            }
        }
    }

    // Parity codewords round-robin across every block.
    for _ in 0..ec_per_block {
        for block in &mut blocks {
            let &codeword = cursor.next().ok_or(Error::Format)?;
            block.codewords.push(codeword);
        }
    }

    if cursor.next().is_some() {
        return Err(Error::Format);
    }
    Ok(blocks)
}
