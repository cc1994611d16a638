//! Decode orchestration
//!
//! Ties the pipeline together: parse version and format information,
//! strip the data mask, read and de-interleave the codewords, correct each
//! block, and decode the bitstream. When the straight pass fails, the same
//! pipeline runs once more against the transposed matrix; symbols scanned
//! through the back of a transparent surface decode that way.

use crate::bit_matrix::BitMatrix;
use crate::config::DecodeConfig;
use crate::data_block;
use crate::data_mask;
use crate::error::Result;
use crate::format::{EcLevel, FormatInformation};
use crate::function_pattern::FunctionPattern;
use crate::parser;
use crate::reed_solomon;
use crate::segments;
use crate::version::Version;

/// The payload and metadata recovered from one symbol.
#[derive(Debug, Clone)]
pub struct Decoded {
    raw_bytes: Vec<u8>,
    text: String,
    byte_segments: Vec<Vec<u8>>,
    ec_level: EcLevel,
    structured_append: Option<(u8, u8)>,
    mirrored: bool,
}

impl Decoded {
    /// The decoded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The corrected data codewords, before segment decoding.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Raw content of every byte-mode segment, in stream order.
    pub fn byte_segments(&self) -> &[Vec<u8>] {
        &self.byte_segments
    }

    /// Error-correction level the symbol was encoded at.
    pub fn ec_level(&self) -> EcLevel {
        self.ec_level
    }

    /// Structured-append sequence indicator, or -1 when the symbol carries
    /// no structured-append header. When several headers occur in one
    /// stream, the last one read is reported.
    pub fn structured_append_sequence(&self) -> i32 {
        self.structured_append
            .map_or(-1, |(sequence, _)| i32::from(sequence))
    }

    /// Structured-append parity byte, or -1 when absent.
    pub fn structured_append_parity(&self) -> i32 {
        self.structured_append.map_or(-1, |(_, parity)| i32::from(parity))
    }

    /// Whether the symbol only decoded after transposition.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Consume the result, keeping only the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Decode one symbol from its sampled module matrix.
///
/// The straight orientation is tried first. If it fails and the mirrored
/// orientation yields valid version and format information, the matrix is
/// transposed and decoded again; a success there is reported with
/// [`Decoded::is_mirrored`] set and the straight-pass error discarded.
pub fn decode(matrix: &BitMatrix, config: &DecodeConfig) -> Result<Decoded> {
    let mut bits = matrix.clone();

    if let Ok((version, format)) = parser::parse_version_info(&bits, false) {
        let pattern = FunctionPattern::new(&version);
        data_mask::unmask(&mut bits, format.data_mask, &pattern);
        match do_decode(&bits, &version, &format, config) {
            Ok(result) => return Ok(result),
            Err(_) => {
                // Revert for the mirrored attempt.
                data_mask::unmask(&mut bits, format.data_mask, &pattern);
            }
        }
    }

    let (version, format) = parser::parse_version_info(&bits, true)?;
    // Valid version and format information in the mirrored orientation is a
    // strong sign the symbol really is transposed; commit to it.
    bits.mirror();
    let pattern = FunctionPattern::new(&version);
    data_mask::unmask(&mut bits, format.data_mask, &pattern);
    let mut result = do_decode(&bits, &version, &format, config)?;
    result.mirrored = true;
    Ok(result)
}

fn do_decode(
    bits: &BitMatrix,
    version: &Version,
    format: &FormatInformation,
    config: &DecodeConfig,
) -> Result<Decoded> {
    let pattern = FunctionPattern::new(version);
    let codewords = parser::read_codewords(bits, version, &pattern)?;
    let blocks = data_block::into_blocks(&codewords, version, format.ec_level)?;
    let ec_per_block = version.ec_blocks(format.ec_level).ec_codewords_per_block;

    let total_data: usize = blocks.iter().map(|b| b.num_data_codewords).sum();
    let mut data = Vec::with_capacity(total_data);
    for mut block in blocks {
        reed_solomon::correct_errors(&mut block.codewords, ec_per_block)?;
        data.extend_from_slice(&block.codewords[..block.num_data_codewords]);
    }

    let stream = segments::decode_bitstream(&data, version, config)?;
    Ok(Decoded {
        raw_bytes: data,
        text: stream.text,
        byte_segments: stream.byte_segments,
        ec_level: format.ec_level,
        structured_append: stream.structured_append,
        mirrored: false,
    })
}
