//! Bitstream segment decoding
//!
//! The corrected data codewords form a sequence of segments, each opened by
//! a 4-bit mode indicator. This module walks the modes until a terminator
//! (or bit exhaustion) and accumulates the decoded text, the raw bytes of
//! every byte-mode segment, and the structured-append metadata.
//!
//! See ISO/IEC 18004 6.4.3 - 6.4.7 for the segment formats, and
//! GB/T 18284-2000 for the Hanzi extension.

use encoding_rs::{Encoding, GB18030, SHIFT_JIS};

use crate::bit_source::BitSource;
use crate::config::DecodeConfig;
use crate::error::{Error, Result};
use crate::text;
use crate::version::Version;

/// ISO 18004:2006 6.4.4 table 5: the alphanumeric-mode character set.
const ALPHANUMERIC_CHARS: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Subset indicator opening a GB2312 Hanzi segment.
const GB2312_SUBSET: u32 = 1;

/// Segment mode indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Terminator,
    Numeric,
    Alphanumeric,
    StructuredAppend,
    Byte,
    Fnc1FirstPosition,
    Fnc1SecondPosition,
    Eci,
    Kanji,
    Hanzi,
}

impl Mode {
    fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            0x0 => Ok(Self::Terminator),
            0x1 => Ok(Self::Numeric),
            0x2 => Ok(Self::Alphanumeric),
            0x3 => Ok(Self::StructuredAppend),
            0x4 => Ok(Self::Byte),
            0x5 => Ok(Self::Fnc1FirstPosition),
            0x7 => Ok(Self::Eci),
            0x8 => Ok(Self::Kanji),
            0x9 => Ok(Self::Fnc1SecondPosition),
            0xD => Ok(Self::Hanzi),
            _ => Err(Error::Format),
        }
    }

    /// Width of the character count field, by version bucket.
    fn character_count_bits(self, version: &Version) -> usize {
        let bucket = match version.number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        let widths: [usize; 3] = match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
            Self::Kanji | Self::Hanzi => [8, 10, 12],
            _ => [0, 0, 0],
        };
        widths[bucket]
    }
}

/// Everything the segment walk produces.
pub(crate) struct DecodedStream {
    pub(crate) text: String,
    pub(crate) byte_segments: Vec<Vec<u8>>,
    pub(crate) structured_append: Option<(u8, u8)>,
}

/// Decode the concatenated data codewords of one symbol.
pub(crate) fn decode_bitstream(
    bytes: &[u8],
    version: &Version,
    config: &DecodeConfig,
) -> Result<DecodedStream> {
    let mut bits = BitSource::new(bytes);
    let mut result = String::new();
    let mut byte_segments: Vec<Vec<u8>> = Vec::new();
    // Multiple structured-append headers are not defined by the standard;
    // the last one read wins.
    let mut structured_append: Option<(u8, u8)> = None;
    let mut current_charset: Option<&'static Encoding> = None;
    let mut fnc1_in_effect = false;

    loop {
        let mode = if bits.available() < 4 {
            // Truncated stream: treat as an implicit terminator.
            Mode::Terminator
        } else {
            Mode::from_bits(bits.read_bits(4)?)?
        };

        match mode {
            Mode::Terminator => break,
            Mode::Fnc1FirstPosition => {
                fnc1_in_effect = true;
            }
            Mode::Fnc1SecondPosition => {
                fnc1_in_effect = true;
                // The application indicator is not represented in the
                // result model; consume it.
                bits.read_bits(8)?;
            }
            Mode::StructuredAppend => {
                if bits.available() < 16 {
                    return Err(Error::Format);
                }
                let sequence = bits.read_bits(8)? as u8;
                let parity = bits.read_bits(8)? as u8;
                structured_append = Some((sequence, parity));
            }
            Mode::Eci => {
                let value = parse_eci_value(&mut bits)?;
                current_charset = Some(text::charset_for_eci(value).ok_or(Error::Format)?);
            }
            Mode::Hanzi => {
                let subset = bits.read_bits(4)?;
                let count = bits.read_bits(Mode::Hanzi.character_count_bits(version))?;
                if subset == GB2312_SUBSET {
                    decode_hanzi_segment(&mut bits, count as usize, &mut result)?;
                }
            }
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte | Mode::Kanji => {
                let count = bits.read_bits(mode.character_count_bits(version))? as usize;
                match mode {
                    Mode::Numeric => decode_numeric_segment(&mut bits, count, &mut result)?,
                    Mode::Alphanumeric => decode_alphanumeric_segment(
                        &mut bits,
                        count,
                        fnc1_in_effect,
                        &mut result,
                    )?,
                    Mode::Byte => decode_byte_segment(
                        &mut bits,
                        count,
                        current_charset,
                        config,
                        &mut result,
                        &mut byte_segments,
                    )?,
                    Mode::Kanji => decode_kanji_segment(&mut bits, count, &mut result)?,
                    _ => unreachable!(),
                }
            }
        }
    }

    Ok(DecodedStream {
        text: result,
        byte_segments,
        structured_append,
    })
}

fn to_alphanumeric_char(value: u32) -> Result<char> {
    ALPHANUMERIC_CHARS
        .get(value as usize)
        .map(|&b| b as char)
        .ok_or(Error::Format)
}

/// Three digits per 10 bits, with 7- and 4-bit tails for the remainder.
fn decode_numeric_segment(bits: &mut BitSource, mut count: usize, result: &mut String) -> Result<()> {
    while count >= 3 {
        if bits.available() < 10 {
            return Err(Error::Format);
        }
        let three_digits = bits.read_bits(10)?;
        if three_digits >= 1000 {
            return Err(Error::Format);
        }
        result.push(to_alphanumeric_char(three_digits / 100)?);
        result.push(to_alphanumeric_char((three_digits / 10) % 10)?);
        result.push(to_alphanumeric_char(three_digits % 10)?);
        count -= 3;
    }
    if count == 2 {
        if bits.available() < 7 {
            return Err(Error::Format);
        }
        let two_digits = bits.read_bits(7)?;
        if two_digits >= 100 {
            return Err(Error::Format);
        }
        result.push(to_alphanumeric_char(two_digits / 10)?);
        result.push(to_alphanumeric_char(two_digits % 10)?);
    } else if count == 1 {
        if bits.available() < 4 {
            return Err(Error::Format);
        }
        let digit = bits.read_bits(4)?;
        if digit >= 10 {
            return Err(Error::Format);
        }
        result.push(to_alphanumeric_char(digit)?);
    }
    Ok(())
}

/// Two characters per 11 bits, one trailing character in 6.
fn decode_alphanumeric_segment(
    bits: &mut BitSource,
    mut count: usize,
    fnc1_in_effect: bool,
    result: &mut String,
) -> Result<()> {
    let mut buffer = String::new();
    while count > 1 {
        if bits.available() < 11 {
            return Err(Error::Format);
        }
        let pair = bits.read_bits(11)?;
        buffer.push(to_alphanumeric_char(pair / 45)?);
        buffer.push(to_alphanumeric_char(pair % 45)?);
        count -= 2;
    }
    if count == 1 {
        if bits.available() < 6 {
            return Err(Error::Format);
        }
        buffer.push(to_alphanumeric_char(bits.read_bits(6)?)?);
    }

    // See 6.4.8.1, 6.4.8.2: under FNC1, "%%" collapses to "%" and a lone
    // "%" becomes the GS separator.
    if fnc1_in_effect {
        let mut rewritten = String::with_capacity(buffer.len());
        let mut chars = buffer.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '%' {
                if chars.peek() == Some(&'%') {
                    chars.next();
                    rewritten.push('%');
                } else {
                    rewritten.push('\u{1D}');
                }
            } else {
                rewritten.push(c);
            }
        }
        result.push_str(&rewritten);
    } else {
        result.push_str(&buffer);
    }
    Ok(())
}

/// Raw bytes, decoded in the active charset and also kept verbatim.
fn decode_byte_segment(
    bits: &mut BitSource,
    count: usize,
    current_charset: Option<&'static Encoding>,
    config: &DecodeConfig,
    result: &mut String,
    byte_segments: &mut Vec<Vec<u8>>,
) -> Result<()> {
    if count * 8 > bits.available() {
        return Err(Error::Format);
    }
    let mut read_bytes = Vec::with_capacity(count);
    for _ in 0..count {
        read_bytes.push(bits.read_bits(8)? as u8);
    }

    // ISO 18004 6.4.5 leaves unmarked byte segments' encoding open; prefer
    // an ECI designator, then the caller's hint, then classification.
    let charset = match current_charset {
        Some(charset) => charset,
        None => config
            .charset_hint_label()
            .and_then(text::charset_for_label)
            .unwrap_or_else(|| text::guess_encoding(&read_bytes)),
    };

    text::append(result, &read_bytes, charset)?;
    byte_segments.push(read_bytes);
    Ok(())
}

/// 13 bits per character, re-spread into a Shift_JIS double byte.
fn decode_kanji_segment(bits: &mut BitSource, count: usize, result: &mut String) -> Result<()> {
    if count * 13 > bits.available() {
        return Err(Error::Format);
    }
    let mut buffer = Vec::with_capacity(2 * count);
    for _ in 0..count {
        let two_bytes = bits.read_bits(13)?;
        let mut assembled = ((two_bytes / 0x0C0) << 8) | (two_bytes % 0x0C0);
        if assembled < 0x01F00 {
            // In the 0x8140 to 0x9FFC range.
            assembled += 0x08140;
        } else {
            // In the 0xE040 to 0xEBBF range.
            assembled += 0x0C140;
        }
        buffer.push((assembled >> 8) as u8);
        buffer.push((assembled & 0xFF) as u8);
    }
    text::append(result, &buffer, SHIFT_JIS)
}

/// 13 bits per character, re-spread into a GB2312 double byte.
fn decode_hanzi_segment(bits: &mut BitSource, count: usize, result: &mut String) -> Result<()> {
    if count * 13 > bits.available() {
        return Err(Error::Format);
    }
    let mut buffer = Vec::with_capacity(2 * count);
    for _ in 0..count {
        let two_bytes = bits.read_bits(13)?;
        let mut assembled = ((two_bytes / 0x060) << 8) | (two_bytes % 0x060);
        if assembled < 0x003BF {
            // In the 0xA1A1 to 0xAAFE range.
            assembled += 0x0A1A1;
        } else {
            // In the 0xB0A1 to 0xFAFE range.
            assembled += 0x0A6A1;
        }
        buffer.push((assembled >> 8) as u8);
        buffer.push((assembled & 0xFF) as u8);
    }
    text::append(result, &buffer, GB18030)
}

/// ECI designator: 1, 2 or 3 bytes keyed by the leading bit pattern.
fn parse_eci_value(bits: &mut BitSource) -> Result<u32> {
    let first_byte = bits.read_bits(8)?;
    if first_byte & 0x80 == 0 {
        return Ok(first_byte & 0x7F);
    }
    if first_byte & 0xC0 == 0x80 {
        let second_byte = bits.read_bits(8)?;
        return Ok(((first_byte & 0x3F) << 8) | second_byte);
    }
    if first_byte & 0xE0 == 0xC0 {
        let second_third_bytes = bits.read_bits(16)?;
        return Ok(((first_byte & 0x1F) << 16) | second_third_bytes);
    }
    Err(Error::Format)
}
