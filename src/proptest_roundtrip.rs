//! Property-based tests for the decoder core
//!
//! Symbols are generated with the `qrcode` crate, converted to a module
//! matrix, and decoded back. This pins the decoder against an independent
//! encoder implementation across versions, levels and payload classes.

use proptest::prelude::*;
use qrcode::{Color, EcLevel as GenLevel, QrCode, Version as GenVersion};

use crate::function_pattern::FunctionPattern;
use crate::version::Version;
use crate::{data_mask, decode, BitMatrix, DecodeConfig};

/// Convert a generated symbol into the decoder's input matrix.
fn matrix_from_code(code: &QrCode) -> BitMatrix {
    let width = code.width();
    let colors = code.to_colors();
    let mut matrix = BitMatrix::new(width);
    for y in 0..width {
        for x in 0..width {
            if colors[y * width + x] == Color::Dark {
                matrix.set(x, y, true);
            }
        }
    }
    matrix
}

fn decode_text(matrix: &BitMatrix) -> Result<String, crate::Error> {
    decode(matrix, &DecodeConfig::new()).map(|d| d.into_text())
}

/// Data-module coordinates in codeword read order, for targeted corruption.
fn data_module_coords(version: &Version) -> Vec<(usize, usize)> {
    let pattern = FunctionPattern::new(version);
    let dimension = version.dimension();
    let mut coords = Vec::new();
    let mut reading_up = true;
    let mut x = dimension as isize - 1;
    while x > 0 {
        if x == 6 {
            x -= 1;
        }
        for counter in 0..dimension {
            let y = if reading_up { dimension - 1 - counter } else { counter };
            for col in 0..2 {
                let xx = (x as usize) - col;
                if !pattern.is_function(xx, y) {
                    coords.push((xx, y));
                }
            }
        }
        reading_up = !reading_up;
        x -= 2;
    }
    coords
}

fn gen_level() -> impl Strategy<Value = GenLevel> {
    prop_oneof![
        Just(GenLevel::L),
        Just(GenLevel::M),
        Just(GenLevel::Q),
        Just(GenLevel::H),
    ]
}

proptest! {
    /// Alphanumeric-charset payloads round-trip at an auto-picked version.
    #[test]
    fn roundtrip_alphanumeric(data in "[A-Z0-9 $%*+./:-]{1,80}") {
        let code = QrCode::new(data.as_bytes()).unwrap();
        let matrix = matrix_from_code(&code);
        prop_assert_eq!(decode_text(&matrix).unwrap(), data);
    }

    /// Digit strings round-trip (numeric mode).
    #[test]
    fn roundtrip_numeric(data in "[0-9]{1,120}") {
        let code = QrCode::new(data.as_bytes()).unwrap();
        let matrix = matrix_from_code(&code);
        prop_assert_eq!(decode_text(&matrix).unwrap(), data);
    }

    /// Printable-ASCII payloads round-trip (byte mode).
    #[test]
    fn roundtrip_bytes(data in proptest::collection::vec(0x20u8..0x7F, 1..60)) {
        let code = QrCode::new(&data).unwrap();
        let matrix = matrix_from_code(&code);
        let expected = String::from_utf8(data).unwrap();
        prop_assert_eq!(decode_text(&matrix).unwrap(), expected);
    }

    /// Mirroring a symbol flips only the `mirrored` flag, not the text.
    #[test]
    fn mirrored_symbols_decode(data in "[a-z0-9]{1,40}", level in gen_level()) {
        let code = QrCode::with_error_correction_level(data.as_bytes(), level).unwrap();
        let mut matrix = matrix_from_code(&code);
        matrix.mirror();
        let result = decode(&matrix, &DecodeConfig::new()).unwrap();
        prop_assert!(result.is_mirrored());
        prop_assert_eq!(result.text(), &data);
    }

    /// Up to two flipped data modules stay within every level's correction
    /// capacity.
    #[test]
    fn tolerates_two_module_flips(
        data in "[a-z]{1,20}",
        level in gen_level(),
        picks in proptest::collection::vec(proptest::num::usize::ANY, 2),
    ) {
        let code = QrCode::with_error_correction_level(data.as_bytes(), level).unwrap();
        let mut matrix = matrix_from_code(&code);
        let version = Version::provisional_for_dimension(matrix.dimension()).unwrap();
        let coords = data_module_coords(&version);
        for pick in picks {
            let (x, y) = coords[pick % coords.len()];
            matrix.flip(x, y);
        }
        prop_assert_eq!(decode_text(&matrix).unwrap(), data);
    }

    /// Corrupting more codewords than a block can repair never yields a
    /// wrong payload; the decode fails instead.
    #[test]
    fn overwhelmed_blocks_fail(data in "[a-z]{1,7}") {
        // Version 1-H: a single block with 17 parity codewords repairs at
        // most 8 errors; damage 12 distinct codewords.
        let code = QrCode::with_version(data.as_bytes(), GenVersion::Normal(1), GenLevel::H)
            .unwrap();
        let mut matrix = matrix_from_code(&code);
        let version = Version::by_number(1).unwrap();
        let coords = data_module_coords(&version);
        for codeword in 0..12 {
            let (x, y) = coords[codeword * 8];
            matrix.flip(x, y);
        }
        prop_assert!(decode_text(&matrix).is_err());
    }

    /// Applying the same mask twice is the identity on data modules.
    #[test]
    fn unmask_is_an_involution(
        seed in proptest::collection::vec(proptest::bool::ANY, 25 * 25),
        mask in 0u8..8,
    ) {
        let version = Version::by_number(2).unwrap();
        let pattern = FunctionPattern::new(&version);
        let mut matrix = BitMatrix::new(25);
        for (i, &bit) in seed.iter().enumerate() {
            if bit {
                matrix.set(i % 25, i / 25, true);
            }
        }
        let original = matrix.clone();
        data_mask::unmask(&mut matrix, mask, &pattern);
        data_mask::unmask(&mut matrix, mask, &pattern);
        prop_assert_eq!(matrix, original);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Every version and level round-trips with an explicitly pinned
    /// geometry.
    #[test]
    fn roundtrip_all_versions(
        version in 1i16..=40,
        level in gen_level(),
        data in "[A-Z0-9 ]{1,10}",
    ) {
        let code = QrCode::with_version(data.as_bytes(), GenVersion::Normal(version), level)
            .unwrap();
        let matrix = matrix_from_code(&code);
        let result = decode(&matrix, &DecodeConfig::new()).unwrap();
        prop_assert_eq!(result.text(), &data);
        prop_assert!(!result.is_mirrored());
    }
}

#[cfg(test)]
mod unit {
    use super::*;

    #[test]
    fn simple_roundtrip() {
        let code = QrCode::new(b"Hello, World!").unwrap();
        let matrix = matrix_from_code(&code);
        let result = decode(&matrix, &DecodeConfig::new()).unwrap();
        assert_eq!(result.text(), "Hello, World!");
        assert!(!result.is_mirrored());
        assert_eq!(result.byte_segments().len(), 1);
    }

    #[test]
    fn url_roundtrip() {
        let code = QrCode::new(b"https://example.com/path?q=rust").unwrap();
        let matrix = matrix_from_code(&code);
        assert_eq!(
            decode_text(&matrix).unwrap(),
            "https://example.com/path?q=rust"
        );
    }

    #[test]
    fn utf8_payload_roundtrip() {
        // The generator emits plain byte mode; the charset guess must
        // recognize multi-byte UTF-8.
        let text = "grüße aus Zürich";
        let code = QrCode::new(text.as_bytes()).unwrap();
        let matrix = matrix_from_code(&code);
        assert_eq!(decode_text(&matrix).unwrap(), text);
    }
}
