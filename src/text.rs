//! Character-set handling for byte-mode payloads
//!
//! Covers the three ways a byte segment's charset gets picked: an in-stream
//! ECI designator, the caller's hint, or structural classification of the
//! bytes themselves. Transcoding runs through `encoding_rs`.
//!
//! Note: encoding_rs treats ISO-8859-1 as WINDOWS-1252 per the WHATWG
//! spec. For QR payloads that is the conventional reading of unmarked
//! byte segments, so WINDOWS-1252 serves as the Latin-1 decoder here.

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8, WINDOWS_1252};

use crate::error::{Error, Result};

/// Resolve an ECI designator value to an encoding. Values whose charset
/// has no `encoding_rs` representation (e.g. the PC code pages) resolve to
/// `None` and the segment is rejected upstream.
pub(crate) fn charset_for_eci(value: u32) -> Option<&'static Encoding> {
    let label = match value {
        1 | 3 => "ISO-8859-1",
        4 => "ISO-8859-2",
        5 => "ISO-8859-3",
        6 => "ISO-8859-4",
        7 => "ISO-8859-5",
        8 => "ISO-8859-6",
        9 => "ISO-8859-7",
        10 => "ISO-8859-8",
        11 => "ISO-8859-9",
        12 => "ISO-8859-10",
        13 => "ISO-8859-11",
        15 => "ISO-8859-13",
        16 => "ISO-8859-14",
        17 => "ISO-8859-15",
        18 => "ISO-8859-16",
        20 => "Shift_JIS",
        21 => "windows-1250",
        22 => "windows-1251",
        23 => "windows-1252",
        24 => "windows-1256",
        25 => "UTF-16BE",
        26 => "UTF-8",
        27 | 170 => "US-ASCII",
        28 => "Big5",
        29 => "GB18030",
        30 => "EUC-KR",
        _ => return None,
    };
    Encoding::for_label(label.as_bytes())
}

/// Resolve a caller-supplied charset name through the WHATWG label registry.
pub(crate) fn charset_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Deterministic charset classification for a byte segment without an ECI
/// designator or usable hint. Purely a function of the byte content.
pub(crate) fn guess_encoding(bytes: &[u8]) -> &'static Encoding {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return UTF_8;
    }
    if bytes.iter().all(|&b| b < 0x80) {
        // Plain ASCII decodes identically everywhere; Latin-1 is the
        // conventional default for unmarked segments.
        return WINDOWS_1252;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    if looks_like_shift_jis(bytes) {
        return SHIFT_JIS;
    }
    WINDOWS_1252
}

/// Decode `bytes` in `charset` and append to `out`.
pub(crate) fn append(out: &mut String, bytes: &[u8], charset: &'static Encoding) -> Result<()> {
    let (decoded, _, had_errors) = charset.decode(bytes);
    if had_errors {
        return Err(Error::Format);
    }
    out.push_str(&decoded);
    Ok(())
}

/// Structural validity check: every byte is ASCII, a single-byte katakana,
/// or a legal lead/trail pair.
fn looks_like_shift_jis(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x00..=0x7F | 0xA1..=0xDF => i += 1,
            0x81..=0x9F | 0xE0..=0xEB => {
                i += 1;
                match bytes.get(i) {
                    Some(&t) if (0x40..=0xFC).contains(&t) && t != 0x7F => i += 1,
                    _ => return false,
                }
            }
            _ => return false,
        }
    }
    true
}
