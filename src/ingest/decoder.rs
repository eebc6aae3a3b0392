use std::io::Read;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{Result, TextpartError};

const UTF32_LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
const UTF32_BE_BOM: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];

/// Decoded text plus the name of the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

/// Read everything from `reader` and decode it.
pub fn read_to_text(reader: &mut dyn Read, encoding: Option<&str>) -> Result<Decoded> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes, encoding)
}

/// Decode raw bytes. With an explicit `encoding` a failure is returned as
/// [`TextpartError::Decode`]; without one the encoding is detected and
/// input that does not decode cleanly in it is a decode error too.
pub fn decode(bytes: &[u8], encoding: Option<&str>) -> Result<Decoded> {
    match encoding {
        Some(label) => decode_with_label(bytes, label),
        None => detect_and_decode(bytes),
    }
}

fn decode_with_label(bytes: &[u8], label: &str) -> Result<Decoded> {
    let normalized = normalize_label(label);
    match normalized.as_str() {
        "utf-32" | "utf32" => {
            let (endian, bom_len) = if bytes.starts_with(&UTF32_BE_BOM) {
                (Endian::Big, 4)
            } else if bytes.starts_with(&UTF32_LE_BOM) {
                (Endian::Little, 4)
            } else {
                (Endian::Little, 0)
            };
            return decode_utf32(&bytes[bom_len..], endian);
        }
        "utf-32le" => return decode_utf32(strip(bytes, &UTF32_LE_BOM), Endian::Little),
        "utf-32be" => return decode_utf32(strip(bytes, &UTF32_BE_BOM), Endian::Big),
        _ => {}
    }

    let encoding = Encoding::for_label(normalized.as_bytes())
        .ok_or_else(|| TextpartError::Config(format!("unknown encoding: {label}")))?;

    // A bare "utf-16" label means "follow the BOM, little-endian otherwise".
    let encoding = if matches!(normalized.as_str(), "utf-16" | "utf16") {
        match Encoding::for_bom(bytes) {
            Some((bom, _)) if bom == UTF_16BE => UTF_16BE,
            _ => UTF_16LE,
        }
    } else {
        encoding
    };

    let body = match Encoding::for_bom(bytes) {
        Some((bom, len)) if bom == encoding => &bytes[len..],
        _ => bytes,
    };
    strict_decode(body, encoding).ok_or_else(|| TextpartError::Decode {
        encoding: encoding.name().to_string(),
        detail: format!("invalid byte sequence for label '{label}'"),
    })
}

/// Normalize a user label for the WHATWG lookup: lowercase, `_` to `-`,
/// `utf-16-be` to `utf-16be`. Also maps the aliases `latin-1`, `utf-8-sig`
/// and `ascii`, which WHATWG spells differently.
fn normalize_label(label: &str) -> String {
    let normalized = label
        .trim()
        .to_ascii_lowercase()
        .replace('_', "-")
        .replace("16-", "16")
        .replace("32-", "32");
    match normalized.as_str() {
        "latin-1" | "latin" => "latin1".into(),
        "utf-8-sig" | "utf8-sig" => "utf-8".into(),
        "ascii" => "us-ascii".into(),
        _ => normalized,
    }
}

/// Detection order: BOM, NUL layout of BOM-less UTF-16/32, strict UTF-8,
/// then a `chardetng` guess for legacy single- and multi-byte encodings.
fn detect_and_decode(bytes: &[u8]) -> Result<Decoded> {
    if bytes.is_empty() {
        return Ok(Decoded {
            text: String::new(),
            encoding: UTF_8.name(),
        });
    }

    // UTF-32LE shares its first two bytes with the UTF-16LE BOM, so check it first.
    if bytes.starts_with(&UTF32_LE_BOM) {
        return decode_utf32(&bytes[4..], Endian::Little);
    }
    if bytes.starts_with(&UTF32_BE_BOM) {
        return decode_utf32(&bytes[4..], Endian::Big);
    }
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let body = &bytes[bom_len..];
        return strict_decode(body, encoding).ok_or_else(|| TextpartError::Decode {
            encoding: encoding.name().to_string(),
            detail: "invalid byte sequence after byte order mark".into(),
        });
    }

    if let Some(layout) = detect_unicode_without_bom(bytes) {
        tracing::debug!(?layout, "detected BOM-less wide encoding");
        return match layout {
            WideLayout::Utf32(endian) => decode_utf32(bytes, endian),
            WideLayout::Utf16(endian) => {
                let encoding = match endian {
                    Endian::Little => UTF_16LE,
                    Endian::Big => UTF_16BE,
                };
                strict_decode(bytes, encoding).ok_or_else(|| TextpartError::Decode {
                    encoding: encoding.name().to_string(),
                    detail: "invalid UTF-16 sequence".into(),
                })
            }
        };
    }

    if let Some(decoded) = strict_decode(bytes, UTF_8) {
        return Ok(decoded);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, false);
    tracing::debug!(encoding = guess.name(), "guessed legacy encoding");
    strict_decode(bytes, guess).ok_or_else(|| TextpartError::Decode {
        encoding: guess.name().to_string(),
        detail: "input is not valid in the detected encoding".into(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WideLayout {
    Utf16(Endian),
    Utf32(Endian),
}

/// Mostly-ASCII UTF-16 and UTF-32 text leaves NULs in fixed byte lanes.
/// UTF-8 and legacy text almost never contain NUL, so the lanes identify
/// the layout and byte order.
fn detect_unicode_without_bom(bytes: &[u8]) -> Option<WideLayout> {
    if bytes.len() < 8 || !bytes.contains(&0) {
        return None;
    }

    if bytes.len() % 4 == 0 {
        let units = bytes.len() / 4;
        let lane_nulls = |lane: usize| {
            bytes
                .iter()
                .skip(lane)
                .step_by(4)
                .filter(|&&b| b == 0)
                .count()
        };
        let (l0, l1, l2, l3) = (lane_nulls(0), lane_nulls(1), lane_nulls(2), lane_nulls(3));
        let mostly = |n: usize| n * 4 > units * 3;
        let rarely = |n: usize| n * 4 < units;
        if mostly(l1) && mostly(l2) && mostly(l3) && rarely(l0) {
            return Some(WideLayout::Utf32(Endian::Little));
        }
        if mostly(l0) && mostly(l1) && mostly(l2) && rarely(l3) {
            return Some(WideLayout::Utf32(Endian::Big));
        }
    }

    if bytes.len() % 2 == 0 {
        let pairs = bytes.len() / 2;
        let nulls_at_even = bytes.iter().step_by(2).filter(|&&b| b == 0).count();
        let nulls_at_odd = bytes.iter().skip(1).step_by(2).filter(|&&b| b == 0).count();
        if nulls_at_odd * 4 > pairs * 3 && nulls_at_even * 4 < pairs {
            return Some(WideLayout::Utf16(Endian::Little));
        }
        if nulls_at_even * 4 > pairs * 3 && nulls_at_odd * 4 < pairs {
            return Some(WideLayout::Utf16(Endian::Big));
        }
    }

    None
}

fn strict_decode(bytes: &[u8], encoding: &'static Encoding) -> Option<Decoded> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| Decoded {
            text: text.into_owned(),
            encoding: encoding.name(),
        })
}

fn strip<'a>(bytes: &'a [u8], bom: &[u8]) -> &'a [u8] {
    bytes.strip_prefix(bom).unwrap_or(bytes)
}

fn decode_utf32(bytes: &[u8], endian: Endian) -> Result<Decoded> {
    let name = match endian {
        Endian::Little => "UTF-32LE",
        Endian::Big => "UTF-32BE",
    };
    let invalid = |detail: String| TextpartError::Decode {
        encoding: name.into(),
        detail,
    };

    if bytes.len() % 4 != 0 {
        return Err(invalid(format!("truncated data: {} bytes", bytes.len())));
    }

    let mut text = String::with_capacity(bytes.len() / 4);
    for (i, unit) in bytes.chunks_exact(4).enumerate() {
        let quad = [unit[0], unit[1], unit[2], unit[3]];
        let code = match endian {
            Endian::Little => u32::from_le_bytes(quad),
            Endian::Big => u32::from_be_bytes(quad),
        };
        let c = char::from_u32(code)
            .ok_or_else(|| invalid(format!("code point {code:#x} at offset {}", i * 4)))?;
        text.push(c);
    }

    Ok(Decoded {
        text,
        encoding: name,
    })
}
