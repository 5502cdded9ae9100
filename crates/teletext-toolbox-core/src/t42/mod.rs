//! T42 line codec: decoding the 42-byte teletext packet structure (magazine, row, page number,
//! and text) and rasterising back to VBI samples.

use std::sync::LazyLock;

use snafu::prelude::*;

pub mod charset;
pub mod filter;

#[cfg(test)]
mod tests;

pub use charset::Charset;

/// Errors parsing T42-adjacent filter specifications.
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(display("{input:?} is not a valid magazine+page specification"))]
    BadPageSpec { input: String },
}

/// Decode one Hamming 8/4-coded byte to its 4-bit value, reporting whether the error was
/// uncorrectable (a double-bit error).
///
/// This is the standard EBU single-error-correcting, double-error-detecting (SECDED) Hamming
/// code used throughout teletext: four data bits `D1..D4`, three parity bits `P1..P3` each
/// covering three of the data bits, and an overall parity bit `P4` covering the whole byte.
fn decode_hamming_8_4(byte: u8) -> (u8, bool) {
    let bit = |n: u8| (byte >> n) & 1;
    let (p1, d1, p2, d2) = (bit(0), bit(1), bit(2), bit(3));
    let (p3, d3, p4, d4) = (bit(4), bit(5), bit(6), bit(7));

    let s1 = p1 ^ d1 ^ d2 ^ d4;
    let s2 = p2 ^ d1 ^ d3 ^ d4;
    let s3 = p3 ^ d2 ^ d3 ^ d4;
    let syndrome = s1 | (s2 << 1) | (s3 << 2);
    let overall_parity = byte.count_ones() % 2;

    let (mut d1, mut d2, mut d3, mut d4) = (d1, d2, d3, d4);
    let mut uncorrectable = false;
    if syndrome != 0 {
        if overall_parity != 0 {
            match syndrome {
                0b011 => d1 ^= 1,
                0b101 => d2 ^= 1,
                0b110 => d3 ^= 1,
                0b111 => d4 ^= 1,
                _ => {} // the error is in a parity bit; the data nibble is unaffected
            }
        } else {
            uncorrectable = true;
        }
    }
    (d1 | (d2 << 1) | (d3 << 2) | (d4 << 3), uncorrectable)
}

/// The 256-entry Hamming 8/4 decode table, precomputed once from [`decode_hamming_8_4`].
static HAMMING_DECODE: LazyLock<[(u8, bool); 256]> =
    LazyLock::new(|| core::array::from_fn(|i| decode_hamming_8_4(i as u8)));

fn hamming_decode(byte: u8) -> (u8, bool) {
    HAMMING_DECODE[byte as usize]
}

/// Decode the teletext magazine number from the line's first byte.
///
/// Magazine value `0` means magazine `8` (magazines are numbered `1..=8`, but only 3 bits are
/// available, so `8` is encoded as `0`).
pub fn magazine(byte0: u8) -> u8 {
    let (nibble, _error) = hamming_decode(byte0);
    let m = nibble & 0x07;
    if m == 0 { 8 } else { m }
}

/// Decode the teletext row number from the line's first two bytes.
pub fn row(bytes: [u8; 2]) -> u8 {
    let (n0, _) = hamming_decode(bytes[0]);
    let (n1, _) = hamming_decode(bytes[1]);
    let combined = (n0 as u16) | ((n1 as u16) << 4);
    (combined >> 3) as u8
}

/// Decode the page number from a row-0 ("header") line, as two hex digits.
///
/// Returns `None` if `bytes` doesn't describe a row-0 line.
pub fn page_number(bytes: &[u8]) -> Option<String> {
    if bytes.len() < 4 {
        return None;
    }
    if row([bytes[0], bytes[1]]) != 0 {
        return None;
    }
    let (units, _) = hamming_decode(bytes[2]);
    let (tens, _) = hamming_decode(bytes[3]);
    Some(format!("{tens:X}{units:X}"))
}

/// Strip the odd-parity bit (bit 7) from a teletext text byte.
fn strip_parity(byte: u8) -> u8 {
    byte & 0x7F
}

/// True iff any byte of `payload` (the 40-byte text region of a T42 line, bytes `2..42`), after
/// stripping its parity bit, is printable and not a space.
pub fn has_meaningful_content(line: &[u8]) -> bool {
    line.iter().skip(2).any(|&b| {
        let c = strip_parity(b);
        (0x21..=0x7E).contains(&c)
    })
}

/// Decode the 40 text bytes (`line[2..42]`) of a T42 line to a display string.
///
/// When `is_header` is set, the magazine and page number are prepended (`"8/01 "` style) ahead of
/// the decoded row text, mirroring how teletext row-0 headers display their own page identity.
pub fn text(payload: &[u8], charset: Charset, is_header: bool, magazine: u8, page: Option<&str>) -> String {
    let mut out = String::with_capacity(payload.len() + 8);
    if is_header {
        if let Some(page) = page {
            out.push_str(&format!("{magazine}/{page} "));
        }
    }
    for &b in payload {
        let c = strip_parity(b);
        out.push(if (0x20..=0x7F).contains(&c) { charset::lookup(charset, c) } else { ' ' });
    }
    out
}

/// Rasterise a 42-byte T42 line back to `720` (or `1440` for `double`) VBI luma samples.
///
/// See [`crate::vbi::t42_to_vbi`] for the bit-expansion algorithm.
pub fn to_vbi(bytes: &[u8; 42], double: bool) -> Vec<u8> {
    crate::vbi::t42_to_vbi(bytes, double)
}
