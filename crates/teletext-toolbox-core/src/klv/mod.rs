//! Key-Length-Value (KLV) reading for SMPTE 377 (MXF) streams.
//!
//! A KLV record is a 16-byte universal label key, a BER-encoded length, and that many value
//! bytes. [`read_record`] reads one record from any [`std::io::Read`]; [`keys::classify`]
//! recognises the closed set of essence/System/TimecodeComponent keys this crate understands.

use std::io;
use std::io::Read;

use snafu::prelude::*;

use crate::ioutil;

pub mod keys;

#[cfg(test)]
mod tests;

/// The 4-byte prefix shared by every SMPTE universal label.
pub const UL_PREFIX: [u8; 4] = [0x06, 0x0E, 0x2B, 0x34];

/// Errors reading or classifying KLV records.
#[derive(Debug, Snafu)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(display("key does not start with the SMPTE universal label prefix 06 0E 2B 34"))]
    NotMxf,

    #[snafu(display("BER long-form length uses {count} bytes, which exceeds the maximum of 8"))]
    BadBerLength { count: u8 },

    #[snafu(display("I/O error while reading a KLV record"))]
    Io { source: io::Error, backtrace: snafu::Backtrace },
}

/// One parsed KLV record: its 16-byte key, and its value bytes (length already consumed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The 16-byte universal label key.
    pub key: [u8; 16],
    /// The value bytes, `length` bytes long.
    pub value: Vec<u8>,
}

/// Decode a BER length from `first` (the already-read length-prefix byte) plus however many
/// additional bytes the long form requires, read from `reader`.
///
/// - Short form (`first & 0x80 == 0`): the length is `first` itself.
/// - Long form: `first & 0x7F` gives the count of following big-endian length bytes; more than 8
///   is rejected as [`Error::BadBerLength`], since that could never fit an in-memory value length
///   even on a 64-bit target, let alone a 32-bit one. The decoded value is also checked against
///   `usize::MAX` so a length that fits in a `u64` but not in a 32-bit target's `usize` is rejected
///   here rather than panicking on the cast the caller makes to size its value buffer.
pub fn read_ber_length<R: Read>(reader: &mut R, first: u8) -> Result<u64, Error> {
    if first & 0x80 == 0 {
        return Ok(first as u64);
    }
    let count = first & 0x7F;
    if count > 8 {
        return Err(Error::BadBerLength { count });
    }
    let mut buf = [0u8; 8];
    ioutil::retry_if_interrupted(|| reader.read_exact(&mut buf[8 - count as usize..]))
        .context(IoSnafu)?;
    let length = u64::from_be_bytes(buf);
    if length > usize::MAX as u64 {
        return Err(Error::BadBerLength { count });
    }
    Ok(length)
}

/// Encode `length` as a BER length, choosing the shortest valid form.
pub fn write_ber_length(length: u64) -> Vec<u8> {
    if length <= 0x7F {
        return vec![length as u8];
    }
    let bytes = length.to_be_bytes();
    let first_significant = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    let significant = &bytes[first_significant..];
    let mut out = Vec::with_capacity(significant.len() + 1);
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
    out
}

/// Read one KLV record: a 16-byte key, a BER length, and that many value bytes.
///
/// Returns `Ok(None)` at a clean end-of-stream (no bytes read before the key). The key is *not*
/// validated against the SMPTE UL prefix here; callers typically want to classify it first (see
/// [`keys::classify`]) so they can decide whether an unrecognised prefix should abort the whole
/// stream or just be skipped.
pub fn read_record<R: Read>(reader: &mut R) -> Result<Option<Record>, Error> {
    let mut key = [0u8; 16];
    let filled = ioutil::read_exact_or_eof(reader, &mut key).context(IoSnafu)?;
    if !filled {
        return Ok(None);
    }
    let mut first_len_byte = [0u8];
    ioutil::retry_if_interrupted(|| reader.read_exact(&mut first_len_byte)).context(IoSnafu)?;
    let length = read_ber_length(reader, first_len_byte[0])?;
    let mut value = vec![0u8; length as usize];
    ioutil::retry_if_interrupted(|| reader.read_exact(&mut value)).context(IoSnafu)?;
    Ok(Some(Record { key, value }))
}

/// Serialize one KLV record back to bytes (key + BER length + value).
pub fn write_record(record: &Record) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + 9 + record.value.len());
    out.extend_from_slice(&record.key);
    out.extend_from_slice(&write_ber_length(record.value.len() as u64));
    out.extend_from_slice(&record.value);
    out
}
