//! Ancillary-data container format carried inside an MXF `Data` essence element (SMPTE 436M
//! style): a 2-byte line count followed by that many `[14-byte line header, payload]` pairs.

use snafu::prelude::*;

use super::{BadLineHeaderSnafu, Error, InvalidLineLengthSnafu};

/// One decoded ANC line, before any teletext-specific interpretation of its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncLine {
    /// Line number field from the line header.
    pub number: u16,
    /// Wrapping type byte from the line header.
    pub wrapping: u8,
    /// Sample coding tag from the line header.
    pub sample_coding: u8,
    /// Sample count from the line header.
    pub sample_count: u16,
    /// The line's payload bytes.
    pub payload: Vec<u8>,
}

/// Parse the ANC container format out of one MXF `Data` essence element's value.
pub fn parse_anc_lines(value: &[u8]) -> Result<Vec<AncLine>, Error> {
    ensure!(value.len() >= 2, BadLineHeaderSnafu);
    let count = u16::from_be_bytes([value[0], value[1]]) as usize;
    let mut lines = Vec::with_capacity(count);
    let mut offset = 2usize;
    for _ in 0..count {
        ensure!(offset + 14 <= value.len(), BadLineHeaderSnafu);
        let header = &value[offset..offset + 14];
        ensure!(header[13] == 0x01, BadLineHeaderSnafu);
        let number = u16::from_be_bytes([header[0], header[1]]);
        let wrapping = header[2];
        let sample_coding = header[3];
        let sample_count = u16::from_be_bytes([header[4], header[5]]);
        let length = u16::from_be_bytes([header[8], header[9]]);
        ensure!(length > 0 && length <= 10_000, InvalidLineLengthSnafu { length });

        let payload_start = offset + 14;
        let payload_end = payload_start + length as usize;
        ensure!(payload_end <= value.len(), BadLineHeaderSnafu);

        lines.push(AncLine {
            number,
            wrapping,
            sample_coding,
            sample_count,
            payload: value[payload_start..payload_end].to_vec(),
        });
        offset = payload_end;
    }
    Ok(lines)
}
