//! [`Line`] and [`Packet`]: the shared in-memory representation every handler produces and every
//! emitter consumes.
//!
//! A [`Line`] is one horizontal raster line of teletext or VBI data; a [`Packet`] groups the lines
//! belonging to one video frame under a single [`Timecode`](crate::timecode::Timecode).

use garde::Validate;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::timecode::Timecode;

#[cfg(test)]
mod tests;

/// The wire/sample format a [`Line`]'s payload is encoded in.
///
/// Each format fixes the payload length: see [`Format::payload_len`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Format {
    /// A decoded 42-byte teletext packet.
    T42,
    /// A single-rate 720-byte VBI luma row.
    Vbi,
    /// A double-rate 1440-byte VBI luma row.
    VbiDouble,
}

impl Format {
    /// The payload length this format requires.
    pub fn payload_len(self) -> usize {
        match self {
            Format::T42 => 42,
            Format::Vbi => 720,
            Format::VbiDouble => 1440,
        }
    }
}

/// Errors constructing or operating on a [`Line`] or [`Packet`].
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(display(
        "a {format:?} line must have a payload of {expected} bytes, got {actual}"
    ))]
    BadPayloadLength { format: Format, expected: usize, actual: usize },

    #[snafu(display("magazine {value} is out of range 1..=8"))]
    BadMagazine { value: u8 },

    #[snafu(display("row {value} is out of range 0..=31"))]
    BadRow { value: u8 },

    #[snafu(display(
        "packet header {declared} does not match its actual line count {actual}"
    ))]
    HeaderMismatch { declared: u16, actual: u16 },
}

/// One horizontal raster line of teletext or VBI data.
///
/// `magazine` and `row` are only meaningful for [`Format::T42`] lines; VBI lines carry `None` for
/// both until they've been decoded to T42.
#[derive(Debug, Clone, PartialEq, Validate, Serialize, Deserialize)]
#[garde(context(()))]
pub struct Line {
    /// Monotonically increasing sequence number assigned by the producing handler.
    #[garde(skip)]
    pub sequence_number: u64,
    /// The frame timecode this line was sampled under, if known.
    #[garde(skip)]
    pub timecode: Option<Timecode>,
    /// Teletext magazine, `1..=8`.
    #[garde(custom(check_magazine))]
    pub magazine: Option<u8>,
    /// Teletext row, `0..=31`.
    #[garde(custom(check_row))]
    pub row: Option<u8>,
    /// The encoding of `payload`.
    #[garde(skip)]
    pub format: Format,
    /// The raw sample/packet bytes. Length is fixed by `format` (see [`Format::payload_len`]).
    #[garde(custom(check_payload(&self)))]
    pub payload: Vec<u8>,
    /// Sample coding tag, carried through from an ANC line header when present.
    #[garde(skip)]
    pub sample_coding: u8,
    /// Sample count, carried through from an ANC line header when present.
    #[garde(skip)]
    pub sample_count: u16,
    /// Decoded Unicode text, empty until a T42 codec has populated it.
    #[garde(skip)]
    pub text: String,
}

fn check_magazine(magazine: &Option<u8>, _ctx: &()) -> garde::Result {
    if let Some(m) = magazine {
        if !(1..=8).contains(m) {
            return Err(garde::Error::new(format!("magazine {m} is out of range 1..=8")));
        }
    }
    Ok(())
}

fn check_row(row: &Option<u8>, _ctx: &()) -> garde::Result {
    if let Some(r) = row {
        if *r > 31 {
            return Err(garde::Error::new(format!("row {r} is out of range 0..=31")));
        }
    }
    Ok(())
}

fn check_payload(line: &Line) -> impl FnOnce(&Vec<u8>, &()) -> garde::Result + '_ {
    move |payload, _ctx| {
        let expected = line.format.payload_len();
        if payload.len() != expected {
            return Err(garde::Error::new(format!(
                "a {:?} line must have a payload of {expected} bytes, got {}",
                line.format,
                payload.len()
            )));
        }
        Ok(())
    }
}

impl Line {
    /// Construct and validate a new line.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence_number: u64,
        timecode: Option<Timecode>,
        magazine: Option<u8>,
        row: Option<u8>,
        format: Format,
        payload: Vec<u8>,
        sample_coding: u8,
        sample_count: u16,
        text: String,
    ) -> Result<Self, Error> {
        let line = Line {
            sequence_number,
            timecode,
            magazine,
            row,
            format,
            payload,
            sample_coding,
            sample_count,
            text,
        };
        line.validate().map_err(|report| {
            let msg = report.to_string();
            if msg.contains("magazine") {
                BadMagazineSnafu { value: line.magazine.unwrap_or_default() }.build()
            } else if msg.contains("row") {
                BadRowSnafu { value: line.row.unwrap_or_default() }.build()
            } else {
                BadPayloadLengthSnafu {
                    format: line.format,
                    expected: line.format.payload_len(),
                    actual: line.payload.len(),
                }
                .build()
            }
        })?;
        Ok(line)
    }

    /// True iff any payload byte, after parity-bit strip, is a printable non-space, non-control
    /// character. Only meaningful for [`Format::T42`] lines; see [`crate::t42::has_meaningful_content`].
    pub fn has_meaningful_content(&self) -> bool {
        self.format == Format::T42 && crate::t42::has_meaningful_content(&self.payload)
    }

    /// Decode a [`Format::T42`] line from a raw 42-byte packet: Hamming-decode the magazine, row,
    /// and page number, then assemble display text from the rest of the payload.
    ///
    /// Every caller that hands a T42 packet to [`Line::new`] needs this same
    /// magazine/row/page/text derivation (`stream::StreamReader`, and anything decoding ANC lines
    /// out of an MXF `Data` essence element), so it lives here rather than being repeated at each
    /// call site.
    pub fn from_t42(
        sequence_number: u64,
        timecode: Option<Timecode>,
        payload: [u8; 42],
    ) -> Result<Self, Error> {
        let magazine = crate::t42::magazine(payload[0]);
        let row = crate::t42::row([payload[0], payload[1]]);
        let page = crate::t42::page_number(&payload);
        let text = crate::t42::text(
            &payload[2..],
            crate::t42::Charset::G0,
            row == 0,
            magazine,
            page.as_deref(),
        );
        Self::new(
            sequence_number,
            timecode,
            Some(magazine),
            Some(row),
            Format::T42,
            payload.to_vec(),
            0,
            0,
            text,
        )
    }
}

/// A group of [`Line`]s sharing one frame timecode.
///
/// `header()` is derived rather than stored, so the invariant
/// `header[0]<<8 | header[1] == lines.len()` can never drift out of sync with the owned lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// The frame timecode shared by every line in this packet.
    pub timecode: Timecode,
    /// The lines belonging to this frame, in input order.
    pub lines: Vec<Line>,
}

impl Packet {
    /// Construct a new packet from a timecode and its lines.
    pub fn new(timecode: Timecode, lines: Vec<Line>) -> Self {
        Packet { timecode, lines }
    }

    /// The big-endian 2-byte line-count header, as emitted on the wire.
    pub fn header(&self) -> [u8; 2] {
        (self.lines.len() as u16).to_be_bytes()
    }

    /// Validate a 2-byte header read from the wire against this packet's actual line count.
    pub fn check_header(&self, header: [u8; 2]) -> Result<(), Error> {
        let declared = u16::from_be_bytes(header);
        let actual = self.lines.len() as u16;
        ensure!(declared == actual, HeaderMismatchSnafu { declared, actual });
        Ok(())
    }
}
