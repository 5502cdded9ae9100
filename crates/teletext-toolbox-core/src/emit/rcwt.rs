//! RCWT (Raw Captions With Time) emitter: an 11-byte fixed header followed by one packet per
//! meaningful T42 line (or blank row-0 header line carrying a valid page number), each
//! timestamped with a running frame-time-stamp counter.

use std::io::Write;

use snafu::prelude::*;

use crate::ioutil;
use crate::line::{Format, Line};
use crate::timecode::Timebase;


/// Fixed 11-byte file header written once, before the first packet.
const HEADER: [u8; 11] = [0xCC, 0xCC, 0xED, 0xCC, 0x00, 0x50, 0x00, 0x02, 0x00, 0x00, 0x00];

const PACKET_TYPE: u8 = 0x03;
const FRAMING_BYTE: u8 = 0x27;
const FIELD_0_MARKER: u8 = 0xAF;
const FIELD_1_MARKER: u8 = 0xAB;

/// Errors writing an RCWT stream.
#[derive(Debug, Snafu)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(display("I/O error while writing an RCWT stream"))]
    Io { source: std::io::Error, backtrace: snafu::Backtrace },
}

/// Writes RCWT packets to an underlying [`Write`], tracking the header-written flag, frame-time-
/// stamp, and field alternation as instance state.
///
/// The frame-time-stamp advances by one frame duration (`1000 / timebase.rate()` milliseconds,
/// rounded down) for every line handed to [`RcwtWriter::write_line`], whether or not that line was
/// meaningful enough to actually emit a packet — this keeps FTS tracking elapsed video time rather
/// than emitted-packet count.
#[derive(Debug)]
pub struct RcwtWriter<W> {
    writer: W,
    header_written: bool,
    fts_ms: u64,
    field: u8,
    frame_duration_ms: u64,
}

impl<W: Write> RcwtWriter<W> {
    /// Construct a writer over `writer`, ticking its frame-time-stamp at `timebase`.
    pub fn new(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            header_written: false,
            fts_ms: 0,
            field: 0,
            frame_duration_ms: 1000 / timebase.rate() as u64,
        }
    }

    fn write_header_if_needed(&mut self) -> Result<(), Error> {
        if !self.header_written {
            ioutil::retry_if_interrupted(|| self.writer.write_all(&HEADER)).context(IoSnafu)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// True if `line` should produce a packet: either it has visible glyph content, or it's a
    /// row-0 header with a valid page number. Decoders rely on header lines to resynchronise
    /// magazine/page tracking even when the header itself has no "visible" glyphs.
    fn should_emit(line: &Line) -> bool {
        if line.has_meaningful_content() {
            return true;
        }
        line.format == Format::T42
            && line.row == Some(0)
            && crate::t42::page_number(&line.payload).is_some()
    }

    /// Consume one line: write its packet if meaningful, then advance FTS and field regardless.
    pub fn write_line(&mut self, line: &Line) -> Result<(), Error> {
        self.write_header_if_needed()?;

        if Self::should_emit(line) {
            let mut packet = Vec::with_capacity(1 + 8 + 1 + 1 + 42);
            packet.push(PACKET_TYPE);
            packet.extend_from_slice(&self.fts_ms.to_le_bytes());
            packet.push(FRAMING_BYTE);
            packet.push(if self.field == 0 { FIELD_0_MARKER } else { FIELD_1_MARKER });
            packet.extend_from_slice(&line.payload);
            ioutil::retry_if_interrupted(|| self.writer.write_all(&packet)).context(IoSnafu)?;
        }

        self.fts_ms += self.frame_duration_ms;
        self.field ^= 1;
        Ok(())
    }

    /// Ensure the header has been written even if no lines were ever written (an empty output
    /// still carries a valid 11-byte RCWT header).
    pub fn finish(&mut self) -> Result<(), Error> {
        self.write_header_if_needed()
    }
}
