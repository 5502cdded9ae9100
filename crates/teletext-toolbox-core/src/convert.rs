//! Top-level pipelines wiring a line source straight through to a caption emitter.
//!
//! A caller converting a capture to RCWT or EBU-STL doesn't want to hand-roll the read/decode/
//! write loop and match on each subsystem's own error type; [`convert_stream`] and [`convert_mxf`]
//! do that, returning [`crate::error::Result`] so every failure along the way (decode, validation,
//! emission, or caller cancellation) comes back through one error type.

use std::io::{Read, Write};

use snafu::prelude::*;

use crate::emit::rcwt::RcwtWriter;
use crate::emit::stl::StlWriter;
use crate::error::{CancelledSnafu, Result, UnsupportedConversionSnafu};
use crate::klv::keys;
use crate::line::{Format, Line};
use crate::mxf::{self, Event, Handler};
use crate::stream::StreamReader;
use crate::timecode::Timebase;
use crate::vbi;

/// Which caption format a conversion pipeline writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Raw Captions With Time.
    Rcwt,
    /// EBU-STL (EBU Tech 3264).
    Stl,
}

/// Either emitter, so a pipeline can be generic over which caption format it writes.
enum Sink<W> {
    Rcwt(RcwtWriter<W>),
    Stl(StlWriter<W>),
}

impl<W: Write> Sink<W> {
    fn new(output: Output, writer: W, timebase: Timebase) -> Self {
        match output {
            Output::Rcwt => Sink::Rcwt(RcwtWriter::new(writer, timebase)),
            Output::Stl => Sink::Stl(StlWriter::new(writer, timebase)),
        }
    }

    fn write_line(&mut self, line: &Line) -> Result<()> {
        match self {
            Sink::Rcwt(writer) => writer.write_line(line)?,
            Sink::Stl(writer) => writer.write_line(line)?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        match self {
            Sink::Rcwt(writer) => writer.finish()?,
            Sink::Stl(writer) => writer.flush()?,
        }
        Ok(())
    }
}

/// Convert a headerless VBI or T42 capture to a caption file.
///
/// Reads `format`-shaped fixed records from `reader` via [`StreamReader`], synthesising
/// timecodes at `timebase` with one frame every `lines_per_frame` records, and writes every
/// resulting line to `output`. `cancelled` is polled once per line so a caller driving a long
/// capture from another thread can stop the conversion early; when it returns `true`,
/// conversion stops with [`crate::error::Error::Cancelled`] and nothing further is written.
///
/// Returns the number of lines written.
pub fn convert_stream<R: Read, W: Write>(
    reader: R,
    format: Format,
    timebase: Timebase,
    lines_per_frame: u32,
    output: Output,
    writer: W,
    mut cancelled: impl FnMut() -> bool,
) -> Result<u64> {
    let mut source = StreamReader::new(reader, format, timebase, lines_per_frame);
    let mut sink = Sink::new(output, writer, timebase);
    let mut written = 0u64;
    while let Some(line) = source.next_line()? {
        ensure!(!cancelled(), CancelledSnafu);
        sink.write_line(&line)?;
        written += 1;
    }
    sink.finish()?;
    Ok(written)
}

/// Decode one MXF ANC line's payload to a 42-byte teletext packet, rasterising VBI samples down
/// to T42 first if that's what the line carries.
fn anc_line_to_t42(payload: &[u8]) -> Result<[u8; 42]> {
    match payload.len() {
        42 => Ok(payload.try_into().expect("length checked above")),
        vbi::VBI_LEN | vbi::VBI_DOUBLE_LEN => Ok(vbi::vbi_to_t42(payload)?),
        _ => UnsupportedConversionSnafu {
            from: "mxf ANC line (unrecognised payload length)",
            to: "caption line",
        }
        .fail(),
    }
}

/// Convert an MXF container's System timecodes and ANC teletext lines to a caption file.
///
/// Only [`mxf::Mode::Filter`] input is meaningful here: an [`mxf::Event::Extracted`] event (raised
/// only under [`mxf::Mode::Extract`]) carries an arbitrary essence value with no caption
/// semantics, so reaching one here reports [`crate::error::Error::UnsupportedConversion`] instead
/// of silently dropping it — a caller who wants both extraction and caption emission from the
/// same MXF file should drive [`Handler`] directly and route [`Event::Extracted`] itself.
///
/// Lines are timestamped with the most recently seen `System` timecode, or left untimestamped if
/// an ANC line arrives before any `System` pack has been parsed.
pub fn convert_mxf<R: Read, W: Write>(
    reader: R,
    mode: mxf::Mode,
    timebase: Timebase,
    output: Output,
    writer: W,
    mut cancelled: impl FnMut() -> bool,
) -> Result<u64> {
    let mut handler = Handler::new(reader, mode);
    let mut sink = Sink::new(output, writer, timebase);
    let mut sequence_number = 0u64;
    let mut current_timecode = None;
    let mut written = 0u64;
    while let Some(event) = handler.next_event()? {
        ensure!(!cancelled(), CancelledSnafu);
        match event {
            Event::SystemTimecode(timecode) => current_timecode = Some(timecode),
            Event::AncLine(anc_line) => {
                let t42_bytes = anc_line_to_t42(&anc_line.payload)?;
                sequence_number += 1;
                let line = Line::from_t42(sequence_number, current_timecode, t42_bytes)?;
                sink.write_line(&line)?;
                written += 1;
            }
            Event::Extracted { key, .. } => {
                return UnsupportedConversionSnafu {
                    from: keys::name_for(&key).unwrap_or("unrecognised MXF essence key"),
                    to: "caption line",
                }
                .fail();
            }
        }
    }
    sink.finish()?;
    Ok(written)
}

#[cfg(test)]
mod tests;
