//! Headerless fixed-record VBI/T42 stream reading: one [`Line`] per 720-, 1440-, or 42-byte
//! record, with timecodes synthesised by counting lines and advancing one frame every
//! `lines_per_frame` records.
//!
//! VBI records are decoded through [`crate::vbi::vbi_to_t42`] immediately on read, so every
//! [`Line`] this reader yields is [`Format::T42`] — the canonical intermediate representation
//! every emitter in this crate consumes.

use std::io::Read;

use snafu::prelude::*;

use crate::bufpool::BufferPool;
use crate::line::{Format, Line};
use crate::timecode::{self, Timebase, Timecode};
use crate::{ioutil, t42, vbi};


/// Default number of lines making up one video frame, when the caller doesn't override it.
pub const DEFAULT_LINES_PER_FRAME: u32 = 25;

/// Errors reading a VBI/T42 stream.
#[derive(Debug, Snafu)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(transparent)]
    Vbi { source: vbi::Error },

    #[snafu(transparent)]
    T42 { source: t42::Error },

    #[snafu(transparent)]
    Line { source: crate::line::Error },

    #[snafu(transparent)]
    Timecode { source: timecode::Error },

    #[snafu(display("I/O error while reading a VBI/T42 stream"))]
    Io { source: std::io::Error, backtrace: snafu::Backtrace },
}

/// The one fixed-size buffer pool this reader's `format` draws from, sized to match
/// [`Format::payload_len`].
#[derive(Debug)]
enum Pool {
    T42(BufferPool<42>),
    Vbi(BufferPool<720>),
    VbiDouble(BufferPool<1440>),
}

impl Pool {
    fn for_format(format: Format) -> Self {
        match format {
            Format::T42 => Pool::T42(BufferPool::new()),
            Format::Vbi => Pool::Vbi(BufferPool::new()),
            Format::VbiDouble => Pool::VbiDouble(BufferPool::new()),
        }
    }
}

/// Reads fixed-size records from a headerless VBI or T42 capture, yielding [`Line`]s with
/// synthesised timecodes.
#[derive(Debug)]
pub struct StreamReader<R> {
    reader: R,
    timebase: Timebase,
    drop_frame: bool,
    lines_per_frame: u32,
    sequence_number: u64,
    line_in_frame: u32,
    frame_number: i64,
    pool: Pool,
}

impl<R: Read> StreamReader<R> {
    /// Construct a reader over fixed-size `format` records, synthesising timecodes at `timebase`
    /// (never drop-frame, since raw VBI/T42 captures carry no drop-frame declaration of their
    /// own), advancing one frame every `lines_per_frame` records.
    pub fn new(reader: R, format: Format, timebase: Timebase, lines_per_frame: u32) -> Self {
        Self {
            reader,
            timebase,
            drop_frame: false,
            lines_per_frame: lines_per_frame.max(1),
            sequence_number: 0,
            line_in_frame: 0,
            frame_number: 0,
            pool: Pool::for_format(format),
        }
    }

    /// Read and decode the next record, returning `Ok(None)` at a clean end-of-stream.
    ///
    /// The record is read into a buffer borrowed from this reader's [`Pool`], so that streaming
    /// through a long capture doesn't allocate a fresh buffer per line; the buffer is returned to
    /// the pool as soon as it goes out of scope at the end of this call.
    pub fn next_line(&mut self) -> Result<Option<Line>, Error> {
        let t42_bytes = match &self.pool {
            Pool::T42(pool) => {
                let mut buf = pool.take();
                let filled =
                    ioutil::read_exact_or_eof(&mut self.reader, &mut *buf).context(IoSnafu)?;
                if !filled {
                    return Ok(None);
                }
                *buf
            }
            Pool::Vbi(pool) => {
                let mut buf = pool.take();
                let filled =
                    ioutil::read_exact_or_eof(&mut self.reader, &mut *buf).context(IoSnafu)?;
                if !filled {
                    return Ok(None);
                }
                vbi::vbi_to_t42(&*buf)?
            }
            Pool::VbiDouble(pool) => {
                let mut buf = pool.take();
                let filled =
                    ioutil::read_exact_or_eof(&mut self.reader, &mut *buf).context(IoSnafu)?;
                if !filled {
                    return Ok(None);
                }
                vbi::vbi_to_t42(&*buf)?
            }
        };

        let timecode =
            Timecode::from_frames(self.frame_number, self.timebase, self.drop_frame)?;
        self.sequence_number += 1;
        let line = Line::from_t42(self.sequence_number, Some(timecode), t42_bytes)?;

        self.line_in_frame += 1;
        if self.line_in_frame >= self.lines_per_frame {
            self.line_in_frame = 0;
            self.frame_number += 1;
        }

        Ok(Some(line))
    }
}
