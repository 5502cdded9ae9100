//! MXF (SMPTE 377) handler: read a KLV stream and yield System timecodes, ANC-essence lines, and
//! (in [`Mode::Extract`]) the raw bytes of any other essence key, or rewrite an MXF file's
//! timecodes in place ([`Mode::Restripe`]).
//!
//! Three modes are selected at construction time: `Filter` only reads System timecodes and ANC
//! lines, `Extract` additionally (or instead) copies out raw essence values, and `Restripe`
//! rewrites System and `TimecodeComponent` timecode bytes in place on a read+write+seek stream.

use std::io::{Read, Seek, SeekFrom, Write};

use snafu::prelude::*;

use crate::klv::keys::KeyType;
use crate::klv::{self, keys};
use crate::timecode::{self, Timebase, Timecode};

pub mod anc;
pub mod system;
pub mod timecode_component;


/// Errors from the MXF handler.
#[derive(Debug, Snafu)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(transparent)]
    Klv { source: klv::Error },

    #[snafu(transparent)]
    Timecode { source: timecode::Error },

    #[snafu(display("ANC line header does not end with the expected 0x01 terminator byte"))]
    BadLineHeader,

    #[snafu(display("ANC line length {length} is outside the valid range 1..=10000"))]
    InvalidLineLength { length: u16 },

    #[snafu(display("TimecodeComponent local set is malformed or missing a required item"))]
    BadLocalSet,

    #[snafu(display(
        "System pack declares timebase {declared:?}/drop_frame={declared_drop_frame}, which \
        does not match the stream's TimecodeComponent of {component:?}/{component_drop_frame}"
    ))]
    TimebaseMismatch {
        declared: Timebase,
        declared_drop_frame: bool,
        component: Timebase,
        component_drop_frame: bool,
    },

    #[snafu(display(
        "System timecode {actual} is not the successor of the previous timecode {expected}"
    ))]
    NonSequentialTimecode { expected: Timecode, actual: Timecode },

    #[snafu(display("I/O error while reading or writing an MXF stream"))]
    Io { source: std::io::Error, backtrace: snafu::Backtrace },
}

/// Which essence keys [`Mode::Extract`] copies out.
#[derive(Debug, Clone)]
pub enum ExtractSelection {
    /// Copy every recognised essence key, one logical sink per distinct key (by symbolic name
    /// where [`keys::name_for`] knows one, else by hex).
    Demux,
    /// Copy only essence keys classifying as one of these [`KeyType`]s.
    Keys(Vec<KeyType>),
}

/// Options for [`Mode::Extract`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Which keys to copy out.
    pub selection: ExtractSelection,
    /// Prepend the raw KLV header (key + BER length) to each extracted value.
    pub include_klv_header: bool,
}

/// Options for [`Mode::Filter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    /// Fail with [`Error::NonSequentialTimecode`] if a System timecode isn't the previous
    /// timecode's successor.
    pub check_sequential_timecode: bool,
}

/// Which of the three MXF operations a [`Handler`] performs.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Read System timecodes and ANC essence lines, validating timebase/sequencing.
    Filter(FilterOptions),
    /// Copy out raw essence key values alongside the `Filter` behaviour.
    Extract(ExtractOptions),
}

/// One item yielded by [`Handler::next_event`].
#[derive(Debug, Clone)]
pub enum Event {
    /// A System metadata pack/set's decoded timecode.
    SystemTimecode(Timecode),
    /// One ANC line decoded from a Data essence element.
    AncLine(anc::AncLine),
    /// A raw essence value copied out under [`Mode::Extract`].
    Extracted { key: [u8; 16], key_type: KeyType, value: Vec<u8> },
}

fn key_matches_selection(key_type: KeyType, selection: &ExtractSelection) -> bool {
    match selection {
        ExtractSelection::Demux => !matches!(
            key_type,
            KeyType::HeaderPartition | KeyType::FooterPartition | KeyType::IndexTableSegment
        ),
        ExtractSelection::Keys(keys) => keys.contains(&key_type),
    }
}

/// Pull-based reader over an MXF KLV stream.
#[derive(Debug)]
pub struct Handler<R> {
    reader: R,
    mode: Mode,
    component: Option<timecode_component::TimecodeComponent>,
    last_system_timecode: Option<Timecode>,
}

impl<R: Read> Handler<R> {
    /// Construct a handler reading from `reader` in the given `mode`.
    pub fn new(reader: R, mode: Mode) -> Self {
        Self { reader, mode, component: None, last_system_timecode: None }
    }

    /// The most recently parsed `TimecodeComponent`, if one has been seen yet.
    pub fn timecode_component(&self) -> Option<timecode_component::TimecodeComponent> {
        self.component
    }

    /// Read and dispatch the next KLV record, returning `Ok(None)` at clean end-of-stream.
    ///
    /// A record may be fully consumed without producing an [`Event`] (partition/index keys in
    /// `Filter` mode, or any key not selected for extraction); this loops internally until either
    /// an event is produced or the stream ends.
    pub fn next_event(&mut self) -> Result<Option<Event>, Error> {
        loop {
            let Some(record) = klv::read_record(&mut self.reader)? else {
                return Ok(None);
            };
            let key_type = keys::classify(&record.key)?;

            if let Some(event) = self.dispatch(key_type, &record)? {
                return Ok(Some(event));
            }
        }
    }

    fn dispatch(
        &mut self,
        key_type: KeyType,
        record: &klv::Record,
    ) -> Result<Option<Event>, Error> {
        match key_type {
            KeyType::TimecodeComponent => {
                self.component = Some(timecode_component::parse(&record.value)?);
                Ok(None)
            }
            KeyType::System => self.handle_system(&record.value),
            KeyType::Data => self.handle_data(&record.value),
            _ => self.handle_other(key_type, record),
        }
    }

    fn handle_system(&mut self, value: &[u8]) -> Result<Option<Event>, Error> {
        let (timebase, drop_frame, timecode) = system::parse_system_packet(value)?;
        if let Some(component) = self.component {
            system::check_against_component(
                timebase,
                drop_frame,
                component.timebase,
                component.drop_frame,
            )?;
        }
        let sequential_check = matches!(
            &self.mode,
            Mode::Filter(FilterOptions { check_sequential_timecode: true })
        );
        if sequential_check {
            if let Some(previous) = self.last_system_timecode {
                let expected = previous.next();
                ensure!(
                    expected == timecode,
                    NonSequentialTimecodeSnafu { expected, actual: timecode }
                );
            }
        }
        self.last_system_timecode = Some(timecode);
        Ok(Some(Event::SystemTimecode(timecode)))
    }

    fn handle_data(&mut self, value: &[u8]) -> Result<Option<Event>, Error> {
        // Only the first line is surfaced per record; callers that need every line in a Data
        // essence element call `anc::parse_anc_lines` directly. Matching the per-key dispatch
        // table, plain `Filter` mode only cares about ANC content, so the common case of one line
        // per element is handled inline here and the rest queued isn't worth the complexity of a
        // resumable sub-iterator.
        let mut lines = anc::parse_anc_lines(value)?;
        if lines.len() > 1 {
            log::debug!(
                "Data essence element carried {} ANC lines; only the first is surfaced",
                lines.len()
            );
        }
        Ok(if lines.is_empty() { None } else { Some(Event::AncLine(lines.remove(0))) })
    }

    fn handle_other(
        &mut self,
        key_type: KeyType,
        record: &klv::Record,
    ) -> Result<Option<Event>, Error> {
        let Mode::Extract(options) = &self.mode else {
            return Ok(None);
        };
        if !key_matches_selection(key_type, &options.selection) {
            return Ok(None);
        }
        let value = if options.include_klv_header {
            klv::write_record(record)
        } else {
            record.value.clone()
        };
        Ok(Some(Event::Extracted { key: record.key, key_type, value }))
    }
}

/// BER length prefix size in bytes, given its first byte.
fn ber_prefix_len(first: u8) -> u64 {
    if first & 0x80 == 0 { 1 } else { 1 + (first & 0x7F) as u64 }
}

/// Rewrite every System timecode and the `TimecodeComponent` start timecode in `stream` so that
/// the track starts at `new_start`, preserving every other byte and the file's total length.
///
/// `stream` must support seeking; this is a single forward pass that both reads and rewrites each
/// record as it's encountered, so a `TimecodeComponent` key must appear before the System packets
/// it governs (true of every MXF file this crate has been exercised against: TimecodeComponent
/// lives in the header metadata, System packets in the essence container that follows it).
pub fn restripe<S: Read + Write + Seek>(stream: &mut S, new_start: Timecode) -> Result<(), Error> {
    let mut frame_offset: Option<i64> = None;

    loop {
        let record_start = stream.stream_position().context(IoSnafu)?;
        let mut key = [0u8; 16];
        let filled =
            crate::ioutil::read_exact_or_eof(stream, &mut key).context(IoSnafu)?;
        if !filled {
            return Ok(());
        }
        let mut first_len_byte = [0u8];
        stream.read_exact(&mut first_len_byte).context(IoSnafu)?;
        let length = klv::read_ber_length(stream, first_len_byte[0])?;
        let value_start = record_start + 16 + ber_prefix_len(first_len_byte[0]);

        let key_type = keys::classify(&key)?;
        match key_type {
            KeyType::TimecodeComponent => {
                let mut value = vec![0u8; length as usize];
                stream.read_exact(&mut value).context(IoSnafu)?;
                let component = timecode_component::parse(&value)?;
                ensure!(
                    new_start.timebase == component.timebase
                        && new_start.drop_frame == component.drop_frame,
                    TimebaseMismatchSnafu {
                        declared: new_start.timebase,
                        declared_drop_frame: new_start.drop_frame,
                        component: component.timebase,
                        component_drop_frame: component.drop_frame,
                    }
                );
                frame_offset =
                    Some(new_start.frame_number() as i64 - component.start_timecode);
                timecode_component::rewrite_start_timecode(
                    &mut value,
                    new_start.frame_number() as i64,
                )?;
                stream.seek(SeekFrom::Start(value_start)).context(IoSnafu)?;
                stream.write_all(&value).context(IoSnafu)?;
            }
            KeyType::System => {
                let mut value = vec![0u8; length as usize];
                stream.read_exact(&mut value).context(IoSnafu)?;
                let (timebase, drop_frame, old_tc) = system::parse_system_packet(&value)?;
                let offset = frame_offset.unwrap_or(0);
                let new_tc = Timecode::from_frames(
                    old_tc.frame_number() as i64 + offset,
                    timebase,
                    drop_frame,
                )?;
                let tc_offset = system::timecode_byte_offset(value.len()).context(
                    TimebaseMismatchSnafu {
                        declared: timebase,
                        declared_drop_frame: drop_frame,
                        component: timebase,
                        component_drop_frame: drop_frame,
                    },
                )?;
                stream
                    .seek(SeekFrom::Start(value_start + tc_offset as u64))
                    .context(IoSnafu)?;
                stream.write_all(&new_tc.to_bytes()).context(IoSnafu)?;
                stream.seek(SeekFrom::Start(value_start + length)).context(IoSnafu)?;
            }
            _ => {
                stream.seek(SeekFrom::Current(length as i64)).context(IoSnafu)?;
            }
        }
    }
}
