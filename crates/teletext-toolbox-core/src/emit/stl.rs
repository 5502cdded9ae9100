//! EBU-STL (EBU Tech 3264) emitter: a 1024-byte GSI block followed by one 128-byte TTI block per
//! emitted subtitle, with temporal coalescing of successive identical caption rows into a single
//! timed subtitle.

use std::io::Write;

use snafu::prelude::*;

use crate::ioutil;
use crate::line::Line;
use crate::timecode::{Timebase, Timecode};


const GSI_LEN: usize = 1024;
const TTI_LEN: usize = 128;
const TEXT_FIELD_LEN: usize = 112;
const TEXT_PADDING: u8 = 0x8F;

const START_BOX: u8 = 0x0B;
const END_BOX: u8 = 0x0A;
const SUBTITLE_GROUP: u8 = 0x00;
const CUMULATIVE_STATUS: u8 = 0x00;

/// Errors writing an EBU-STL stream.
#[derive(Debug, Snafu)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(display("I/O error while writing an EBU-STL stream"))]
    Io { source: std::io::Error, backtrace: snafu::Backtrace },
}

fn pad_ascii(out: &mut [u8], s: &str) {
    let bytes = s.as_bytes();
    let n = bytes.len().min(out.len());
    out[..n].copy_from_slice(&bytes[..n]);
    for b in &mut out[n..] {
        *b = b' ';
    }
}

/// Build the 1024-byte GSI (General Subtitle Information) block for one output file.
///
/// Field layout follows EBU Tech 3264 §5.1; this crate only ever emits teletext-origin
/// subtitles, so the less-used fields (country of origin, publisher, editor) are left blank
/// rather than plumbed through from a caller that has no such metadata to give.
fn build_gsi(timebase: Timebase, total_subtitles: u16, total_ttis: u16) -> [u8; GSI_LEN] {
    let mut gsi = [b' '; GSI_LEN];

    pad_ascii(&mut gsi[0..3], "850"); // CPN: code page number, Multilingual
    let dfc = match timebase {
        Timebase::Fps30 | Timebase::Fps60 => "STL30.01",
        _ => "STL25.01",
    };
    pad_ascii(&mut gsi[3..11], dfc); // DFC: disk format code
    gsi[11] = b'0'; // DSC: display standard code, open subtitling
    pad_ascii(&mut gsi[12..14], "15"); // CCT: character code table, Latin
    pad_ascii(&mut gsi[14..16], "09"); // LC: language code, English
    pad_ascii(&mut gsi[16..48], ""); // OPT: original programme title
    pad_ascii(&mut gsi[48..80], ""); // OET: original episode title
    pad_ascii(&mut gsi[80..112], ""); // TPT: translated programme title
    pad_ascii(&mut gsi[112..144], ""); // TET: translated episode title
    pad_ascii(&mut gsi[144..176], ""); // TN: translator's name
    pad_ascii(&mut gsi[176..208], ""); // TCD: translator's contact details
    pad_ascii(&mut gsi[208..224], ""); // SLR: subtitle list reference code
    pad_ascii(&mut gsi[224..230], ""); // CD: creation date
    pad_ascii(&mut gsi[230..236], ""); // RD: revision date
    pad_ascii(&mut gsi[236..241], "00000"); // RN: revision number
    pad_ascii(&mut gsi[241..246], &format!("{total_ttis:05}")); // TNB: total number of TTI blocks
    pad_ascii(&mut gsi[246..251], &format!("{total_subtitles:05}")); // TNS: total number of subtitles
    pad_ascii(&mut gsi[251..254], "001"); // TNG: total number of subtitle groups
    pad_ascii(&mut gsi[254..256], "40"); // MNC: maximum number of displayable characters per row
    pad_ascii(&mut gsi[256..258], "23"); // MNR: maximum number of displayable rows
    gsi[258] = b'0'; // TCS: time code status, not intended for use
    pad_ascii(&mut gsi[259..267], "00000000"); // TCP: time code start-of-programme
    pad_ascii(&mut gsi[267..275], "00000000"); // TCF: time code first in-cue
    gsi[275] = b'0'; // TND: total number of disks
    gsi[276] = b'1'; // DSN: disk sequence number
    pad_ascii(&mut gsi[277..280], ""); // CO: country of origin
    pad_ascii(&mut gsi[280..312], ""); // PUB: publisher
    pad_ascii(&mut gsi[312..344], ""); // EN: editor
    pad_ascii(&mut gsi[344..376], ""); // ECD: editor contact details
    // 376..448 spare, 448..1024 user-defined area: both left space-filled.

    gsi
}

fn timecode_bytes(tc: Timecode) -> [u8; 4] {
    [tc.hour, tc.minute, tc.second, tc.frame]
}

fn encode_text(text: &str) -> [u8; TEXT_FIELD_LEN] {
    let mut out = [TEXT_PADDING; TEXT_FIELD_LEN];
    for (slot, ch) in out.iter_mut().zip(text.chars()) {
        *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
    out
}

#[derive(Debug)]
struct OpenSubtitle {
    text: String,
    start: Timecode,
    end: Timecode,
}

fn build_tti(number: u16, subtitle: &OpenSubtitle) -> [u8; TTI_LEN] {
    let mut tti = [0u8; TTI_LEN];
    tti[0] = SUBTITLE_GROUP;
    tti[1..3].copy_from_slice(&number.to_le_bytes());
    tti[3] = 0x00; // EBN: extension block number, last (or only) block
    tti[4] = CUMULATIVE_STATUS;
    tti[5..9].copy_from_slice(&timecode_bytes(subtitle.start));
    tti[9..13].copy_from_slice(&timecode_bytes(subtitle.end));
    tti[13] = 20; // VP: vertical position, row 20 (matches source row 22 with a small safe margin)
    tti[14] = 0x01; // JC: justification code, centred
    tti[15] = 0x00; // CF: comment flag, text (not a comment)

    let mut text = Vec::with_capacity(TEXT_FIELD_LEN);
    text.push(START_BOX);
    text.extend_from_slice(subtitle.text.as_bytes());
    text.push(END_BOX);
    let encoded = encode_text(&String::from_utf8_lossy(&text));
    tti[16..16 + TEXT_FIELD_LEN].copy_from_slice(&encoded);
    tti
}

/// Writes an EBU-STL stream, merging successive lines with identical caption-row text into one
/// timed subtitle.
///
/// A fresh `blank` packet (one whose [`Line::has_meaningful_content`] is false) always closes any
/// currently-open subtitle; [`StlWriter::flush`] must be called once the input is exhausted to
/// emit a subtitle left open by the final line.
#[derive(Debug)]
pub struct StlWriter<W> {
    writer: W,
    timebase: Timebase,
    header_written: bool,
    subtitle_number: u16,
    open: Option<OpenSubtitle>,
}

impl<W: Write> StlWriter<W> {
    /// Construct a writer over `writer`, declaring `timebase` in the GSI disk format code.
    pub fn new(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase, header_written: false, subtitle_number: 0, open: None }
    }

    fn write_header_if_needed(&mut self) -> Result<(), Error> {
        if !self.header_written {
            // Placeholder totals; real totals aren't known until the stream ends, but GSI is a
            // fixed-position header written first. Callers that need exact totals should write
            // to a seekable file and patch bytes 241..251 after `flush`.
            let gsi = build_gsi(self.timebase, 0, 0);
            ioutil::retry_if_interrupted(|| self.writer.write_all(&gsi)).context(IoSnafu)?;
            self.header_written = true;
        }
        Ok(())
    }

    fn flush_open(&mut self) -> Result<(), Error> {
        if let Some(subtitle) = self.open.take() {
            let tti = build_tti(self.subtitle_number, &subtitle);
            self.subtitle_number += 1;
            ioutil::retry_if_interrupted(|| self.writer.write_all(&tti)).context(IoSnafu)?;
        }
        Ok(())
    }

    /// Consume one line, merging it into the open subtitle, flushing, or opening a new one.
    pub fn write_line(&mut self, line: &Line) -> Result<(), Error> {
        self.write_header_if_needed()?;
        let Some(timecode) = line.timecode else { return Ok(()) };

        if !line.has_meaningful_content() {
            return self.flush_open();
        }

        let content = line.text.trim();
        if let Some(open) = &mut self.open {
            if open.text == content {
                open.end = timecode.next();
                return Ok(());
            }
            self.flush_open()?;
        }
        self.open = Some(OpenSubtitle {
            text: content.to_string(),
            start: timecode,
            end: timecode.next(),
        });
        Ok(())
    }

    /// Flush the last open subtitle, if any. Must be called once after the last [`write_line`](
    /// Self::write_line) call to avoid losing it.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.write_header_if_needed()?;
        self.flush_open()
    }
}
