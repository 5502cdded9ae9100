//! MPEG-2 Transport Stream demultiplexer: finds the teletext elementary stream via PAT/PMT,
//! reassembles its PES packets, and extracts T42 teletext lines with their timecodes.
//!
//! General references:
//! - ISO/IEC 13818-1 - MPEG-2 Systems (transport stream, PES)
//! - ETSI EN 300 472 - DVB teletext carriage in PES packets

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};

use smallvec::SmallVec;
use snafu::prelude::*;

use crate::line::{Format, Line};
use crate::timecode::{self, Timebase, Timecode};

#[cfg(test)]
mod tests;

const SYNC_BYTE: u8 = 0x47;
const PACKET_SIZE_188: usize = 188;
const PACKET_SIZE_192: usize = 192;
const SCAN_WINDOW: usize = 1880;
const TELETEXT_STREAM_TYPE: u8 = 0x06;
const TELETEXT_DESCRIPTOR_TAG: u8 = 0x56;
const VIDEO_STREAM_TYPES: [u8; 4] = [0x01, 0x02, 0x1B, 0x24];
const TELETEXT_DATA_IDENTIFIER: u8 = 0x10;

/// Errors from the transport-stream handler.
#[derive(Debug, Snafu)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(transparent)]
    Timecode { source: timecode::Error },

    #[snafu(transparent)]
    Line { source: crate::line::Error },

    #[snafu(display("transport stream packet does not start with sync byte 0x47"))]
    BadSyncByte,

    #[snafu(display("I/O error while reading a transport stream"))]
    Io { source: std::io::Error, backtrace: snafu::Backtrace },
}

/// Reverse the bit order of a byte (teletext is transmitted LSB-first in DVB; this crate's T42
/// representation elsewhere is MSB-first).
pub fn reverse_bits(byte: u8) -> u8 {
    let mut b = byte;
    b = (b & 0xF0) >> 4 | (b & 0x0F) << 4;
    b = (b & 0xCC) >> 2 | (b & 0x33) << 2;
    b = (b & 0xAA) >> 1 | (b & 0x55) << 1;
    b
}

/// Detect whether `reader`'s packets are 188 or 192 bytes, by scanning up to [`SCAN_WINDOW`]
/// bytes for the sync byte at each stride and picking whichever has a ≥80% hit rate. Ties favour
/// 188. Leaves the reader's position unspecified; callers must seek back to the start afterwards.
pub fn detect_packet_size<R: Read + Seek>(reader: &mut R) -> Result<usize, Error> {
    let start = reader.stream_position().context(IoSnafu)?;
    let mut buf = vec![0u8; SCAN_WINDOW];
    let read = reader.read(&mut buf).context(IoSnafu)?;
    buf.truncate(read);
    reader.seek(SeekFrom::Start(start)).context(IoSnafu)?;

    let Some(first_sync) = buf.iter().position(|&b| b == SYNC_BYTE) else {
        return Ok(PACKET_SIZE_188);
    };

    let hit_rate = |stride: usize| -> f64 {
        let mut hits = 0usize;
        let mut total = 0usize;
        let mut offset = first_sync;
        while offset < buf.len() {
            total += 1;
            if buf[offset] == SYNC_BYTE {
                hits += 1;
            }
            offset += stride;
        }
        if total == 0 { 0.0 } else { hits as f64 / total as f64 }
    };

    let rate_188 = hit_rate(PACKET_SIZE_188);
    let rate_192 = hit_rate(PACKET_SIZE_192);
    if rate_192 > rate_188 && rate_192 >= 0.8 {
        Ok(PACKET_SIZE_192)
    } else {
        Ok(PACKET_SIZE_188)
    }
}

/// One decoded transport-stream packet header.
#[derive(Debug, Clone, Copy)]
pub struct PacketHeader {
    pub pid: u16,
    pub payload_unit_start: bool,
    pub continuity_counter: u8,
}

/// Decode a packet header and return it along with the offset its payload starts at.
pub fn decode_packet_header(packet: &[u8]) -> Result<(PacketHeader, usize), Error> {
    ensure!(packet.first() == Some(&SYNC_BYTE), BadSyncByteSnafu);
    let payload_unit_start = packet[1] & 0x40 != 0;
    let pid = (((packet[1] & 0x1F) as u16) << 8) | packet[2] as u16;
    let adaptation_field_control = (packet[3] >> 4) & 0x03;
    let continuity_counter = packet[3] & 0x0F;
    let has_adaptation = adaptation_field_control & 0b10 != 0;
    let has_payload = adaptation_field_control & 0b01 != 0;

    let mut offset = 4;
    if has_adaptation {
        let adaptation_length = packet.get(offset).copied().unwrap_or(0) as usize;
        offset += 1 + adaptation_length;
    }
    if !has_payload {
        offset = packet.len();
    }
    Ok((PacketHeader { pid, payload_unit_start, continuity_counter }, offset.min(packet.len())))
}

/// Walk a PAT payload (after the pointer field) for `(program_number, pmt_pid)` pairs.
pub fn parse_pat(section: &[u8]) -> Vec<(u16, u16)> {
    if section.first() != Some(&0x00) {
        return Vec::new();
    }
    let section_length = (((section[1] & 0x0F) as usize) << 8) | section[2] as usize;
    let end = (3 + section_length).saturating_sub(4).min(section.len());
    let mut programs = Vec::new();
    let mut offset = 8;
    while offset + 4 <= end {
        let program_number = ((section[offset] as u16) << 8) | section[offset + 1] as u16;
        let pid = (((section[offset + 2] & 0x1F) as u16) << 8) | section[offset + 3] as u16;
        if program_number != 0 {
            programs.push((program_number, pid));
        }
        offset += 4;
    }
    programs
}

/// Walk a PMT payload for the DVB teletext elementary PID (if any) and every video elementary PID.
pub fn parse_pmt(section: &[u8]) -> (Option<u16>, Vec<u16>) {
    if section.first() != Some(&0x02) {
        return (None, Vec::new());
    }
    let section_length = (((section[1] & 0x0F) as usize) << 8) | section[2] as usize;
    let end = (3 + section_length).saturating_sub(4).min(section.len());
    let program_info_length = (((section[10] & 0x0F) as usize) << 8) | section[11] as usize;
    let mut offset = 12 + program_info_length;

    let mut teletext_pid = None;
    let mut video_pids = Vec::new();
    while offset + 5 <= end {
        let stream_type = section[offset];
        let elementary_pid = (((section[offset + 1] & 0x1F) as u16) << 8) | section[offset + 2] as u16;
        let es_info_length = (((section[offset + 3] & 0x0F) as usize) << 8) | section[offset + 4] as usize;
        let es_info_start = offset + 5;
        let es_info_end = (es_info_start + es_info_length).min(end);

        if VIDEO_STREAM_TYPES.contains(&stream_type) {
            video_pids.push(elementary_pid);
        }
        if stream_type == TELETEXT_STREAM_TYPE {
            let mut d = es_info_start;
            while d + 2 <= es_info_end {
                let tag = section[d];
                let len = section[d + 1] as usize;
                if tag == TELETEXT_DESCRIPTOR_TAG {
                    teletext_pid = Some(elementary_pid);
                }
                d += 2 + len;
            }
        }
        offset = es_info_end;
    }
    (teletext_pid, video_pids)
}

/// Pick a frame rate from a sorted-by-arrival list of video-PID PES start PTS values, per the
/// minimum-delta heuristic: ignore deltas outside `1..=10_000` 90kHz ticks, map the smallest
/// surviving delta to the nearest of the recognised rates.
pub fn detect_frame_rate(pts_values: &[u64]) -> Timebase {
    let min_delta = pts_values
        .windows(2)
        .filter_map(|pair| pair[1].checked_sub(pair[0]))
        .filter(|&delta| delta > 0 && delta <= 10_000)
        .min();

    let Some(delta) = min_delta else {
        return Timebase::Fps25;
    };
    let rate = 90_000.0 / delta as f64;
    let candidates = [
        Timebase::Fps24,
        Timebase::Fps25,
        Timebase::Fps30,
        Timebase::Fps48,
        Timebase::Fps50,
        Timebase::Fps60,
    ];
    candidates
        .into_iter()
        .min_by(|a, b| {
            (a.rate() as f64 - rate).abs().total_cmp(&(b.rate() as f64 - rate).abs())
        })
        .unwrap_or(Timebase::Fps25)
}

/// One PES packet's parsed contents: its PTS (if present) and the T42 data units it carried.
///
/// A teletext PES packet almost always carries one or two data units, so `data_units` is a
/// [`SmallVec`] to avoid a heap allocation in the common case.
#[derive(Debug, Clone, Default)]
pub struct PesPayload {
    pub pts: Option<u64>,
    pub data_units: SmallVec<[[u8; 42]; 4]>,
}

fn read_pts(bytes: &[u8]) -> Option<u64> {
    if bytes[0] & 1 != 1 || bytes[2] & 1 != 1 || bytes[4] & 1 != 1 {
        return None;
    }
    let high = ((bytes[0] >> 1) & 0x07) as u64;
    let mid = ((bytes[1] as u64) << 7) | ((bytes[2] as u64) >> 1);
    let low = ((bytes[3] as u64) << 7) | ((bytes[4] as u64) >> 1);
    Some((high << 30) | (mid << 15) | low)
}

/// Parse one complete, reassembled PES packet buffer into its PTS and teletext data units.
///
/// Returns `Ok(None)` if the buffer isn't a teletext PES (wrong start code, or the EBU data
/// identifier byte isn't 0x10) — callers should drop these PES packets rather than error out.
pub fn parse_pes(buffer: &[u8]) -> Result<Option<PesPayload>, Error> {
    if buffer.len() < 9 || buffer[0..3] != [0x00, 0x00, 0x01] {
        return Ok(None);
    }
    let flags = buffer[7];
    let pts_flag = (flags >> 6) & 0x03;
    let pts = if pts_flag == 0b10 || pts_flag == 0b11 {
        buffer.get(9..14).and_then(|b| read_pts(b))
    } else {
        None
    };

    let header_data_length = buffer[8] as usize;
    let data_start = 9 + header_data_length;
    if buffer.get(data_start) != Some(&TELETEXT_DATA_IDENTIFIER) {
        return Ok(None);
    }

    let mut data_units = SmallVec::new();
    let mut offset = data_start + 1;
    while offset + 2 <= buffer.len() {
        let data_unit_id = buffer[offset];
        let data_unit_length = buffer[offset + 1] as usize;
        let unit_start = offset + 2;
        let unit_end = unit_start + data_unit_length;
        if unit_end > buffer.len() {
            break;
        }
        if matches!(data_unit_id, 0x02 | 0x03) {
            // [2 framing bytes, 42 T42 bytes] when length == 44; just the 42 bytes when 46.
            let t42_start = if data_unit_length == 44 { unit_start + 2 } else { unit_start };
            if t42_start + 42 <= unit_end {
                let mut line = [0u8; 42];
                for (i, slot) in line.iter_mut().enumerate() {
                    *slot = reverse_bits(buffer[t42_start + i]);
                }
                data_units.push(line);
            }
        }
        offset = unit_end;
    }
    Ok(Some(PesPayload { pts, data_units }))
}

/// Reassembles PES packets per-PID from transport-stream packet payloads, and converts PTS values
/// to [`Timecode`]s relative to the first PTS observed.
#[derive(Debug)]
pub struct Demuxer {
    buffers: HashMap<u16, Vec<u8>>,
    first_pts: Option<u64>,
    frame_rate: Timebase,
    next_frame_counter: u32,
    sequence_number: u64,
    last_continuity: HashMap<u16, u8>,
}

impl Demuxer {
    /// Construct a demuxer that converts PTS values assuming `frame_rate`.
    pub fn new(frame_rate: Timebase) -> Self {
        Self {
            buffers: HashMap::new(),
            first_pts: None,
            frame_rate,
            next_frame_counter: 0,
            sequence_number: 0,
            last_continuity: HashMap::new(),
        }
    }

    /// Track `pid`'s continuity counter, logging (not failing) on an unexpected jump. A packet
    /// carrying no payload repeats the previous counter, which is not a jump.
    fn check_continuity(&mut self, pid: u16, continuity_counter: u8) {
        if let Some(&last) = self.last_continuity.get(&pid) {
            let expected = (last + 1) & 0x0F;
            if continuity_counter != last && continuity_counter != expected {
                log::warn!(
                    "PID {pid:#x}: continuity counter jumped from {last} to {continuity_counter}, expected {expected}"
                );
            }
        }
        self.last_continuity.insert(pid, continuity_counter);
    }

    /// Feed one transport-stream packet's payload for `pid`. If `payload_unit_start` is set, any
    /// previously buffered PES for this PID is finalised and returned (parsed into lines) before
    /// starting the new buffer.
    pub fn feed(
        &mut self,
        pid: u16,
        payload_unit_start: bool,
        continuity_counter: u8,
        payload: &[u8],
    ) -> Result<Option<Vec<Line>>, Error> {
        self.check_continuity(pid, continuity_counter);
        let mut finished = None;
        if payload_unit_start {
            if let Some(buffer) = self.buffers.remove(&pid) {
                finished = self.finalize(buffer)?;
            }
            self.buffers.insert(pid, payload.to_vec());
        } else if let Some(buffer) = self.buffers.get_mut(&pid) {
            buffer.extend_from_slice(payload);
        }
        Ok(finished)
    }

    /// Finalise and parse any PID's buffered PES data (used at end-of-stream).
    pub fn flush(&mut self, pid: u16) -> Result<Option<Vec<Line>>, Error> {
        match self.buffers.remove(&pid) {
            Some(buffer) => self.finalize(buffer),
            None => Ok(None),
        }
    }

    fn finalize(&mut self, buffer: Vec<u8>) -> Result<Option<Vec<Line>>, Error> {
        let Some(payload) = parse_pes(&buffer)? else {
            log::debug!("dropping PES packet that isn't EBU teletext (bad start code or data identifier)");
            return Ok(None);
        };
        if payload.data_units.is_empty() {
            return Ok(None);
        }
        let timecode = self.next_timecode(payload.pts)?;
        let lines = payload
            .data_units
            .into_iter()
            .map(|t42| {
                self.sequence_number += 1;
                Line::new(
                    self.sequence_number,
                    Some(timecode),
                    None,
                    None,
                    Format::T42,
                    t42.to_vec(),
                    0,
                    0,
                    String::new(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(lines))
    }

    fn next_timecode(&mut self, pts: Option<u64>) -> Result<Timecode, Error> {
        let frame = match pts {
            Some(pts) => {
                let first = *self.first_pts.get_or_insert(pts);
                ((pts.saturating_sub(first)) * self.frame_rate.rate() as u64 / 90_000) as i64
            }
            None => {
                let n = self.next_frame_counter;
                self.next_frame_counter += 1;
                n as i64
            }
        };
        Ok(Timecode::from_frames(frame, self.frame_rate, false)?)
    }
}
