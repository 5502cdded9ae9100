use rstest::rstest;
use googletest::prelude::*;

use super::*;

#[rstest]
#[case(0x00)]
#[case(0xFF)]
#[case(0xA5)]
#[case(0x01)]
fn test_reverse_bits_is_its_own_inverse(#[case] byte: u8) {
    expect_that!(reverse_bits(reverse_bits(byte)), eq(byte));
}

fn packet_with_sync_bytes(stride: usize, count: usize, sync_offset: usize) -> Vec<u8> {
    let mut buf = vec![0xFFu8; sync_offset + stride * count + 4];
    let mut offset = sync_offset;
    while offset < buf.len() {
        buf[offset] = SYNC_BYTE;
        offset += stride;
    }
    buf
}

#[googletest::test]
fn test_detect_packet_size_finds_192_byte_stride() {
    let data = packet_with_sync_bytes(PACKET_SIZE_192, 8, 3);
    let mut cursor = std::io::Cursor::new(data);
    let size = detect_packet_size(&mut cursor).unwrap();
    expect_that!(size, eq(PACKET_SIZE_192));
}

#[googletest::test]
fn test_detect_packet_size_defaults_to_188() {
    let data = packet_with_sync_bytes(PACKET_SIZE_188, 8, 0);
    let mut cursor = std::io::Cursor::new(data);
    let size = detect_packet_size(&mut cursor).unwrap();
    expect_that!(size, eq(PACKET_SIZE_188));
}

fn ts_packet(pid: u16, payload_unit_start: bool, payload: &[u8]) -> Vec<u8> {
    let mut packet = vec![0xFFu8; 188];
    packet[0] = SYNC_BYTE;
    packet[1] = if payload_unit_start { 0x40 } else { 0x00 } | ((pid >> 8) as u8 & 0x1F);
    packet[2] = (pid & 0xFF) as u8;
    packet[3] = 0x10; // no adaptation field, payload present, continuity counter 0
    packet[4..4 + payload.len()].copy_from_slice(payload);
    packet
}

#[googletest::test]
fn test_decode_packet_header_rejects_bad_sync_byte() {
    let mut packet = ts_packet(0x100, true, &[]);
    packet[0] = 0x00;
    expect_that!(matches!(decode_packet_header(&packet), Err(Error::BadSyncByte)), eq(true));
}

#[googletest::test]
fn test_decode_packet_header_reads_pid_and_pusi() {
    let packet = ts_packet(0x1FFF, true, &[]);
    let (header, offset) = decode_packet_header(&packet).unwrap();
    expect_that!(header.pid, eq(0x1FFF));
    expect_that!(header.payload_unit_start, eq(true));
    expect_that!(offset, eq(4));
}

fn pat_section(programs: &[(u16, u16)]) -> Vec<u8> {
    let mut section = vec![0u8; 8];
    section[0] = 0x00; // table id
    section[3] = 0x00; // transport stream id hi
    section[4] = 0x01;
    for &(program_number, pmt_pid) in programs {
        section.extend_from_slice(&program_number.to_be_bytes());
        section.push(0xE0 | ((pmt_pid >> 8) as u8 & 0x1F));
        section.push((pmt_pid & 0xFF) as u8);
    }
    let length = (section.len() - 3 + 4) as u16; // + 4-byte CRC not actually appended
    section[1] = 0xB0 | ((length >> 8) as u8 & 0x0F);
    section[2] = (length & 0xFF) as u8;
    section
}

#[googletest::test]
fn test_parse_pat_extracts_pmt_pid() {
    let section = pat_section(&[(1, 0x100)]);
    let programs = parse_pat(&section);
    expect_that!(programs, eq(vec![(1u16, 0x100u16)]));
}

fn pmt_section(teletext_pid: u16, video_pid: u16) -> Vec<u8> {
    let mut section = vec![0u8; 12];
    section[0] = 0x02;
    section[10] = 0xF0; // program_info_length hi nibble reserved bits, length 0
    section[11] = 0x00;

    // video stream entry
    section.push(0x02); // MPEG2 video
    section.push(0xE0 | ((video_pid >> 8) as u8 & 0x1F));
    section.push((video_pid & 0xFF) as u8);
    section.push(0xF0);
    section.push(0x00);

    // teletext stream entry with descriptor tag 0x56
    section.push(TELETEXT_STREAM_TYPE);
    section.push(0xE0 | ((teletext_pid >> 8) as u8 & 0x1F));
    section.push((teletext_pid & 0xFF) as u8);
    section.push(0xF0);
    section.push(0x02);
    section.push(TELETEXT_DESCRIPTOR_TAG);
    section.push(0x00); // descriptor length 0

    let length = (section.len() - 3 + 4) as u16;
    section[1] = 0xB0 | ((length >> 8) as u8 & 0x0F);
    section[2] = (length & 0xFF) as u8;
    section
}

#[googletest::test]
fn test_parse_pmt_finds_teletext_and_video_pids() {
    let section = pmt_section(0x200, 0x101);
    let (teletext_pid, video_pids) = parse_pmt(&section);
    expect_that!(teletext_pid, some(eq(0x200u16)));
    expect_that!(video_pids, eq(vec![0x101u16]));
}

fn teletext_pes(pts: Option<u32>, t42_lines: &[[u8; 42]]) -> Vec<u8> {
    let mut buffer = vec![0x00, 0x00, 0x01, 0xBD, 0x00, 0x00];
    buffer.push(0x80); // byte 6: marker bits, scrambling/priority/alignment/copyright unset
    let pts_flag = if pts.is_some() { 0x80 } else { 0x00 };
    buffer.push(pts_flag); // byte 7: PTS_DTS_flags in bits 7..6
    let header_data_length = if pts.is_some() { 5 } else { 0 };
    buffer.push(header_data_length);
    if let Some(pts) = pts {
        let pts = pts as u64;
        let high = ((pts >> 30) & 0x07) as u8;
        let mid = ((pts >> 15) & 0x7FFF) as u16;
        let low = (pts & 0x7FFF) as u16;
        buffer.push((0x20 | (high << 1) | 1));
        buffer.push((mid >> 7) as u8);
        buffer.push((((mid & 0x7F) << 1) | 1) as u8);
        buffer.push((low >> 7) as u8);
        buffer.push((((low & 0x7F) << 1) | 1) as u8);
    }
    buffer.push(TELETEXT_DATA_IDENTIFIER);
    for line in t42_lines {
        buffer.push(0x02); // data_unit_id: teletext
        buffer.push(44); // length: 2 framing bytes + 42 payload bytes
        buffer.push(0x00);
        buffer.push(0x00);
        for &byte in line {
            buffer.push(reverse_bits(byte));
        }
    }
    buffer
}

#[googletest::test]
fn test_parse_pes_extracts_pts_and_unreverses_data_units() {
    let line = [0x55u8; 42];
    let buffer = teletext_pes(Some(12345), &[line]);
    let payload = parse_pes(&buffer).unwrap().unwrap();
    expect_that!(payload.pts, some(eq(12345u64)));
    expect_that!(payload.data_units.into_vec(), eq(vec![line]));
}

#[googletest::test]
fn test_parse_pes_rejects_non_teletext_data_identifier() {
    let mut buffer = teletext_pes(None, &[[0xAAu8; 42]]);
    let header_data_length = buffer[8] as usize;
    buffer[9 + header_data_length] = 0x99;
    let result = parse_pes(&buffer).unwrap();
    expect_that!(result, none());
}

#[googletest::test]
fn test_demuxer_first_pts_yields_zero_timecode() {
    let mut demuxer = Demuxer::new(Timebase::Fps25);
    let line = [0x41u8; 42];
    let buffer = teletext_pes(Some(900_000), &[line]);
    let lines = demuxer.feed(0x200, true, 0, &buffer).unwrap();
    expect_that!(lines, none()); // first feed only opens the buffer

    let next_buffer = teletext_pes(Some(900_000 + 3600), &[line]);
    let lines = demuxer.feed(0x200, true, 1, &next_buffer).unwrap().unwrap();
    expect_that!(lines.len(), eq(1));
    expect_that!(lines[0].timecode.unwrap().frame_number(), eq(0));
}

#[googletest::test]
fn test_demuxer_flush_returns_last_buffered_pes() {
    let mut demuxer = Demuxer::new(Timebase::Fps25);
    let line = [0x41u8; 42];
    let buffer = teletext_pes(Some(900_000), &[line]);
    demuxer.feed(0x200, true, 0, &buffer).unwrap();
    let lines = demuxer.flush(0x200).unwrap().unwrap();
    expect_that!(lines[0].payload, eq(line.to_vec()));
}

#[googletest::test]
fn test_scenario_three_pes_packets_yield_three_lines_in_order() {
    let mut demuxer = Demuxer::new(Timebase::Fps25);
    let a = [0xAAu8; 42];
    let b = [0xBBu8; 42];
    let c = [0xCCu8; 42];

    let mut results = Vec::new();
    for (i, line) in [a, b, c].iter().enumerate() {
        let pts = 900_000 + (i as u32) * 3600;
        let buffer = teletext_pes(Some(pts), &[*line]);
        if let Some(lines) = demuxer.feed(0x200, true, i as u8, &buffer).unwrap() {
            results.push(lines);
        }
    }
    results.push(demuxer.flush(0x200).unwrap().unwrap());

    expect_that!(results.len(), eq(3));
    expect_that!(results[0][0].payload, eq(a.to_vec()));
    expect_that!(results[1][0].payload, eq(b.to_vec()));
    expect_that!(results[2][0].payload, eq(c.to_vec()));
}

#[googletest::test]
fn test_demuxer_survives_a_continuity_counter_jump() {
    // A dropped packet (counter jumps from 0 straight to 5) is logged, not fatal: the PES still
    // reassembles from whatever bytes actually arrived.
    let mut demuxer = Demuxer::new(Timebase::Fps25);
    let line = [0x41u8; 42];
    let buffer = teletext_pes(Some(900_000), &[line]);
    demuxer.feed(0x200, true, 0, &buffer).unwrap();
    let next_buffer = teletext_pes(Some(900_000 + 3600), &[line]);
    let lines = demuxer.feed(0x200, true, 5, &next_buffer).unwrap().unwrap();
    expect_that!(lines.len(), eq(1));
}

#[googletest::test]
fn test_detect_frame_rate_defaults_to_25_with_no_deltas() {
    expect_that!(detect_frame_rate(&[]), eq(Timebase::Fps25));
}

#[googletest::test]
fn test_detect_frame_rate_picks_nearest_rate() {
    // 90000/3600 = 25 exactly.
    expect_that!(detect_frame_rate(&[0, 3600, 7200]), eq(Timebase::Fps25));
    // 90000/1500 = 60 exactly.
    expect_that!(detect_frame_rate(&[0, 1500, 3000]), eq(Timebase::Fps60));
}
