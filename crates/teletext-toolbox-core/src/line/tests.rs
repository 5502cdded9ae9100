use googletest::prelude::*;
use rstest::rstest;

use super::*;

fn t42_line(magazine: Option<u8>, row: Option<u8>, payload_len: usize) -> Line {
    Line {
        sequence_number: 0,
        timecode: None,
        magazine,
        row,
        format: Format::T42,
        payload: vec![0u8; payload_len],
        sample_coding: 0,
        sample_count: 0,
        text: String::new(),
    }
}

#[googletest::test]
fn test_new_valid_t42_line() {
    let line = Line::new(0, None, Some(8), Some(20), Format::T42, vec![0u8; 42], 0, 0, String::new());
    expect_that!(line.is_ok(), eq(true));
}

#[googletest::test]
fn test_new_rejects_wrong_payload_length() {
    let result = Line::new(0, None, Some(8), Some(20), Format::T42, vec![0u8; 10], 0, 0, String::new());
    expect_that!(
        result,
        err(eq(Error::BadPayloadLength { format: Format::T42, expected: 42, actual: 10 }))
    );
}

#[rstest]
#[case(0)]
#[case(9)]
fn test_new_rejects_out_of_range_magazine(#[case] magazine: u8) {
    let result = Line::new(0, None, Some(magazine), Some(0), Format::T42, vec![0u8; 42], 0, 0, String::new());
    expect_that!(result, err(eq(Error::BadMagazine { value: magazine })));
}

#[googletest::test]
fn test_new_rejects_out_of_range_row() {
    let result = Line::new(0, None, Some(1), Some(32), Format::T42, vec![0u8; 42], 0, 0, String::new());
    expect_that!(result, err(eq(Error::BadRow { value: 32 })));
}

#[googletest::test]
fn test_new_vbi_line_allows_no_magazine_or_row() {
    let line = Line::new(0, None, None, None, Format::Vbi, vec![0u8; 720], 0, 0, String::new());
    expect_that!(line.is_ok(), eq(true));
}

#[googletest::test]
fn test_vbi_double_line_requires_1440_bytes() {
    let result = Line::new(0, None, None, None, Format::VbiDouble, vec![0u8; 720], 0, 0, String::new());
    expect_that!(
        result,
        err(eq(Error::BadPayloadLength { format: Format::VbiDouble, expected: 1440, actual: 720 }))
    );
}

#[googletest::test]
fn test_packet_header_matches_line_count() {
    let lines = vec![t42_line(Some(8), Some(20), 42), t42_line(Some(8), Some(21), 42)];
    let timecode =
        crate::timecode::Timecode::from_hmsf(0, 0, 0, 0, crate::timecode::Timebase::Fps25, false)
            .unwrap();
    let packet = Packet::new(timecode, lines);
    expect_that!(packet.header(), eq([0x00, 0x02]));
    expect_that!(packet.check_header([0x00, 0x02]), ok(anything()));
}

#[googletest::test]
fn test_packet_check_header_rejects_mismatch() {
    let lines = vec![t42_line(Some(8), Some(20), 42)];
    let timecode =
        crate::timecode::Timecode::from_hmsf(0, 0, 0, 0, crate::timecode::Timebase::Fps25, false)
            .unwrap();
    let packet = Packet::new(timecode, lines);
    expect_that!(
        packet.check_header([0x00, 0x05]),
        err(eq(Error::HeaderMismatch { declared: 5, actual: 1 }))
    );
}
