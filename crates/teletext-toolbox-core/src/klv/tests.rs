use std::io::Cursor;

use googletest::prelude::*;
use rstest::rstest;

use super::*;
use crate::testutil::from_hex;

#[rstest]
#[case(0)]
#[case(1)]
#[case(127)]
fn test_ber_length_short_form_round_trips_in_one_byte(#[case] length: u64) {
    let encoded = write_ber_length(length);
    expect_that!(encoded.len(), eq(1));
    let mut reader = Cursor::new(vec![]);
    let decoded = read_ber_length(&mut reader, encoded[0]).unwrap();
    expect_that!(decoded, eq(length));
}

#[rstest]
#[case(128)]
#[case(255)]
#[case(65_536)]
#[case(0xFF_FF_FF_FF)]
#[case(72_057_594_037_927_935)] // 2^56 - 1
fn test_ber_length_long_form_round_trips(#[case] length: u64) {
    let encoded = write_ber_length(length);
    expect_that!(encoded[0] & 0x80, eq(0x80));
    let mut reader = Cursor::new(encoded[1..].to_vec());
    let decoded = read_ber_length(&mut reader, encoded[0]).unwrap();
    expect_that!(decoded, eq(length));
}

#[googletest::test]
fn test_ber_length_rejects_more_than_8_bytes() {
    let mut reader = Cursor::new(vec![0u8; 9]);
    let result = read_ber_length(&mut reader, 0x89);
    expect_that!(result.is_err(), eq(true));
    expect_that!(matches!(result, Err(Error::BadBerLength { count: 9 })), eq(true));
}

#[googletest::test]
fn test_read_record_round_trips_through_write_record() {
    let record = Record {
        key: [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x14,
            0x00, 0x00,
        ],
        value: from_hex("DEADBEEF"),
    };
    let bytes = write_record(&record);
    let mut reader = Cursor::new(bytes);
    let read_back = read_record(&mut reader).unwrap().unwrap();
    expect_that!(read_back, eq(record));
}

#[googletest::test]
fn test_read_record_clean_eof_returns_none() {
    let mut reader = Cursor::new(Vec::<u8>::new());
    let result = read_record(&mut reader).unwrap();
    expect_that!(result, none());
}

#[googletest::test]
fn test_read_record_truncated_key_is_an_error() {
    let mut reader = Cursor::new(from_hex("060E2B34"));
    let result = read_record(&mut reader);
    expect_that!(result.is_err(), eq(true));
}

#[googletest::test]
fn test_read_record_truncated_value_is_an_error() {
    // Key (16 bytes) + length byte claiming 4 bytes of value, but only 1 is present.
    let mut bytes = from_hex("060E2B34025301010D01010101140000");
    bytes.push(0x04); // length = 4
    bytes.push(0xAA); // only one value byte present
    let mut reader = Cursor::new(bytes);
    let result = read_record(&mut reader);
    expect_that!(result.is_err(), eq(true));
}

#[googletest::test]
fn test_write_ber_length_chooses_shortest_form() {
    expect_that!(write_ber_length(0), eq(vec![0x00]));
    expect_that!(write_ber_length(127), eq(vec![0x7F]));
    expect_that!(write_ber_length(128), eq(vec![0x81, 0x80]));
    expect_that!(write_ber_length(256), eq(vec![0x82, 0x01, 0x00]));
}
