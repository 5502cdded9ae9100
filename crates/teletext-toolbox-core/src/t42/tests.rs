use googletest::prelude::*;
use rstest::rstest;

use super::*;

/// Find a Hamming 8/4-encoded byte for `nibble` (there are two valid encodings per nibble; the
/// first one found, with no error flagged, is used).
fn encode(nibble: u8) -> u8 {
    (0..=255u16)
        .map(|b| b as u8)
        .find(|&b| hamming_decode(b) == (nibble & 0x0F, false))
        .expect("every nibble has at least one valid Hamming 8/4 encoding")
}

#[rstest]
#[case(0x0)]
#[case(0x1)]
#[case(0x7)]
#[case(0xF)]
fn test_hamming_round_trips_clean_nibbles(#[case] nibble: u8) {
    let byte = encode(nibble);
    let (decoded, error) = hamming_decode(byte);
    expect_that!(decoded, eq(nibble));
    expect_that!(error, eq(false));
}

#[googletest::test]
fn test_hamming_corrects_single_bit_error() {
    let clean = encode(0x05);
    for bit in 0..8 {
        let corrupted = clean ^ (1 << bit);
        let (decoded, error) = hamming_decode(corrupted);
        expect_that!(decoded, eq(0x05));
        expect_that!(error, eq(false));
    }
}

#[googletest::test]
fn test_magazine_zero_nibble_means_magazine_8() {
    let byte0 = encode(0x00);
    expect_that!(magazine(byte0), eq(8));
}

#[rstest]
#[case(1)]
#[case(7)]
fn test_magazine_nonzero_nibble(#[case] mag: u8) {
    let byte0 = encode(mag);
    expect_that!(magazine(byte0), eq(mag));
}

#[googletest::test]
fn test_row_decodes_from_combined_nibbles() {
    // magazine 3 (low 3 bits), row 20 (upper 5 bits): combined = 3 | (20 << 3) = 0xA3.
    let combined: u8 = 3 | (20 << 3);
    let n0 = combined & 0x0F;
    let n1 = combined >> 4;
    let bytes = [encode(n0), encode(n1)];
    expect_that!(row(bytes), eq(20));
    expect_that!(magazine(bytes[0]), eq(3));
}

#[googletest::test]
fn test_page_number_on_row_zero() {
    let combined: u8 = 8 & 0x07; // magazine 8, row 0
    let n0 = combined & 0x0F;
    let n1 = combined >> 4;
    let units = encode(0x1);
    let tens = encode(0x0);
    let bytes = [encode(n0), encode(n1), units, tens];
    expect_that!(page_number(&bytes), some(eq("01".to_string())));
}

#[googletest::test]
fn test_page_number_none_for_non_header_row() {
    let combined: u8 = 3 | (20 << 3);
    let n0 = combined & 0x0F;
    let n1 = combined >> 4;
    let bytes = [encode(n0), encode(n1), 0x00, 0x00];
    expect_that!(page_number(&bytes), none());
}

#[googletest::test]
fn test_has_meaningful_content_true_for_printable_text() {
    let mut line = vec![0u8; 42];
    line[2] = b'H'; // odd parity not required for this test; has_meaningful_content only checks
                    // the low 7 bits against the printable range.
    expect_that!(has_meaningful_content(&line), eq(true));
}

#[googletest::test]
fn test_has_meaningful_content_false_for_blank_line() {
    let line = vec![0x20u8; 42];
    expect_that!(has_meaningful_content(&line), eq(false));
}

#[googletest::test]
fn test_text_renders_printable_bytes_via_g0() {
    let payload = b"HELLO".to_vec();
    let out = text(&payload, Charset::G0, false, 8, None);
    expect_that!(out, eq("HELLO".to_string()));
}

#[googletest::test]
fn test_text_header_prepends_magazine_and_page() {
    let payload = b"HELLO".to_vec();
    let out = text(&payload, Charset::G0, true, 8, Some("01"));
    expect_that!(out, eq("8/01 HELLO".to_string()));
}
