use googletest::prelude::*;

use super::*;

#[googletest::test]
fn test_vbi_to_t42_flat_signal_fails_with_no_signal() {
    let row = vec![0x80u8; VBI_LEN];
    let result = vbi_to_t42(&row);
    expect_that!(result, err(eq(Error::NoSignal { value: 0x80 })));
}

#[googletest::test]
fn test_vbi_to_t42_missing_crifc_fails() {
    let mut row = vec![0x10u8; VBI_LEN];
    row[0] = 0xFF; // give it dynamic range, but no clock-run-in pattern anywhere
    let result = vbi_to_t42(&row);
    expect_that!(result, err(eq(Error::NoCrifc)));
}

#[googletest::test]
fn test_t42_to_vbi_single_rate_length() {
    let t42 = [0x55u8; 42];
    let vbi = t42_to_vbi(&t42, false);
    expect_that!(vbi.len(), eq(VBI_LEN));
}

#[googletest::test]
fn test_t42_to_vbi_double_rate_length() {
    let t42 = [0x55u8; 42];
    let vbi = t42_to_vbi(&t42, true);
    expect_that!(vbi.len(), eq(VBI_DOUBLE_LEN));
}

#[googletest::test]
fn test_double_line_averages_neighbours_and_repeats_last() {
    let line = vec![0x10u8, 0x20u8, 0x30u8];
    let doubled = double_line(&line);
    // out[0]=in[0]=0x10; out[1]=avg(in[0],in[1])=0x18
    // out[2]=in[1]=0x20; out[3]=avg(in[1],in[2])=0x28
    // out[4]=in[2]=0x30; out[5]=avg(in[2],in[2])=0x30 (last sample repeated)
    expect_that!(doubled, eq(vec![0x10, 0x18, 0x20, 0x28, 0x30, 0x30]));
}

#[googletest::test]
fn test_round_trip_single_rate_recovers_original_packet() {
    let mut t42 = [0u8; 42];
    for (i, byte) in t42.iter_mut().enumerate() {
        *byte = fix_parity((i as u8).wrapping_mul(37));
    }
    let vbi = t42_to_vbi(&t42, false);
    let recovered = vbi_to_t42(&vbi).unwrap();
    expect_that!(recovered, eq(t42));
}

#[googletest::test]
fn test_round_trip_double_rate_recovers_original_packet() {
    let mut t42 = [0u8; 42];
    for (i, byte) in t42.iter_mut().enumerate() {
        *byte = fix_parity((i as u8).wrapping_mul(37).wrapping_add(5));
    }
    let vbi = t42_to_vbi(&t42, true);
    let recovered = vbi_to_t42(&vbi).unwrap();
    expect_that!(recovered, eq(t42));
}

#[googletest::test]
fn test_fix_parity_flips_msb_on_even_parity() {
    expect_that!(fix_parity(0x00), eq(0x80)); // zero set bits: even parity, flip MSB
    expect_that!(fix_parity(0x01), eq(0x01)); // one set bit: already odd parity
}

#[googletest::test]
fn test_pack_byte_reads_msb_first() {
    let bits = [1u8, 0, 0, 0, 0, 0, 0, 1];
    expect_that!(pack_byte(&bits, 0), eq(0b1000_0001));
}
