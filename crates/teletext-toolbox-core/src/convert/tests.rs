use std::io::Cursor;

use googletest::prelude::*;

use super::*;
use crate::klv::keys::KEY_TABLE;
use crate::klv::Record;

fn key_for(name: &str) -> [u8; 16] {
    KEY_TABLE.iter().find(|e| e.name == name).unwrap().pattern
}

fn t42_line(fill: u8) -> [u8; 42] {
    [fill; 42]
}

#[googletest::test]
fn test_convert_stream_writes_rcwt_header_and_one_packet_per_meaningful_line() {
    let mut data = Vec::new();
    data.extend_from_slice(&t42_line(0x00)); // decodes to a row-0 header with a page number
    let mut out = Vec::new();

    let written = convert_stream(
        Cursor::new(data),
        Format::T42,
        Timebase::Fps25,
        1,
        Output::Rcwt,
        &mut out,
        || false,
    )
    .unwrap();

    expect_that!(written, eq(1));
    // RCWT's 11-byte fixed header is always written, even when no packet was emitted.
    expect_that!(out.len(), ge(11));
    expect_that!(&out[0..4], eq(&[0xCC, 0xCC, 0xED, 0xCC]));
}

#[googletest::test]
fn test_convert_stream_reports_decode_errors_through_the_crate_level_error() {
    let row = vec![0x80u8; crate::vbi::VBI_LEN]; // flat signal: no dynamic range
    let mut out = Vec::new();

    let result = convert_stream(
        Cursor::new(row),
        Format::Vbi,
        Timebase::Fps25,
        1,
        Output::Stl,
        &mut out,
        || false,
    );

    expect_that!(
        matches!(result, Err(crate::error::Error::Stream { .. })),
        eq(true)
    );
}

#[googletest::test]
fn test_convert_stream_honours_cancellation() {
    let mut data = Vec::new();
    for _ in 0..4 {
        data.extend_from_slice(&t42_line(0x20));
    }
    let mut out = Vec::new();
    let mut calls = 0;

    let result = convert_stream(
        Cursor::new(data),
        Format::T42,
        Timebase::Fps25,
        1,
        Output::Rcwt,
        &mut out,
        || {
            calls += 1;
            calls > 1
        },
    );

    expect_that!(
        matches!(result, Err(crate::error::Error::Cancelled)),
        eq(true)
    );
}

fn anc_data_value(payload: &[u8]) -> Vec<u8> {
    let mut value = Vec::new();
    value.extend_from_slice(&1u16.to_be_bytes()); // one ANC line
    value.extend_from_slice(&0u16.to_be_bytes()); // line number
    value.push(0x01); // wrapping
    value.push(0x02); // sample_coding
    value.extend_from_slice(&(payload.len() as u16).to_be_bytes()); // sample_count
    value.extend_from_slice(&[0u8; 2]); // unused
    value.extend_from_slice(&(payload.len() as u16).to_be_bytes()); // length
    value.extend_from_slice(&[0u8; 3]); // unused
    value.push(0x01); // header terminator
    value.extend_from_slice(payload);
    value
}

fn append_record(stream: &mut Vec<u8>, key: [u8; 16], value: Vec<u8>) {
    stream.extend_from_slice(&crate::klv::write_record(&Record { key, value }));
}

#[googletest::test]
fn test_convert_mxf_writes_one_line_per_anc_line_with_the_latest_system_timecode() {
    let start = crate::timecode::Timecode::from_hmsf(1, 0, 0, 0, Timebase::Fps25, false).unwrap();
    let mut file = Vec::new();
    let mut system_value = vec![0u8; 47];
    system_value[39] = 0x04; // 25fps, no drop frame
    system_value[41..45].copy_from_slice(&start.to_bytes());
    append_record(&mut file, key_for("SystemMetadataPack"), system_value);
    append_record(
        &mut file,
        key_for("VbiRawLineElement"),
        anc_data_value(&t42_line(0x20)),
    );

    let mut out = Vec::new();
    let written = convert_mxf(
        Cursor::new(file),
        mxf::Mode::Filter(mxf::FilterOptions { check_sequential_timecode: false }),
        Timebase::Fps25,
        Output::Stl,
        &mut out,
        || false,
    )
    .unwrap();

    expect_that!(written, eq(1));
    expect_that!(out.is_empty(), eq(false));
}

#[googletest::test]
fn test_convert_mxf_rejects_extracted_events_as_unsupported() {
    // A video essence element is never ANC/caption content, so under `Mode::Extract` it comes
    // back as `Event::Extracted` rather than `Event::AncLine` — exactly the event this pipeline
    // can't turn into a caption line.
    let mut file = Vec::new();
    append_record(&mut file, key_for("Uncompressed8BitVideoElement"), vec![0xAAu8; 8]);

    let mut out = Vec::new();
    let result = convert_mxf(
        Cursor::new(file),
        mxf::Mode::Extract(mxf::ExtractOptions {
            selection: mxf::ExtractSelection::Demux,
            include_klv_header: false,
        }),
        Timebase::Fps25,
        Output::Rcwt,
        &mut out,
        || false,
    );

    expect_that!(
        matches!(result, Err(crate::error::Error::UnsupportedConversion { .. })),
        eq(true)
    );
}
