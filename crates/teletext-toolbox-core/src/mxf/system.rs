//! Parsing the SMPTE timecode carried in a System metadata pack or set (SMPTE 326M).

use snafu::prelude::*;

use super::{Error, TimebaseMismatchSnafu};
use crate::timecode::{Timebase, Timecode};

/// Maps the rate-code's 4-bit index (bits 4..1) to a nominal frame rate. `0` means "unsupported".
const RATE_TABLE: [u8; 16] = [0, 24, 25, 30, 48, 50, 60, 72, 75, 90, 96, 100, 120, 0, 0, 0];

/// The two System item layouts this crate recognises, distinguishing on value length: a "pack"
/// carries its rate-code byte ending at offset 41, a "set" at offset 12.
fn rate_code_offset(len: usize) -> Option<usize> {
    if len >= 41 + 4 {
        Some(41)
    } else if len >= 12 + 4 {
        Some(12)
    } else {
        None
    }
}

/// The byte offset of the 4-byte packed-BCD SMPTE timecode within a System pack/set value, for
/// callers (restripe) that need to seek directly to it rather than re-decode the whole packet.
pub fn timecode_byte_offset(len: usize) -> Option<usize> {
    rate_code_offset(len)
}

/// Parse the rate code and SMPTE timecode out of a System metadata pack/set value.
///
/// The byte at `rate_code_offset - 2` is the rate code; the byte at `rate_code_offset - 1` is
/// unused by this crate; the 4 bytes starting at `rate_code_offset` are the packed-BCD SMPTE
/// timecode (see [`crate::timecode::Timecode::from_bytes`]).
pub fn parse_system_packet(value: &[u8]) -> Result<(Timebase, bool, Timecode), Error> {
    let base = rate_code_offset(value.len()).context(TimebaseMismatchSnafu {
        declared: Timebase::Fps25,
        declared_drop_frame: false,
        component: Timebase::Fps25,
        component_drop_frame: false,
    })?;
    let rate_code = value[base - 2];
    let index = ((rate_code >> 1) & 0x0F) as usize;
    let drop_frame = rate_code & 0x01 != 0;
    let rate = RATE_TABLE[index];
    let timebase = Timebase::from_u8(rate).context(TimebaseMismatchSnafu {
        declared: Timebase::Fps25,
        declared_drop_frame: false,
        component: Timebase::Fps25,
        component_drop_frame: false,
    })?;
    let tc_bytes: [u8; 4] = value[base..base + 4].try_into().unwrap();
    let timecode = Timecode::from_bytes(tc_bytes, timebase, drop_frame).ok().context(
        TimebaseMismatchSnafu {
            declared: timebase,
            declared_drop_frame: drop_frame,
            component: timebase,
            component_drop_frame: drop_frame,
        },
    )?;
    Ok((timebase, drop_frame, timecode))
}

/// Verify that `(timebase, drop_frame)` decoded from a System packet matches the stream-level
/// TimecodeComponent declaration.
pub fn check_against_component(
    timebase: Timebase,
    drop_frame: bool,
    component_timebase: Timebase,
    component_drop_frame: bool,
) -> Result<(), Error> {
    ensure!(
        timebase == component_timebase && drop_frame == component_drop_frame,
        TimebaseMismatchSnafu {
            declared: timebase,
            declared_drop_frame: drop_frame,
            component: component_timebase,
            component_drop_frame,
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    fn pack_value(rate_code: u8, timecode: Timecode) -> Vec<u8> {
        let mut value = vec![0u8; 41 + 5 + 1];
        value[39] = rate_code;
        value[41..45].copy_from_slice(&timecode.to_bytes());
        value
    }

    #[googletest::test]
    fn test_parse_system_packet_pack_layout() {
        let timecode =
            Timecode::from_hmsf(1, 2, 3, 4, Timebase::Fps25, false).unwrap();
        // rate code: index 2 (25fps) at bits 4..1, bit 0 clear (no drop frame): (2 << 1) = 0x04.
        let value = pack_value(0x04, timecode);
        let (timebase, df, tc) = parse_system_packet(&value).unwrap();
        expect_that!(timebase, eq(Timebase::Fps25));
        expect_that!(df, eq(false));
        expect_that!(tc, eq(timecode));
    }

    #[googletest::test]
    fn test_check_against_component_matching() {
        expect_that!(
            check_against_component(Timebase::Fps25, false, Timebase::Fps25, false),
            ok(anything())
        );
    }

    #[googletest::test]
    fn test_check_against_component_mismatch_fails() {
        let result = check_against_component(Timebase::Fps30, true, Timebase::Fps25, false);
        expect_that!(result.is_err(), eq(true));
    }
}
