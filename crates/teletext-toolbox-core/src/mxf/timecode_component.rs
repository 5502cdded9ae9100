//! The `TimecodeComponent` local set: start timecode, edit rate, and drop-frame flag for one
//! MXF timeline track, plus in-place rewriting of the start timecode for restripe mode.

use snafu::prelude::*;

use super::{BadLocalSetSnafu, Error};
use crate::timecode::Timebase;

/// Local tag for the start timecode (`Position`, 8-byte big-endian signed integer).
const TAG_START_TIMECODE: u16 = 0x1501;
/// Local tag for the rounded timecode base (`UInt16`), the nominal frame rate.
const TAG_ROUNDED_TIMECODE_BASE: u16 = 0x1502;
/// Local tag for the drop-frame flag (`Boolean`, 1 byte).
const TAG_DROP_FRAME: u16 = 0x1503;

/// One local-set item: its tag, and the byte range in the enclosing value it occupies (header
/// included), so [`rewrite_start_timecode`] can splice a same-length replacement in place.
struct Item {
    tag: u16,
    value_range: std::ops::Range<usize>,
}

fn walk_items(value: &[u8]) -> Result<Vec<Item>, Error> {
    let mut items = Vec::new();
    let mut offset = 0usize;
    while offset + 4 <= value.len() {
        let tag = u16::from_be_bytes([value[offset], value[offset + 1]]);
        let len = u16::from_be_bytes([value[offset + 2], value[offset + 3]]) as usize;
        let start = offset + 4;
        let end = start + len;
        ensure!(end <= value.len(), BadLocalSetSnafu);
        items.push(Item { tag, value_range: start..end });
        offset = end;
    }
    Ok(items)
}

/// The fields this crate cares about out of a `TimecodeComponent` local set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimecodeComponent {
    /// The start timecode, as an absolute frame count (MXF `Position`).
    pub start_timecode: i64,
    /// The nominal frame rate this component's timecodes are counted against.
    pub timebase: Timebase,
    /// Whether NTSC drop-frame counting applies.
    pub drop_frame: bool,
}

/// Parse a `TimecodeComponent` local set's value bytes.
pub fn parse(value: &[u8]) -> Result<TimecodeComponent, Error> {
    let items = walk_items(value)?;
    let mut start_timecode = None;
    let mut rate = None;
    let mut drop_frame = false;

    for item in &items {
        let bytes = &value[item.value_range.clone()];
        match item.tag {
            TAG_START_TIMECODE => {
                ensure!(bytes.len() == 8, BadLocalSetSnafu);
                start_timecode = Some(i64::from_be_bytes(bytes.try_into().unwrap()));
            }
            TAG_ROUNDED_TIMECODE_BASE => {
                ensure!(bytes.len() == 2, BadLocalSetSnafu);
                rate = Some(u16::from_be_bytes([bytes[0], bytes[1]]));
            }
            TAG_DROP_FRAME => {
                ensure!(bytes.len() == 1, BadLocalSetSnafu);
                drop_frame = bytes[0] != 0;
            }
            _ => {}
        }
    }

    let start_timecode = start_timecode.context(BadLocalSetSnafu)?;
    let rate = rate.context(BadLocalSetSnafu)?;
    let timebase = Timebase::from_u8(rate as u8).context(BadLocalSetSnafu)?;
    Ok(TimecodeComponent { start_timecode, timebase, drop_frame })
}

/// Rewrite the `0x1501` start-timecode item of a `TimecodeComponent` local set's value bytes in
/// place, replacing it with `new_start_timecode`. The item's length doesn't change (it's always
/// an 8-byte `Position`), so this never shifts any other item's offset.
pub fn rewrite_start_timecode(value: &mut [u8], new_start_timecode: i64) -> Result<(), Error> {
    let items = walk_items(value)?;
    let item =
        items.iter().find(|item| item.tag == TAG_START_TIMECODE).context(BadLocalSetSnafu)?;
    ensure!(item.value_range.len() == 8, BadLocalSetSnafu);
    value[item.value_range.clone()].copy_from_slice(&new_start_timecode.to_be_bytes());
    Ok(())
}
