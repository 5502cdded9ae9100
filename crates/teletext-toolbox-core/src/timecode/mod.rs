//! SMPTE `HH:MM:SS:FF` timecode arithmetic.
//!
//! A [`Timecode`] is a value type: hours, minutes, seconds, and frame number, tagged with the
//! [`Timebase`] it was counted against and whether NTSC-style drop-frame counting is in effect.
//! Two timecodes can only be compared or added together when their timebase and drop-frame flag
//! agree; see [`Error::TimecodeMismatch`].
//!
//! General timecode standards:
//! - SMPTE 12M (entire standard) - Time and Control Code

use std::cmp::Ordering;
use std::sync::LazyLock;

use garde::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;


/// Nominal frame rate that a [`Timecode`] is counted against.
///
/// These are the only timebases this crate's formats ever declare: MXF `TimecodeComponent`
/// edit rates, the transport-stream frame-rate autodetector, and RCWT/STL emission all restrict
/// themselves to this set.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Timebase {
    Fps24 = 24,
    Fps25 = 25,
    Fps30 = 30,
    Fps48 = 48,
    Fps50 = 50,
    Fps60 = 60,
}

impl Timebase {
    /// The nominal integer frame rate.
    pub fn rate(self) -> u32 {
        self as u32
    }

    /// Whether drop-frame counting is a legal mode for this timebase.
    ///
    /// Only the two NTSC-derived rates (29.97 nominally-30 and 59.94 nominally-60) use drop
    /// frame; the others are exact integer rates with nothing to compensate for.
    pub fn supports_drop_frame(self) -> bool {
        matches!(self, Timebase::Fps30 | Timebase::Fps60)
    }

    /// The maximum valid frame number for one second at this timebase (`rate() - 1`).
    pub fn max_frame(self) -> u8 {
        (self.rate() - 1) as u8
    }

    /// Total representable frame count in a 24-hour wrap, accounting for drop frame if enabled.
    ///
    /// Non-drop-frame timebases wrap at exactly `rate * 24 * 3600`. Drop-frame timebases subtract
    /// the frames skipped by [`dropped_frames_in`] evaluated over the full 24 hours (1440
    /// minutes).
    pub fn max_frames(self, drop_frame: bool) -> u32 {
        let nominal = self.rate() * 24 * 3600;
        if drop_frame {
            nominal - dropped_frames_in(1440, self)
        } else {
            nominal
        }
    }

    /// Map a raw integer frame rate (e.g. from the MXF System pack's rate table) to a [`Timebase`].
    pub fn from_u8(rate: u8) -> Option<Self> {
        match rate {
            24 => Some(Timebase::Fps24),
            25 => Some(Timebase::Fps25),
            30 => Some(Timebase::Fps30),
            48 => Some(Timebase::Fps48),
            50 => Some(Timebase::Fps50),
            60 => Some(Timebase::Fps60),
            _ => None,
        }
    }
}

/// Number of frames dropped by the drop-frame rule over `total_minutes` elapsed minutes.
///
/// 30fps drops 2 frames (numbers 00 and 01) at the start of every minute except every tenth
/// minute; 60fps drops twice as many (4) for the same reason, since the underlying NTSC clock
/// deviation is the same 0.1% regardless of how many frames make up a second.
fn dropped_frames_in(total_minutes: u32, timebase: Timebase) -> u32 {
    let per_drop = match timebase {
        Timebase::Fps30 => 2,
        Timebase::Fps60 => 4,
        _ => 0,
    };
    let tens = total_minutes / 10;
    let rem = total_minutes % 10;
    (tens * 9 * per_drop) + (rem * per_drop)
}

/// Errors constructing or operating on a [`Timecode`].
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(display("timecode component {field} value {value} is out of range"))]
    OutOfRange { field: &'static str, value: u32 },

    #[snafu(display("drop frame is not valid for timebase {timebase:?}"))]
    InvalidDropFrame { timebase: Timebase },

    #[snafu(display(
        "cannot operate on timecodes with differing timebase/drop-frame \
        ({lhs_timebase:?}/{lhs_drop_frame} vs {rhs_timebase:?}/{rhs_drop_frame})"
    ))]
    TimecodeMismatch {
        lhs_timebase: Timebase,
        lhs_drop_frame: bool,
        rhs_timebase: Timebase,
        rhs_drop_frame: bool,
    },

    #[snafu(display("could not parse timecode string {input:?}"))]
    BadFormat { input: String },

    #[snafu(display("BCD digit {value:#x} is not a valid decimal digit"))]
    BadBcd { value: u8 },
}

/// Validation context for [`Timecode`]: just the declared timebase, since every field's valid
/// range depends on it.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    /// The timebase the timecode was decoded against.
    pub timebase: Timebase,
}

/// A SMPTE `HH:MM:SS:FF` timecode.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Validate, Serialize, Deserialize)]
#[garde(context(ValidationContext))]
pub struct Timecode {
    /// Hour, `0..=23`.
    #[garde(range(min = 0, max = 23))]
    pub hour: u8,
    /// Minute, `0..=59`.
    #[garde(range(min = 0, max = 59))]
    pub minute: u8,
    /// Second, `0..=59`.
    #[garde(range(min = 0, max = 59))]
    pub second: u8,
    /// Frame number within the second, `0..=(timebase - 1)`.
    #[garde(custom(check_frame(&self)))]
    pub frame: u8,
    /// Nominal frame rate this timecode is counted against.
    #[garde(skip)]
    pub timebase: Timebase,
    /// Whether NTSC drop-frame counting applies. Only legal when
    /// [`Timebase::supports_drop_frame`] is true.
    #[garde(custom(check_drop_frame(&self)))]
    pub drop_frame: bool,
}

fn check_frame(tc: &Timecode) -> impl FnOnce(&u8, &ValidationContext) -> garde::Result + '_ {
    move |frame, _ctx| {
        if *frame > tc.timebase.max_frame() {
            return Err(garde::Error::new(format!(
                "frame number {frame} exceeds the maximum of {} for timebase {:?}",
                tc.timebase.max_frame(),
                tc.timebase
            )));
        }
        // IEC 60461:2010 Section 4.2.3 style drop-frame check: frame numbers 00/01 (or 00..03 at
        // 60fps) may not be used at the start of a non-exempt minute.
        if tc.drop_frame && tc.minute % 10 != 0 && tc.second == 0 {
            let skipped = match tc.timebase {
                Timebase::Fps30 => 2,
                Timebase::Fps60 => 4,
                _ => 0,
            };
            if *frame < skipped {
                return Err(garde::Error::new(format!(
                    "drop frame is set, but frame number {frame} is one of the dropped frame \
                    numbers for minute {}",
                    tc.minute
                )));
            }
        }
        Ok(())
    }
}

fn check_drop_frame(
    tc: &Timecode,
) -> impl FnOnce(&bool, &ValidationContext) -> garde::Result + '_ {
    move |drop_frame, _ctx| {
        if *drop_frame && !tc.timebase.supports_drop_frame() {
            return Err(garde::Error::new(format!(
                "drop frame is not valid for timebase {:?}",
                tc.timebase
            )));
        }
        Ok(())
    }
}

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<hour>\d{1,2}):(?P<minute>\d{1,2}):(?P<second>\d{1,2})(?P<sep>[:;])(?P<frame>\d{1,2})$",
    )
    .unwrap()
});

impl Timecode {
    /// Construct and validate a timecode from its components.
    pub fn from_hmsf(
        hour: u8,
        minute: u8,
        second: u8,
        frame: u8,
        timebase: Timebase,
        drop_frame: bool,
    ) -> Result<Self, Error> {
        let tc = Timecode { hour, minute, second, frame, timebase, drop_frame };
        tc.validate_with(&ValidationContext { timebase }).map_err(|report| {
            // Surface the most specific error kind we can from the first failing field.
            if report.to_string().contains("drop frame") && !timebase.supports_drop_frame() {
                Error::InvalidDropFrame { timebase }
            } else {
                let (field, value) = out_of_range_field(hour, minute, second, frame, timebase);
                Error::OutOfRange { field, value }
            }
        })?;
        Ok(tc)
    }

    /// Parse `HH:MM:SS:FF` (non-drop-frame) or `HH:MM:SS;FF` (drop-frame) at the given timebase.
    pub fn from_string(s: &str, timebase: Timebase) -> Result<Self, Error> {
        let caps = TIME_RE.captures(s).context(BadFormatSnafu { input: s.to_string() })?;
        let drop_frame = &caps["sep"] == ";";
        let hour: u8 =
            caps["hour"].parse().ok().context(BadFormatSnafu { input: s.to_string() })?;
        let minute: u8 =
            caps["minute"].parse().ok().context(BadFormatSnafu { input: s.to_string() })?;
        let second: u8 =
            caps["second"].parse().ok().context(BadFormatSnafu { input: s.to_string() })?;
        let frame: u8 =
            caps["frame"].parse().ok().context(BadFormatSnafu { input: s.to_string() })?;
        Self::from_hmsf(hour, minute, second, frame, timebase, drop_frame)
    }

    /// Construct a timecode from an absolute frame number, reduced modulo [`Timebase::max_frames`].
    ///
    /// Negative `n` wraps upward (e.g. `-1` is the last representable frame).
    pub fn from_frames(n: i64, timebase: Timebase, drop_frame: bool) -> Result<Self, Error> {
        if drop_frame && !timebase.supports_drop_frame() {
            return Err(Error::InvalidDropFrame { timebase });
        }
        let max = timebase.max_frames(drop_frame) as i64;
        let n = n.rem_euclid(max);
        if !drop_frame {
            let rate = timebase.rate() as i64;
            let frame = n % rate;
            let total_seconds = n / rate;
            let second = total_seconds % 60;
            let total_minutes = total_seconds / 60;
            let minute = total_minutes % 60;
            let hour = (total_minutes / 60) % 24;
            return Ok(Timecode {
                hour: hour as u8,
                minute: minute as u8,
                second: second as u8,
                frame: frame as u8,
                timebase,
                drop_frame,
            });
        }

        // Drop-frame: invert the "total minutes elapsed so far, including dropped frames" walk.
        // Each non-exempt minute is `rate*60 - per_drop` frames long; each exempt (every-tenth)
        // minute is the full `rate*60`.
        let per_drop = match timebase {
            Timebase::Fps30 => 2,
            Timebase::Fps60 => 4,
            _ => 0,
        } as i64;
        let rate = timebase.rate() as i64;
        let full_ten_minute_block = rate * 60 * 10 - per_drop * 9;
        let ten_minute_blocks = n / full_ten_minute_block;
        let mut remaining = n % full_ten_minute_block;
        let mut minute = ten_minute_blocks * 10;
        // First minute of the block is exempt (divisible by 10).
        let first_minute_len = rate * 60;
        if remaining < first_minute_len {
            let total_minutes = minute;
            let hour = (total_minutes / 60) % 24;
            let minute_in_hour = total_minutes % 60;
            return Ok(Timecode {
                hour: hour as u8,
                minute: minute_in_hour as u8,
                second: ((remaining / rate) % 60) as u8,
                frame: (remaining % rate) as u8,
                timebase,
                drop_frame,
            });
        }
        remaining -= first_minute_len;
        minute += 1;
        let per_minute_len = rate * 60 - per_drop;
        let extra_minutes = remaining / per_minute_len;
        minute += extra_minutes;
        let mut frame_in_minute = remaining % per_minute_len + per_drop;
        if frame_in_minute >= rate * 60 {
            // Shouldn't happen given the modulo above, but guards against an off-by-one.
            frame_in_minute -= rate * 60;
            minute += 1;
        }
        let total_minutes = minute;
        let hour = (total_minutes / 60) % 24;
        let minute_in_hour = total_minutes % 60;
        Ok(Timecode {
            hour: hour as u8,
            minute: minute_in_hour as u8,
            second: ((frame_in_minute / rate) % 60) as u8,
            frame: (frame_in_minute % rate) as u8,
            timebase,
            drop_frame,
        })
    }

    /// Compute this timecode's zero-based absolute frame number since `00:00:00:00`.
    pub fn frame_number(&self) -> u32 {
        let rate = self.timebase.rate();
        let total_minutes = self.hour as u32 * 60 + self.minute as u32;
        let mut n =
            (self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32) * rate
                + self.frame as u32;
        if self.drop_frame {
            n -= dropped_frames_in(total_minutes, self.timebase);
        }
        n
    }

    /// SMPTE-packed BCD decode. See module docs for the bit layout.
    ///
    /// - `bytes[0]`: frame tens/units BCD; bit 7 is the drop-frame flag for 30/60fps video
    ///   (shifted out before BCD decode).
    /// - `bytes[1]`: second tens/units BCD; for 48fps, bit 7 carries the field flag.
    /// - `bytes[2]`: minute tens/units BCD.
    /// - `bytes[3]`: hour tens/units BCD; bit 7 carries the field flag for 50/60fps.
    ///
    /// For 30/60fps the frame byte is stored with a `+64` bias that must be subtracted before BCD
    /// decode. For 48/50/60fps, the stored BCD frame value is a 25/30fps-equivalent field count,
    /// so the decoded number is doubled and the field bit (from byte 1 or byte 3) is added back
    /// in to recover the true 48/50/60fps frame number.
    pub fn from_bytes(bytes: [u8; 4], timebase: Timebase, drop_frame: bool) -> Result<Self, Error> {
        if drop_frame && !timebase.supports_drop_frame() {
            return Err(Error::InvalidDropFrame { timebase });
        }
        let mut frame_byte = bytes[0];
        if matches!(timebase, Timebase::Fps30 | Timebase::Fps60) {
            frame_byte = frame_byte.wrapping_sub(64);
        }
        let mut frame = from_bcd(frame_byte & 0x7F)?;

        let field_from_second = (bytes[1] & 0x80) != 0;
        let second = from_bcd(bytes[1] & 0x7F)?;
        let minute = from_bcd(bytes[2] & 0x7F)?;
        let field_from_hour = (bytes[3] & 0x80) != 0;
        let hour = from_bcd(bytes[3] & 0x7F)?;

        let field = match timebase {
            Timebase::Fps48 => field_from_second,
            Timebase::Fps50 | Timebase::Fps60 => field_from_hour,
            _ => false,
        };
        if matches!(timebase, Timebase::Fps48 | Timebase::Fps50 | Timebase::Fps60) {
            frame = frame * 2 + u8::from(field);
        }

        Timecode::from_hmsf(hour, minute, second, frame, timebase, drop_frame)
    }

    /// Inverse of [`Timecode::from_bytes`].
    ///
    /// BCD is computed from the un-doubled frame value *before* the field high bit is combined in
    /// and *before* the drop-frame/+64 flag is OR'd into byte 0.
    pub fn to_bytes(&self) -> [u8; 4] {
        let (stored_frame, field) = match self.timebase {
            Timebase::Fps48 | Timebase::Fps50 | Timebase::Fps60 => {
                (self.frame / 2, self.frame % 2 != 0)
            }
            _ => (self.frame, false),
        };
        let mut byte0 = to_bcd(stored_frame);
        if matches!(self.timebase, Timebase::Fps30 | Timebase::Fps60) {
            byte0 = byte0.wrapping_add(64);
        }
        let mut byte1 = to_bcd(self.second);
        let mut byte3 = to_bcd(self.hour);
        match self.timebase {
            Timebase::Fps48 => byte1 |= (field as u8) << 7,
            Timebase::Fps50 | Timebase::Fps60 => byte3 |= (field as u8) << 7,
            _ => {}
        }
        let byte2 = to_bcd(self.minute);
        [byte0, byte1, byte2, byte3]
    }

    /// The video field (0 or 1) this frame belongs to.
    ///
    /// Derived, not stored: `frame % 2` for the doubled-rate timebases, else always 0.
    pub fn field(&self) -> u8 {
        match self.timebase {
            Timebase::Fps48 | Timebase::Fps50 | Timebase::Fps60 => self.frame % 2,
            _ => 0,
        }
    }

    /// The next frame, wrapping at [`Timebase::max_frames`].
    pub fn next(&self) -> Self {
        // unwrap: constructing from a value already reduced modulo max_frames cannot fail.
        Self::from_frames(self.frame_number() as i64 + 1, self.timebase, self.drop_frame).unwrap()
    }

    /// The previous frame, wrapping at [`Timebase::max_frames`].
    pub fn previous(&self) -> Self {
        Self::from_frames(self.frame_number() as i64 - 1, self.timebase, self.drop_frame).unwrap()
    }

    fn check_comparable(&self, other: &Self) -> Result<(), Error> {
        if self.timebase != other.timebase || self.drop_frame != other.drop_frame {
            return Err(Error::TimecodeMismatch {
                lhs_timebase: self.timebase,
                lhs_drop_frame: self.drop_frame,
                rhs_timebase: other.timebase,
                rhs_drop_frame: other.drop_frame,
            });
        }
        Ok(())
    }

    /// Add a signed frame count, wrapping at [`Timebase::max_frames`].
    pub fn add_frames(&self, frames: i64) -> Self {
        Self::from_frames(self.frame_number() as i64 + frames, self.timebase, self.drop_frame)
            .unwrap()
    }

    /// Add two timecodes of matching timebase/drop-frame, as absolute frame numbers.
    pub fn checked_add(&self, other: &Self) -> Result<Self, Error> {
        self.check_comparable(other)?;
        Ok(self.add_frames(other.frame_number() as i64))
    }

    /// Compare two timecodes, failing if their timebase/drop-frame disagree.
    pub fn checked_cmp(&self, other: &Self) -> Result<Ordering, Error> {
        self.check_comparable(other)?;
        Ok(self.frame_number().cmp(&other.frame_number()))
    }
}

impl std::fmt::Display for Timecode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = if self.drop_frame { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            self.hour, self.minute, self.second, sep, self.frame
        )
    }
}

fn to_bcd(n: u8) -> u8 {
    ((n / 10) << 4) | (n % 10)
}

fn from_bcd(b: u8) -> Result<u8, Error> {
    let tens = b >> 4;
    let units = b & 0x0F;
    if tens > 9 || units > 9 {
        return Err(Error::BadBcd { value: b });
    }
    Ok(tens * 10 + units)
}

fn out_of_range_field(
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    timebase: Timebase,
) -> (&'static str, u32) {
    if hour > 23 {
        ("hour", hour as u32)
    } else if minute > 59 {
        ("minute", minute as u32)
    } else if second > 59 {
        ("second", second as u32)
    } else {
        ("frame", frame.max(timebase.max_frame()) as u32)
    }
}
