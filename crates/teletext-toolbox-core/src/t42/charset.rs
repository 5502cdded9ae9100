//! Teletext character-set tables, mapping the printable code range `0x20..=0x7F` to Unicode.
//!
//! G0 is reproduced exactly per the default Latin national option. G1 (mosaic graphics), G2
//! (supplementary Latin), and G3 (line drawing) are approximated onto the nearest thematically
//! matching Unicode block (shading characters, Latin-1 Supplement, and Box Drawing respectively)
//! rather than reproducing ETS 300 706's exact glyph assignments byte-for-byte; see `DESIGN.md`.

/// Which of the four teletext character sets to look characters up in.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Charset {
    /// Default Latin national option.
    G0,
    /// Cyrillic national option.
    G0Cyrillic,
    /// Mosaic graphics.
    G1,
    /// Supplementary Latin (accented characters).
    G2,
    /// Line drawing.
    G3,
}

/// Look up the Unicode character for `code` (`0x20..=0x7F`) in `charset`.
///
/// Bytes outside the printable range, and the parity bit, are the caller's responsibility to
/// strip first; out-of-range input renders as a space.
pub fn lookup(charset: Charset, code: u8) -> char {
    let code = code & 0x7F;
    if !(0x20..=0x7F).contains(&code) {
        return ' ';
    }
    match charset {
        Charset::G0 => g0_latin(code),
        Charset::G0Cyrillic => g0_cyrillic(code),
        Charset::G1 => g1_mosaic(code),
        Charset::G2 => g2_latin_supplement(code),
        Charset::G3 => g3_line_drawing(code),
    }
}

/// Default G0 Latin national option: ASCII, with the twelve positions ETS 300 706 reassigns to
/// currency/arrow/fraction/box-drawing symbols.
fn g0_latin(code: u8) -> char {
    match code {
        0x23 => '£',
        0x5B => '←',
        0x5C => '½',
        0x5D => '→',
        0x5E => '↑',
        0x5F => '#',
        0x60 => '—',
        0x7B => '¼',
        0x7C => '‖',
        0x7D => '¾',
        0x7E => '÷',
        0x7F => '■',
        _ => code as char,
    }
}

/// Cyrillic G0 national option: letters replace the Latin alphabet positions; digits and
/// punctuation are shared with [`g0_latin`].
fn g0_cyrillic(code: u8) -> char {
    match code {
        0x40..=0x5F => {
            char::from_u32(0x0410 + (code as u32 - 0x40)).unwrap_or_else(|| g0_latin(code))
        }
        0x60..=0x7F => {
            char::from_u32(0x0430 + (code as u32 - 0x60)).unwrap_or_else(|| g0_latin(code))
        }
        _ => g0_latin(code),
    }
}

/// G1 mosaic graphics, approximated by shading density rather than exact sextant glyphs: a 2x3
/// mosaic cell's six bits (`code & 0x3F`) are reduced to a shade character by popcount.
fn g1_mosaic(code: u8) -> char {
    match (code & 0x3F).count_ones() {
        0 => ' ',
        1 | 2 => '\u{2591}', // light shade
        3 | 4 => '\u{2592}', // medium shade
        5 => '\u{2593}',     // dark shade
        _ => '\u{2588}',     // full block
    }
}

/// G2 supplementary Latin, approximated by mapping the 96-code printable range directly onto the
/// 96-code Latin-1 Supplement block (`U+00A0..=U+00FF`).
fn g2_latin_supplement(code: u8) -> char {
    char::from_u32(0xA0 + (code as u32 - 0x20)).unwrap_or(' ')
}

/// G3 line drawing, approximated by mapping the 96-code printable range onto the leading 96
/// entries of the Unicode Box Drawing block (`U+2500..`).
fn g3_line_drawing(code: u8) -> char {
    char::from_u32(0x2500 + (code as u32 - 0x20)).unwrap_or(' ')
}
