//! Parsing for the magazine+page and row-list specifications used to configure T42/VBI/ANC
//! filtering (e.g. a CLI's `--magazine 8 --page 01 --rows 1,2,5-8` options).

use snafu::prelude::*;

use super::{BadPageSpecSnafu, Error};

/// Parse a 3-character magazine+page specification like `"801"` into `(magazine, page)`.
///
/// The first character is the magazine digit (`1..=8`); the remaining two are the page number as
/// two hex digits.
pub fn parse_page(input: &str) -> Result<(u8, String), Error> {
    let bad = || BadPageSpecSnafu { input: input.to_string() }.build();
    if input.len() != 3 {
        return Err(bad());
    }
    let magazine_char = input.chars().next().ok_or_else(bad)?;
    let magazine = magazine_char.to_digit(10).ok_or_else(bad)? as u8;
    ensure!(matches!(magazine, 1..=8), BadPageSpecSnafu { input: input.to_string() });
    let page = &input[1..3];
    ensure!(page.chars().all(|c| c.is_ascii_hexdigit()), BadPageSpecSnafu {
        input: input.to_string()
    });
    Ok((magazine, page.to_string()))
}

/// Parse a comma-separated row-list specification like `"1,2,5-8,15"` into an expanded list of
/// row numbers.
///
/// Rows outside `0..=31`, and unparseable segments, are silently dropped rather than failing the
/// whole specification.
pub fn parse_rows(input: &str) -> Vec<u8> {
    let mut rows = Vec::new();
    for segment in input.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if let Some((start, end)) = segment.split_once('-') {
            if let (Ok(start), Ok(end)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>())
            {
                for row in start..=end {
                    if row <= 31 {
                        rows.push(row as u8);
                    }
                }
            }
        } else if let Ok(row) = segment.parse::<u32>() {
            if row <= 31 {
                rows.push(row as u8);
            }
        }
    }
    rows
}
