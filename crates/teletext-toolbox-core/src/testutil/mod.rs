//! Test-only helpers shared across this crate's unit tests.

use data_encoding::HEXUPPER_PERMISSIVE;

/// Decode a hex string (whitespace is ignored) into bytes, for use in test fixtures.
///
/// Panics on malformed input: this is a test helper, not a parser users should call with
/// untrusted data.
pub(crate) fn from_hex(s: &str) -> Vec<u8> {
    let stripped: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    HEXUPPER_PERMISSIVE.decode(stripped.as_bytes()).expect("invalid hex test fixture")
}
