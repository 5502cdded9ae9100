//! This crate provides functions for parsing, converting, extracting, and rewriting broadcast
//! television ancillary/teletext data embedded in professional media container formats.
//!
//! It reads four kinds of input and can produce any of them, plus two caption encodings:
//!
//! - Input: [Material Exchange Format (MXF)](https://en.wikipedia.org/wiki/Material_Exchange_Format)
//!   files (via [`mxf`]), MPEG-2 Transport Streams (via [`ts`]), raw Vertical Blanking Interval
//!   captures (via [`vbi`]), and raw T42 teletext line streams (via [`t42`]).
//! - Output: all of the above, plus
//!   [Raw Captions With Time (RCWT)](emit::rcwt) and [EBU-STL](emit::stl) subtitle files.
//!
//! The shared in-memory representation that every parser produces and every emitter consumes is
//! a [`line::Line`] (one teletext/VBI raster line), optionally grouped into a [`line::Packet`]
//! (the lines belonging to one video frame). [`timecode::Timecode`] is the SMPTE timecode carrier
//! that rides along with both. [`convert`] wires a line source straight through to a caption
//! emitter for the common case of converting one whole capture to one whole caption file.
//!
//! Video decoding, audio decoding, random-access indexing of MXF files, and writing new MXF
//! containers from scratch are all out of scope for this crate.

pub mod bufpool;
pub mod convert;
pub mod emit;
pub mod error;
pub mod ioutil;
pub mod klv;
pub mod line;
pub mod mxf;
pub mod stream;
pub mod t42;
pub mod timecode;
pub mod ts;
pub mod vbi;

#[cfg(test)]
pub(crate) mod testutil;
