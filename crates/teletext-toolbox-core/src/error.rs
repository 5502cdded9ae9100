//! The top-level error type returned by the handlers and emitters in this crate.
//!
//! Each subsystem (timecode arithmetic, the KLV reader, the MXF handler, the transport-stream
//! demultiplexer, the headerless VBI/T42 stream reader, the VBI/T42 codecs, and the two emitters)
//! defines its own `Error` enum close to the code that raises it. This module composes them into
//! one [`Error`] so that [`crate::convert`]'s pipelines, and any caller driving a whole pipeline
//! of their own, don't have to match on each subsystem's error type individually.

use snafu::Snafu;

use crate::{emit, klv, line, mxf, stream, t42, timecode, ts, vbi};

/// Errors that can occur anywhere in a parse/convert/extract/restripe pipeline.
///
/// Within a single frame or packet, most of the variants here are recoverable by the caller: a
/// malformed inner line causes that line (or, for [`Error::Mxf`] with
/// [`mxf::Error::BadLineHeader`]/[`mxf::Error::InvalidLineLength`], the whole containing packet)
/// to be skipped rather than the entire operation aborting.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[allow(missing_docs)]
pub enum Error {
    #[snafu(transparent)]
    Timecode { source: timecode::Error },

    #[snafu(transparent)]
    Klv { source: klv::Error },

    #[snafu(transparent)]
    Line { source: line::Error },

    #[snafu(transparent)]
    Mxf { source: mxf::Error },

    #[snafu(transparent)]
    Ts { source: ts::Error },

    #[snafu(transparent)]
    Stream { source: stream::Error },

    #[snafu(transparent)]
    Vbi { source: vbi::Error },

    #[snafu(transparent)]
    T42 { source: t42::Error },

    #[snafu(transparent)]
    Rcwt { source: emit::rcwt::Error },

    #[snafu(transparent)]
    Stl { source: emit::stl::Error },

    /// No conversion is defined between the requested input and output formats.
    #[snafu(display("no conversion is defined from {from} to {to}"))]
    UnsupportedConversion {
        /// Name of the source format.
        from: &'static str,
        /// Name of the requested output format.
        to: &'static str,
    },

    /// The caller's cancellation signal was observed between two yielded elements.
    #[snafu(display("operation was cancelled"))]
    Cancelled,
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
