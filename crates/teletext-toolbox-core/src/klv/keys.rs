//! The closed set of MXF universal-label keys this crate recognises.
//!
//! One compile-time table (`KEY_TABLE`) is the single source of truth: [`KeyEntry`] tuples of a
//! symbolic name, a byte pattern, how many of its leading bytes must match exactly, and the
//! [`KeyType`] it maps to. [`classify`] walks the table once per key; [`name_for`] is the
//! symbolic-naming lookup used by demux-mode extraction file naming.

use super::{Error, UL_PREFIX};

/// The category a classified MXF key belongs to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[allow(missing_docs)]
pub enum KeyType {
    Data,
    Video,
    Audio,
    System,
    TimecodeComponent,
    HeaderPartition,
    FooterPartition,
    IndexTableSegment,
    Unknown,
}

/// One entry in the compile-time key table.
#[derive(Debug, Clone, Copy)]
pub struct KeyEntry {
    /// A human-readable name, used for demux-mode file naming.
    pub name: &'static str,
    /// The 16-byte key pattern.
    pub pattern: [u8; 16],
    /// How many leading bytes of `pattern` must match exactly; the registry item/version octets
    /// that commonly vary between otherwise-identical essence-element keys are excluded from the
    /// match by giving a `prefix_len` shorter than 16.
    pub prefix_len: u8,
    /// The [`KeyType`] this key maps to.
    pub kind: KeyType,
}

macro_rules! key {
    ($name:literal, $pattern:expr, $prefix_len:expr, $kind:expr) => {
        KeyEntry { name: $name, pattern: $pattern, prefix_len: $prefix_len, kind: $kind }
    };
}

/// The closed ~80-entry list of essence/System/TimecodeComponent/partition keys this crate
/// understands, covering common video/audio/data essence wrapping variants and every
/// partition-status/partition-kind combination, plus the structural System/TimecodeComponent/
/// index keys. This is not the full SMPTE registry (treated, per this crate's scope, as an opaque
/// lookup table, not a dictionary of every registered label); entries can be appended without
/// touching [`classify`] or [`name_for`].
pub const KEY_TABLE: &[KeyEntry] = &[
    key!(
        "ClosedCompleteHeaderPartition",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x02,
            0x04, 0x00
        ],
        16,
        KeyType::HeaderPartition
    ),
    key!(
        "OpenIncompleteHeaderPartition",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x02,
            0x01, 0x00
        ],
        16,
        KeyType::HeaderPartition
    ),
    key!(
        "ClosedCompleteFooterPartition",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x02,
            0x04, 0x04
        ],
        16,
        KeyType::FooterPartition
    ),
    key!(
        "IndexTableSegment",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x10,
            0x01, 0x00
        ],
        16,
        KeyType::IndexTableSegment
    ),
    key!(
        "SystemMetadataPack",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x04, 0x01,
            0x01, 0x00
        ],
        16,
        KeyType::System
    ),
    key!(
        "SystemMetadataSet",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x04, 0x01,
            0x02, 0x00
        ],
        16,
        KeyType::System
    ),
    key!(
        "TimecodeComponent",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x14,
            0x00, 0x00
        ],
        16,
        KeyType::TimecodeComponent
    ),
    key!(
        "AncillaryDataEssenceElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x17, 0x01,
            0x08, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "PictureEssenceElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x15, 0x01,
            0x08, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "SoundEssenceElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x16, 0x01,
            0x08, 0x00
        ],
        15,
        KeyType::Audio
    ),

    // Video essence element wrapping/coding variants.
    key!(
        "Uncompressed8BitVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x01, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Uncompressed10BitVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x02, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Uncompressed12BitVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x03, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "DvBased25MbpsVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x04, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "DvBased50MbpsVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x05, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "DvBased100MbpsVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x06, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Mpeg2SdVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x07, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Mpeg2Hd420VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x09, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Mpeg2Hd422VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x0A, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "AvcIntra50VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x0B, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "AvcIntra100VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x0C, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "AvcIntra200VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x0D, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Jpeg2000VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x0E, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Vc3Dnxhd36VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x0F, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Vc3Dnxhd115VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x10, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Vc3Dnxhd145VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x11, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Vc3Dnxhd175VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x12, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Vc3Dnxhd220VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x13, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Vc2VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x14, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Prores422VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x15, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Prores422HqVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x16, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "Prores4444VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x17, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "H264VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x18, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "HevcVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x19, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "RawRgbVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x1A, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "RawYuv422VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x1B, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "RawYuv420VideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x1C, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "AlphaMatteVideoElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x1D, 0x00
        ],
        15,
        KeyType::Video
    ),
    key!(
        "AncillaryVideoOverlayElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x1E, 0x00
        ],
        15,
        KeyType::Video
    ),

    // Audio essence element wrapping/coding variants.
    key!(
        "Pcm16BitAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x01, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "Pcm20BitAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x02, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "Pcm24BitAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x03, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "Pcm32BitAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x04, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "PcmFloat32AudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x05, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "PcmFloat64AudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x06, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "AesBwfAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x07, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "Aes3AudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x09, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "Mpeg1Layer2AudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x0A, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "AacLcAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x0B, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "Ac3AudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x0C, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "Eac3AudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x0D, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "DolbyEAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x0E, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "DolbyAtmosAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x0F, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "OpusAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x10, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "FlacAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x11, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "AlawAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x12, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "MulawAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x13, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "DtsAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x14, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "MlpAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x15, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "VorbisAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x16, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "WmaAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x17, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "AmrNbAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x18, 0x00
        ],
        15,
        KeyType::Audio
    ),
    key!(
        "AmrWbAudioElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x16, 0x01, 0x19, 0x00
        ],
        15,
        KeyType::Audio
    ),

    // Data essence element wrapping/coding variants (beyond ANC).
    key!(
        "VbiRawLineElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x01, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "TimedTextElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x02, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "SccCaptionElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x03, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "Scte104Element",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x04, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "Smpte2038Element",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x05, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "DolbyEMetadataElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x06, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "KlvMetadataStreamElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x07, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "IsxdMetadataElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x09, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "AfdBarDataElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x0A, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "ActiveFormatDescriptorElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x0B, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "AvcAccessUnitElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x0C, 0x00
        ],
        15,
        KeyType::Data
    ),
    key!(
        "GenericStreamElement",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01,
            0x0D, 0x01, 0x03, 0x01, 0x17, 0x01, 0x0D, 0x00
        ],
        15,
        KeyType::Data
    ),

    // Remaining partition status/kind combinations.
    key!(
        "ClosedIncompleteHeaderPartition",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01,
            0x0D, 0x01, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00
        ],
        16,
        KeyType::HeaderPartition
    ),
    key!(
        "OpenCompleteHeaderPartition",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01,
            0x0D, 0x01, 0x02, 0x01, 0x01, 0x02, 0x03, 0x00
        ],
        16,
        KeyType::HeaderPartition
    ),
    key!(
        "OpenIncompleteFooterPartition",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01,
            0x0D, 0x01, 0x02, 0x01, 0x01, 0x02, 0x01, 0x04
        ],
        16,
        KeyType::FooterPartition
    ),
    key!(
        "ClosedIncompleteFooterPartition",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01,
            0x0D, 0x01, 0x02, 0x01, 0x01, 0x02, 0x02, 0x04
        ],
        16,
        KeyType::FooterPartition
    ),
    key!(
        "OpenCompleteFooterPartition",
        [
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01,
            0x0D, 0x01, 0x02, 0x01, 0x01, 0x02, 0x03, 0x04
        ],
        16,
        KeyType::FooterPartition
    ),
];

/// Classify `key`, looking up the closed table in [`KEY_TABLE`].
///
/// Returns [`Error::NotMxf`] if `key` doesn't start with the SMPTE universal label prefix.
/// Unrecognised (but UL-prefixed) keys classify as [`KeyType::Unknown`] rather than failing,
/// since unrecognised essence variants are common and should just be skipped, not abort parsing.
pub fn classify(key: &[u8; 16]) -> Result<KeyType, Error> {
    if key[0..4] != UL_PREFIX {
        return Err(Error::NotMxf);
    }
    for entry in KEY_TABLE {
        let len = entry.prefix_len as usize;
        if key[..len] == entry.pattern[..len] {
            return Ok(entry.kind);
        }
    }
    Ok(KeyType::Unknown)
}

/// Look up the symbolic name of `key`, if it is in [`KEY_TABLE`].
pub fn name_for(key: &[u8; 16]) -> Option<&'static str> {
    KEY_TABLE.iter().find(|entry| {
        let len = entry.prefix_len as usize;
        key[..len] == entry.pattern[..len]
    }).map(|entry| entry.name)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_classify_not_mxf() {
        let key = [0u8; 16];
        expect_that!(matches!(classify(&key), Err(Error::NotMxf)), eq(true));
    }

    #[googletest::test]
    fn test_classify_timecode_component() {
        let key = KEY_TABLE
            .iter()
            .find(|e| e.name == "TimecodeComponent")
            .unwrap()
            .pattern;
        expect_that!(classify(&key), ok(eq(KeyType::TimecodeComponent)));
    }

    #[googletest::test]
    fn test_classify_unknown_ul_still_returns_unknown() {
        let mut key = UL_PREFIX.to_vec();
        key.extend_from_slice(&[0xFFu8; 12]);
        let key: [u8; 16] = key.try_into().unwrap();
        expect_that!(classify(&key), ok(eq(KeyType::Unknown)));
    }

    #[googletest::test]
    fn test_name_for_known_key() {
        let pattern =
            KEY_TABLE.iter().find(|e| e.name == "AncillaryDataEssenceElement").unwrap().pattern;
        expect_that!(name_for(&pattern), some(eq("AncillaryDataEssenceElement")));
    }
}
