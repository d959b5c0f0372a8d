//! Error types for encoding and decoding signatures.

use songprint_analysis::Band;
use thiserror::Error;

/// Errors raised by the landmark encoder and the container codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The buffer does not start with the signature magic.
    #[error("unsupported format: magic {0:#010x}")]
    UnsupportedFormat(u32),

    /// The container was written by a format version this crate cannot read.
    #[error("unsupported format: version {0}")]
    UnsupportedVersion(u8),

    /// The buffer ends before a field it declares.
    #[error("truncated signature: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes required to read the next field.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// The trailing checksum does not match the contents.
    #[error("corrupt signature: checksum {actual:#010x}, expected {expected:#010x}")]
    Corrupt {
        /// Checksum stored in the container.
        expected: u32,
        /// Checksum computed over the received bytes.
        actual: u32,
    },

    /// A band-table entry names a band index outside the known bands.
    #[error("unknown band index {0}")]
    UnknownBand(u8),

    /// Two blocks claim the same band.
    #[error("duplicate block for band {0:?}")]
    DuplicateBand(Band),

    /// A band-table entry points outside the block area.
    #[error("block for band {band:?} at {offset}+{length} lies outside the container")]
    BlockOutOfBounds {
        /// Band the entry describes.
        band: Band,
        /// Declared absolute byte offset.
        offset: u32,
        /// Declared byte length.
        length: u32,
    },

    /// A block's records cannot be parsed.
    #[error("malformed block for band {band:?}: {reason}")]
    MalformedBlock {
        /// Band of the block.
        band: Band,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Peaks handed to the encoder go backwards in time.
    #[error("peaks out of order in band {band:?}: frame {frame} after {previous}")]
    PeaksOutOfOrder {
        /// Band of the offending peak.
        band: Band,
        /// Frame of the preceding peak.
        previous: u32,
        /// Frame of the offending peak.
        frame: u32,
    },

    /// A peak was placed in a block for a different band.
    #[error("peak from band {found:?} in block for band {expected:?}")]
    BandMismatch {
        /// Band of the block.
        expected: Band,
        /// Band recorded on the peak.
        found: Band,
    },

    /// A length does not fit its fixed-width field.
    #[error("{field} of {value} does not fit the container")]
    Overflow {
        /// Name of the field.
        field: &'static str,
        /// Value that was too large.
        value: usize,
    },

    /// The uri payload is not valid base64.
    #[error("invalid signature uri: {0}")]
    InvalidUri(#[from] base64::DecodeError),
}

/// Convenience result type for format operations.
pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_and_version_read_as_unsupported_format() {
        assert!(
            FormatError::UnsupportedFormat(0xdeadbeef)
                .to_string()
                .starts_with("unsupported format")
        );
        assert_eq!(
            FormatError::UnsupportedVersion(7).to_string(),
            "unsupported format: version 7"
        );
    }

    #[test]
    fn checksum_mismatch_reads_as_corrupt() {
        let msg = FormatError::Corrupt {
            expected: 1,
            actual: 2,
        }
        .to_string();
        assert!(msg.starts_with("corrupt signature"), "got: {msg}");
    }
}
