//! Delta-time landmark records.
//!
//! A band block is a run of 5-byte records, one per peak:
//!
//! ```text
//! [delta: u8][magnitude: u16 LE][frequency_bin: u16 LE]
//! ```
//!
//! `delta` counts frames since the previous peak of the same band; the first
//! peak is measured from frame 0. A delta of 255 or more does not fit, so the
//! encoder starts a new blocklet instead:
//!
//! ```text
//! [0xFF][base_frame: u32 LE]
//! ```
//!
//! The record after a marker carries delta 0 relative to `base_frame`. The
//! marker byte is never a valid delta, so decoding is unambiguous.

use songprint_analysis::{Band, Peak};

use crate::error::{FormatError, Result};
use crate::reader::Reader;

/// Delta byte reserved for the blocklet offset marker.
pub const OFFSET_MARKER: u8 = 0xFF;

/// Bytes in one peak record.
pub const RECORD_LEN: usize = 5;

/// Bytes in one blocklet offset marker.
pub const MARKER_LEN: usize = 5;

/// Encode the peaks of one band into block bytes.
///
/// Peaks must belong to `band` and be ordered by frame. Peaks sharing a frame
/// are fine and are written with delta 0.
pub fn encode_band(band: Band, peaks: &[Peak]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(peaks.len() * RECORD_LEN);
    let mut previous = 0u32;

    for peak in peaks {
        if peak.band != band {
            return Err(FormatError::BandMismatch {
                expected: band,
                found: peak.band,
            });
        }
        if peak.frame_index < previous {
            return Err(FormatError::PeaksOutOfOrder {
                band,
                previous,
                frame: peak.frame_index,
            });
        }

        let mut delta = peak.frame_index - previous;
        if delta >= OFFSET_MARKER as u32 {
            out.push(OFFSET_MARKER);
            out.extend_from_slice(&peak.frame_index.to_le_bytes());
            delta = 0;
        }

        out.push(delta as u8);
        out.extend_from_slice(&peak.magnitude.to_le_bytes());
        out.extend_from_slice(&peak.frequency_bin.to_le_bytes());
        previous = peak.frame_index;
    }

    Ok(out)
}

/// Decode block bytes back into the peaks of one band.
pub fn decode_band(band: Band, bytes: &[u8]) -> Result<Vec<Peak>> {
    let malformed = |reason| FormatError::MalformedBlock { band, reason };

    let mut reader = Reader::new(bytes);
    let mut peaks = Vec::with_capacity(bytes.len() / RECORD_LEN);
    let mut base = 0u32;

    while !reader.is_empty() {
        if reader.peek_u8() == Some(OFFSET_MARKER) {
            reader.u8()?;
            let frame = reader
                .u32()
                .map_err(|_| malformed("offset marker cut short"))?;
            if frame < base {
                return Err(FormatError::PeaksOutOfOrder {
                    band,
                    previous: base,
                    frame,
                });
            }
            if reader.is_empty() || reader.peek_u8() == Some(OFFSET_MARKER) {
                return Err(malformed("offset marker without a record"));
            }
            base = frame;
        }

        if reader.remaining() < RECORD_LEN {
            return Err(malformed("record cut short"));
        }
        let delta = reader.u8()?;
        let magnitude = reader.u16()?;
        let frequency_bin = reader.u16()?;

        let frame_index = base
            .checked_add(delta as u32)
            .ok_or_else(|| malformed("frame index overflows"))?;
        peaks.push(Peak {
            band,
            frame_index,
            frequency_bin,
            magnitude,
        });
        base = frame_index;
    }

    Ok(peaks)
}

/// Encoded size of a peak run without building it.
pub fn encoded_len(peaks: &[Peak]) -> usize {
    let mut previous = 0u32;
    peaks
        .iter()
        .map(|peak| {
            let delta = peak.frame_index.saturating_sub(previous);
            previous = peak.frame_index;
            if delta >= OFFSET_MARKER as u32 {
                MARKER_LEN + RECORD_LEN
            } else {
                RECORD_LEN
            }
        })
        .sum()
}
