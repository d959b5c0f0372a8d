//! The binary signature container.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! offset  size  field
//! 0       4     magic 0xCAFE2580
//! 4       1     version
//! 5       4     sample_rate
//! 9       4     total_samples
//! 13      1     band_count
//! 14      9·n   band table: (band_index u8, offset u32, length u32)
//! ..            band blocks, concatenated in table order
//! end-4   4     CRC-32 (ISO-HDLC) over every preceding byte
//! ```
//!
//! Block offsets are absolute from the start of the container. Decoding
//! checks structure in the order magic, version, checksum, table, so a foreign
//! buffer is reported as an unsupported format and a damaged one as corrupt.

use crc::{CRC_32_ISO_HDLC, Crc};
use songprint_analysis::{Band, Peak};

use crate::error::{FormatError, Result};
use crate::landmark::{decode_band, encode_band};
use crate::reader::Reader;
use crate::uri::{decode_uri, encode_uri};

/// Magic number opening every container.
pub const MAGIC: u32 = 0xCAFE_2580;

/// Container format version written by this crate.
pub const VERSION: u8 = 1;

/// Bytes before the band table.
pub const HEADER_LEN: usize = 14;

/// Bytes per band-table entry.
pub const TABLE_ENTRY_LEN: usize = 9;

/// Bytes of the trailing checksum.
pub const CHECKSUM_LEN: usize = 4;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// The peaks of one band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandBlock {
    /// Band the peaks belong to.
    pub band: Band,
    /// Peaks ordered by frame.
    pub peaks: Vec<Peak>,
}

/// A parsed or ready-to-encode signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureContainer {
    /// Rate the peaks were computed at, in Hz.
    pub sample_rate: u32,
    /// Samples covered by the analysis.
    pub total_samples: u32,
    /// One block per band, at most one per band.
    pub blocks: Vec<BandBlock>,
}

impl SignatureContainer {
    /// Container with no blocks.
    pub fn new(sample_rate: u32, total_samples: u32) -> Self {
        Self {
            sample_rate,
            total_samples,
            blocks: Vec::new(),
        }
    }

    /// Build a container from per-band peak lists.
    ///
    /// Bands without peaks are left out and blocks are ordered by band index.
    pub fn from_peaks(
        sample_rate: u32,
        total_samples: u32,
        bands: impl IntoIterator<Item = (Band, Vec<Peak>)>,
    ) -> Self {
        let mut blocks: Vec<BandBlock> = bands
            .into_iter()
            .filter(|(_, peaks)| !peaks.is_empty())
            .map(|(band, peaks)| BandBlock { band, peaks })
            .collect();
        blocks.sort_by_key(|block| block.band);

        Self {
            sample_rate,
            total_samples,
            blocks,
        }
    }

    /// Block for `band`, if present.
    pub fn block(&self, band: Band) -> Option<&BandBlock> {
        self.blocks.iter().find(|block| block.band == band)
    }

    /// Peaks across every block.
    pub fn peak_count(&self) -> usize {
        self.blocks.iter().map(|block| block.peaks.len()).sum()
    }

    /// Audio duration the container describes, in seconds.
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.total_samples as f32 / self.sample_rate as f32
    }

    /// Serialize to the binary container.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let band_count = u8::try_from(self.blocks.len()).map_err(|_| FormatError::Overflow {
            field: "band count",
            value: self.blocks.len(),
        })?;

        let mut seen = [false; Band::ALL.len()];
        let mut payloads = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let slot = &mut seen[block.band.index() as usize];
            if *slot {
                return Err(FormatError::DuplicateBand(block.band));
            }
            *slot = true;
            payloads.push(encode_band(block.band, &block.peaks)?);
        }

        let table_end = HEADER_LEN + TABLE_ENTRY_LEN * self.blocks.len();
        let body_len = table_end + payloads.iter().map(Vec::len).sum::<usize>();
        let total_len = body_len + CHECKSUM_LEN;
        if u32::try_from(total_len).is_err() {
            return Err(FormatError::Overflow {
                field: "container length",
                value: total_len,
            });
        }

        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.push(VERSION);
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.total_samples.to_le_bytes());
        out.push(band_count);

        // Lengths fit in u32 because the whole container does.
        let mut offset = table_end;
        for (block, payload) in self.blocks.iter().zip(&payloads) {
            out.push(block.band.index());
            out.extend_from_slice(&(offset as u32).to_le_bytes());
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            offset += payload.len();
        }
        for payload in &payloads {
            out.extend_from_slice(payload);
        }

        let checksum = CRC32.checksum(&out);
        out.extend_from_slice(&checksum.to_le_bytes());
        Ok(out)
    }

    /// Parse a binary container.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.u32()?;
        if magic != MAGIC {
            return Err(FormatError::UnsupportedFormat(magic));
        }

        let minimum = HEADER_LEN + CHECKSUM_LEN;
        if bytes.len() < minimum {
            return Err(FormatError::Truncated {
                needed: minimum,
                available: bytes.len(),
            });
        }

        let version = reader.u8()?;
        if version != VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        let (body, stored) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
        let expected = Reader::new(stored).u32()?;
        let actual = CRC32.checksum(body);
        if expected != actual {
            return Err(FormatError::Corrupt { expected, actual });
        }

        let sample_rate = reader.u32()?;
        let total_samples = reader.u32()?;
        let band_count = reader.u8()? as usize;

        let table_end = HEADER_LEN + TABLE_ENTRY_LEN * band_count;
        if table_end > body.len() {
            return Err(FormatError::Truncated {
                needed: table_end,
                available: body.len(),
            });
        }

        let mut seen = [false; Band::ALL.len()];
        let mut blocks = Vec::with_capacity(band_count);
        for _ in 0..band_count {
            let index = reader.u8()?;
            let offset = reader.u32()?;
            let length = reader.u32()?;

            let band = Band::from_index(index).ok_or(FormatError::UnknownBand(index))?;
            let slot = &mut seen[index as usize];
            if *slot {
                return Err(FormatError::DuplicateBand(band));
            }
            *slot = true;

            let start = offset as usize;
            let payload = start
                .checked_add(length as usize)
                .filter(|&end| start >= table_end && end <= body.len())
                .map(|end| &body[start..end])
                .ok_or(FormatError::BlockOutOfBounds {
                    band,
                    offset,
                    length,
                })?;

            blocks.push(BandBlock {
                band,
                peaks: decode_band(band, payload)?,
            });
        }

        Ok(Self {
            sample_rate,
            total_samples,
            blocks,
        })
    }

    /// Encode and project into the textual uri form.
    pub fn to_uri(&self) -> Result<String> {
        self.encode().map(|bytes| encode_uri(&bytes))
    }

    /// Parse the textual uri form.
    pub fn from_uri(uri: &str) -> Result<Self> {
        Self::decode(&decode_uri(uri)?)
    }
}
