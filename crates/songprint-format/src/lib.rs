//! Songprint Format - the versioned binary signature layout
//!
//! Turns per-band peaks into the exact byte sequence a recognition backend
//! expects and parses it back:
//!
//! - [`landmark`] - 5-byte delta-time peak records with blocklet offset markers
//! - [`container`] - Header, band table, blocks, and CRC-32 trailer
//! - [`uri`] - `data:` uri projection with standard base64
//!
//! Decoding is the exact inverse of encoding: for every container that
//! encodes, `decode(encode(c)) == c`.
//!
//! ## Example
//!
//! ```rust
//! use songprint_analysis::{Band, Peak};
//! use songprint_format::SignatureContainer;
//!
//! let peak = Peak { band: Band::LowMid, frame_index: 12, frequency_bin: 8192, magnitude: 9000 };
//! let container = SignatureContainer::from_peaks(16_000, 48_000, [(Band::LowMid, vec![peak])]);
//!
//! let uri = container.to_uri().unwrap();
//! assert!(uri.starts_with("data:audio/vnd.shazam.sig;base64,"));
//! assert_eq!(SignatureContainer::from_uri(&uri).unwrap(), container);
//! ```

pub mod container;
pub mod error;
pub mod landmark;
mod reader;
pub mod uri;

pub use container::{BandBlock, MAGIC, SignatureContainer, VERSION};
pub use error::{FormatError, Result};
pub use landmark::{decode_band, encode_band};
pub use uri::{URI_PREFIX, decode_uri, encode_uri};
