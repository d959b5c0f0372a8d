//! The `Signature` value handed to callers and uploaded by network clients.

use serde::{Deserialize, Serialize};
use songprint_format::SignatureContainer;

use crate::error::Result;

/// Integer-encoded request location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geolocation {
    /// Altitude in metres.
    pub altitude: i16,
    /// Latitude in whole degrees.
    pub latitude: i8,
    /// Longitude in whole degrees.
    pub longitude: i8,
}

impl Default for Geolocation {
    fn default() -> Self {
        Self {
            altitude: 300,
            latitude: 45,
            longitude: 2,
        }
    }
}

/// The fingerprint payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSong {
    /// 16 kHz samples covered by the analysis frames.
    pub samples: u32,
    /// Generation time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// `data:` uri holding the binary container.
    pub uri: String,
}

/// A fingerprint together with its request context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Where the request claims to come from.
    pub geolocation: Geolocation,
    /// The fingerprint itself.
    pub signature: SignatureSong,
    /// Generation time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// IANA timezone name.
    pub timezone: String,
}

impl Signature {
    /// Parse the binary container back out of the uri.
    pub fn decode_container(&self) -> Result<SignatureContainer> {
        Ok(SignatureContainer::from_uri(&self.signature.uri)?)
    }

    /// Duration of analysed audio in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.signature.samples as f32 / songprint_analysis::ANALYSIS_SAMPLE_RATE as f32
    }

    /// Serialize as the JSON body network clients upload.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON body produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
