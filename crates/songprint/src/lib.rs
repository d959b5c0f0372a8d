//! Songprint - acoustic signatures for song recognition
//!
//! Audio in, fingerprint out. A call decodes the file, downmixes and resamples
//! it to 16 kHz, picks time-frequency peaks in four bands, and packs them into
//! a versioned, checksummed container carried as a `data:` uri.
//!
//! - [`Recognizer`] / [`SignatureEngine`] - the async surface, with a bounded
//!   worker pool
//! - [`SignatureGenerator`] - the same pipeline, synchronous, on the calling thread
//! - [`Signature`] - the result, serializable to the JSON body network clients send
//! - [`SignatureError`] - every failure, tagged with an [`ErrorKind`]
//!
//! The stage crates are re-exported as [`analysis`], [`format`], [`io`], and
//! [`config`] for callers who need the pieces.
//!
//! ## Example
//!
//! ```rust,no_run
//! use songprint::{Recognizer, SignatureEngine};
//!
//! # async fn run() -> songprint::Result<()> {
//! let engine = SignatureEngine::new();
//! let signature = engine.recognize_path("song.mp3".as_ref()).await?;
//! println!("{}", signature.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod generator;
pub mod recognizer;
pub mod signature;

pub use songprint_analysis as analysis;
pub use songprint_config as config;
pub use songprint_format as format;
pub use songprint_io as io;

pub use context::{ContextProvider, RequestContext, StaticContext};
pub use error::{ErrorKind, Result, SignatureError};
pub use generator::{SignatureGenerator, centred_segment};
pub use recognizer::{Recognizer, SignatureEngine};
pub use signature::{Geolocation, Signature, SignatureSong};

pub use songprint_analysis::{ANALYSIS_SAMPLE_RATE, Band, Peak, PeakConfig};
pub use songprint_config::RecognizerConfig;
pub use songprint_format::{SignatureContainer, URI_PREFIX};
pub use songprint_io::{AudioSource, DefaultAudioSource, PcmAudio};
