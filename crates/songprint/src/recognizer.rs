//! The async recognition surface.
//!
//! Each call runs its whole pipeline (decode, resample, analyse, encode) as one
//! blocking task. A counting semaphore sized to the worker count bounds how
//! many pipelines are in flight; callers wait on it without blocking their
//! executor. Calls share nothing mutable, so a failed call leaves no trace.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use songprint_config::RecognizerConfig;
use songprint_io::{AudioSource, DefaultAudioSource};
use tokio::sync::Semaphore;

use crate::context::{ContextProvider, RequestContext, StaticContext};
use crate::error::{ErrorKind, Result, SignatureError};
use crate::generator::SignatureGenerator;
use crate::signature::{Signature, SignatureSong};

/// Something that turns audio into a [`Signature`].
pub trait Recognizer: Send + Sync {
    /// Fingerprint the audio file at `path`.
    fn recognize_path(&self, path: &Path) -> impl Future<Output = Result<Signature>> + Send;

    /// Fingerprint an in-memory audio file.
    fn recognize_bytes(&self, bytes: Vec<u8>) -> impl Future<Output = Result<Signature>> + Send;
}

enum Input {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// The default [`Recognizer`].
///
/// Cheap to clone; clones share the worker limit.
#[derive(Clone)]
pub struct SignatureEngine {
    generator: SignatureGenerator,
    source: Arc<dyn AudioSource>,
    context: Arc<dyn ContextProvider>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl SignatureEngine {
    /// Engine with default settings.
    pub fn new() -> Self {
        Self::from_config(&RecognizerConfig::default())
    }

    /// Engine using the segment, worker, peak, and context settings of `config`.
    pub fn from_config(config: &RecognizerConfig) -> Self {
        let workers = config.effective_workers().max(1);
        Self {
            generator: SignatureGenerator::from_config(config),
            source: Arc::new(DefaultAudioSource),
            context: Arc::new(StaticContext(RequestContext::from(&config.context))),
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Replace the audio decoder.
    pub fn with_source(mut self, source: impl AudioSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// Replace the request context provider.
    pub fn with_context(mut self, context: impl ContextProvider + 'static) -> Self {
        self.context = Arc::new(context);
        self
    }

    /// Replace the worker limit. Clones made earlier keep the old limit.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self.permits = Arc::new(Semaphore::new(self.workers));
        self
    }

    /// Maximum pipelines running at once.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The synchronous generator each call runs.
    pub fn generator(&self) -> &SignatureGenerator {
        &self.generator
    }

    async fn run(&self, input: Input) -> Result<Signature> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| SignatureError::new(ErrorKind::Internal, "worker pool closed"))?;

        let started = Instant::now();
        let generator = self.generator;
        let source = Arc::clone(&self.source);

        let (container, uri) = tokio::task::spawn_blocking(move || -> Result<_> {
            let audio = match input {
                Input::Path(path) => source.read_path(&path)?,
                Input::Bytes(bytes) => source.read_bytes(bytes, None)?,
            };
            let container = generator.generate(&audio)?;
            let uri = container.to_uri()?;
            Ok((container, uri))
        })
        .await??;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let context = self.context.context();

        tracing::info!(
            samples = container.total_samples,
            peaks = container.peak_count(),
            bands = container.blocks.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "signature generated"
        );

        Ok(Signature {
            geolocation: context.geolocation,
            signature: SignatureSong {
                samples: container.total_samples,
                timestamp,
                uri,
            },
            timestamp,
            timezone: context.timezone,
        })
    }
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignatureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureEngine")
            .field("generator", &self.generator)
            .field("workers", &self.workers)
            .field("available", &self.permits.available_permits())
            .finish_non_exhaustive()
    }
}

impl Recognizer for SignatureEngine {
    async fn recognize_path(&self, path: &Path) -> Result<Signature> {
        tracing::debug!(path = %path.display(), "recognize path");
        self.run(Input::Path(path.to_path_buf())).await
    }

    async fn recognize_bytes(&self, bytes: Vec<u8>) -> Result<Signature> {
        tracing::debug!(bytes = bytes.len(), "recognize bytes");
        if bytes.is_empty() {
            return Err(SignatureError::new(ErrorKind::Input, "empty audio buffer"));
        }
        self.run(Input::Bytes(bytes)).await
    }
}
