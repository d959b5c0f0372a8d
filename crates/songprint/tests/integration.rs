//! End-to-end tests through the async engine.

use std::path::Path;

use songprint::{
    ANALYSIS_SAMPLE_RATE, Band, ErrorKind, Geolocation, PcmAudio, Recognizer, RecognizerConfig,
    Signature, SignatureEngine, SignatureError, SignatureSong, URI_PREFIX,
};
use proptest::prelude::*;
use tempfile::TempDir;

/// Linear sweep from 300 Hz to 5 kHz so every band sees energy.
fn sweep(sample_rate: u32, seconds: f64) -> Vec<f32> {
    sweep_samples(sample_rate, (f64::from(sample_rate) * seconds) as usize)
}

/// [`sweep`] over exactly `n` samples.
fn sweep_samples(sample_rate: u32, n: usize) -> Vec<f32> {
    let sr = f64::from(sample_rate);
    let (f0, f1) = (300.0_f64, 5000.0_f64);
    let rate = (f1 - f0) * sr / n.max(1) as f64;
    (0..n)
        .map(|i| {
            let t = i as f64 / sr;
            let phase = 2.0 * std::f64::consts::PI * (f0 * t + 0.5 * rate * t * t);
            (0.5 * phase.sin()) as f32
        })
        .collect()
}

fn wav_bytes(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample((s * 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[tokio::test]
async fn wav_file_produces_decodable_signature() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sweep.wav");
    songprint::io::write_wav(
        &path,
        &PcmAudio {
            samples: sweep(44_100, 10.0),
            sample_rate: 44_100,
            channels: 1,
        },
    )
    .unwrap();

    let signature = SignatureEngine::new().recognize_path(&path).await.unwrap();
    assert!(signature.signature.uri.starts_with(URI_PREFIX));
    assert_eq!(signature.signature.samples, 160_000);
    assert_eq!(signature.geolocation, Geolocation::default());
    assert_eq!(signature.timezone, "Europe/Paris");

    let container = signature.decode_container().unwrap();
    assert_eq!(container.sample_rate, ANALYSIS_SAMPLE_RATE);
    assert_eq!(container.total_samples, signature.signature.samples);
    for band in Band::ALL {
        let block = container.block(band).unwrap_or_else(|| panic!("no peaks in {band:?}"));
        assert!(!block.peaks.is_empty());
    }
}

#[tokio::test]
async fn same_audio_gives_same_uri() {
    let bytes = wav_bytes(&sweep(22_050, 4.0), 22_050, 1);
    let engine = SignatureEngine::new();

    let a = engine.recognize_bytes(bytes.clone()).await.unwrap();
    let b = engine.recognize_bytes(bytes).await.unwrap();
    assert_eq!(a.signature.uri, b.signature.uri);
    assert_eq!(a.signature.samples, b.signature.samples);
}

#[tokio::test]
async fn stereo_duplicate_matches_mono() {
    let mono = sweep(16_000, 3.0);
    let stereo: Vec<f32> = mono.iter().flat_map(|&s| [s, s]).collect();
    let engine = SignatureEngine::new();

    let a = engine.recognize_bytes(wav_bytes(&mono, 16_000, 1)).await.unwrap();
    let b = engine.recognize_bytes(wav_bytes(&stereo, 16_000, 2)).await.unwrap();
    assert_eq!(a.signature.uri, b.signature.uri);
}

#[tokio::test]
async fn long_input_is_limited_to_segment() {
    let config = RecognizerConfig::from_toml("segment_duration_seconds = 2").unwrap();
    let engine = SignatureEngine::from_config(&config);

    let signature = engine
        .recognize_bytes(wav_bytes(&sweep(16_000, 6.0), 16_000, 1))
        .await
        .unwrap();
    assert_eq!(signature.signature.samples, 32_000);
    assert_eq!(signature.duration_seconds(), 2.0);
}

#[tokio::test]
async fn empty_bytes_are_input_error() {
    let err = SignatureEngine::new().recognize_bytes(Vec::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}

#[tokio::test]
async fn short_clip_is_input_error() {
    let bytes = wav_bytes(&sweep(16_000, 0.05), 16_000, 1);
    let err = SignatureEngine::new().recognize_bytes(bytes).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = SignatureEngine::new()
        .recognize_path(&dir.path().join("missing.wav"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[tokio::test]
async fn garbage_bytes_are_decode_error() {
    let bytes = b"definitely not an audio container ".repeat(64);
    let err = SignatureEngine::new().recognize_bytes(bytes).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn absurd_header_rate_is_decode_error() {
    let mut bytes = wav_bytes(&sweep(16_000, 1.0), 16_000, 1);
    bytes[24..28].copy_from_slice(&2_147_483_647u32.to_le_bytes());
    let err = SignatureEngine::new().recognize_bytes(bytes).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_are_independent() {
    let engine = SignatureEngine::new().with_workers(2);
    let good = wav_bytes(&sweep(16_000, 3.0), 16_000, 1);
    let expected = engine.recognize_bytes(good.clone()).await.unwrap().signature.uri;

    let mut calls = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        let bytes = if i % 2 == 0 { good.clone() } else { b"junk".repeat(32) };
        calls.push(tokio::spawn(async move { engine.recognize_bytes(bytes).await }));
    }

    for (i, call) in calls.into_iter().enumerate() {
        let result = call.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(result.unwrap().signature.uri, expected);
        } else {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Decode);
        }
    }
}

#[tokio::test]
async fn json_body_roundtrips() {
    let signature = SignatureEngine::new()
        .recognize_bytes(wav_bytes(&sweep(16_000, 2.0), 16_000, 1))
        .await
        .unwrap();
    let back = Signature::from_json(&signature.to_json().unwrap()).unwrap();
    assert_eq!(back, signature);
}

/// Canned recognizer standing in for the engine.
struct FixedRecognizer(Signature);

impl Recognizer for FixedRecognizer {
    async fn recognize_path(&self, path: &Path) -> songprint::Result<Signature> {
        if path.as_os_str().is_empty() {
            return Err(SignatureError::new(ErrorKind::Input, "empty path"));
        }
        Ok(self.0.clone())
    }

    async fn recognize_bytes(&self, bytes: Vec<u8>) -> songprint::Result<Signature> {
        if bytes.is_empty() {
            return Err(SignatureError::new(ErrorKind::Input, "empty audio buffer"));
        }
        Ok(self.0.clone())
    }
}

async fn samples_of<R: Recognizer>(recognizer: &R, bytes: Vec<u8>) -> songprint::Result<u32> {
    Ok(recognizer.recognize_bytes(bytes).await?.signature.samples)
}

#[tokio::test]
async fn callers_can_substitute_a_recognizer() {
    let fixed = FixedRecognizer(Signature {
        geolocation: Geolocation::default(),
        signature: SignatureSong {
            samples: 48_000,
            timestamp: 0,
            uri: format!("{URI_PREFIX}AAAA"),
        },
        timestamp: 0,
        timezone: "UTC".to_string(),
    });

    assert_eq!(samples_of(&fixed, vec![1, 2, 3]).await.unwrap(), 48_000);
    assert_eq!(samples_of(&fixed, Vec::new()).await.unwrap_err().kind(), ErrorKind::Input);
    assert!(fixed.recognize_path(Path::new("")).await.is_err());

    let engine = SignatureEngine::new();
    let bytes = wav_bytes(&sweep(16_000, 1.0), 16_000, 1);
    assert_eq!(samples_of(&engine, bytes).await.unwrap(), 16_000);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn samples_match_container_total(
        analysis_len in 2_048usize..40_000,
        sample_rate in prop_oneof![Just(8_000u32), Just(16_000), Just(22_050), Just(44_100)],
    ) {
        // source length that resamples to at least `analysis_len` samples
        let len = (analysis_len * sample_rate as usize).div_ceil(ANALYSIS_SAMPLE_RATE as usize);
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let bytes = wav_bytes(&sweep_samples(sample_rate, len), sample_rate, 1);
        let signature = runtime
            .block_on(SignatureEngine::new().recognize_bytes(bytes))
            .unwrap();

        let container = signature.decode_container().unwrap();
        prop_assert_eq!(container.total_samples, signature.signature.samples);
        prop_assert_eq!((signature.signature.samples - 2_048) % 128, 0);
    }
}
