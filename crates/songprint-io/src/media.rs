//! Compressed audio through symphonia's probe and codec registry.

use std::io::{Cursor, ErrorKind};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::source::PcmAudio;
use crate::{Error, Result};

/// Decode the default track of any container symphonia can probe.
///
/// `extension` (without the dot) helps the probe when the container has no
/// reliable magic, as with raw AAC or some mp3 files. Packets that fail to
/// decode are skipped, but a stream where none decode is [`Error::Unsupported`].
/// Any other error aborts.
pub fn decode_media(bytes: Vec<u8>, extension: Option<&str>) -> Result<PcmAudio> {
    let stream = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Unsupported(format!("unrecognized container: {e}")))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| Error::Unsupported("no audio track".to_string()))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let sample_rate = params
        .sample_rate
        .ok_or_else(|| Error::Unsupported("track has no sample rate".to_string()))?;
    let mut channels = params.channels.map(|c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs().make(&params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channels.get_or_insert(spec.channels.count() as u16);

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            Err(SymphoniaError::DecodeError(reason)) => {
                skipped += 1;
                tracing::warn!(reason, "skipping undecodable packet");
            }
            Err(e) => return Err(e.into()),
        }
    }

    ensure_decoded(samples.len(), skipped)?;
    let channels = channels
        .filter(|&c| c > 0)
        .ok_or_else(|| Error::Unsupported("track has no channels".to_string()))?;

    tracing::debug!(
        sample_rate,
        channels,
        samples = samples.len(),
        skipped,
        "decoded compressed audio"
    );

    Ok(PcmAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// A stream whose every packet failed is a decode failure, not silence.
fn ensure_decoded(decoded: usize, skipped: usize) -> Result<()> {
    if decoded == 0 && skipped > 0 {
        return Err(Error::Unsupported(format!(
            "no decodable packets ({skipped} skipped)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_container_is_unsupported() {
        let result = decode_media(b"definitely not audio at all".to_vec(), None);
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_all_packets_skipped_is_unsupported() {
        let err = ensure_decoded(0, 3).unwrap_err();
        assert!(matches!(err, Error::Unsupported(ref m) if m.contains("no decodable packets")));
        assert!(ensure_decoded(1024, 3).is_ok());
        // an empty stream is left for the caller to report as empty audio
        assert!(ensure_decoded(0, 0).is_ok());
    }
}
