//! Boundary to the text-to-speech engine.
//!
//! The cleaning pipeline never calls a backend itself; callers hand the
//! segments from [`Segmenter::split`](crate::Segmenter::split) to
//! [`synthesize_segments`] with whichever backend they configured.

use crate::error::CleanError;

/// A speech engine able to turn one segment into audio.
///
/// Implementations own their retry and timeout policy.
pub trait SpeechBackend {
    /// Synthesize `text`, optionally with a named voice. Returns encoded audio bytes.
    fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, CleanError>;

    /// Whether credentials and endpoint settings look usable.
    fn validate_config(&self) -> bool;
}

/// Audio for one segment, tagged with the segment's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentAudio {
    pub segment: usize,
    pub audio: Vec<u8>,
}

/// Synthesize `segments` in order, skipping any the backend fails on.
///
/// Fails up front with [`CleanError::BackendUnavailable`] when the backend
/// reports an invalid configuration, and with the last synthesis error when
/// no segment succeeded. An empty segment list yields an empty result.
pub fn synthesize_segments<B>(
    backend: &B,
    segments: &[String],
    voice: Option<&str>,
) -> Result<Vec<SegmentAudio>, CleanError>
where
    B: SpeechBackend + ?Sized,
{
    if !backend.validate_config() {
        return Err(CleanError::BackendUnavailable(
            "configuration rejected by backend".to_string(),
        ));
    }

    let mut chunks = Vec::with_capacity(segments.len());
    let mut last_error = None;

    for (i, text) in segments.iter().enumerate() {
        match backend.synthesize(text, voice) {
            Ok(audio) => chunks.push(SegmentAudio { segment: i, audio }),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(segment = i, error = %err, "skipping segment");
                last_error = Some(err);
            }
        }
    }

    match last_error {
        Some(err) if chunks.is_empty() => Err(err),
        _ => Ok(chunks),
    }
}
