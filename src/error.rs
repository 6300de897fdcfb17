use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("unknown strictness: {0} (expected conservative, balanced or aggressive)")]
    UnknownStrictness(String),

    #[error("invalid maximum segment length: {0}")]
    InvalidSegmentLength(usize),

    #[error("speech backend is not configured: {0}")]
    BackendUnavailable(String),

    #[error("synthesis failed for segment {segment}: {reason}")]
    Synthesis { segment: usize, reason: String },
}
