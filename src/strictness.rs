use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CleanError;

/// Named threshold preset controlling how much borderline content is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

/// Classifier thresholds. One fixed row per [`Strictness`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct StrictnessProfile {
    /// Blocks shorter than this (in characters) are `Short`.
    pub short_length: usize,
    pub low_length: usize,
    pub high_length: usize,
    pub max_link_density: f64,
    pub min_punct_density: f64,
    pub min_stopword_density: f64,
    pub good_score: f64,
    pub bad_score: f64,
}

const CONSERVATIVE: StrictnessProfile = StrictnessProfile {
    short_length: 8,
    low_length: 20,
    high_length: 80,
    max_link_density: 0.6,
    min_punct_density: 0.005,
    min_stopword_density: 0.05,
    good_score: 0.8,
    bad_score: -1.5,
};

const BALANCED: StrictnessProfile = StrictnessProfile {
    short_length: 12,
    low_length: 30,
    high_length: 120,
    max_link_density: 0.5,
    min_punct_density: 0.01,
    min_stopword_density: 0.08,
    good_score: 1.0,
    bad_score: -1.0,
};

const AGGRESSIVE: StrictnessProfile = StrictnessProfile {
    short_length: 20,
    low_length: 40,
    high_length: 160,
    max_link_density: 0.35,
    min_punct_density: 0.02,
    min_stopword_density: 0.12,
    good_score: 1.5,
    bad_score: -0.5,
};

impl Strictness {
    pub const ALL: [Strictness; 3] = [
        Strictness::Conservative,
        Strictness::Balanced,
        Strictness::Aggressive,
    ];

    pub fn profile(self) -> StrictnessProfile {
        match self {
            Strictness::Conservative => CONSERVATIVE,
            Strictness::Balanced => BALANCED,
            Strictness::Aggressive => AGGRESSIVE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strictness::Conservative => "conservative",
            Strictness::Balanced => "balanced",
            Strictness::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strictness {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Strictness::ALL
            .into_iter()
            .find(|level| level.as_str() == lower)
            .ok_or_else(|| CleanError::UnknownStrictness(s.to_string()))
    }
}
