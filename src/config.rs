use std::fmt;
use std::str::FromStr;

use crate::constants::config::{DEFAULT_SEED, DEFAULT_THRESHOLD, DEFAULT_TOP_N};
use crate::data::Direction;
use crate::errors::AnalyzerError;

/// Which message directions are retained when building the record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionMode {
    /// Only messages the archive owner received.
    Received,
    /// Only messages the archive owner sent.
    Sent,
    /// Every message regardless of direction.
    Both,
}

impl DirectionMode {
    /// Whether a record with `direction` passes this mode's filter.
    pub fn admits(self, direction: Direction) -> bool {
        match self {
            DirectionMode::Received => direction == Direction::Received,
            DirectionMode::Sent => direction == Direction::Sent,
            DirectionMode::Both => true,
        }
    }
}

impl fmt::Display for DirectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DirectionMode::Received => "received",
            DirectionMode::Sent => "sent",
            DirectionMode::Both => "both",
        };
        f.write_str(label)
    }
}

/// Accepts `received|sent|both` and the legacy codes `1|2|3`.
impl FromStr for DirectionMode {
    type Err = AnalyzerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "received" | "1" => Ok(DirectionMode::Received),
            "sent" | "2" => Ok(DirectionMode::Sent),
            "both" | "3" => Ok(DirectionMode::Both),
            other => Err(AnalyzerError::InvalidConfiguration(format!(
                "unknown mode '{other}': expected received, sent, or both"
            ))),
        }
    }
}

/// Resampling applied before classifier training.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SamplingStrategy {
    /// Use the store as-is.
    None,
    /// Randomly drop records until every partner matches the smallest partner.
    Undersample,
    /// Randomly duplicate records until every partner matches the largest partner.
    Oversample,
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SamplingStrategy::None => "none",
            SamplingStrategy::Undersample => "under",
            SamplingStrategy::Oversample => "over",
        };
        f.write_str(label)
    }
}

/// Accepts `none|under|over` and the legacy codes `3|1|2`.
impl FromStr for SamplingStrategy {
    type Err = AnalyzerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" | "3" => Ok(SamplingStrategy::None),
            "under" | "undersample" | "1" => Ok(SamplingStrategy::Undersample),
            "over" | "oversample" | "2" => Ok(SamplingStrategy::Oversample),
            other => Err(AnalyzerError::InvalidConfiguration(format!(
                "unknown sampling strategy '{other}': expected none, under, or over"
            ))),
        }
    }
}

/// Run-scoped configuration passed into the pipeline entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Minimum number of (direction-filtered) messages a partner needs to be kept.
    pub threshold: usize,
    /// Direction filter applied before grouping.
    pub mode: DirectionMode,
    /// Number of unigrams and bigrams reported per partner.
    pub top_n: usize,
    /// Resampling applied before classifier training.
    pub sampling: SamplingStrategy,
    /// Seed for resampling; same seed and input give the same training set.
    pub seed: u64,
    /// Whether the discriminative term ranking runs.
    pub enable_ranking: bool,
    /// Whether the classifier is trained.
    pub enable_classifier: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            mode: DirectionMode::Received,
            top_n: DEFAULT_TOP_N,
            sampling: SamplingStrategy::Oversample,
            seed: DEFAULT_SEED,
            enable_ranking: true,
            enable_classifier: true,
        }
    }
}

impl AnalyzerConfig {
    /// Reject out-of-range values before any archive is read.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.threshold == 0 {
            return Err(AnalyzerError::InvalidConfiguration(
                "threshold must be at least 1".to_string(),
            ));
        }
        if self.enable_ranking && self.top_n == 0 {
            return Err(AnalyzerError::InvalidConfiguration(
                "top_n must be at least 1 when ranking is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_names_and_legacy_codes() {
        assert_eq!("Received".parse::<DirectionMode>().unwrap(), DirectionMode::Received);
        assert_eq!("2".parse::<DirectionMode>().unwrap(), DirectionMode::Sent);
        assert_eq!(" both ".parse::<DirectionMode>().unwrap(), DirectionMode::Both);
    }

    #[test]
    fn unknown_mode_is_a_configuration_error() {
        let err = "inbox".parse::<DirectionMode>().unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("inbox"));
    }

    #[test]
    fn sampling_parses_names_and_legacy_codes() {
        assert_eq!("1".parse::<SamplingStrategy>().unwrap(), SamplingStrategy::Undersample);
        assert_eq!("over".parse::<SamplingStrategy>().unwrap(), SamplingStrategy::Oversample);
        assert_eq!("3".parse::<SamplingStrategy>().unwrap(), SamplingStrategy::None);
        assert!("smote".parse::<SamplingStrategy>().is_err());
    }

    #[test]
    fn mode_admits_matching_directions() {
        assert!(DirectionMode::Received.admits(Direction::Received));
        assert!(!DirectionMode::Received.admits(Direction::Sent));
        assert!(DirectionMode::Both.admits(Direction::Sent));
    }

    #[test]
    fn validate_rejects_zero_threshold_and_top_n() {
        let config = AnalyzerConfig {
            threshold: 0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyzerConfig {
            top_n: 0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyzerConfig {
            top_n: 0,
            enable_ranking: false,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
