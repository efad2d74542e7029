use crate::types::Term;
use crate::utils::word_tokens;
use crate::weighting::{TermWeighting, WeightingKind};

/// Count-then-IDF weighting for the classifier.
///
/// Lowercased unigrams, no stop-word removal, every term kept. Vectors are
/// raw counts times smoothed IDF, L2 normalized.
#[derive(Clone, Debug, Default)]
pub struct ClassificationWeighting;

impl ClassificationWeighting {
    /// Create the classification strategy.
    pub fn new() -> Self {
        Self
    }
}

impl TermWeighting for ClassificationWeighting {
    const KIND: WeightingKind = WeightingKind::Classification;

    fn analyze(&self, text: &str) -> Vec<Term> {
        word_tokens(text)
    }

    fn min_df(&self) -> usize {
        1
    }

    fn term_frequency(&self, count: usize) -> f64 {
        count as f64
    }
}
