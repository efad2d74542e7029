use std::collections::HashSet;
use std::sync::OnceLock;

use stop_words::LANGUAGE;

use crate::constants::weighting::{ANALYTICAL_MAX_NGRAM, ANALYTICAL_MIN_DF, NGRAM_SEPARATOR};
use crate::types::Term;
use crate::utils::word_tokens;
use crate::weighting::{TermWeighting, WeightingKind};

fn english_stop_words() -> &'static HashSet<String> {
    static STOP_WORDS: OnceLock<HashSet<String>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| stop_words::get(LANGUAGE::English).into_iter().collect())
}

/// TF-IDF for vocabulary analysis.
///
/// Lowercased word tokens with English stop words removed, then unigrams and
/// bigrams of the remaining tokens. Terms must appear in at least
/// `ANALYTICAL_MIN_DF` documents. Term frequency is `1 + ln(count)`.
#[derive(Clone, Debug, Default)]
pub struct AnalyticalWeighting;

impl AnalyticalWeighting {
    /// Create the analytical strategy.
    pub fn new() -> Self {
        Self
    }
}

impl TermWeighting for AnalyticalWeighting {
    const KIND: WeightingKind = WeightingKind::Analytical;

    fn analyze(&self, text: &str) -> Vec<Term> {
        let stop_words = english_stop_words();
        let tokens: Vec<String> = word_tokens(text)
            .into_iter()
            .filter(|token| !stop_words.contains(token))
            .collect();
        let mut terms = tokens.clone();
        for n in 2..=ANALYTICAL_MAX_NGRAM {
            terms.extend(
                tokens
                    .windows(n)
                    .map(|window| window.join(NGRAM_SEPARATOR)),
            );
        }
        terms
    }

    fn min_df(&self) -> usize {
        ANALYTICAL_MIN_DF
    }

    fn term_frequency(&self, count: usize) -> f64 {
        1.0 + (count as f64).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AnalyzerError;

    #[test]
    fn stop_words_are_removed_before_bigrams() {
        let terms = AnalyticalWeighting::new().analyze("The pizza and the tacos");
        assert_eq!(terms, vec!["pizza", "tacos", "pizza tacos"]);
    }

    #[test]
    fn terms_in_a_single_document_are_excluded() {
        let corpus = ["pizza tacos", "pizza tacos", "guitar"];
        let (vectors, vocabulary) = AnalyticalWeighting::new().fit_transform(&corpus).unwrap();
        assert_eq!(vocabulary.terms(), &["pizza", "pizza tacos", "tacos"]);
        assert_eq!(vectors.len(), 3);
        assert!(vectors.rows[2].is_empty());
    }

    #[test]
    fn rows_are_l2_normalized_with_sublinear_tf() {
        let corpus = ["pizza pizza pizza guitar", "pizza guitar"];
        let (vectors, vocabulary) = AnalyticalWeighting::new().fit_transform(&corpus).unwrap();
        for row in &vectors.rows {
            assert!((row.norm() - 1.0).abs() < 1e-9);
        }
        let pizza = vocabulary.index_of("pizza").unwrap();
        let guitar = vocabulary.index_of("guitar").unwrap();
        // Both terms appear in every document, so idf is equal and the ratio is tf-only.
        let ratio = vectors.rows[0].get(pizza) / vectors.rows[0].get(guitar);
        assert!((ratio - (1.0 + 3.0f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn corpus_without_shared_terms_is_empty() {
        let err = AnalyticalWeighting::new()
            .fit_transform(&["pizza", "guitar"])
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::EmptyCorpus {
                stage: "ranking",
                ..
            }
        ));
    }
}
