//! Discriminative term ranking: which words and phrases set each partner apart.
//!
//! For every partner a one-vs-rest chi-square statistic is computed per term,
//! using summed TF-IDF weights as observed frequencies. Terms are ordered by
//! `(statistic, term)` ascending and the tail of that order is reported.

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::constants::weighting::NGRAM_SEPARATOR;
use crate::data::{DisplayName, PartnerId};
use crate::errors::AnalyzerError;
use crate::store::RecordStore;
use crate::types::Term;
use crate::weighting::{AnalyticalWeighting, TermWeighting, VectorSet, Vocabulary, WeightingKind};

/// One term and its chi-square statistic for a partner.
#[derive(Clone, Debug, PartialEq)]
pub struct TermScore {
    /// Unigram or space-joined bigram.
    pub term: Term,
    /// Chi-square statistic against the partner's label.
    pub chi2: f64,
}

/// Most distinguishing vocabulary of one partner, strongest first.
#[derive(Clone, Debug, PartialEq)]
pub struct PartnerTerms {
    /// Partner identity.
    pub partner_id: PartnerId,
    /// Display name for reports.
    pub display_name: DisplayName,
    /// Messages the partner contributed to the corpus.
    pub messages: usize,
    /// Highest-scoring single words.
    pub unigrams: Vec<TermScore>,
    /// Highest-scoring two-word phrases.
    pub bigrams: Vec<TermScore>,
}

/// Ranking output for every partner in stable partner order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankingReport {
    /// Terms reported per category and partner.
    pub top_n: usize,
    /// Per-partner results.
    pub partners: Vec<PartnerTerms>,
}

impl RankingReport {
    /// True when no partner has any reported term.
    pub fn is_trivial(&self) -> bool {
        self.partners
            .iter()
            .all(|partner| partner.unigrams.is_empty() && partner.bigrams.is_empty())
    }
}

/// Fit the analytical weighting over every message in `store` and rank.
///
/// Fewer than two partners leaves nothing to contrast; the report then lists
/// the partners with no terms.
pub fn rank_store(store: &RecordStore, top_n: usize) -> Result<RankingReport, AnalyzerError> {
    if store.len() < 2 {
        warn!(
            "[parley:rank] {} partner(s) in the store; no contrast is possible",
            store.len()
        );
        return Ok(trivial_report(store, top_n));
    }
    let corpus: Vec<&str> = store
        .indexed_records()
        .map(|(_, record)| record.body.as_str())
        .collect();
    let (vectors, vocabulary) = AnalyticalWeighting::new().fit_transform(&corpus)?;
    info!(
        "[parley:rank] vectorized {} messages into {} terms",
        vectors.len(),
        vocabulary.len()
    );
    rank(store, &vectors, &vocabulary, top_n)
}

/// Rank terms for each partner given analytical vectors of the store's records.
///
/// `vectors.rows` must follow `store.indexed_records()` order, and both
/// `vectors` and `vocabulary` must come from the same analytical fit.
pub fn rank(
    store: &RecordStore,
    vectors: &VectorSet,
    vocabulary: &Vocabulary,
    top_n: usize,
) -> Result<RankingReport, AnalyzerError> {
    if vocabulary.kind() != WeightingKind::Analytical {
        return Err(AnalyzerError::InvalidConfiguration(format!(
            "ranking needs an analytical vocabulary, got one fitted by {} weighting",
            vocabulary.kind()
        )));
    }
    if vectors.dimension != vocabulary.len() {
        return Err(AnalyzerError::InvalidConfiguration(format!(
            "ranking received {}-dimensional vectors for a {}-term vocabulary",
            vectors.dimension,
            vocabulary.len()
        )));
    }
    if vectors.len() != store.message_count() {
        return Err(AnalyzerError::InvalidConfiguration(format!(
            "ranking received {} vectors for {} messages",
            vectors.len(),
            store.message_count()
        )));
    }
    if store.len() < 2 {
        return Ok(trivial_report(store, top_n));
    }

    let labels: Vec<usize> = store.indexed_records().map(|(idx, _)| idx).collect();
    let feature_totals = vectors.column_totals();
    let documents = vectors.len() as f64;

    let mut partners = Vec::with_capacity(store.len());
    for (partner_idx, thread) in store.threads().enumerate() {
        let mut in_class = vec![0.0; vectors.dimension];
        for (row, label) in vectors.rows.iter().zip(&labels) {
            if *label != partner_idx {
                continue;
            }
            for &(feature, weight) in row.entries() {
                in_class[feature] += weight;
            }
        }
        let class_share = thread.messages.len() as f64 / documents;

        let mut scores: Vec<TermScore> = vocabulary
            .terms()
            .iter()
            .enumerate()
            .map(|(feature, term)| TermScore {
                term: term.clone(),
                chi2: chi_square(in_class[feature], feature_totals[feature], class_share),
            })
            .collect();
        scores.sort_by(ascending_by_score_then_term);

        let (unigrams, bigrams): (Vec<TermScore>, Vec<TermScore>) = scores
            .into_iter()
            .partition(|score| !score.term.contains(NGRAM_SEPARATOR));
        debug!(
            "[parley:rank] partner {} scored {} unigrams and {} bigrams",
            thread.partner_id,
            unigrams.len(),
            bigrams.len()
        );

        partners.push(PartnerTerms {
            partner_id: thread.partner_id.clone(),
            display_name: thread.display_name.clone(),
            messages: thread.messages.len(),
            unigrams: strongest(unigrams, top_n),
            bigrams: strongest(bigrams, top_n),
        });
    }

    Ok(RankingReport { top_n, partners })
}

/// One-vs-rest chi-square for a single term.
///
/// `in_class` is the term's weight inside the partner's messages, `total` its
/// weight over the whole corpus, `class_share` the partner's fraction of
/// messages. Undefined statistics (zero expected frequency) score zero.
pub fn chi_square(in_class: f64, total: f64, class_share: f64) -> f64 {
    let observed = [in_class, total - in_class];
    let expected = [class_share * total, (1.0 - class_share) * total];
    let statistic: f64 = observed
        .iter()
        .zip(expected)
        .map(|(observed, expected)| (observed - expected).powi(2) / expected)
        .sum();
    if statistic.is_finite() { statistic } else { 0.0 }
}

fn ascending_by_score_then_term(a: &TermScore, b: &TermScore) -> Ordering {
    a.chi2
        .total_cmp(&b.chi2)
        .then_with(|| a.term.cmp(&b.term))
}

/// Last `top_n` entries of an ascending list, strongest first.
fn strongest(ascending: Vec<TermScore>, top_n: usize) -> Vec<TermScore> {
    let start = ascending.len().saturating_sub(top_n);
    ascending.into_iter().skip(start).rev().collect()
}

fn trivial_report(store: &RecordStore, top_n: usize) -> RankingReport {
    RankingReport {
        top_n,
        partners: store
            .threads()
            .map(|thread| PartnerTerms {
                partner_id: thread.partner_id.clone(),
                display_name: thread.display_name.clone(),
                messages: thread.messages.len(),
                unigrams: Vec::new(),
                bigrams: Vec::new(),
            })
            .collect(),
    }
}
