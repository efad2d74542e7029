//! Term weighting: turns message bodies into sparse TF-IDF vectors.
//!
//! Two strategies exist and never share state:
//! - [`AnalyticalWeighting`] feeds the discriminative term ranker.
//! - [`ClassificationWeighting`] feeds the classifier.
//!
//! Each `fit_transform` call produces a [`Vocabulary`] tagged with the
//! strategy that fitted it; `transform` refuses vocabularies fitted by the
//! other strategy and never mutates the one it is given.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::errors::AnalyzerError;
use crate::types::{StageName, Term};

mod analytical;
mod classification;

pub use analytical::AnalyticalWeighting;
pub use classification::ClassificationWeighting;

/// Which strategy fitted a vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeightingKind {
    /// Sublinear TF-IDF over unigrams and bigrams, stop words removed.
    Analytical,
    /// Raw counts times IDF over unigrams.
    Classification,
}

impl WeightingKind {
    /// Pipeline stage that owns vectors of this kind.
    pub fn stage(self) -> StageName {
        match self {
            WeightingKind::Analytical => "ranking",
            WeightingKind::Classification => "classifier",
        }
    }
}

impl fmt::Display for WeightingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightingKind::Analytical => f.write_str("analytical"),
            WeightingKind::Classification => f.write_str("classification"),
        }
    }
}

/// Fitted terms and their inverse document frequencies.
///
/// Terms are sorted lexicographically; a term's position is its feature index.
#[derive(Clone, Debug, PartialEq)]
pub struct Vocabulary {
    kind: WeightingKind,
    terms: Vec<Term>,
    index: HashMap<Term, usize>,
    idf: Vec<f64>,
    documents: usize,
}

impl Vocabulary {
    /// Strategy that fitted this vocabulary.
    pub fn kind(&self) -> WeightingKind {
        self.kind
    }

    /// Number of terms (the dimension of every vector built from it).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when fitting kept no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in feature-index order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Feature index of `term`, if it was kept during fitting.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// IDF weight of the feature at `idx`.
    pub fn idf(&self, idx: usize) -> f64 {
        self.idf[idx]
    }

    /// Number of documents seen during fitting.
    pub fn documents(&self) -> usize {
        self.documents
    }
}

/// Sparse feature vector: `(feature index, weight)` pairs sorted by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Non-zero entries in index order.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Weight at `idx` (zero when absent).
    pub fn get(&self, idx: usize) -> f64 {
        self.entries
            .binary_search_by_key(&idx, |(entry_idx, _)| *entry_idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// True when every weight is zero.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt()
    }
}

/// One vector per input text, all of the same dimension.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorSet {
    /// Vocabulary size the vectors were built against.
    pub dimension: usize,
    /// Vectors in input order.
    pub rows: Vec<SparseVector>,
}

impl VectorSet {
    /// Number of vectors.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no texts were transformed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column sums (total weight of each feature over all rows).
    pub fn column_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.dimension];
        for row in &self.rows {
            for &(idx, weight) in row.entries() {
                totals[idx] += weight;
            }
        }
        totals
    }
}

/// Shared fit/transform contract of the weighting strategies.
pub trait TermWeighting {
    /// Tag written into every vocabulary this strategy fits.
    const KIND: WeightingKind;

    /// Split a text into the terms this strategy counts.
    fn analyze(&self, text: &str) -> Vec<Term>;

    /// Terms present in fewer documents than this are dropped at fit time.
    fn min_df(&self) -> usize;

    /// Term frequency transform applied to a raw in-document count.
    fn term_frequency(&self, count: usize) -> f64;

    /// Fit a vocabulary on `corpus` and return its vectors.
    ///
    /// An empty corpus, or one where no term survives, is `EmptyCorpus`.
    fn fit_transform<S: AsRef<str>>(
        &self,
        corpus: &[S],
    ) -> Result<(VectorSet, Vocabulary), AnalyzerError> {
        let analyzed: Vec<Vec<Term>> = corpus
            .iter()
            .map(|text| self.analyze(text.as_ref()))
            .collect();
        let vocabulary = fit_vocabulary(Self::KIND, &analyzed, self.min_df())?;
        let rows = analyzed
            .iter()
            .map(|terms| self.weigh(terms, &vocabulary))
            .collect();
        Ok((
            VectorSet {
                dimension: vocabulary.len(),
                rows,
            },
            vocabulary,
        ))
    }

    /// Map `texts` through an already fitted vocabulary.
    ///
    /// Terms outside the vocabulary contribute nothing.
    fn transform<S: AsRef<str>>(
        &self,
        texts: &[S],
        vocabulary: &Vocabulary,
    ) -> Result<VectorSet, AnalyzerError> {
        if vocabulary.kind() != Self::KIND {
            return Err(AnalyzerError::InvalidConfiguration(format!(
                "{} weighting cannot use a vocabulary fitted by {} weighting",
                Self::KIND,
                vocabulary.kind()
            )));
        }
        let rows = texts
            .iter()
            .map(|text| self.weigh(&self.analyze(text.as_ref()), vocabulary))
            .collect();
        Ok(VectorSet {
            dimension: vocabulary.len(),
            rows,
        })
    }

    /// Weight one analyzed document: `tf * idf`, then L2 normalization.
    fn weigh(&self, terms: &[Term], vocabulary: &Vocabulary) -> SparseVector {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for term in terms {
            if let Some(idx) = vocabulary.index_of(term) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, self.term_frequency(count) * vocabulary.idf(idx)))
            .collect();
        entries.sort_by_key(|(idx, _)| *idx);
        let norm = entries
            .iter()
            .map(|(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut entries {
                *weight /= norm;
            }
        }
        SparseVector { entries }
    }
}

/// Smoothed IDF: `ln((1 + n) / (1 + df)) + 1`.
pub fn smoothed_idf(documents: usize, document_frequency: usize) -> f64 {
    ((1.0 + documents as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

fn fit_vocabulary(
    kind: WeightingKind,
    analyzed: &[Vec<Term>],
    min_df: usize,
) -> Result<Vocabulary, AnalyzerError> {
    if analyzed.is_empty() {
        return Err(AnalyzerError::EmptyCorpus {
            stage: kind.stage(),
            details: format!("{kind} weighting was given no documents"),
        });
    }
    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for terms in analyzed {
        let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
        for term in unique {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }
    let mut kept: Vec<(&str, usize)> = document_frequency
        .into_iter()
        .filter(|(_, df)| *df >= min_df)
        .collect();
    if kept.is_empty() {
        return Err(AnalyzerError::EmptyCorpus {
            stage: kind.stage(),
            details: format!(
                "no terms survived {kind} weighting over {} documents (min_df={min_df})",
                analyzed.len()
            ),
        });
    }
    kept.sort_by(|a, b| a.0.cmp(b.0));

    let documents = analyzed.len();
    let terms: Vec<Term> = kept.iter().map(|(term, _)| term.to_string()).collect();
    let idf = kept
        .iter()
        .map(|(_, df)| smoothed_idf(documents, *df))
        .collect();
    let index = terms
        .iter()
        .enumerate()
        .map(|(idx, term)| (term.clone(), idx))
        .collect();
    Ok(Vocabulary {
        kind,
        terms,
        index,
        idf,
        documents,
    })
}
