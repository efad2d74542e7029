//! Multinomial Naive Bayes over classification-weighted term vectors.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::constants::classifier::LAPLACE_ALPHA;
use crate::data::{LabeledText, PartnerId};
use crate::errors::AnalyzerError;
use crate::weighting::{ClassificationWeighting, SparseVector, TermWeighting, Vocabulary};

const STAGE: &str = "classifier";

/// Outcome of classifying one text.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Partner with the highest posterior.
    pub partner_id: PartnerId,
    /// Unnormalized log posterior of that partner.
    pub log_posterior: f64,
}

/// Trained classifier. Owns its own weighting fit; nothing is shared with
/// the ranker.
#[derive(Clone, Debug)]
pub struct Model {
    weighting: ClassificationWeighting,
    vocabulary: Vocabulary,
    classes: Vec<PartnerId>,
    class_log_prior: Vec<f64>,
    // classes x vocabulary
    feature_log_prob: Vec<Vec<f64>>,
}

impl Model {
    /// Fit the classification weighting on `samples` and estimate class
    /// priors and per-class term log-probabilities.
    pub fn train(samples: &[LabeledText]) -> Result<Self, AnalyzerError> {
        if samples.is_empty() {
            return Err(AnalyzerError::EmptyCorpus {
                stage: STAGE,
                details: "no training samples".to_string(),
            });
        }
        let weighting = ClassificationWeighting::new();
        let texts: Vec<&str> = samples.iter().map(|sample| sample.text.as_str()).collect();
        let (vectors, vocabulary) = weighting.fit_transform(&texts)?;

        let classes: Vec<PartnerId> = samples
            .iter()
            .map(|sample| sample.partner_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut class_counts = vec![0usize; classes.len()];
        let mut feature_sums = vec![vec![0.0f64; vocabulary.len()]; classes.len()];
        for (sample, row) in samples.iter().zip(&vectors.rows) {
            let class = classes
                .binary_search(&sample.partner_id)
                .map_err(|_| AnalyzerError::InvalidConfiguration(format!(
                    "sample labelled {} has no class",
                    sample.partner_id
                )))?;
            class_counts[class] += 1;
            for &(feature, weight) in row.entries() {
                feature_sums[class][feature] += weight;
            }
        }

        let total = samples.len() as f64;
        let class_log_prior = class_counts
            .iter()
            .map(|count| (*count as f64 / total).ln())
            .collect();
        let feature_log_prob = feature_sums
            .into_iter()
            .map(|sums| {
                let denominator =
                    (sums.iter().sum::<f64>() + LAPLACE_ALPHA * sums.len() as f64).ln();
                sums.into_iter()
                    .map(|sum| (sum + LAPLACE_ALPHA).ln() - denominator)
                    .collect()
            })
            .collect();

        info!(
            "[parley:classifier] trained on {} samples, {} classes, {} terms",
            samples.len(),
            classes.len(),
            vocabulary.len()
        );
        Ok(Self {
            weighting,
            vocabulary,
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Classes in sorted partner order.
    pub fn classes(&self) -> &[PartnerId] {
        &self.classes
    }

    /// Vocabulary fitted at training time.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Log prior of each class, aligned with [`Model::classes`].
    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// Most likely partner for `text`. Terms outside the vocabulary are
    /// ignored; text with no known terms falls back to the priors.
    pub fn predict(&self, text: &str) -> Result<Prediction, AnalyzerError> {
        let vectors = self.weighting.transform(&[text], &self.vocabulary)?;
        let features = vectors.rows.first().cloned().unwrap_or_default();
        let scores = self.joint_log_likelihood(&features);
        debug!("[parley:classifier] scores {:?}", scores);

        let mut best: Option<(usize, f64)> = None;
        for (class, score) in scores.into_iter().enumerate() {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((class, score)),
            }
        }
        let (class, log_posterior) = best.ok_or_else(|| AnalyzerError::EmptyCorpus {
            stage: STAGE,
            details: "model has no classes".to_string(),
        })?;
        Ok(Prediction {
            partner_id: self.classes[class].clone(),
            log_posterior,
        })
    }

    fn joint_log_likelihood(&self, features: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| {
                prior
                    + features
                        .entries()
                        .iter()
                        .map(|&(feature, weight)| weight * log_prob[feature])
                        .sum::<f64>()
            })
            .collect()
    }
}

/// Train a model; see [`Model::train`].
pub fn train(samples: &[LabeledText]) -> Result<Model, AnalyzerError> {
    Model::train(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(text: &str, partner_id: &str) -> LabeledText {
        LabeledText {
            text: text.to_string(),
            partner_id: partner_id.to_string(),
        }
    }

    #[test]
    fn disjoint_vocabularies_predict_their_partner() {
        let model = train(&[
            labeled("hello world", "5550000001"),
            labeled("goodbye moon", "5550000002"),
        ])
        .unwrap();
        assert_eq!(model.predict("hello").unwrap().partner_id, "5550000001");
        assert_eq!(model.predict("moon").unwrap().partner_id, "5550000002");
        assert_eq!(model.predict("Goodbye, MOON!").unwrap().partner_id, "5550000002");
    }

    #[test]
    fn unknown_terms_fall_back_to_priors() {
        let model = train(&[
            labeled("pizza tonight", "5550000001"),
            labeled("pizza again", "5550000001"),
            labeled("band practice", "5550000002"),
        ])
        .unwrap();
        let prediction = model.predict("xylophone zeppelin").unwrap();
        assert_eq!(prediction.partner_id, "5550000001");
        assert!((prediction.log_posterior - (2.0f64 / 3.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn ties_go_to_earliest_partner() {
        let model = train(&[
            labeled("band practice", "5550000002"),
            labeled("pizza tonight", "5550000001"),
        ])
        .unwrap();
        assert_eq!(model.classes(), &["5550000001", "5550000002"]);
        assert_eq!(model.predict("").unwrap().partner_id, "5550000001");
    }

    #[test]
    fn priors_follow_class_frequencies() {
        let model = train(&[
            labeled("one", "a"),
            labeled("two", "a"),
            labeled("three", "a"),
            labeled("four", "b"),
        ])
        .unwrap();
        let priors = model.class_log_prior();
        assert!((priors[0] - 0.75f64.ln()).abs() < 1e-12);
        assert!((priors[1] - 0.25f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn empty_training_sets_are_rejected() {
        let err = train(&[]).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::EmptyCorpus {
                stage: "classifier",
                ..
            }
        ));
        let err = train(&[labeled("!", "a"), labeled("?", "b")]).unwrap_err();
        assert!(matches!(err, AnalyzerError::EmptyCorpus { .. }));
    }
}
