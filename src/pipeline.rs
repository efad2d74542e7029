//! One analysis run: store, then ranking and classification as configured.

use tracing::info;

use crate::balancer::Balancer;
use crate::classifier::Model;
use crate::config::AnalyzerConfig;
use crate::errors::AnalyzerError;
use crate::ranker::{RankingReport, rank_store};
use crate::source::ArchiveSnapshot;
use crate::store::RecordStore;

/// Everything a run produced.
#[derive(Debug)]
pub struct Analysis {
    /// Filtered, partner-grouped records.
    pub store: RecordStore,
    /// Discriminative vocabulary, when ranking was enabled.
    pub ranking: Option<RankingReport>,
    /// Trained classifier, when classification was enabled.
    pub model: Option<Model>,
}

/// Validated configuration bound to the analysis stages.
#[derive(Clone, Debug)]
pub struct Pipeline {
    config: AnalyzerConfig,
}

impl Pipeline {
    /// Validate `config`; nothing is read before this succeeds.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run every enabled stage over `snapshot`.
    pub fn run(&self, snapshot: impl Into<ArchiveSnapshot>) -> Result<Analysis, AnalyzerError> {
        let store =
            RecordStore::from_snapshot(snapshot.into(), self.config.mode, self.config.threshold);
        if store.is_empty() {
            return Err(AnalyzerError::EmptyCorpus {
                stage: "record store",
                details: format!(
                    "no partner has at least {} {} messages",
                    self.config.threshold, self.config.mode
                ),
            });
        }

        let ranking = if self.config.enable_ranking {
            Some(rank_store(&store, self.config.top_n)?)
        } else {
            info!("[parley:pipeline] ranking disabled");
            None
        };

        let model = if self.config.enable_classifier {
            let balancer = Balancer::new(self.config.sampling, self.config.seed);
            let samples = balancer.balance(&store);
            let model = Model::train(&samples)?;
            info!(
                "[parley:pipeline] classifier fitted {} terms over {} {}-sampled texts",
                model.vocabulary().len(),
                model.vocabulary().documents(),
                balancer.strategy()
            );
            Some(model)
        } else {
            info!("[parley:pipeline] classifier disabled");
            None
        };

        Ok(Analysis {
            store,
            ranking,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DirectionMode, SamplingStrategy};
    use crate::data::RawEntry;

    fn config(threshold: usize) -> AnalyzerConfig {
        AnalyzerConfig {
            threshold,
            mode: DirectionMode::Both,
            top_n: 2,
            sampling: SamplingStrategy::Oversample,
            ..AnalyzerConfig::default()
        }
    }

    #[test]
    fn invalid_configuration_fails_before_running() {
        let err = Pipeline::new(config(0)).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidConfiguration(_)));
    }

    #[test]
    fn no_surviving_partner_is_an_empty_corpus() {
        let pipeline = Pipeline::new(config(5)).unwrap();
        let err = pipeline
            .run(vec![RawEntry::new("5550000001", "1", "hi")])
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::EmptyCorpus {
                stage: "record store",
                ..
            }
        ));
    }

    #[test]
    fn disabled_stages_produce_nothing() {
        let mut config = config(1);
        config.enable_ranking = false;
        config.enable_classifier = false;
        let analysis = Pipeline::new(config)
            .unwrap()
            .run(vec![RawEntry::new("5550000001", "1", "hello there")])
            .unwrap();
        assert_eq!(analysis.store.len(), 1);
        assert!(analysis.ranking.is_none());
        assert!(analysis.model.is_none());
    }

    #[test]
    fn full_run_ranks_and_trains() {
        let entries = vec![
            RawEntry::new("5550000001", "1", "pizza hello world"),
            RawEntry::new("5550000001", "1", "pizza again hello world"),
            RawEntry::new("5550000002", "1", "goodbye moon"),
        ];
        let analysis = Pipeline::new(config(1)).unwrap().run(entries).unwrap();
        let ranking = analysis.ranking.unwrap();
        assert_eq!(ranking.partners.len(), 2);
        let model = analysis.model.unwrap();
        assert_eq!(model.predict("moon").unwrap().partner_id, "5550000002");
        // Oversampling brings the single-message partner up to two texts.
        assert_eq!(model.vocabulary().documents(), 4);
    }
}
