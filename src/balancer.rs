//! Class balancing: resample partner threads so no partner dominates training.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use tracing::info;

use crate::config::SamplingStrategy;
use crate::data::LabeledText;
use crate::hash::stable_hash_str;
use crate::metrics::partner_skew;
use crate::store::{PartnerThread, RecordStore};

/// Seeded resampler over a record store.
///
/// Each partner draws from its own RNG seeded with `(seed, partner_id)`, so a
/// partner's sample depends only on its own thread, the target count, and the seed.
#[derive(Clone, Copy, Debug)]
pub struct Balancer {
    strategy: SamplingStrategy,
    seed: u64,
}

impl Balancer {
    /// Create a balancer.
    pub fn new(strategy: SamplingStrategy, seed: u64) -> Self {
        Self { strategy, seed }
    }

    /// Strategy in use.
    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Flatten `store` into `(text, partner)` pairs, resampled per the strategy.
    ///
    /// Output follows partner order; within a partner, kept records stay in
    /// archive order and oversampled duplicates follow the originals.
    pub fn balance(&self, store: &RecordStore) -> Vec<LabeledText> {
        let target = match self.strategy {
            SamplingStrategy::None => None,
            SamplingStrategy::Undersample => store.counts().map(|(_, count)| count).min(),
            SamplingStrategy::Oversample => store.counts().map(|(_, count)| count).max(),
        };

        let mut samples = Vec::new();
        for thread in store.threads() {
            let picked = match target {
                None => (0..thread.messages.len()).collect(),
                Some(target) => self.pick_indices(thread, target),
            };
            samples.extend(picked.into_iter().map(|idx| LabeledText {
                text: thread.messages[idx].body.clone(),
                partner_id: thread.partner_id.clone(),
            }));
        }

        if let Some(skew) = partner_skew(store.counts()) {
            info!(
                "[parley:balance] strategy={} target={:?} samples {} -> {} (max/min ratio before {:.2})",
                self.strategy,
                target,
                skew.total,
                samples.len(),
                skew.ratio
            );
        }
        samples
    }

    fn pick_indices(&self, thread: &PartnerThread, target: usize) -> Vec<usize> {
        let available = thread.messages.len();
        let mut rng = StdRng::seed_from_u64(stable_hash_str(self.seed, &thread.partner_id));
        if target <= available {
            let mut kept = index::sample(&mut rng, available, target).into_vec();
            kept.sort_unstable();
            return kept;
        }
        let mut picked: Vec<usize> = (0..available).collect();
        if available == 0 {
            return picked;
        }
        picked.extend((available..target).map(|_| rng.random_range(0..available)));
        picked
    }
}

/// Convenience wrapper around [`Balancer::balance`].
pub fn balance(store: &RecordStore, strategy: SamplingStrategy, seed: u64) -> Vec<LabeledText> {
    Balancer::new(strategy, seed).balance(store)
}
