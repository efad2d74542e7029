//! Record store: well-formed records grouped by partner, filtered by direction
//! and conversation volume.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::DirectionMode;
use crate::data::{DisplayName, MessageRecord, PartnerId, RawEntry};
use crate::errors::IngestionError;
use crate::source::ArchiveSnapshot;

/// All retained messages exchanged with one partner, in archive order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartnerThread {
    /// Normalized partner identity.
    pub partner_id: PartnerId,
    /// Most common display name among the partner's records (ties: alphabetical).
    pub display_name: DisplayName,
    /// Retained records in archive order.
    pub messages: Vec<MessageRecord>,
}

/// Counts reported at the end of store construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreSummary {
    /// Partners that met the threshold.
    pub partners: usize,
    /// Messages held by those partners.
    pub messages: usize,
    /// Entries skipped as malformed (including undecodable archive elements).
    pub skipped: usize,
    /// Well-formed records removed by the direction filter.
    pub filtered_by_direction: usize,
    /// Partners removed by the volume threshold.
    pub dropped_partners: usize,
    /// Messages those partners held.
    pub dropped_messages: usize,
}

/// Partner-grouped, filtered records for one analysis run.
///
/// Partners are ordered by `partner_id`; a partner's position in that order
/// is its stable integer index for the whole run.
#[derive(Clone, Debug)]
pub struct RecordStore {
    mode: DirectionMode,
    threshold: usize,
    threads: IndexMap<PartnerId, PartnerThread>,
    summary: StoreSummary,
}

impl RecordStore {
    /// Build a store from raw archive entries.
    ///
    /// Order of operations: malformed entries are skipped, the direction
    /// filter is applied, records are grouped by partner, and partners with
    /// fewer than `threshold` remaining records are dropped whole.
    pub fn build<I>(entries: I, mode: DirectionMode, threshold: usize) -> Self
    where
        I: IntoIterator<Item = RawEntry>,
    {
        Self::assemble(entries, mode, threshold, 0)
    }

    /// Build a store from an archive snapshot, counting undecodable elements as skipped.
    pub fn from_snapshot(snapshot: ArchiveSnapshot, mode: DirectionMode, threshold: usize) -> Self {
        Self::assemble(snapshot.entries, mode, threshold, snapshot.undecodable)
    }

    fn assemble<I>(entries: I, mode: DirectionMode, threshold: usize, undecodable: usize) -> Self
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut summary = StoreSummary {
            skipped: undecodable,
            ..StoreSummary::default()
        };
        let mut grouped: IndexMap<PartnerId, Vec<MessageRecord>> = IndexMap::new();

        for (entry_idx, entry) in entries.into_iter().enumerate() {
            let record = match MessageRecord::try_from(entry) {
                Ok(record) => record,
                Err(err) => {
                    log_skipped(entry_idx, &err);
                    summary.skipped += 1;
                    continue;
                }
            };
            if !mode.admits(record.direction) {
                summary.filtered_by_direction += 1;
                continue;
            }
            grouped
                .entry(record.partner_id.clone())
                .or_default()
                .push(record);
        }

        let mut threads: IndexMap<PartnerId, PartnerThread> = IndexMap::new();
        for (partner_id, messages) in grouped {
            if messages.len() < threshold {
                summary.dropped_partners += 1;
                summary.dropped_messages += messages.len();
                continue;
            }
            let display_name = dominant_display_name(&messages);
            threads.insert(
                partner_id.clone(),
                PartnerThread {
                    partner_id,
                    display_name,
                    messages,
                },
            );
        }
        threads.sort_keys();

        summary.partners = threads.len();
        summary.messages = threads.values().map(|thread| thread.messages.len()).sum();
        info!(
            "[parley:store] {} partners and {} messages saved (mode={}, threshold={}, skipped={}, dropped partners={})",
            summary.partners,
            summary.messages,
            mode,
            threshold,
            summary.skipped,
            summary.dropped_partners
        );

        Self {
            mode,
            threshold,
            threads,
            summary,
        }
    }

    /// Direction mode the store was built with.
    pub fn mode(&self) -> DirectionMode {
        self.mode
    }

    /// Threshold the store was built with.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Construction counts.
    pub fn summary(&self) -> &StoreSummary {
        &self.summary
    }

    /// Number of partners.
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// True when no partner met the threshold.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Total retained messages.
    pub fn message_count(&self) -> usize {
        self.summary.messages
    }

    /// Partner threads in stable partner order.
    pub fn threads(&self) -> impl Iterator<Item = &PartnerThread> {
        self.threads.values()
    }

    /// Partner ids in stable partner order.
    pub fn partner_ids(&self) -> impl Iterator<Item = &PartnerId> {
        self.threads.keys()
    }

    /// Stable integer index of a partner.
    pub fn index_of(&self, partner_id: &str) -> Option<usize> {
        self.threads.get_index_of(partner_id)
    }

    /// Thread for a partner.
    pub fn get(&self, partner_id: &str) -> Option<&PartnerThread> {
        self.threads.get(partner_id)
    }

    /// Display name for a partner, falling back to the id itself.
    pub fn display_name<'a>(&'a self, partner_id: &'a str) -> &'a str {
        self.threads
            .get(partner_id)
            .map(|thread| thread.display_name.as_str())
            .unwrap_or(partner_id)
    }

    /// Every retained record with its partner index, partner by partner.
    pub fn indexed_records(&self) -> impl Iterator<Item = (usize, &MessageRecord)> {
        self.threads
            .values()
            .enumerate()
            .flat_map(|(idx, thread)| thread.messages.iter().map(move |record| (idx, record)))
    }

    /// `(partner, count)` pairs in stable partner order.
    pub fn counts(&self) -> impl Iterator<Item = (&PartnerId, usize)> {
        self.threads
            .iter()
            .map(|(partner_id, thread)| (partner_id, thread.messages.len()))
    }

    /// Partner id to display name lookup.
    pub fn display_names(&self) -> HashMap<PartnerId, DisplayName> {
        self.threads
            .iter()
            .map(|(partner_id, thread)| (partner_id.clone(), thread.display_name.clone()))
            .collect()
    }
}

fn log_skipped(entry_idx: usize, err: &IngestionError) {
    warn!("[parley:store] skipping archive entry #{}: {}", entry_idx, err);
}

fn dominant_display_name(messages: &[MessageRecord]) -> DisplayName {
    let mut tallies: HashMap<&str, usize> = HashMap::new();
    for record in messages {
        *tallies.entry(record.display_name.as_str()).or_insert(0) += 1;
    }
    tallies
        .into_iter()
        .max_by(|(left_name, left), (right_name, right)| {
            left.cmp(right).then_with(|| right_name.cmp(left_name))
        })
        .map(|(name, _)| name.to_string())
        .unwrap_or_default()
}
