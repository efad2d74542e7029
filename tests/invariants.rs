use std::collections::{BTreeMap, BTreeSet, HashMap};

use parley::balancer::balance;
use parley::config::{DirectionMode, SamplingStrategy};
use parley::data::{Direction, MessageRecord, RawEntry};
use parley::ranker::rank_store;
use parley::store::RecordStore;
use parley::weighting::{ClassificationWeighting, TermWeighting};

fn conversation(address: &str, received: usize, sent: usize) -> Vec<RawEntry> {
    let mut entries = Vec::with_capacity(received + sent);
    for idx in 0..received {
        entries.push(RawEntry::new(address, "1", &format!("from {address} number {idx}")));
    }
    for idx in 0..sent {
        entries.push(RawEntry::new(address, "2", &format!("to {address} number {idx}")));
    }
    entries
}

fn archive() -> Vec<RawEntry> {
    let mut entries = Vec::new();
    entries.extend(conversation("+15550000001", 6, 2));
    entries.extend(conversation("5550000002", 1, 5));
    entries.extend(conversation("5550000003", 3, 3));
    entries.extend(conversation("handle@example.com", 0, 1));
    entries
}

fn raw_counts(mode: DirectionMode) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for entry in archive() {
        let record = MessageRecord::try_from(entry).unwrap();
        if mode.admits(record.direction) {
            *counts.entry(record.partner_id).or_insert(0) += 1;
        }
    }
    counts
}

#[test]
fn threshold_separates_kept_and_dropped_partners() {
    for mode in [DirectionMode::Received, DirectionMode::Sent, DirectionMode::Both] {
        for threshold in 1..=9 {
            let store = RecordStore::build(archive(), mode, threshold);
            for (partner_id, count) in raw_counts(mode) {
                match store.get(&partner_id) {
                    Some(thread) => {
                        assert!(count >= threshold);
                        assert_eq!(thread.messages.len(), count);
                        assert!(thread.messages.iter().all(|m| mode.admits(m.direction)));
                    }
                    None => assert!(count < threshold, "{partner_id} wrongly dropped"),
                }
            }
        }
    }
}

#[test]
fn received_and_sent_stores_union_to_both_at_threshold_one() {
    let received = RecordStore::build(archive(), DirectionMode::Received, 1);
    let sent = RecordStore::build(archive(), DirectionMode::Sent, 1);
    let both = RecordStore::build(archive(), DirectionMode::Both, 1);

    let mut union: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for store in [&received, &sent] {
        for thread in store.threads() {
            union
                .entry(thread.partner_id.clone())
                .or_default()
                .extend(thread.messages.iter().map(|m| m.body.clone()));
        }
    }
    let both_map: BTreeMap<String, BTreeSet<String>> = both
        .threads()
        .map(|thread| {
            (
                thread.partner_id.clone(),
                thread.messages.iter().map(|m| m.body.clone()).collect(),
            )
        })
        .collect();
    assert_eq!(union, both_map);
}

#[test]
fn aggregate_only_partners_appear_only_in_both() {
    // 3 received + 3 sent: below 4 in either direction, above it together.
    let received = RecordStore::build(archive(), DirectionMode::Received, 4);
    let sent = RecordStore::build(archive(), DirectionMode::Sent, 4);
    let both = RecordStore::build(archive(), DirectionMode::Both, 4);
    assert!(received.get("5550000003").is_none());
    assert!(sent.get("5550000003").is_none());
    assert!(both.get("5550000003").is_some());
}

#[test]
fn partner_ids_collapse_country_code_variants() {
    let mut entries = conversation("+1 (555) 000-0001", 1, 0);
    entries.extend(conversation("5550000001", 1, 0));
    let store = RecordStore::build(entries, DirectionMode::Both, 2);
    assert_eq!(store.len(), 1);
    assert_eq!(store.partner_ids().next().unwrap(), "5550000001");
    assert!(
        store
            .get("5550000001")
            .unwrap()
            .messages
            .iter()
            .all(|m| m.direction == Direction::Received)
    );
}

#[test]
fn resampling_equalizes_every_partner() {
    let store = RecordStore::build(archive(), DirectionMode::Both, 1);
    let counts: Vec<usize> = store.counts().map(|(_, count)| count).collect();
    let max = *counts.iter().max().unwrap();
    let min = *counts.iter().min().unwrap();

    for (strategy, expected) in [
        (SamplingStrategy::Oversample, max),
        (SamplingStrategy::Undersample, min),
    ] {
        let samples = balance(&store, strategy, 42);
        let mut per_partner: HashMap<&str, usize> = HashMap::new();
        for sample in &samples {
            *per_partner.entry(sample.partner_id.as_str()).or_insert(0) += 1;
        }
        assert_eq!(per_partner.len(), store.len());
        assert!(per_partner.values().all(|count| *count == expected));
        assert_eq!(samples, balance(&store, strategy, 42));
    }
}

#[test]
fn classification_transform_is_repeatable() {
    let weighting = ClassificationWeighting::new();
    let corpus = ["pizza tonight?", "band practice at eight", "pizza after practice"];
    let (_, vocabulary) = weighting.fit_transform(&corpus).unwrap();
    let first = weighting.transform(&["practice pizza"], &vocabulary).unwrap();
    let second = weighting.transform(&["practice pizza"], &vocabulary).unwrap();
    assert_eq!(first, second);
}

#[test]
fn single_partner_ranking_is_trivial() {
    let store = RecordStore::build(conversation("5550000001", 4, 0), DirectionMode::Both, 1);
    let report = rank_store(&store, 5).unwrap();
    assert!(report.is_trivial());
    assert_eq!(report.partners.len(), 1);
}
