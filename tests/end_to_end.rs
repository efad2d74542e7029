use std::io::Cursor;

use parley::config::{AnalyzerConfig, DirectionMode, SamplingStrategy};
use parley::constants::query::{FAREWELL, PREDICTION_PREFIX};
use parley::data::RawEntry;
use parley::pipeline::Pipeline;
use parley::query::QueryLoop;

fn volume_archive() -> Vec<RawEntry> {
    let mut entries = Vec::new();
    for (address, count) in [("5550000001", 600), ("5550000002", 550), ("5550000003", 5)] {
        for idx in 0..count {
            entries.push(RawEntry::new(address, "1", &format!("message {idx}")));
        }
    }
    entries
}

#[test]
fn default_threshold_keeps_high_volume_partners() {
    let config = AnalyzerConfig {
        enable_ranking: false,
        enable_classifier: false,
        ..AnalyzerConfig::default()
    };
    let analysis = Pipeline::new(config).unwrap().run(volume_archive()).unwrap();
    let kept: Vec<&String> = analysis.store.partner_ids().collect();
    assert_eq!(kept, vec!["5550000001", "5550000002"]);
    assert_eq!(analysis.store.message_count(), 1150);
    assert_eq!(analysis.store.summary().dropped_partners, 1);
}

#[test]
fn guessing_game_answers_then_quits() {
    let config = AnalyzerConfig {
        threshold: 1,
        mode: DirectionMode::Both,
        sampling: SamplingStrategy::None,
        enable_ranking: false,
        ..AnalyzerConfig::default()
    };
    let analysis = Pipeline::new(config)
        .unwrap()
        .run(vec![
            RawEntry::new("5550000001", "1", "hello world").with_contact_name("Alice"),
            RawEntry::new("5550000002", "2", "goodbye moon").with_contact_name("Bob"),
        ])
        .unwrap();
    let model = analysis.model.as_ref().unwrap();

    let mut out = Vec::new();
    let session = QueryLoop::new(model, analysis.store.display_names())
        .run(Cursor::new("hello\nmoon\nquit\nhello\n"), &mut out)
        .unwrap();
    assert_eq!(session.predictions, 2);

    let printed = String::from_utf8(out).unwrap();
    let answers: Vec<&str> = printed
        .lines()
        .filter_map(|line| line.split(PREDICTION_PREFIX).nth(1))
        .collect();
    assert_eq!(answers, vec!["Alice (5550000001)", "Bob (5550000002)"]);
    assert!(printed.trim_end().ends_with(FAREWELL));
}

#[test]
fn quit_first_line_means_no_predictions() {
    let config = AnalyzerConfig {
        threshold: 1,
        mode: DirectionMode::Both,
        enable_ranking: false,
        ..AnalyzerConfig::default()
    };
    let analysis = Pipeline::new(config)
        .unwrap()
        .run(vec![
            RawEntry::new("5550000001", "1", "hello world"),
            RawEntry::new("5550000002", "1", "goodbye moon"),
        ])
        .unwrap();
    let session = QueryLoop::new(analysis.model.as_ref().unwrap(), Default::default())
        .run(Cursor::new("quit\n"), Vec::new())
        .unwrap();
    assert_eq!(session.predictions, 0);
}
