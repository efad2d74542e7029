#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runner.
pub mod apps;
/// Seeded class balancing.
pub mod balancer;
/// Multinomial Naive Bayes classifier.
pub mod classifier;
/// Run configuration types.
pub mod config;
/// Centralized constants used across the store, weighting, and query loop.
pub mod constants;
/// Raw entries, message records, and labeled texts.
pub mod data;
mod hash;
/// Aggregate metrics helpers.
pub mod metrics;
/// End-to-end analysis run.
pub mod pipeline;
/// Interactive guessing loop.
pub mod query;
/// Discriminative term ranking.
pub mod ranker;
/// Plain-text report rendering.
pub mod report;
/// Archive source trait and built-in readers.
pub mod source;
/// Partner-grouped record store.
pub mod store;
/// Input transports used by sources (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Text normalization helpers.
pub mod utils;
/// TF-IDF weighting strategies.
pub mod weighting;

mod errors;

pub use balancer::{Balancer, balance};
pub use classifier::{Model, Prediction};
pub use config::{AnalyzerConfig, DirectionMode, SamplingStrategy};
pub use data::{Direction, LabeledText, MessageRecord, RawEntry};
pub use errors::{AnalyzerError, IngestionError};
pub use pipeline::{Analysis, Pipeline};
pub use query::{QueryLoop, QuerySession};
pub use ranker::{PartnerTerms, RankingReport, TermScore};
pub use source::{
    ArchiveSnapshot, ArchiveSource, InMemoryArchive, JsonLinesArchive, XmlArchive, load_archives,
};
pub use store::{PartnerThread, RecordStore, StoreSummary};
pub use types::{DisplayName, PartnerId, ReadableDate, SourceId, StageName, Term, TypeCode};
pub use weighting::{
    AnalyticalWeighting, ClassificationWeighting, TermWeighting, VectorSet, Vocabulary,
};
