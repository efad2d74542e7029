//! Plain-text renderers for run results.

use std::fmt::Write;

use crate::constants::report::{CHART_WIDTH, SECTION_RULE};
use crate::metrics::partner_skew;
use crate::ranker::{RankingReport, TermScore};
use crate::store::RecordStore;

/// Group digits in thousands: `1234567` -> `1,234,567`.
pub fn format_count_with_commas(value: usize) -> String {
    let raw = value.to_string();
    let mut grouped_reversed = String::with_capacity(raw.len() + (raw.len() / 3));
    for (idx, ch) in raw.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            grouped_reversed.push(',');
        }
        grouped_reversed.push(ch);
    }
    grouped_reversed.chars().rev().collect()
}

/// Store totals, skip counts and per-partner shares.
pub fn render_store_summary(store: &RecordStore) -> String {
    let summary = store.summary();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "--- record store (mode={}, threshold={}) ---",
        store.mode(),
        format_count_with_commas(store.threshold())
    );
    let _ = writeln!(
        out,
        "{} partners and {} messages saved",
        format_count_with_commas(summary.partners),
        format_count_with_commas(summary.messages)
    );
    let _ = writeln!(
        out,
        "skipped={} filtered_by_direction={} dropped_partners={} dropped_messages={}",
        summary.skipped,
        summary.filtered_by_direction,
        summary.dropped_partners,
        summary.dropped_messages
    );
    if let Some(skew) = partner_skew(store.counts()) {
        for entry in &skew.per_partner {
            let _ = writeln!(
                out,
                "{} [{}]: count={} share={:.2}",
                store.display_name(&entry.partner_id),
                entry.partner_id,
                format_count_with_commas(entry.count),
                entry.share
            );
        }
        let _ = writeln!(
            out,
            "skew: partners={} total={} min={} max={} mean={:.2} ratio={:.2}",
            skew.partners, skew.total, skew.min, skew.max, skew.mean, skew.ratio
        );
    }
    out
}

/// Horizontal bar per partner, longest bar scaled to the chart width.
pub fn render_partner_chart(store: &RecordStore) -> String {
    let mut out = String::new();
    let Some(skew) = partner_skew(store.counts()) else {
        return out;
    };
    let labels: Vec<&str> = skew
        .per_partner
        .iter()
        .map(|entry| store.display_name(&entry.partner_id))
        .collect();
    let label_width = labels.iter().map(|label| label.chars().count()).max().unwrap_or(0);
    let _ = writeln!(out, "--- messages per partner ---");
    for (entry, label) in skew.per_partner.iter().zip(labels) {
        let bar = if skew.max == 0 {
            0
        } else {
            (entry.count * CHART_WIDTH).div_ceil(skew.max)
        };
        let _ = writeln!(
            out,
            "{label:<label_width$} | {} {}",
            "#".repeat(bar),
            format_count_with_commas(entry.count)
        );
    }
    out
}

/// Per-partner unigram and bigram lists, strongest first.
pub fn render_ranking(report: &RankingReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "--- top {} terms per partner, strongest first ---",
        report.top_n
    );
    for partner in &report.partners {
        let _ = writeln!(out, "{SECTION_RULE}");
        let _ = writeln!(
            out,
            "{} [{}] ({} messages)",
            partner.display_name,
            partner.partner_id,
            format_count_with_commas(partner.messages)
        );
        if partner.unigrams.is_empty() && partner.bigrams.is_empty() {
            let _ = writeln!(out, "  (no distinguishing terms)");
            continue;
        }
        let _ = writeln!(out, "  Most correlated unigrams: {}", join_terms(&partner.unigrams));
        let _ = writeln!(out, "  Most correlated bigrams: {}", join_terms(&partner.bigrams));
    }
    if !report.partners.is_empty() {
        let _ = writeln!(out, "{SECTION_RULE}");
    }
    out
}

fn join_terms(scores: &[TermScore]) -> String {
    scores
        .iter()
        .map(|score| score.term.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
