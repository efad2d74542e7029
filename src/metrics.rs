use crate::types::PartnerId;

/// Aggregate skew metrics for per-partner message counts.
#[derive(Clone, Debug, PartialEq)]
pub struct PartnerSkew {
    pub total: usize,
    pub partners: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub max_share: f64,
    pub min_share: f64,
    pub ratio: f64,
    pub per_partner: Vec<PartnerShare>,
}

/// One partner's share of the corpus.
#[derive(Clone, Debug, PartialEq)]
pub struct PartnerShare {
    pub partner_id: PartnerId,
    pub count: usize,
    pub share: f64,
}

/// Compute skew metrics from `(partner, count)` pairs.
///
/// `per_partner` is sorted by count descending, then partner id.
pub fn partner_skew<'a, I>(counts: I) -> Option<PartnerSkew>
where
    I: IntoIterator<Item = (&'a PartnerId, usize)>,
{
    let counts: Vec<(&PartnerId, usize)> = counts.into_iter().collect();
    let min = counts.iter().map(|(_, count)| *count).min()?;
    let max = counts.iter().map(|(_, count)| *count).max()?;
    let total: usize = counts.iter().map(|(_, count)| *count).sum();
    let partners = counts.len();
    let share_of = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    };
    let ratio = if min == 0 {
        f64::INFINITY
    } else {
        max as f64 / min as f64
    };
    let mut per_partner: Vec<PartnerShare> = counts
        .iter()
        .map(|(partner_id, count)| PartnerShare {
            partner_id: (*partner_id).clone(),
            count: *count,
            share: share_of(*count),
        })
        .collect();
    per_partner.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.partner_id.cmp(&b.partner_id))
    });
    Some(PartnerSkew {
        total,
        partners,
        min,
        max,
        mean: total as f64 / partners as f64,
        max_share: share_of(max),
        min_share: share_of(min),
        ratio,
        per_partner,
    })
}
