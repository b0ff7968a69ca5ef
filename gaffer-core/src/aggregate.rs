//! Pure statistical aggregation over player collections.
//!
//! Works on any snapshot of players — a live roster slot, a transfer-list
//! preview, or an ad-hoc selection — and never mutates or performs I/O.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::player::Player;
use crate::position::{self, PositionGroup};

const CONTRACT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Most frequent value of a categorical field, with its occurrence count.
/// Ties break on the first value encountered in bucket iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeStat {
    pub value: String,
    pub count: usize,
}

/// Per-bucket report row. Numeric fields are arithmetic means rounded to two
/// decimals, with missing values counted as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    pub players: usize,
    pub overall: f64,
    pub potential: f64,
    pub skills: f64,
    pub weak_foot: f64,
    pub total_stats: f64,
    pub value: f64,
    pub wage: f64,
    pub appearances: f64,
    pub goals: f64,
    pub assists: f64,
    pub clean_sheets: f64,
    pub yellow_cards: f64,
    pub red_cards: f64,
    pub avg_rating: f64,
    pub nationality: ModeStat,
    pub foot: ModeStat,
    /// Mean of the parsable contract-end dates, `None` when no player in the
    /// bucket has one.
    pub contract_end: Option<NaiveDate>,
}

/// Bucket players by role code. Buckets appear only when at least one player
/// belongs to them.
pub fn aggregate_by_role<'a, I>(players: I) -> BTreeMap<String, BucketStats>
where
    I: IntoIterator<Item = &'a Player>,
{
    let mut buckets: BTreeMap<String, Vec<&Player>> = BTreeMap::new();
    for player in players {
        buckets.entry(player.role.clone()).or_default().push(player);
    }
    buckets
        .into_iter()
        .map(|(role, members)| (role, BucketStats::compute(&members)))
        .collect()
}

/// Bucket players by position group via the classifier. The `Unknown` group
/// is a bucket like any other when populated.
pub fn aggregate_by_group<'a, I>(players: I) -> BTreeMap<PositionGroup, BucketStats>
where
    I: IntoIterator<Item = &'a Player>,
{
    let mut buckets: BTreeMap<PositionGroup, Vec<&Player>> = BTreeMap::new();
    for player in players {
        buckets
            .entry(position::classify(&player.role))
            .or_default()
            .push(player);
    }
    buckets
        .into_iter()
        .map(|(group, members)| (group, BucketStats::compute(&members)))
        .collect()
}

impl BucketStats {
    #[allow(clippy::cast_precision_loss)]
    fn compute(members: &[&Player]) -> Self {
        Self {
            players: members.len(),
            overall: mean_by(members, |p| f64::from(p.overall)),
            potential: mean_by(members, |p| f64::from(p.potential)),
            skills: mean_by(members, |p| f64::from(p.skills)),
            weak_foot: mean_by(members, |p| f64::from(p.weak_foot)),
            total_stats: mean_by(members, |p| f64::from(p.total_stats)),
            value: mean_by(members, |p| p.value as f64),
            wage: mean_by(members, |p| p.wage as f64),
            appearances: mean_by(members, |p| f64::from(p.appearances)),
            goals: mean_by(members, |p| f64::from(p.goals)),
            assists: mean_by(members, |p| f64::from(p.assists)),
            clean_sheets: mean_by(members, |p| f64::from(p.clean_sheets)),
            yellow_cards: mean_by(members, |p| f64::from(p.yellow_cards)),
            red_cards: mean_by(members, |p| f64::from(p.red_cards)),
            avg_rating: mean_by(members, |p| p.avg_rating),
            nationality: mode_of(members.iter().map(|p| or_unknown(&p.nationality))),
            foot: mode_of(members.iter().map(|p| or_unknown(&p.foot))),
            contract_end: mean_contract_end(members),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_by(members: &[&Player], field: impl Fn(&Player) -> f64) -> f64 {
    let sum: f64 = members.iter().map(|p| field(p)).sum();
    round2(sum / members.len() as f64)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

fn mode_of(values: impl Iterator<Item = String>) -> ModeStat {
    let values: Vec<String> = values.collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in &values {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }
    let best = counts.values().copied().max().unwrap_or(0);
    let winner = values
        .iter()
        .find(|v| counts.get(v.as_str()).copied().unwrap_or(0) == best)
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());
    ModeStat {
        value: winner,
        count: best,
    }
}

/// Mean of the parsable contract dates, truncated to a UTC day. Players
/// without a parsable date are excluded from numerator and denominator.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn mean_contract_end(members: &[&Player]) -> Option<NaiveDate> {
    let stamps: Vec<i64> = members
        .iter()
        .filter_map(|p| p.contract_end.as_deref())
        .filter_map(|s| NaiveDate::parse_from_str(s, CONTRACT_DATE_FORMAT).ok())
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().timestamp())
        .collect();
    if stamps.is_empty() {
        return None;
    }
    let mean = stamps.iter().sum::<i64>() as f64 / stamps.len() as f64;
    DateTime::<Utc>::from_timestamp(mean.round() as i64, 0).map(|dt| dt.date_naive())
}
