//! Stable multi-key ranking and top-K extraction.
//!
//! Orders a subset by a sequence of sort keys with per-key direction. The
//! sort is stable: rows not distinguished by any key keep their input
//! order, so repeated calls with the same inputs never reshuffle residual
//! ties. Also provides the two-stage "top 7 then refine by chosen
//! features" composition from the buyer-facing view.

use phonescope_schema::{Field, Record};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One sort criterion: a field and a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub field: Field,
    pub direction: Direction,
}

impl SortKey {
    pub fn asc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }
}

fn compare(a: &Record, b: &Record, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ord = key.field.value(a).cmp(&key.field.value(b));
        let ord = match key.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Sort a subset by the given keys and optionally truncate to `limit`.
///
/// A `limit` larger than the subset returns the whole subset unchanged in
/// count. An empty key list is the identity ordering.
pub fn rank(rows: &[Record], keys: &[SortKey], limit: Option<usize>) -> Vec<Record> {
    let mut out: Vec<Record> = rows.to_vec();
    out.sort_by(|a, b| compare(a, b, keys));
    if let Some(limit) = limit {
        out.truncate(limit);
    }
    out
}

/// The stock feature-heavy criterion behind the "top 7" table: storage,
/// memory, cameras, battery, and fast charge, all descending.
pub fn feature_heavy_keys() -> Vec<SortKey> {
    [
        Field::RomGb,
        Field::RamGb,
        Field::TotalRearCameraMp,
        Field::RearCameraCount,
        Field::TotalFrontCameraMp,
        Field::FrontCameraCount,
        Field::BatteryMah,
        Field::FastCharge,
    ]
    .into_iter()
    .map(SortKey::desc)
    .collect()
}

/// Refine an already-limited top-K by up to a few chosen features.
///
/// Re-sorts `top` by the chosen features descending with price ascending
/// as the final tie-break, then truncates to `k` again. This operates on
/// the prior elite set only; it can reorder within it but never
/// reintroduce a row that was not already there.
pub fn refine_top(top: &[Record], features: &[Field], k: usize) -> Vec<Record> {
    let mut keys: Vec<SortKey> = features.iter().copied().map(SortKey::desc).collect();
    keys.push(SortKey::asc(Field::PriceInr));
    rank(top, &keys, Some(k))
}
