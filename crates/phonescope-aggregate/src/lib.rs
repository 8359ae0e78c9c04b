//! Grouping and per-group statistics for phonescope datasets.
//!
//! Partitions a subset by one or more key fields and computes count, mean,
//! median, min, max, and arg-min/arg-max per group. All metric operations
//! share the same [`group_by`] partition, so no metric ever sees a
//! different row set than another for the same group.

use itertools::Itertools;
use phonescope_schema::{Field, FieldValue, Record};
use std::collections::HashMap;
use thiserror::Error;

/// The tuple of key-field values identifying a group.
pub type GroupKey = Vec<FieldValue>;

/// A metric request over a field the schema cannot aggregate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AggregateError {
    #[error("field {0} is not numeric; cannot compute a metric over it")]
    NonNumericMetric(Field),
}

/// Batched per-group statistics over one numeric metric field.
///
/// All five numbers come from the identical partition. The max − min
/// spread is the caller's derivation, kept out of the metric vocabulary.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Partition rows by the tuple of key-field values.
///
/// Rows inside a group keep their original dataset order. Groups are
/// ordered primary key ascending; within one primary-key value, secondary
/// groups appear in first-encountered order (callers wanting a specific
/// secondary order pre-sort the subset). Grouping by zero keys yields one
/// group holding every row; grouping an empty subset yields no groups.
pub fn group_by<'a>(rows: &'a [Record], keys: &[Field]) -> Vec<(GroupKey, Vec<&'a Record>)> {
    let mut order: Vec<(GroupKey, Vec<&Record>)> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for row in rows {
        let key: GroupKey = keys.iter().map(|f| f.value(row)).collect_vec();
        match index.get(&key) {
            Some(&i) => order[i].1.push(row),
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, vec![row]));
            }
        }
    }

    if !keys.is_empty() {
        // Stable sort on the primary key only keeps secondary groups in
        // encounter order within each primary value.
        order.sort_by(|a, b| a.0[0].cmp(&b.0[0]));
    }
    order
}

fn metric_values(group: &[&Record], metric: Field) -> Result<Vec<f64>, AggregateError> {
    group
        .iter()
        .map(|r| {
            metric
                .numeric(r)
                .ok_or(AggregateError::NonNumericMetric(metric))
        })
        .collect()
}

fn require_numeric(metric: Field) -> Result<(), AggregateError> {
    if metric.is_numeric() {
        Ok(())
    } else {
        Err(AggregateError::NonNumericMetric(metric))
    }
}

fn median_of(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Rows per group.
pub fn count_by(rows: &[Record], keys: &[Field]) -> Vec<(GroupKey, usize)> {
    group_by(rows, keys)
        .into_iter()
        .map(|(key, group)| (key, group.len()))
        .collect()
}

/// Arithmetic mean of `metric` per group.
pub fn mean_by(
    rows: &[Record],
    keys: &[Field],
    metric: Field,
) -> Result<Vec<(GroupKey, f64)>, AggregateError> {
    require_numeric(metric)?;
    group_by(rows, keys)
        .into_iter()
        .map(|(key, group)| {
            let values = metric_values(&group, metric)?;
            Ok((key, values.iter().sum::<f64>() / values.len() as f64))
        })
        .collect()
}

/// Median of `metric` per group (mean of the middle pair for even sizes).
pub fn median_by(
    rows: &[Record],
    keys: &[Field],
    metric: Field,
) -> Result<Vec<(GroupKey, f64)>, AggregateError> {
    require_numeric(metric)?;
    group_by(rows, keys)
        .into_iter()
        .map(|(key, group)| {
            let mut values = metric_values(&group, metric)?;
            values.sort_by(f64::total_cmp);
            Ok((key, median_of(&values)))
        })
        .collect()
}

/// Minimum of `metric` per group.
pub fn min_by(
    rows: &[Record],
    keys: &[Field],
    metric: Field,
) -> Result<Vec<(GroupKey, f64)>, AggregateError> {
    require_numeric(metric)?;
    group_by(rows, keys)
        .into_iter()
        .map(|(key, group)| {
            let values = metric_values(&group, metric)?;
            Ok((key, values.iter().copied().fold(f64::INFINITY, f64::min)))
        })
        .collect()
}

/// Maximum of `metric` per group.
pub fn max_by(
    rows: &[Record],
    keys: &[Field],
    metric: Field,
) -> Result<Vec<(GroupKey, f64)>, AggregateError> {
    require_numeric(metric)?;
    group_by(rows, keys)
        .into_iter()
        .map(|(key, group)| {
            let values = metric_values(&group, metric)?;
            Ok((
                key,
                values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ))
        })
        .collect()
}

/// The record with the minimal `metric` value per group.
///
/// Ties resolve to the lowest original row index: group rows keep dataset
/// order and only a strictly smaller value replaces the current pick.
pub fn arg_min_by<'a>(
    rows: &'a [Record],
    keys: &[Field],
    metric: Field,
) -> Result<Vec<(GroupKey, &'a Record)>, AggregateError> {
    require_numeric(metric)?;
    group_by(rows, keys)
        .into_iter()
        .map(|(key, group)| {
            let mut best = group[0];
            let mut best_value = metric
                .numeric(best)
                .ok_or(AggregateError::NonNumericMetric(metric))?;
            for row in &group[1..] {
                let value = metric
                    .numeric(row)
                    .ok_or(AggregateError::NonNumericMetric(metric))?;
                if value < best_value {
                    best = row;
                    best_value = value;
                }
            }
            Ok((key, best))
        })
        .collect()
}

/// The record with the maximal `metric` value per group.
///
/// Same tie-break as [`arg_min_by`]: the lowest original row index wins.
pub fn arg_max_by<'a>(
    rows: &'a [Record],
    keys: &[Field],
    metric: Field,
) -> Result<Vec<(GroupKey, &'a Record)>, AggregateError> {
    require_numeric(metric)?;
    group_by(rows, keys)
        .into_iter()
        .map(|(key, group)| {
            let mut best = group[0];
            let mut best_value = metric
                .numeric(best)
                .ok_or(AggregateError::NonNumericMetric(metric))?;
            for row in &group[1..] {
                let value = metric
                    .numeric(row)
                    .ok_or(AggregateError::NonNumericMetric(metric))?;
                if value > best_value {
                    best = row;
                    best_value = value;
                }
            }
            Ok((key, best))
        })
        .collect()
}

/// Count, mean, median, min, and max of `metric` per group, batched over
/// one partition.
pub fn summarize(
    rows: &[Record],
    keys: &[Field],
    metric: Field,
) -> Result<Vec<GroupSummary>, AggregateError> {
    require_numeric(metric)?;
    group_by(rows, keys)
        .into_iter()
        .map(|(key, group)| {
            let mut values = metric_values(&group, metric)?;
            values.sort_by(f64::total_cmp);
            Ok(GroupSummary {
                count: values.len(),
                mean: values.iter().sum::<f64>() / values.len() as f64,
                median: median_of(&values),
                min: values[0],
                max: values[values.len() - 1],
                key,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonescope_schema::{Flag, OsType};
    use proptest::prelude::*;

    fn phone(brand: &str, model: &str, year: i32, price: f64) -> Record {
        Record {
            brand: brand.to_string(),
            model_name: model.to_string(),
            release_year: year,
            price_inr: price,
            processor_brand: "Snapdragon".to_string(),
            processor_model: "695".to_string(),
            core_count: "Octa".to_string(),
            ram_gb: 6.0,
            rom_gb: 128.0,
            primary_camera_mp: 50.0,
            secondary_camera_mp: 2.0,
            total_rear_camera_mp: 52.0,
            rear_camera_count: 2,
            front_camera_mp: 16.0,
            total_front_camera_mp: 16.0,
            front_camera_count: 1,
            display_size_cm: 16.7,
            battery_mah: 5000.0,
            fast_charge_watts: 33.0,
            fast_charge: Flag::Yes,
            five_g: Flag::Yes,
            nfc: Flag::No,
            fingerprint: Flag::Yes,
            os_type: OsType::Android,
            os_version: "12".to_string(),
        }
    }

    #[test]
    fn mean_by_brand_matches_hand_computation() {
        // Brand A has 10k and 20k, brand B has 15k.
        let data = vec![
            phone("A", "A1", 2021, 10_000.0),
            phone("A", "A2", 2021, 20_000.0),
            phone("B", "B1", 2022, 15_000.0),
        ];
        let out = mean_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
        assert_eq!(
            out,
            vec![
                (vec![FieldValue::Text("A".to_string())], 15_000.0),
                (vec![FieldValue::Text("B".to_string())], 15_000.0),
            ]
        );
    }

    #[test]
    fn groups_sorted_by_primary_key_ascending() {
        let data = vec![
            phone("A", "A1", 2023, 1.0),
            phone("A", "A2", 2021, 2.0),
            phone("A", "A3", 2022, 3.0),
        ];
        let out = count_by(&data, &[Field::ReleaseYear]);
        let years: Vec<GroupKey> = out.into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            years,
            vec![
                vec![FieldValue::Int(2021)],
                vec![FieldValue::Int(2022)],
                vec![FieldValue::Int(2023)],
            ]
        );
    }

    #[test]
    fn secondary_key_keeps_encounter_order() {
        let data = vec![
            phone("Z", "Z9", 2021, 1.0),
            phone("A", "A1", 2021, 2.0),
            phone("Z", "Z9", 2021, 3.0),
            phone("B", "B1", 2020, 4.0),
        ];
        let out = count_by(&data, &[Field::ReleaseYear, Field::Brand]);
        assert_eq!(
            out,
            vec![
                (
                    vec![FieldValue::Int(2020), FieldValue::Text("B".to_string())],
                    1
                ),
                // 2021: Z encountered before A, so Z stays first.
                (
                    vec![FieldValue::Int(2021), FieldValue::Text("Z".to_string())],
                    2
                ),
                (
                    vec![FieldValue::Int(2021), FieldValue::Text("A".to_string())],
                    1
                ),
            ]
        );
    }

    #[test]
    fn count_conservation() {
        let data = vec![
            phone("A", "A1", 2021, 1.0),
            phone("A", "A2", 2022, 2.0),
            phone("B", "B1", 2021, 3.0),
        ];
        let total: usize = count_by(&data, &[Field::Brand, Field::ReleaseYear])
            .iter()
            .map(|(_, n)| n)
            .sum();
        assert_eq!(total, data.len());
    }

    #[test]
    fn empty_subset_yields_no_groups() {
        let data: Vec<Record> = vec![];
        assert!(count_by(&data, &[Field::Brand]).is_empty());
        assert!(summarize(&data, &[Field::Brand], Field::PriceInr)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn zero_keys_is_one_group() {
        let data = vec![phone("A", "A1", 2021, 10.0), phone("B", "B1", 2022, 30.0)];
        let out = summarize(&data, &[], Field::PriceInr).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, GroupKey::new());
        assert_eq!(out[0].count, 2);
        assert_eq!(out[0].mean, 20.0);
    }

    #[test]
    fn median_even_and_odd() {
        let data = vec![
            phone("A", "A1", 2021, 10.0),
            phone("A", "A2", 2021, 30.0),
            phone("A", "A3", 2021, 20.0),
        ];
        let out = median_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
        assert_eq!(out[0].1, 20.0);

        let data = vec![phone("A", "A1", 2021, 10.0), phone("A", "A2", 2021, 30.0)];
        let out = median_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
        assert_eq!(out[0].1, 20.0);
    }

    #[test]
    fn min_max_per_group() {
        let data = vec![
            phone("A", "A1", 2021, 10.0),
            phone("A", "A2", 2021, 30.0),
            phone("B", "B1", 2021, 5.0),
        ];
        let min = min_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
        let max = max_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
        assert_eq!(min[0].1, 10.0);
        assert_eq!(max[0].1, 30.0);
        assert_eq!(min[1].1, 5.0);
    }

    #[test]
    fn arg_min_tie_breaks_to_lowest_index() {
        let data = vec![
            phone("A", "first-cheap", 2021, 9_999.0),
            phone("A", "second-cheap", 2021, 9_999.0),
            phone("A", "pricey", 2021, 50_000.0),
        ];
        for _ in 0..10 {
            let out = arg_min_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
            assert_eq!(out[0].1.model_name, "first-cheap");
        }
    }

    #[test]
    fn arg_max_tie_breaks_to_lowest_index() {
        let data = vec![
            phone("A", "big-one", 2021, 50_000.0),
            phone("A", "big-two", 2021, 50_000.0),
        ];
        let out = arg_max_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
        assert_eq!(out[0].1.model_name, "big-one");
    }

    #[test]
    fn arg_min_per_year_finds_cheapest_model() {
        // The "minimum price trend" query: cheapest phone per year.
        let data = vec![
            phone("A", "A-mid", 2021, 20_000.0),
            phone("B", "B-cheap", 2021, 8_000.0),
            phone("C", "C-cheap", 2022, 12_000.0),
            phone("A", "A-flagship", 2022, 80_000.0),
        ];
        let out = arg_min_by(&data, &[Field::ReleaseYear], Field::PriceInr).unwrap();
        let picks: Vec<&str> = out.iter().map(|(_, r)| r.model_name.as_str()).collect();
        assert_eq!(picks, vec!["B-cheap", "C-cheap"]);
    }

    #[test]
    fn non_numeric_metric_fails_fast() {
        let data = vec![phone("A", "A1", 2021, 10.0)];
        let err = mean_by(&data, &[Field::Brand], Field::ModelName).unwrap_err();
        assert_eq!(err, AggregateError::NonNumericMetric(Field::ModelName));
        // Fails even when the subset is empty: contract check precedes data.
        let empty: Vec<Record> = vec![];
        assert!(summarize(&empty, &[], Field::Brand).is_err());
    }

    #[test]
    fn summary_agrees_with_single_metric_calls() {
        let data = vec![
            phone("A", "A1", 2021, 10.0),
            phone("A", "A2", 2021, 30.0),
            phone("B", "B1", 2021, 7.0),
        ];
        let summaries = summarize(&data, &[Field::Brand], Field::PriceInr).unwrap();
        let means = mean_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
        let mins = min_by(&data, &[Field::Brand], Field::PriceInr).unwrap();
        for ((s, (mk, mean)), (nk, min)) in summaries.iter().zip(&means).zip(&mins) {
            assert_eq!(&s.key, mk);
            assert_eq!(&s.key, nk);
            assert_eq!(s.mean, *mean);
            assert_eq!(s.min, *min);
        }
    }

    proptest! {
        // Sum of per-group counts equals the subset size for any grouping.
        #[test]
        fn count_conservation_holds(rows in proptest::collection::vec((0usize..4, 2018i32..2024, 0f64..90_000.0), 0..60)) {
            let brands = ["A", "B", "C", "D"];
            let data: Vec<Record> = rows
                .iter()
                .map(|(b, year, price)| phone(brands[*b], "M", *year, *price))
                .collect();
            let total: usize = count_by(&data, &[Field::Brand, Field::ReleaseYear])
                .iter()
                .map(|(_, n)| n)
                .sum();
            prop_assert_eq!(total, data.len());
        }
    }
}
