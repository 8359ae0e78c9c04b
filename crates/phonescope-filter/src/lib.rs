//! Conjunctive record filtering for phonescope datasets.
//!
//! Provides filter predicates and combinators for narrowing a dataset by
//! brand, release year, price bin, capability flags, OS type, and
//! processor criteria. All predicates are ANDed; there is no OR mode.

use phonescope_bins::PriceBinTable;
use phonescope_schema::{FeatureFlag, OsType, Record};
use serde::{Deserialize, Serialize};

/// A price-bin predicate: a label looked up through a specific table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceBinCriterion {
    pub label: String,
    pub table: PriceBinTable,
}

/// Filter criteria for records.
///
/// Every criterion is optional; an absent criterion is the "all" wildcard.
/// The empty filter is the identity: it returns the dataset unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PhoneFilter {
    /// Record passes if its brand is in the set. One entry models the
    /// single-brand dropdown; absent means all brands.
    pub brands: Option<Vec<String>>,
    /// Exact release year; absent means all years.
    pub release_year: Option<i32>,
    /// Inclusive year range for period slicing (e.g. 2017..=2020).
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Price-bin label, evaluated against the record's price through the
    /// carried table. Unassigned prices never match.
    pub price_bin: Option<PriceBinCriterion>,
    /// Capability flags that must be set ("Yes").
    pub features: Option<Vec<FeatureFlag>>,
    pub os_type: Option<OsType>,
    /// Categorical core-count label, e.g. "Octa".
    pub core_count: Option<String>,
    pub processor_brand: Option<String>,
}

impl PhoneFilter {
    /// Create a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a brand to the membership set.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        let mut brands = self.brands.take().unwrap_or_default();
        brands.push(brand.into());
        self.brands = Some(brands);
        self
    }

    /// Require an exact release year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }

    /// Restrict to an inclusive year range.
    pub fn with_year_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_year = min;
        self.max_year = max;
        self
    }

    /// Require the record's price to fall in a labeled bin of `table`.
    pub fn with_price_bin(mut self, label: impl Into<String>, table: PriceBinTable) -> Self {
        self.price_bin = Some(PriceBinCriterion {
            label: label.into(),
            table,
        });
        self
    }

    /// Require a capability flag to be set.
    pub fn with_feature(mut self, feature: FeatureFlag) -> Self {
        let mut features = self.features.take().unwrap_or_default();
        features.push(feature);
        self.features = Some(features);
        self
    }

    pub fn with_os_type(mut self, os: OsType) -> Self {
        self.os_type = Some(os);
        self
    }

    pub fn with_core_count(mut self, label: impl Into<String>) -> Self {
        self.core_count = Some(label.into());
        self
    }

    pub fn with_processor_brand(mut self, brand: impl Into<String>) -> Self {
        self.processor_brand = Some(brand.into());
        self
    }

    /// Check if a record matches this filter.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(ref brands) = self.brands
            && !brands.iter().any(|b| b == &record.brand)
        {
            return false;
        }

        if let Some(year) = self.release_year
            && record.release_year != year
        {
            return false;
        }
        if let Some(min) = self.min_year
            && record.release_year < min
        {
            return false;
        }
        if let Some(max) = self.max_year
            && record.release_year > max
        {
            return false;
        }

        if let Some(ref bin) = self.price_bin
            && bin.table.assign(record.price_inr) != Some(bin.label.as_str())
        {
            return false;
        }

        if let Some(ref features) = self.features
            && !features.iter().all(|f| record.flag(*f).as_bool())
        {
            return false;
        }

        if let Some(os) = self.os_type
            && record.os_type != os
        {
            return false;
        }

        if let Some(ref cores) = self.core_count
            && record.core_count != *cores
        {
            return false;
        }

        if let Some(ref proc) = self.processor_brand
            && record.processor_brand != *proc
        {
            return false;
        }

        true
    }
}

/// Filter records by the given criteria, preserving input order.
///
/// An empty result is well-formed; downstream aggregation and ranking
/// accept it.
pub fn filter_phones(records: &[Record], filter: &PhoneFilter) -> Vec<Record> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}
