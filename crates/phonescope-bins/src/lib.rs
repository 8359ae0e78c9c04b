//! Labeled half-open price intervals and bin assignment.
//!
//! A [`PriceBinTable`] maps a continuous price onto one of an ordered set
//! of `[lower, upper)` ranges. A price outside every range is unassigned,
//! which is a value, not an error: bin-label filters simply never match an
//! unassigned row.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One labeled `[lower, upper)` price interval.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PriceBin {
    pub lower: f64,
    pub upper: f64,
    pub label: String,
}

/// An ordered, strictly increasing sequence of price bins.
///
/// Static configuration, built once per session. Two stock tables exist
/// with different granularities; they are independent and never unified.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PriceBinTable {
    bins: Vec<PriceBin>,
}

/// Rejected bin-table configuration.
#[derive(Error, Debug, PartialEq)]
pub enum BinTableError {
    #[error("bin table must have at least one bin")]
    Empty,
    #[error("bin {index} ({label:?}) is not a valid half-open interval: [{lower}, {upper})")]
    EmptyInterval {
        index: usize,
        label: String,
        lower: f64,
        upper: f64,
    },
    #[error("bin {index} ({label:?}) overlaps or precedes the bin before it")]
    OutOfOrder { index: usize, label: String },
    #[error("bin {index} has an empty label")]
    BlankLabel { index: usize },
}

impl PriceBinTable {
    /// Build a table, validating ordering and interval shape up front.
    pub fn new(bins: Vec<PriceBin>) -> Result<Self, BinTableError> {
        if bins.is_empty() {
            return Err(BinTableError::Empty);
        }
        for (index, bin) in bins.iter().enumerate() {
            if bin.label.trim().is_empty() {
                return Err(BinTableError::BlankLabel { index });
            }
            if bin.lower.is_nan() || bin.upper.is_nan() || bin.lower >= bin.upper {
                return Err(BinTableError::EmptyInterval {
                    index,
                    label: bin.label.clone(),
                    lower: bin.lower,
                    upper: bin.upper,
                });
            }
            if index > 0 && bin.lower < bins[index - 1].upper {
                return Err(BinTableError::OutOfOrder {
                    index,
                    label: bin.label.clone(),
                });
            }
        }
        Ok(Self { bins })
    }

    /// Build a table from contiguous boundary edges and labels.
    ///
    /// `edges` has one more element than `labels`; bin `i` covers
    /// `[edges[i], edges[i + 1])`.
    pub fn from_edges(edges: &[f64], labels: &[&str]) -> Result<Self, BinTableError> {
        let bins = labels
            .iter()
            .enumerate()
            .map(|(i, label)| PriceBin {
                lower: edges.get(i).copied().unwrap_or(f64::INFINITY),
                upper: edges.get(i + 1).copied().unwrap_or(f64::NEG_INFINITY),
                label: (*label).to_string(),
            })
            .collect();
        Self::new(bins)
    }

    /// Assign a value to its bin label.
    ///
    /// Returns `None` when the value precedes the first bin or sits at or
    /// beyond the last bin's upper bound. Intervals are right-exclusive, so
    /// a value exactly on a boundary lands in the higher bin.
    pub fn assign(&self, value: f64) -> Option<&str> {
        self.bins
            .iter()
            .find(|bin| bin.lower <= value && value < bin.upper)
            .map(|bin| bin.label.as_str())
    }

    /// Whether a label belongs to this table.
    pub fn has_label(&self, label: &str) -> bool {
        self.bins.iter().any(|bin| bin.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bins.iter().map(|bin| bin.label.as_str())
    }

    pub fn bins(&self) -> &[PriceBin] {
        &self.bins
    }

    /// The coarse table used for market-wide breakdowns (8 bins, 0–2L).
    pub fn coarse() -> Self {
        let edges = [
            0.0, 15_000.0, 30_000.0, 50_000.0, 75_000.0, 100_000.0, 125_000.0, 150_000.0,
            200_000.0,
        ];
        let labels = [
            "0-15k", "15k-30k", "30k-50k", "50k-75k", "75k-1L", "1L-1.25L", "1.25L-1.5L",
            "1.5L-2L",
        ];
        Self::from_edges(&edges, &labels).expect("stock coarse table is valid")
    }

    /// The fine table used for buyer-facing browsing (14 bins, 0–2L).
    pub fn fine() -> Self {
        let edges = [
            0.0, 10_000.0, 15_000.0, 20_000.0, 30_000.0, 40_000.0, 50_000.0, 60_000.0, 70_000.0,
            80_000.0, 90_000.0, 100_000.0, 125_000.0, 150_000.0, 200_000.0,
        ];
        let labels = [
            "0-10k", "10k-15k", "15k-20k", "20k-30k", "30k-40k", "40k-50k", "50k-60k", "60k-70k",
            "70k-80k", "80k-90k", "90k-1L", "1L-1.25L", "1.25L-1.5L", "1.5L-2L",
        ];
        Self::from_edges(&edges, &labels).expect("stock fine table is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_bins() -> PriceBinTable {
        PriceBinTable::from_edges(&[0.0, 15_000.0, 30_000.0], &["low", "high"]).unwrap()
    }

    #[test]
    fn assigns_interior_values() {
        let t = two_bins();
        assert_eq!(t.assign(10_000.0), Some("low"));
        assert_eq!(t.assign(20_000.0), Some("high"));
    }

    #[test]
    fn boundary_goes_to_higher_bin() {
        let t = two_bins();
        assert_eq!(t.assign(15_000.0), Some("high"));
        assert_eq!(t.assign(0.0), Some("low"));
    }

    #[test]
    fn out_of_range_is_unassigned() {
        let t = two_bins();
        assert_eq!(t.assign(-1.0), None);
        assert_eq!(t.assign(30_000.0), None);
        assert_eq!(t.assign(1_000_000.0), None);
    }

    #[test]
    fn empty_table_rejected() {
        assert_eq!(
            PriceBinTable::new(vec![]).unwrap_err(),
            BinTableError::Empty
        );
    }

    #[test]
    fn inverted_interval_rejected() {
        let err = PriceBinTable::new(vec![PriceBin {
            lower: 10.0,
            upper: 10.0,
            label: "x".to_string(),
        }])
        .unwrap_err();
        assert!(matches!(err, BinTableError::EmptyInterval { index: 0, .. }));
    }

    #[test]
    fn overlapping_bins_rejected() {
        let err = PriceBinTable::new(vec![
            PriceBin {
                lower: 0.0,
                upper: 100.0,
                label: "a".to_string(),
            },
            PriceBin {
                lower: 50.0,
                upper: 200.0,
                label: "b".to_string(),
            },
        ])
        .unwrap_err();
        assert!(matches!(err, BinTableError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn blank_label_rejected() {
        let err = PriceBinTable::from_edges(&[0.0, 1.0], &[" "]).unwrap_err();
        assert_eq!(err, BinTableError::BlankLabel { index: 0 });
    }

    #[test]
    fn gap_between_bins_is_unassigned() {
        let t = PriceBinTable::new(vec![
            PriceBin {
                lower: 0.0,
                upper: 10.0,
                label: "a".to_string(),
            },
            PriceBin {
                lower: 20.0,
                upper: 30.0,
                label: "b".to_string(),
            },
        ])
        .unwrap();
        assert_eq!(t.assign(15.0), None);
        assert_eq!(t.assign(10.0), None);
        assert_eq!(t.assign(20.0), Some("b"));
    }

    #[test]
    fn stock_tables_cover_expected_labels() {
        let coarse = PriceBinTable::coarse();
        assert_eq!(coarse.bins().len(), 8);
        assert_eq!(coarse.assign(14_999.0), Some("0-15k"));
        assert_eq!(coarse.assign(15_000.0), Some("15k-30k"));

        let fine = PriceBinTable::fine();
        assert_eq!(fine.bins().len(), 14);
        assert_eq!(fine.assign(9_999.0), Some("0-10k"));
        assert_eq!(fine.assign(199_999.0), Some("1.5L-2L"));
        assert_eq!(fine.assign(200_000.0), None);
    }

    proptest! {
        // Every in-domain value lands in exactly one bin and that bin
        // contains it.
        #[test]
        fn coverage_within_domain(price in 0.0f64..200_000.0) {
            let t = PriceBinTable::coarse();
            let label = t.assign(price).expect("domain is contiguous");
            let matching: Vec<_> = t
                .bins()
                .iter()
                .filter(|b| b.lower <= price && price < b.upper)
                .collect();
            prop_assert_eq!(matching.len(), 1);
            prop_assert_eq!(matching[0].label.as_str(), label);
        }

        // Boundaries always resolve to the bin whose lower bound they are.
        #[test]
        fn boundaries_prefer_higher_bin(idx in 0usize..8) {
            let t = PriceBinTable::coarse();
            let edge = t.bins()[idx].lower;
            prop_assert_eq!(t.assign(edge), Some(t.bins()[idx].label.as_str()));
        }
    }
}
