use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earliest release year accepted at load time.
pub const MIN_RELEASE_YEAR: i32 = 2000;
/// Latest release year accepted at load time.
pub const MAX_RELEASE_YEAR: i32 = 2035;

/// A two-valued categorical flag, "Yes"/"No" on the wire.
///
/// The published dataset encodes booleans as strings. The enum keeps that
/// boundary representation while predicate evaluation works on the bool.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Flag {
    Yes,
    No,
}

impl Flag {
    pub fn as_bool(self) -> bool {
        matches!(self, Flag::Yes)
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        if b { Flag::Yes } else { Flag::No }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OsType {
    Android,
    #[serde(rename = "iOS")]
    Ios,
}

/// The four boolean capabilities a record carries.
///
/// Keeping these separate from [`crate::Field`] means a feature predicate
/// can only ever name a flag column.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FeatureFlag {
    FiveG,
    Nfc,
    FastCharge,
    Fingerprint,
}

impl std::str::FromStr for FeatureFlag {
    type Err = crate::field::UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5g" | "five_g" => Ok(FeatureFlag::FiveG),
            "nfc" => Ok(FeatureFlag::Nfc),
            "fast_charge" => Ok(FeatureFlag::FastCharge),
            "fingerprint" => Ok(FeatureFlag::Fingerprint),
            other => Err(crate::field::UnknownField(other.to_string())),
        }
    }
}

impl std::fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FeatureFlag::FiveG => "five_g",
            FeatureFlag::Nfc => "nfc",
            FeatureFlag::FastCharge => "fast_charge",
            FeatureFlag::Fingerprint => "fingerprint",
        };
        f.write_str(name)
    }
}

/// The canonical smartphone record.
///
/// This is the data spine. Engines never mutate a record; they only derive
/// new collections from slices of them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub brand: String,
    /// Not unique across a brand; several variants may share a name.
    pub model_name: String,
    pub release_year: i32,
    /// Non-negative, single currency (INR).
    pub price_inr: f64,
    pub processor_brand: String,
    pub processor_model: String,
    /// Categorical core-count label, e.g. "Octa".
    pub core_count: String,
    pub ram_gb: f64,
    pub rom_gb: f64,
    pub primary_camera_mp: f64,
    pub secondary_camera_mp: f64,
    pub total_rear_camera_mp: f64,
    pub rear_camera_count: u32,
    pub front_camera_mp: f64,
    pub total_front_camera_mp: f64,
    pub front_camera_count: u32,
    pub display_size_cm: f64,
    pub battery_mah: f64,
    pub fast_charge_watts: f64,
    pub fast_charge: Flag,
    pub five_g: Flag,
    pub nfc: Flag,
    pub fingerprint: Flag,
    pub os_type: OsType,
    pub os_version: String,
}

/// A row that violates the schema invariants.
///
/// Raised at load time so dynamically-shaped data never reaches the
/// engines.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("brand must be non-empty")]
    EmptyBrand,
    #[error("model name must be non-empty")]
    EmptyModelName,
    #[error("price must be non-negative, got {0}")]
    NegativePrice(String),
    #[error("release year {0} outside {MIN_RELEASE_YEAR}..={MAX_RELEASE_YEAR}")]
    YearOutOfRange(i32),
}

impl Record {
    /// Read one of the boolean capability flags.
    pub fn flag(&self, feature: FeatureFlag) -> Flag {
        match feature {
            FeatureFlag::FiveG => self.five_g,
            FeatureFlag::Nfc => self.nfc,
            FeatureFlag::FastCharge => self.fast_charge,
            FeatureFlag::Fingerprint => self.fingerprint,
        }
    }

    /// Check the load-time invariants.
    ///
    /// Ingestion rejects any row that fails here rather than letting it
    /// flow into filtering or aggregation.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        if self.brand.trim().is_empty() {
            return Err(SchemaViolation::EmptyBrand);
        }
        if self.model_name.trim().is_empty() {
            return Err(SchemaViolation::EmptyModelName);
        }
        if self.price_inr.is_nan() || self.price_inr < 0.0 {
            return Err(SchemaViolation::NegativePrice(self.price_inr.to_string()));
        }
        if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&self.release_year) {
            return Err(SchemaViolation::YearOutOfRange(self.release_year));
        }
        Ok(())
    }
}
