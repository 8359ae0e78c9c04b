use crate::record::Record;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// A schema field usable as a group key, sort key, or metric.
///
/// Callers hand field names across the integration boundary as strings;
/// [`Field::from_str`] is the single place those strings are checked, so an
/// unknown name fails fast instead of silently dropping a key.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
pub enum Field {
    Brand,
    ModelName,
    ReleaseYear,
    PriceInr,
    ProcessorBrand,
    ProcessorModel,
    CoreCount,
    RamGb,
    RomGb,
    PrimaryCameraMp,
    SecondaryCameraMp,
    TotalRearCameraMp,
    RearCameraCount,
    FrontCameraMp,
    TotalFrontCameraMp,
    FrontCameraCount,
    DisplaySizeCm,
    BatteryMah,
    FastChargeWatts,
    FastCharge,
    FiveG,
    Nfc,
    Fingerprint,
    OsType,
    OsVersion,
}

/// A field name that is not part of the record schema.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim().to_lowercase().as_str() {
            "brand" => Field::Brand,
            "model_name" => Field::ModelName,
            "release_year" => Field::ReleaseYear,
            "price" | "price_inr" => Field::PriceInr,
            "processor_brand" => Field::ProcessorBrand,
            "processor_model" => Field::ProcessorModel,
            "core_count" => Field::CoreCount,
            "ram_gb" => Field::RamGb,
            "rom_gb" => Field::RomGb,
            "primary_camera_mp" => Field::PrimaryCameraMp,
            "secondary_camera_mp" => Field::SecondaryCameraMp,
            "total_rear_camera_mp" => Field::TotalRearCameraMp,
            "rear_camera_count" => Field::RearCameraCount,
            "front_camera_mp" => Field::FrontCameraMp,
            "total_front_camera_mp" => Field::TotalFrontCameraMp,
            "front_camera_count" => Field::FrontCameraCount,
            "display_size_cm" => Field::DisplaySizeCm,
            "battery_mah" => Field::BatteryMah,
            "fast_charge_watts" => Field::FastChargeWatts,
            "fast_charge" => Field::FastCharge,
            "5g" | "five_g" => Field::FiveG,
            "nfc" => Field::Nfc,
            "fingerprint" => Field::Fingerprint,
            "os_type" => Field::OsType,
            "os_version" => Field::OsVersion,
            other => return Err(UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Brand => "brand",
            Field::ModelName => "model_name",
            Field::ReleaseYear => "release_year",
            Field::PriceInr => "price_inr",
            Field::ProcessorBrand => "processor_brand",
            Field::ProcessorModel => "processor_model",
            Field::CoreCount => "core_count",
            Field::RamGb => "ram_gb",
            Field::RomGb => "rom_gb",
            Field::PrimaryCameraMp => "primary_camera_mp",
            Field::SecondaryCameraMp => "secondary_camera_mp",
            Field::TotalRearCameraMp => "total_rear_camera_mp",
            Field::RearCameraCount => "rear_camera_count",
            Field::FrontCameraMp => "front_camera_mp",
            Field::TotalFrontCameraMp => "total_front_camera_mp",
            Field::FrontCameraCount => "front_camera_count",
            Field::DisplaySizeCm => "display_size_cm",
            Field::BatteryMah => "battery_mah",
            Field::FastChargeWatts => "fast_charge_watts",
            Field::FastCharge => "fast_charge",
            Field::FiveG => "five_g",
            Field::Nfc => "nfc",
            Field::Fingerprint => "fingerprint",
            Field::OsType => "os_type",
            Field::OsVersion => "os_version",
        };
        f.write_str(name)
    }
}

impl Field {
    /// Extract the typed value of this field from a record.
    pub fn value(self, r: &Record) -> FieldValue {
        match self {
            Field::Brand => FieldValue::Text(r.brand.clone()),
            Field::ModelName => FieldValue::Text(r.model_name.clone()),
            Field::ReleaseYear => FieldValue::Int(i64::from(r.release_year)),
            Field::PriceInr => FieldValue::Num(r.price_inr),
            Field::ProcessorBrand => FieldValue::Text(r.processor_brand.clone()),
            Field::ProcessorModel => FieldValue::Text(r.processor_model.clone()),
            Field::CoreCount => FieldValue::Text(r.core_count.clone()),
            Field::RamGb => FieldValue::Num(r.ram_gb),
            Field::RomGb => FieldValue::Num(r.rom_gb),
            Field::PrimaryCameraMp => FieldValue::Num(r.primary_camera_mp),
            Field::SecondaryCameraMp => FieldValue::Num(r.secondary_camera_mp),
            Field::TotalRearCameraMp => FieldValue::Num(r.total_rear_camera_mp),
            Field::RearCameraCount => FieldValue::Int(i64::from(r.rear_camera_count)),
            Field::FrontCameraMp => FieldValue::Num(r.front_camera_mp),
            Field::TotalFrontCameraMp => FieldValue::Num(r.total_front_camera_mp),
            Field::FrontCameraCount => FieldValue::Int(i64::from(r.front_camera_count)),
            Field::DisplaySizeCm => FieldValue::Num(r.display_size_cm),
            Field::BatteryMah => FieldValue::Num(r.battery_mah),
            Field::FastChargeWatts => FieldValue::Num(r.fast_charge_watts),
            Field::FastCharge => FieldValue::Flag(r.fast_charge.as_bool()),
            Field::FiveG => FieldValue::Flag(r.five_g.as_bool()),
            Field::Nfc => FieldValue::Flag(r.nfc.as_bool()),
            Field::Fingerprint => FieldValue::Flag(r.fingerprint.as_bool()),
            Field::OsType => FieldValue::Text(
                match r.os_type {
                    crate::record::OsType::Android => "Android",
                    crate::record::OsType::Ios => "iOS",
                }
                .to_string(),
            ),
            Field::OsVersion => FieldValue::Text(r.os_version.clone()),
        }
    }

    /// Whether the field carries a numeric value.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Field::Brand
                | Field::ModelName
                | Field::ProcessorBrand
                | Field::ProcessorModel
                | Field::CoreCount
                | Field::FastCharge
                | Field::FiveG
                | Field::Nfc
                | Field::Fingerprint
                | Field::OsType
                | Field::OsVersion
        )
    }

    /// Numeric view of this field, if it has one.
    ///
    /// Metrics (mean, median, min, max) are only defined over numeric
    /// fields; text and flag fields return `None` and callers fail fast.
    pub fn numeric(self, r: &Record) -> Option<f64> {
        match self.value(r) {
            FieldValue::Num(v) => Some(v),
            FieldValue::Int(v) => Some(v as f64),
            FieldValue::Text(_) | FieldValue::Flag(_) => None,
        }
    }
}

/// A field value extracted for grouping or sorting.
///
/// Carries a total order (f64 via `total_cmp`) and a consistent hash so any
/// field can serve as a map key. A given field always produces the same
/// variant, so cross-variant comparisons only matter for the derived
/// discriminant order.
#[derive(Clone, Debug, Serialize)]
pub enum FieldValue {
    Int(i64),
    Num(f64),
    Text(String),
    Flag(bool),
}

impl FieldValue {
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Int(_) => 0,
            FieldValue::Num(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Flag(_) => 3,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Num(a), FieldValue::Num(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Flag(a), FieldValue::Flag(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            FieldValue::Int(v) => v.hash(state),
            FieldValue::Num(v) => v.to_bits().hash(state),
            FieldValue::Text(v) => v.hash(state),
            FieldValue::Flag(v) => v.hash(state),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Num(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{v}")
                }
            }
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Flag(v) => f.write_str(if *v { "Yes" } else { "No" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Flag, OsType, Record};

    fn phone(brand: &str, year: i32, price: f64) -> Record {
        Record {
            brand: brand.to_string(),
            model_name: format!("{brand} One"),
            release_year: year,
            price_inr: price,
            processor_brand: "Snapdragon".to_string(),
            processor_model: "8 Gen 2".to_string(),
            core_count: "Octa".to_string(),
            ram_gb: 8.0,
            rom_gb: 256.0,
            primary_camera_mp: 50.0,
            secondary_camera_mp: 8.0,
            total_rear_camera_mp: 58.0,
            rear_camera_count: 2,
            front_camera_mp: 16.0,
            total_front_camera_mp: 16.0,
            front_camera_count: 1,
            display_size_cm: 16.9,
            battery_mah: 5000.0,
            fast_charge_watts: 67.0,
            fast_charge: Flag::Yes,
            five_g: Flag::Yes,
            nfc: Flag::No,
            fingerprint: Flag::Yes,
            os_type: OsType::Android,
            os_version: "13".to_string(),
        }
    }

    #[test]
    fn parse_known_fields() {
        assert_eq!("brand".parse::<Field>().unwrap(), Field::Brand);
        assert_eq!("price".parse::<Field>().unwrap(), Field::PriceInr);
        assert_eq!("price_inr".parse::<Field>().unwrap(), Field::PriceInr);
        assert_eq!("5g".parse::<Field>().unwrap(), Field::FiveG);
        assert_eq!("RAM_GB".parse::<Field>().unwrap(), Field::RamGb);
    }

    #[test]
    fn parse_unknown_field_fails_fast() {
        let err = "warranty_years".parse::<Field>().unwrap_err();
        assert_eq!(err, UnknownField("warranty_years".to_string()));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for field in [
            Field::Brand,
            Field::PriceInr,
            Field::TotalRearCameraMp,
            Field::FiveG,
            Field::OsVersion,
        ] {
            assert_eq!(field.to_string().parse::<Field>().unwrap(), field);
        }
    }

    #[test]
    fn value_extraction_matches_record() {
        let r = phone("Pixel", 2023, 59999.0);
        assert_eq!(
            Field::Brand.value(&r),
            FieldValue::Text("Pixel".to_string())
        );
        assert_eq!(Field::ReleaseYear.value(&r), FieldValue::Int(2023));
        assert_eq!(Field::PriceInr.value(&r), FieldValue::Num(59999.0));
        assert_eq!(Field::Nfc.value(&r), FieldValue::Flag(false));
    }

    #[test]
    fn numeric_view_covers_ints_and_nums() {
        let r = phone("Pixel", 2023, 59999.0);
        assert_eq!(Field::PriceInr.numeric(&r), Some(59999.0));
        assert_eq!(Field::RearCameraCount.numeric(&r), Some(2.0));
        assert_eq!(Field::Brand.numeric(&r), None);
        assert_eq!(Field::FiveG.numeric(&r), None);
    }

    #[test]
    fn num_ordering_is_total() {
        let a = FieldValue::Num(1.0);
        let b = FieldValue::Num(2.0);
        assert!(a < b);
        assert_eq!(a, FieldValue::Num(1.0));
    }

    #[test]
    fn flag_ordering_puts_yes_above_no() {
        assert!(FieldValue::Flag(true) > FieldValue::Flag(false));
    }
}
