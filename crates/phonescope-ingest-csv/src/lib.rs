//! CSV loader for the published smartphone dataset.
//!
//! Maps the dataset's published column headers onto [`Record`], enforcing
//! the schema invariants per row. Rows that fail to parse or validate are
//! collected with their line numbers rather than silently dropped; the
//! caller decides how loudly to report them. Handles both local files and
//! the raw-URL hosting the original dashboard loads from.

use anyhow::{Context, Result};
use phonescope_schema::{Flag, OsType, Record};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One CSV row under the dataset's published headers.
///
/// Columns not listed here (display type, extra rear/front lenses) are
/// ignored by the header-based reader.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Brand")]
    brand: String,
    #[serde(rename = "Model Name")]
    model_name: String,
    #[serde(rename = "Release Year")]
    release_year: i32,
    #[serde(rename = "Price (INR)")]
    price_inr: f64,
    #[serde(rename = "Processor Brand")]
    processor_brand: String,
    #[serde(rename = "Processor Model")]
    processor_model: String,
    #[serde(rename = "Number of Cores")]
    core_count: String,
    #[serde(rename = "RAM (GB)")]
    ram_gb: f64,
    #[serde(rename = "ROM (GB)")]
    rom_gb: f64,
    #[serde(rename = "Primary Camera (MP)")]
    primary_camera_mp: f64,
    #[serde(rename = "Secondary Camera (MP)", default)]
    secondary_camera_mp: Option<f64>,
    #[serde(rename = "Total Rear Camera Megapixels")]
    total_rear_camera_mp: f64,
    #[serde(rename = "Number of Rear Cameras")]
    rear_camera_count: u32,
    #[serde(rename = "Front Camera 1 (MP)")]
    front_camera_mp: f64,
    #[serde(rename = "Total Front Camera Megapixels")]
    total_front_camera_mp: f64,
    #[serde(rename = "Number of Front Cameras")]
    front_camera_count: u32,
    #[serde(rename = "Display Size (cm)")]
    display_size_cm: f64,
    #[serde(rename = "Battery Capacity (mAh)")]
    battery_mah: f64,
    #[serde(rename = "Fast Charge Capacity (W)", default)]
    fast_charge_watts: Option<f64>,
    #[serde(rename = "Fast Charge Availability")]
    fast_charge: Flag,
    #[serde(rename = "5G Support")]
    five_g: Flag,
    #[serde(rename = "NFC Support")]
    nfc: Flag,
    #[serde(rename = "Fingerprint Sensor")]
    fingerprint: Flag,
    #[serde(rename = "Operating System Type")]
    os_type: OsType,
    #[serde(rename = "Operating System Version")]
    os_version: String,
}

impl From<RawRow> for Record {
    fn from(raw: RawRow) -> Self {
        Record {
            brand: raw.brand,
            model_name: raw.model_name,
            release_year: raw.release_year,
            price_inr: raw.price_inr,
            processor_brand: raw.processor_brand,
            processor_model: raw.processor_model,
            core_count: raw.core_count,
            ram_gb: raw.ram_gb,
            rom_gb: raw.rom_gb,
            primary_camera_mp: raw.primary_camera_mp,
            secondary_camera_mp: raw.secondary_camera_mp.unwrap_or(0.0),
            total_rear_camera_mp: raw.total_rear_camera_mp,
            rear_camera_count: raw.rear_camera_count,
            front_camera_mp: raw.front_camera_mp,
            total_front_camera_mp: raw.total_front_camera_mp,
            front_camera_count: raw.front_camera_count,
            display_size_cm: raw.display_size_cm,
            battery_mah: raw.battery_mah,
            fast_charge_watts: raw.fast_charge_watts.unwrap_or(0.0),
            fast_charge: raw.fast_charge,
            five_g: raw.five_g,
            nfc: raw.nfc,
            fingerprint: raw.fingerprint,
            os_type: raw.os_type,
            os_version: raw.os_version,
        }
    }
}

/// A row the loader refused, with the 1-based data line it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: usize,
    pub reason: String,
}

/// The outcome of a load: accepted records plus refused rows.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<Record>,
    pub rejected: Vec<RejectedRow>,
}

/// Read records from any CSV reader with the published headers.
pub fn read_records(input: impl Read) -> Result<LoadReport> {
    let mut reader = csv::Reader::from_reader(input);
    let mut report = LoadReport::default();

    for (i, row) in reader.deserialize::<RawRow>().enumerate() {
        let line = i + 1;
        match row {
            Ok(raw) => {
                let record = Record::from(raw);
                match record.validate() {
                    Ok(()) => report.records.push(record),
                    Err(violation) => report.rejected.push(RejectedRow {
                        line,
                        reason: violation.to_string(),
                    }),
                }
            }
            Err(err) => report.rejected.push(RejectedRow {
                line,
                reason: err.to_string(),
            }),
        }
    }

    Ok(report)
}

/// Load the dataset from a local CSV file.
pub fn load_path(path: impl AsRef<Path>) -> Result<LoadReport> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("open {path:?}"))?;
    read_records(file).with_context(|| format!("read {path:?}"))
}

/// Load the dataset from an http(s) URL (the original hosts both CSVs as
/// raw files on GitHub).
pub fn load_url(url: &str) -> Result<LoadReport> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("fetch {url}"))?;
    read_records(response).with_context(|| format!("read {url}"))
}

/// Load from either a URL or a local path, dispatching on the scheme.
pub fn load_source(source: &str) -> Result<LoadReport> {
    if source.starts_with("http://") || source.starts_with("https://") {
        load_url(source)
    } else {
        load_path(source)
    }
}
