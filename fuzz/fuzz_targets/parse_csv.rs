//! Fuzz harness for CSV dataset ingestion.
//!
//! The loader must never panic on malformed input: bad rows land in the
//! rejected list, good rows still load.
//! Target: `phonescope_ingest_csv::read_records`

#![no_main]

use libfuzzer_sys::fuzz_target;
use phonescope_ingest_csv::read_records;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = read_records(data) {
        // Every accepted record already passed schema validation.
        for record in &report.records {
            assert!(record.validate().is_ok());
        }
    }
});
