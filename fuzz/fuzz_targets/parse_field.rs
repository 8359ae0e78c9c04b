//! Fuzz harness for field-name parsing and bin assignment.
//!
//! Field parsing is the only place caller strings enter the engines;
//! unknown names must error, never panic. Bin assignment must stay total
//! over arbitrary floats.
//! Target: `phonescope_schema::Field::from_str`, `PriceBinTable::assign`

#![no_main]

use libfuzzer_sys::fuzz_target;
use phonescope_bins::PriceBinTable;
use phonescope_schema::Field;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = s.parse::<Field>();
    }

    if data.len() >= 8 {
        let value = f64::from_le_bytes(data[..8].try_into().unwrap());
        let _ = PriceBinTable::coarse().assign(value);
        let _ = PriceBinTable::fine().assign(value);
    }
});
