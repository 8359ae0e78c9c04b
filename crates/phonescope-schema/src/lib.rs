//! Canonical record model and data types for the phonescope engines.
//!
//! Defines the smartphone [`record::Record`], the two-valued feature
//! [`record::Flag`], the [`field::Field`] enum used for group keys, sort
//! keys, and metrics, and the typed [`field::FieldValue`] extracted from
//! records for comparison. All other crates depend on these types.

pub mod field;
pub mod record;

pub use field::{Field, FieldValue, UnknownField};
pub use record::{FeatureFlag, Flag, OsType, Record, SchemaViolation};
