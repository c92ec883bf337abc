//! Step definitions for the behavioural scenarios.

mod field_steps;
mod scan_steps;

pub use field_steps::FieldWorld;
pub use scan_steps::ScanWorld;
