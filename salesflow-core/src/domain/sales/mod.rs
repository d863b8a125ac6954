// salesflow-core/src/domain/sales/mod.rs

pub mod coerce;
pub mod reshape;
pub mod wide;

pub use reshape::{RAW_COLUMNS, reshape_sales};
pub use wide::WideTable;
