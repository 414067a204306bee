//! Stats module - grouped summary statistics

mod summary;

pub use summary::{round2, MetricStats};
