//! Data module - CSV loading and label mapping

pub mod labels;
pub mod loader;

pub use loader::{LabeledTables, ShopAlignment};
