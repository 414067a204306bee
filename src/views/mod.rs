//! Views module - the product and shop filter/aggregate views

pub mod filter;
pub mod product;
pub mod shop;

use polars::prelude::PolarsError;
use thiserror::Error;

pub use product::{ProductView, ProductViewOutput, SegmentSummary};
pub use shop::{ShopSummary, ShopView, ShopViewOutput};

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
