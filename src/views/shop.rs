//! Shop View Module
//! Filtered shop rows (capped for display) plus per-shop product statistics
//! computed over a semi-join of the product table.

use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashSet;

use crate::data::loader::{shop_display_columns, SHOPNAME_COL, SHOPSIZE_COL};
use crate::stats::MetricStats;
use crate::views::filter;
use crate::views::ViewError;

/// Product statistics for one shop.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopSummary {
    pub shop: String,
    pub sales: MetricStats,
    pub price: MetricStats,
    pub ram: MetricStats,
    pub rom: MetricStats,
}

/// Shop-mode output: capped display rows and the per-shop summary.
#[derive(Debug, Clone)]
pub struct ShopViewOutput {
    pub rows: DataFrame,
    pub summary: Vec<ShopSummary>,
}

pub struct ShopView;

impl ShopView {
    /// Build the shop view. Unlike the product view, the summary reflects
    /// the category filter: it is computed from the products of the filtered
    /// shop set. The row cap applies to the display rows only.
    pub fn build(
        shops: &DataFrame,
        products: &DataFrame,
        category_filter: &str,
        row_limit: usize,
    ) -> Result<ShopViewOutput, ViewError> {
        let category = filter::resolve_selection(shops, SHOPSIZE_COL, category_filter);
        let filtered_shops =
            filter::apply_equality_filters(shops, &[(SHOPSIZE_COL, &category)])?;

        let rows = filtered_shops
            .select(shop_display_columns())?
            .head(Some(row_limit));

        // Semi-join on the full filtered shop set, not the capped rows.
        let shop_names: HashSet<String> = filter::distinct_values(&filtered_shops, SHOPNAME_COL)
            .into_iter()
            .collect();
        let restricted = Self::restrict_to_shops(products, &shop_names)?;
        let summary = Self::per_shop_summary(&restricted)?;

        Ok(ShopViewOutput { rows, summary })
    }

    /// Keep only product rows whose `SHOPNAME` appears in the given set.
    fn restrict_to_shops(
        products: &DataFrame,
        shop_names: &HashSet<String>,
    ) -> Result<DataFrame, ViewError> {
        let names = products.column(SHOPNAME_COL)?.cast(&DataType::String)?;
        let names = names.str()?;

        let mask: Vec<bool> = names
            .into_iter()
            .map(|name| name.is_some_and(|n| shop_names.contains(n)))
            .collect();
        let mask = BooleanChunked::from_slice("mask".into(), &mask);
        Ok(products.filter(&mask)?)
    }

    /// SALES/PRICE/RAM/ROM statistics per shop, sorted by shop name.
    fn per_shop_summary(products: &DataFrame) -> Result<Vec<ShopSummary>, ViewError> {
        let mut shops = filter::distinct_values(products, SHOPNAME_COL);
        shops.sort();

        shops
            .par_iter()
            .map(|shop| {
                let sales =
                    filter::numeric_values_for_group(products, SHOPNAME_COL, shop, "SALES")?;
                let price =
                    filter::numeric_values_for_group(products, SHOPNAME_COL, shop, "PRICE")?;
                let ram = filter::numeric_values_for_group(products, SHOPNAME_COL, shop, "RAM")?;
                let rom = filter::numeric_values_for_group(products, SHOPNAME_COL, shop, "ROM")?;

                Ok(ShopSummary {
                    shop: shop.clone(),
                    sales: MetricStats::compute(&sales),
                    price: MetricStats::compute(&price),
                    ram: MetricStats::compute(&ram),
                    rom: MetricStats::compute(&rom),
                })
            })
            .collect()
    }
}
