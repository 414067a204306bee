//! Product View Module
//! Filtered product rows plus the per-segment market summary.

use polars::prelude::*;
use rayon::prelude::*;

use crate::data::labels::SEGMENT_COL;
use crate::data::loader::PRODUCT_DISPLAY_COLUMNS;
use crate::stats::MetricStats;
use crate::views::filter;
use crate::views::ViewError;

/// Statistics for one market segment over the full product table.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub segment: String,
    pub price: MetricStats,
    pub ram: MetricStats,
    pub rom: MetricStats,
}

/// Product-mode output: display rows and the segment summary.
#[derive(Debug, Clone)]
pub struct ProductViewOutput {
    pub rows: DataFrame,
    pub summary: Vec<SegmentSummary>,
}

pub struct ProductView;

impl ProductView {
    /// Build the product view. The row subset honours the filters; the
    /// summary is always computed over the full unfiltered table, so it is
    /// invariant under filter changes.
    pub fn build(
        products: &DataFrame,
        brand_filter: &str,
        segment_filter: &str,
    ) -> Result<ProductViewOutput, ViewError> {
        let brand = filter::resolve_selection(products, "BRAND", brand_filter);
        let segment = filter::resolve_selection(products, SEGMENT_COL, segment_filter);

        let filtered = filter::apply_equality_filters(
            products,
            &[("BRAND", &brand), (SEGMENT_COL, &segment)],
        )?;
        let rows = filtered.select(PRODUCT_DISPLAY_COLUMNS)?;

        let summary = Self::segment_summary(products)?;
        Ok(ProductViewOutput { rows, summary })
    }

    /// Per-segment PRICE/RAM/ROM statistics over the given table, one entry
    /// per segment present in the data, sorted by segment name.
    pub fn segment_summary(products: &DataFrame) -> Result<Vec<SegmentSummary>, ViewError> {
        let mut segments = filter::distinct_values(products, SEGMENT_COL);
        segments.sort();

        segments
            .par_iter()
            .map(|segment| {
                let price =
                    filter::numeric_values_for_group(products, SEGMENT_COL, segment, "PRICE")?;
                let ram =
                    filter::numeric_values_for_group(products, SEGMENT_COL, segment, "RAM")?;
                let rom =
                    filter::numeric_values_for_group(products, SEGMENT_COL, segment, "ROM")?;

                Ok(SegmentSummary {
                    segment: segment.clone(),
                    price: MetricStats::compute(&price),
                    ram: MetricStats::compute(&ram),
                    rom: MetricStats::compute(&rom),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::filter::ALL_OPTION;
    use polars::df;

    fn products() -> DataFrame {
        df![
            "PRODUCT" => ["P1", "P2", "P3"],
            "SHOPNAME" => ["Alpha", "Beta", "Alpha"],
            "BRAND" => ["X", "Y", "Y"],
            "MODEL" => ["M1", "M2", "M3"],
            "PRICE" => [1000.0, 200.0, 300.0],
            "RAM" => [12.0, 4.0, 6.0],
            "ROM" => [256.0, 64.0, 128.0],
            "SALES" => [3.0, 9.0, 5.0],
            "segment" => ["Flagship", "Entry Level", "Entry Level"],
        ]
        .unwrap()
    }

    #[test]
    fn all_filters_return_every_row_unchanged() {
        let df = products();
        let output = ProductView::build(&df, ALL_OPTION, ALL_OPTION).unwrap();
        let expected = df.select(PRODUCT_DISPLAY_COLUMNS).unwrap();
        assert!(output.rows.equals_missing(&expected));
    }

    #[test]
    fn brand_filter_restricts_rows_but_not_summary() {
        let output = ProductView::build(&products(), "X", ALL_OPTION).unwrap();
        assert_eq!(output.rows.height(), 1);

        // The summary still covers both segments of the full table.
        assert_eq!(output.summary.len(), 2);
        let entry = output.summary.iter().find(|s| s.segment == "Entry Level");
        assert_eq!(entry.unwrap().price.mean, 250.0);
        let flagship = output.summary.iter().find(|s| s.segment == "Flagship");
        assert_eq!(flagship.unwrap().price.mean, 1000.0);
    }

    #[test]
    fn summary_is_invariant_under_filter_changes() {
        let df = products();
        let unfiltered = ProductView::build(&df, ALL_OPTION, ALL_OPTION).unwrap();
        let filtered = ProductView::build(&df, "Y", "Entry Level").unwrap();
        assert_eq!(unfiltered.summary, filtered.summary);
    }

    #[test]
    fn filters_are_conjunctive() {
        let output = ProductView::build(&products(), "Y", "Flagship").unwrap();
        assert_eq!(output.rows.height(), 0);
    }

    #[test]
    fn stale_brand_selection_degrades_to_all() {
        let df = products();
        let output = ProductView::build(&df, "NOKIA", ALL_OPTION).unwrap();
        assert_eq!(output.rows.height(), df.height());
    }

    #[test]
    fn summary_groups_are_sorted_by_segment_name() {
        let output = ProductView::build(&products(), ALL_OPTION, ALL_OPTION).unwrap();
        let names: Vec<&str> = output.summary.iter().map(|s| s.segment.as_str()).collect();
        assert_eq!(names, vec!["Entry Level", "Flagship"]);
    }
}
