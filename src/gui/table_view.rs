//! Table Viewer Widget
//! Row-virtualised display of a projected DataFrame, plus the summary grids.

use egui::{RichText, ScrollArea};
use polars::prelude::*;

use crate::views::{SegmentSummary, ShopSummary};

const ROW_HEIGHT: f32 = 18.0;
const CELL_WIDTH: f32 = 110.0;

pub struct TableView;

impl TableView {
    /// Draw a DataFrame as a virtualised row grid. Only visible rows are
    /// rendered, so the full product table stays responsive.
    pub fn show(ui: &mut egui::Ui, df: &DataFrame, id: &str, max_height: f32) {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        // Header
        ui.horizontal(|ui| {
            for name in &columns {
                ui.add_sized(
                    [CELL_WIDTH, ROW_HEIGHT],
                    egui::Label::new(RichText::new(name).strong().size(11.0)),
                );
            }
        });
        ui.separator();

        ScrollArea::vertical()
            .id_salt(id.to_string())
            .max_height(max_height)
            .auto_shrink([false, true])
            .show_rows(ui, ROW_HEIGHT, df.height(), |ui, row_range| {
                for row in row_range {
                    ui.horizontal(|ui| {
                        for column in df.get_columns() {
                            let text = Self::cell_text(column, row);
                            ui.add_sized(
                                [CELL_WIDTH, ROW_HEIGHT],
                                egui::Label::new(RichText::new(text).size(11.0)),
                            );
                        }
                    });
                }
            });
    }

    fn cell_text(column: &Column, row: usize) -> String {
        match column.get(row) {
            Ok(val) if val.is_null() => "-".to_string(),
            Ok(val) => val.to_string().trim_matches('"').to_string(),
            Err(_) => String::new(),
        }
    }

    /// Per-segment summary grid (full-table statistics).
    pub fn segment_summary_grid(ui: &mut egui::Ui, summary: &[SegmentSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("segment_summary")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in [
                            "Segment", "N", "Price μ", "Price min", "Price max", "Price med",
                            "RAM μ", "RAM min", "RAM max", "ROM μ", "ROM min", "ROM max",
                        ] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for entry in summary {
                            ui.label(RichText::new(&entry.segment).size(11.0));
                            ui.label(RichText::new(entry.price.count.to_string()).size(11.0));
                            for v in [
                                entry.price.mean,
                                entry.price.min,
                                entry.price.max,
                                entry.price.median,
                                entry.ram.mean,
                                entry.ram.min,
                                entry.ram.max,
                                entry.rom.mean,
                                entry.rom.min,
                                entry.rom.max,
                            ] {
                                ui.label(RichText::new(format!("{v:.2}")).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Per-shop summary grid (filtered shop set). One column per metric
    /// statistic, matching the per-shop aggregation.
    pub fn shop_summary_grid(ui: &mut egui::Ui, summary: &[ShopSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("shop_summary")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in SHOP_SUMMARY_HEADERS {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for entry in summary {
                            ui.label(RichText::new(&entry.shop).size(11.0));
                            ui.label(RichText::new(entry.sales.count.to_string()).size(11.0));
                            for v in shop_summary_values(entry) {
                                ui.label(RichText::new(format!("{v:.2}")).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Shop summary column headers; the first two are the shop name and count,
/// the rest line up with `shop_summary_values`.
const SHOP_SUMMARY_HEADERS: [&str; 14] = [
    "Shop", "N", "Sales μ", "Sales min", "Sales max", "Price μ", "Price min", "Price max",
    "RAM μ", "RAM min", "RAM max", "ROM μ", "ROM min", "ROM max",
];

fn shop_summary_values(entry: &ShopSummary) -> [f64; 12] {
    [
        entry.sales.mean,
        entry.sales.min,
        entry.sales.max,
        entry.price.mean,
        entry.price.min,
        entry.price.max,
        entry.ram.mean,
        entry.ram.min,
        entry.ram.max,
        entry.rom.mean,
        entry.rom.min,
        entry.rom.max,
    ]
}
