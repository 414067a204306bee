//! Chart Plotter Module
//! Interactive product-view charts using egui_plot.

use egui::Color32;
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};
use polars::prelude::*;

use crate::data::labels::SEGMENT_COL;
use crate::views::filter;

/// Color palette for segments.
pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
];

/// Chart inputs extracted from the filtered product rows, one entry per
/// segment present in the rows.
#[derive(Debug, Clone, Default)]
pub struct ProductChartData {
    pub price_by_segment: Vec<(String, Vec<f64>)>,
    pub ram_rom_by_segment: Vec<(String, Vec<[f64; 2]>)>,
}

impl ProductChartData {
    pub fn from_rows(rows: &DataFrame) -> ProductChartData {
        let mut segments = filter::distinct_values(rows, SEGMENT_COL);
        segments.sort();

        let mut data = ProductChartData::default();
        for segment in segments {
            let price = filter::numeric_values_for_group(rows, SEGMENT_COL, &segment, "PRICE")
                .unwrap_or_default();
            let points = Self::ram_rom_points(rows, &segment).unwrap_or_default();
            data.price_by_segment.push((segment.clone(), price));
            data.ram_rom_by_segment.push((segment, points));
        }
        data
    }

    /// RAM/ROM pairs for one segment, keeping only rows where both values
    /// are present.
    fn ram_rom_points(rows: &DataFrame, segment: &str) -> PolarsResult<Vec<[f64; 2]>> {
        let subset = rows
            .clone()
            .lazy()
            .filter(col(SEGMENT_COL).eq(lit(segment)))
            .collect()?;

        let ram = subset.column("RAM")?.cast(&DataType::Float64)?;
        let ram = ram.f64()?;
        let rom = subset.column("ROM")?.cast(&DataType::Float64)?;
        let rom = rom.f64()?;

        Ok(ram
            .into_iter()
            .zip(rom)
            .filter_map(|(r, o)| Some([r?, o?]))
            .collect())
    }
}

pub struct ChartPlotter;

impl ChartPlotter {
    pub fn segment_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Label for an integer axis mark. Marks that are negative or fall
    /// between box positions render as empty.
    fn axis_label(labels: &[String], value: f64) -> String {
        let rounded = value.round();
        if rounded < 0.0 || (value - rounded).abs() > 0.01 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }

    /// Boxplot of PRICE per segment over the filtered rows.
    /// X-axis: segments, Y-axis: price.
    pub fn draw_price_boxplot(ui: &mut egui::Ui, data: &ProductChartData) {
        let x_labels: Vec<String> = data
            .price_by_segment
            .iter()
            .map(|(segment, _)| segment.clone())
            .collect();

        Plot::new("price_boxplot")
            .height(300.0)
            .allow_scroll(false)
            .x_axis_label("Market Segment")
            .y_axis_label("Price")
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| Self::axis_label(&x_labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, (segment, values)) in data.price_by_segment.iter().enumerate() {
                    if values.is_empty() {
                        continue;
                    }

                    let color = Self::segment_color(i);
                    let mut sorted = values.clone();
                    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

                    let n = sorted.len();
                    let q1 = sorted[n / 4];
                    let median = sorted[n / 2];
                    let q3 = sorted[3 * n / 4];
                    let iqr = q3 - q1;
                    let whisker_low = sorted
                        .iter()
                        .copied()
                        .find(|&v| v >= q1 - 1.5 * iqr)
                        .unwrap_or(q1);
                    let whisker_high = sorted
                        .iter()
                        .rev()
                        .copied()
                        .find(|&v| v <= q3 + 1.5 * iqr)
                        .unwrap_or(q3);

                    let box_elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(whisker_low, q1, median, q3, whisker_high),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(segment));
                }
            });
    }

    /// RAM vs ROM scatter, one colour per segment.
    pub fn draw_ram_rom_scatter(ui: &mut egui::Ui, data: &ProductChartData) {
        Plot::new("ram_rom_scatter")
            .height(300.0)
            .allow_scroll(false)
            .x_axis_label("RAM (GB)")
            .y_axis_label("ROM (GB)")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, (segment, points)) in data.ram_rom_by_segment.iter().enumerate() {
                    if points.is_empty() {
                        continue;
                    }
                    let plot_points: PlotPoints = points.iter().copied().collect();
                    plot_ui.points(
                        Points::new(plot_points)
                            .radius(3.0)
                            .color(Self::segment_color(i))
                            .name(segment),
                    );
                }
            });
    }
}
