//! Segdash - Phone Market Segmentation Dashboard
//!
//! Desktop dashboard over two pre-computed CSV tables: per-product phone
//! listings with a cluster-derived market segment, and per-shop aggregates
//! with a predicted shop-size category.

mod config;
mod data;
mod gui;
mod stats;
mod views;

use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("Segdash"),
        ..Default::default()
    };

    eframe::run_native(
        "Segdash",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
}
