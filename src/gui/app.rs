//! Dashboard Application
//! Main window: sidebar controls, data tables, summaries and charts.

use egui::{RichText, ScrollArea, SidePanel};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

use crate::config::AppConfig;
use crate::data::labels::SEGMENT_COL;
use crate::data::loader::{self, LabeledTables, SHOPSIZE_COL};
use crate::gui::charts::{ChartPlotter, ProductChartData};
use crate::gui::control_panel::{ControlPanel, ControlPanelAction, DashboardView};
use crate::gui::table_view::TableView;
use crate::views::filter;
use crate::views::{ProductView, ProductViewOutput, ShopView, ShopViewOutput};

/// Loading result from the background thread.
enum LoadResult {
    Complete(Box<LabeledTables>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    tables: Option<Arc<LabeledTables>>,
    control_panel: ControlPanel,

    product_output: Option<ProductViewOutput>,
    product_charts: ProductChartData,
    shop_output: Option<ShopViewOutput>,

    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        let mut control_panel = ControlPanel::new();
        control_panel.product_csv = Some(config.product_csv.clone());
        control_panel.shop_csv = Some(config.shop_csv.clone());

        let mut app = Self {
            config,
            tables: None,
            control_panel,
            product_output: None,
            product_charts: ProductChartData::default(),
            shop_output: None,
            load_rx: None,
            is_loading: false,
        };
        app.start_load();
        app
    }

    /// Load both CSV tables in a background thread.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }
        self.is_loading = true;
        self.control_panel.status = "Loading CSV tables...".to_string();

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let product_path = self.config.product_csv.clone();
        let shop_path = self.config.shop_csv.clone();
        let alignment = self.config.shop_alignment;

        thread::spawn(move || {
            match loader::load_and_label(&product_path, &shop_path, alignment) {
                Ok(tables) => {
                    let _ = tx.send(LoadResult::Complete(Box::new(tables)));
                }
                Err(e) => {
                    // Report the whole chain, not just the outermost message.
                    let e = anyhow::Error::new(e);
                    log::error!("load failed: {e:#}");
                    let _ = tx.send(LoadResult::Error(format!("{e:#}")));
                }
            }
        });
    }

    /// Check for loading results.
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete(tables) => {
                        self.control_panel.status = format!(
                            "Loaded {} products, {} shops",
                            tables.products.height(),
                            tables.shops.height()
                        );
                        self.control_panel.update_options(
                            filter::filter_options(&tables.products, "BRAND"),
                            filter::filter_options(&tables.products, SEGMENT_COL),
                            filter::filter_options(&tables.shops, SHOPSIZE_COL),
                        );
                        self.tables = Some(Arc::new(*tables));
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.recompute_views();
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.status = format!("Error: {error}");
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// One full recompute of the active view (a filter change triggers this).
    fn recompute_views(&mut self) {
        let Some(tables) = self.tables.clone() else {
            return;
        };
        let settings = self.control_panel.settings.clone();

        match settings.view {
            DashboardView::Product => {
                match ProductView::build(&tables.products, &settings.brand, &settings.segment) {
                    Ok(output) => {
                        self.product_charts = ProductChartData::from_rows(&output.rows);
                        self.product_output = Some(output);
                    }
                    Err(e) => {
                        self.control_panel.status =
                            format!("Error: {:#}", anyhow::Error::new(e));
                    }
                }
            }
            DashboardView::Shop => {
                match ShopView::build(
                    &tables.shops,
                    &tables.products,
                    &settings.category,
                    self.config.shop_row_limit,
                ) {
                    Ok(output) => {
                        self.shop_output = Some(output);
                    }
                    Err(e) => {
                        self.control_panel.status =
                            format!("Error: {:#}", anyhow::Error::new(e));
                    }
                }
            }
        }
    }

    fn browse_csv(&mut self) -> Option<PathBuf> {
        if self.is_loading {
            return None;
        }
        rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
    }

    fn show_product_view(&self, ui: &mut egui::Ui) {
        let Some(output) = &self.product_output else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };
        let settings = &self.control_panel.settings;

        ui.label(
            RichText::new("📦 Product Dashboard - Market Segments")
                .size(18.0)
                .strong(),
        );
        ui.add_space(8.0);

        ui.label(RichText::new(format!(
            "Products (Brand: {}, Segment: {}) — {} rows",
            settings.brand,
            settings.segment,
            output.rows.height()
        )));
        ui.add_space(4.0);
        TableView::show(ui, &output.rows, "product_rows", 260.0);

        ui.add_space(12.0);
        ui.columns(2, |columns| {
            columns[0].label(RichText::new("Price Distribution by Segment").strong());
            ChartPlotter::draw_price_boxplot(&mut columns[0], &self.product_charts);

            columns[1].label(RichText::new("RAM vs ROM by Segment").strong());
            ChartPlotter::draw_ram_rom_scatter(&mut columns[1], &self.product_charts);
        });

        ui.add_space(12.0);
        ui.label(RichText::new("Segment Summary (full table)").strong());
        ui.add_space(4.0);
        TableView::segment_summary_grid(ui, &output.summary);
    }

    fn show_shop_view(&self, ui: &mut egui::Ui) {
        let Some(output) = &self.shop_output else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };
        let settings = &self.control_panel.settings;

        ui.label(
            RichText::new("🏬 Shop Dashboard - Predicted Category")
                .size(18.0)
                .strong(),
        );
        ui.add_space(8.0);

        ui.label(RichText::new(format!(
            "Shops (Category: {}) — {} rows shown",
            settings.category,
            output.rows.height()
        )));
        ui.add_space(4.0);
        TableView::show(ui, &output.rows, "shop_rows", 260.0);

        ui.add_space(12.0);
        ui.label(RichText::new("Average Product Metrics per Shop").strong());
        ui.add_space(4.0);
        TableView::shop_summary_grid(ui, &output.summary);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseProductCsv => {
                            if let Some(path) = self.browse_csv() {
                                self.config.product_csv = path.clone();
                                self.control_panel.product_csv = Some(path);
                                self.config.save();
                                self.start_load();
                            }
                        }
                        ControlPanelAction::BrowseShopCsv => {
                            if let Some(path) = self.browse_csv() {
                                self.config.shop_csv = path.clone();
                                self.control_panel.shop_csv = Some(path);
                                self.config.save();
                                self.start_load();
                            }
                        }
                        ControlPanelAction::Reload => self.start_load(),
                        ControlPanelAction::ViewChanged
                        | ControlPanelAction::FiltersChanged => self.recompute_views(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| match self.control_panel.settings.view {
                DashboardView::Product => self.show_product_view(ui),
                DashboardView::Shop => self.show_shop_view(ui),
            });
        });
    }
}
