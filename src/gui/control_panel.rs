//! Control Panel Widget
//! Left side panel with the view selector and filter controls.

use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

use crate::views::filter::ALL_OPTION;

/// Which dashboard is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    Product,
    Shop,
}

/// Current view and filter selections.
#[derive(Clone)]
pub struct FilterSettings {
    pub view: DashboardView,
    pub brand: String,
    pub segment: String,
    pub category: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            view: DashboardView::default(),
            brand: ALL_OPTION.to_string(),
            segment: ALL_OPTION.to_string(),
            category: ALL_OPTION.to_string(),
        }
    }
}

/// Left side control panel with data sources, view selector and filters.
pub struct ControlPanel {
    pub settings: FilterSettings,
    pub product_csv: Option<PathBuf>,
    pub shop_csv: Option<PathBuf>,
    pub brand_options: Vec<String>,
    pub segment_options: Vec<String>,
    pub category_options: Vec<String>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: FilterSettings::default(),
            product_csv: None,
            shop_csv: None,
            brand_options: Vec::new(),
            segment_options: Vec::new(),
            category_options: Vec::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the filter option lists after a load. Selections that no
    /// longer exist snap back to the sentinel.
    pub fn update_options(
        &mut self,
        brands: Vec<String>,
        segments: Vec<String>,
        categories: Vec<String>,
    ) {
        if !brands.contains(&self.settings.brand) {
            self.settings.brand = ALL_OPTION.to_string();
        }
        if !segments.contains(&self.settings.segment) {
            self.settings.segment = ALL_OPTION.to_string();
        }
        if !categories.contains(&self.settings.category) {
            self.settings.category = ALL_OPTION.to_string();
        }
        self.brand_options = brands;
        self.segment_options = segments;
        self.category_options = categories;
    }

    /// Draw the control panel.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Segdash")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Phone market segmentation")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Sources =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        if let Some(a) = Self::csv_row(ui, "Products:", self.product_csv.as_ref(), "browse_products")
        {
            action = a;
        }
        ui.add_space(4.0);
        if let Some(a) = Self::csv_row(ui, "Shops:", self.shop_csv.as_ref(), "browse_shops") {
            action = a;
        }

        ui.add_space(8.0);
        if ui.button("⟳ Reload").clicked() {
            action = ControlPanelAction::Reload;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== View Selector =====
        ui.label(RichText::new("🗂 Dashboard View").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if ui
                .radio_value(
                    &mut self.settings.view,
                    DashboardView::Product,
                    "Products (Market Segments)",
                )
                .changed()
            {
                action = ControlPanelAction::ViewChanged;
            }
        });
        ui.horizontal(|ui| {
            if ui
                .radio_value(
                    &mut self.settings.view,
                    DashboardView::Shop,
                    "Shops (Predicted Category)",
                )
                .changed()
            {
                action = ControlPanelAction::ViewChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        match self.settings.view {
            DashboardView::Product => {
                if Self::filter_combo(
                    ui,
                    "Brand:",
                    "brand_filter",
                    &mut self.settings.brand,
                    &self.brand_options,
                ) {
                    action = ControlPanelAction::FiltersChanged;
                }
                ui.add_space(5.0);
                if Self::filter_combo(
                    ui,
                    "Market Segment:",
                    "segment_filter",
                    &mut self.settings.segment,
                    &self.segment_options,
                ) {
                    action = ControlPanelAction::FiltersChanged;
                }
            }
            DashboardView::Shop => {
                if Self::filter_combo(
                    ui,
                    "Shop Category:",
                    "category_filter",
                    &mut self.settings.category,
                    &self.category_options,
                ) {
                    action = ControlPanelAction::FiltersChanged;
                }
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn csv_row(
        ui: &mut egui::Ui,
        label: &str,
        path: Option<&PathBuf>,
        id: &str,
    ) -> Option<ControlPanelAction> {
        let mut action = None;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).size(12.0));
                    let path_text = path
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = Some(match id {
                                "browse_products" => ControlPanelAction::BrowseProductCsv,
                                _ => ControlPanelAction::BrowseShopCsv,
                            });
                        }
                    });
                });
            });
        action
    }

    fn filter_combo(
        ui: &mut egui::Ui,
        label: &str,
        id: &str,
        selected: &mut String,
        options: &[String],
    ) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(150.0)
                .selected_text(selected.clone())
                .show_ui(ui, |ui| {
                    for option in options {
                        if ui
                            .selectable_label(*selected == *option, option)
                            .clicked()
                        {
                            *selected = option.clone();
                            changed = true;
                        }
                    }
                });
        });
        changed
    }
}

/// Actions triggered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    BrowseProductCsv,
    BrowseShopCsv,
    Reload,
    ViewChanged,
    FiltersChanged,
}
