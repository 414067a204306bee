//! Application Configuration
//! Paths to the two CSV tables and dashboard tunables, persisted as JSON
//! next to the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::ShopAlignment;

pub const CONFIG_FILE: &str = "segdash.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-product phone listings.
    pub product_csv: PathBuf,
    /// Per-shop aggregates.
    pub shop_csv: PathBuf,
    /// How shop names are reconciled against the product table.
    pub shop_alignment: ShopAlignment,
    /// Display cap for the shop table.
    pub shop_row_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            product_csv: PathBuf::from("dataDashboardPhabletSample.csv"),
            shop_csv: PathBuf::from("dataDashboardTokoAggregated.csv"),
            shop_alignment: ShopAlignment::default(),
            shop_row_limit: 50,
        }
    }
}

impl AppConfig {
    /// Load from `segdash.json` in the working directory; fall back to
    /// defaults when the file is absent or malformed.
    pub fn load() -> AppConfig {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> AppConfig {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("ignoring malformed config {}: {e}", path.display());
                    AppConfig::default()
                }
            },
            Err(_) => AppConfig::default(),
        }
    }

    /// Persist to `segdash.json` so re-pointed CSV paths survive a restart.
    /// A write failure is logged, never surfaced to the dashboard.
    pub fn save(&self) {
        self.save_to(Path::new(CONFIG_FILE));
    }

    pub fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(text) => {
                if let Err(e) = std::fs::write(path, text) {
                    log::warn!("failed to write config {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("failed to serialize config: {e}"),
        }
    }
}
