//! GUI module - dashboard shell

mod app;
mod charts;
mod control_panel;
mod table_view;

pub use app::DashboardApp;
