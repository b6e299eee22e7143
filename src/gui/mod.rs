//! Preview host: an egui window that embeds the settings panel

pub mod components;
pub mod constants;
pub mod manager;

pub use manager::run_gui;
