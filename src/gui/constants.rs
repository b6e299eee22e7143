//! GUI-specific constants for layout, colors and the effect log

use egui;

/// Host window dimensions
pub const WINDOW_WIDTH: f32 = 640.0;
pub const WINDOW_HEIGHT: f32 = 720.0;
pub const WINDOW_MIN_WIDTH: f32 = 480.0;
pub const WINDOW_MIN_HEIGHT: f32 = 480.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Width of numeric inputs next to their labels
pub const INPUT_WIDTH: f32 = 70.0;

/// Status colors
pub const STATUS_PENDING: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);
pub const STATUS_SAVED: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);

/// Number of delivered side effects kept on screen
pub const EFFECT_LOG_LEN: usize = 12;
