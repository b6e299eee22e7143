//! Settings panel tabs

pub mod immediate_settings;
pub mod screen_settings;
