//! Collaborators that log and remember every call
//!
//! Stands in for a real window system and renderer in the preview host.

use tracing::info;

use super::collaborators::{
    Collaborators, FeatureModules, FrameLimiter, FrameLimits, RenderResources, WindowController,
    WindowPlacement,
};
use crate::config::schema::Feature;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Resize { width: i32, height: i32 },
    Reposition(WindowPlacement),
    Fullscreen(bool),
    CursorLocked(bool),
    FrameLimits(FrameLimits),
    ShaderPreset(String),
    RenderTarget { stretch_horizontal: bool, stretch_vertical: bool },
    FontMetrics(f32),
    MiniMapSize { width: i32, height: i32 },
    Feature(Feature, bool),
}

#[derive(Debug, Default)]
pub struct RecordingWindow {
    pub calls: Vec<Call>,
}

impl WindowController for RecordingWindow {
    fn resize(&mut self, width: i32, height: i32) {
        info!(width, height, "Resize window");
        self.calls.push(Call::Resize { width, height });
    }

    fn reposition(&mut self, placement: &WindowPlacement) {
        info!(
            x = placement.x,
            y = placement.y,
            centered = placement.centered,
            hide_title_bar = placement.hide_title_bar,
            "Reposition window"
        );
        self.calls.push(Call::Reposition(*placement));
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        info!(fullscreen, "Toggle fullscreen");
        self.calls.push(Call::Fullscreen(fullscreen));
    }

    fn set_cursor_locked(&mut self, locked: bool) {
        info!(locked, "Apply cursor lock");
        self.calls.push(Call::CursorLocked(locked));
    }
}

#[derive(Debug, Default)]
pub struct RecordingLimiter {
    pub calls: Vec<Call>,
}

impl FrameLimiter for RecordingLimiter {
    fn configure(&mut self, limits: &FrameLimits) {
        info!(vsync = limits.vsync, foreground = ?limits.foreground, background = ?limits.background, "Configure frame limiter");
        self.calls.push(Call::FrameLimits(*limits));
    }
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
}

impl RenderResources for RecordingRenderer {
    fn load_shader_preset(&mut self, preset: &str) {
        info!(preset, "Load shader preset");
        self.calls.push(Call::ShaderPreset(preset.to_string()));
    }

    fn resize_render_target(&mut self, stretch_horizontal: bool, stretch_vertical: bool) {
        info!(stretch_horizontal, stretch_vertical, "Resize render target");
        self.calls.push(Call::RenderTarget {
            stretch_horizontal,
            stretch_vertical,
        });
    }

    fn recompute_font_metrics(&mut self, scale: f32) {
        info!(scale, "Recompute font metrics");
        self.calls.push(Call::FontMetrics(scale));
    }

    fn resize_mini_map(&mut self, width: i32, height: i32) {
        info!(width, height, "Resize mini map");
        self.calls.push(Call::MiniMapSize { width, height });
    }
}

#[derive(Debug, Default)]
pub struct RecordingFeatures {
    pub calls: Vec<Call>,
}

impl FeatureModules for RecordingFeatures {
    fn set_enabled(&mut self, feature: Feature, enabled: bool) {
        info!(feature = ?feature, enabled, "Toggle feature module");
        self.calls.push(Call::Feature(feature, enabled));
    }
}

/// One recorder per collaborator role
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub window: RecordingWindow,
    pub limiter: RecordingLimiter,
    pub renderer: RecordingRenderer,
    pub features: RecordingFeatures,
}

impl RecordingHost {
    pub fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            window: &mut self.window,
            limiter: &mut self.limiter,
            renderer: &mut self.renderer,
            features: &mut self.features,
        }
    }

    /// All recorded calls, grouped by collaborator
    pub fn calls(&self) -> Vec<Call> {
        self.window
            .calls
            .iter()
            .chain(&self.limiter.calls)
            .chain(&self.renderer.calls)
            .chain(&self.features.calls)
            .cloned()
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.window.calls.len()
            + self.limiter.calls.len()
            + self.renderer.calls.len()
            + self.features.calls.len()
    }

    pub fn clear(&mut self) {
        self.window.calls.clear();
        self.limiter.calls.clear();
        self.renderer.calls.clear();
        self.features.calls.clear();
    }
}
