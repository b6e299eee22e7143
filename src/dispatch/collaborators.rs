//! Host-side collaborators that side effects are delivered to

use crate::config::live::ScreenSettings;
use crate::config::schema::Feature;

/// Window geometry the controller should apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlacement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub centered: bool,
    pub hide_title_bar: bool,
}

impl From<&ScreenSettings> for WindowPlacement {
    fn from(screen: &ScreenSettings) -> Self {
        Self {
            x: screen.window_posx,
            y: screen.window_posy,
            width: screen.window_width,
            height: screen.window_height,
            centered: screen.centered_window,
            hide_title_bar: screen.hide_title_bar,
        }
    }
}

/// Frame pacing; `None` means uncapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    pub vsync: bool,
    pub foreground: Option<i32>,
    pub background: Option<i32>,
}

impl From<&ScreenSettings> for FrameLimits {
    fn from(screen: &ScreenSettings) -> Self {
        Self {
            vsync: screen.vsync,
            // vsync already paces the focused window
            foreground: (!screen.vsync && screen.foreground_fps).then_some(screen.foreground_fps_value),
            background: screen.background_fps.then_some(screen.background_fps_value),
        }
    }
}

pub trait WindowController {
    fn resize(&mut self, width: i32, height: i32);
    fn reposition(&mut self, placement: &WindowPlacement);
    fn set_fullscreen(&mut self, fullscreen: bool);
    fn set_cursor_locked(&mut self, locked: bool);
}

pub trait FrameLimiter {
    fn configure(&mut self, limits: &FrameLimits);
}

/// Renderer resources derived from settings
pub trait RenderResources {
    fn load_shader_preset(&mut self, preset: &str);
    fn resize_render_target(&mut self, stretch_horizontal: bool, stretch_vertical: bool);
    fn recompute_font_metrics(&mut self, scale: f32);
    fn resize_mini_map(&mut self, width: i32, height: i32);
}

pub trait FeatureModules {
    fn set_enabled(&mut self, feature: Feature, enabled: bool);
}

/// Everything the reconciliation point may call into
pub struct Collaborators<'a> {
    pub window: &'a mut dyn WindowController,
    pub limiter: &'a mut dyn FrameLimiter,
    pub renderer: &'a mut dyn RenderResources,
    pub features: &'a mut dyn FeatureModules,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::live::LiveState;

    #[test]
    fn test_frame_limits_vsync_disables_foreground_cap() {
        let mut screen = LiveState::default().screen;
        screen.foreground_fps = true;
        screen.vsync = true;
        assert_eq!(FrameLimits::from(&screen).foreground, None);

        screen.vsync = false;
        assert_eq!(FrameLimits::from(&screen).foreground, Some(60));
    }

    #[test]
    fn test_frame_limits_background_cap() {
        let mut screen = LiveState::default().screen;
        assert_eq!(FrameLimits::from(&screen).background, Some(25));
        screen.background_fps = false;
        assert_eq!(FrameLimits::from(&screen).background, None);
    }
}
