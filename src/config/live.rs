//! Live settings
//!
//! The authoritative in-memory values the rest of the host reads. Every write
//! goes through [`LiveState::set`], which clamps into the declared range.

use tracing::{debug, warn};

use super::schema::{Condition, DEPENDENCIES, Environment, SettingId};
use super::store::ConfigStore;
use super::value::SettingValue;

/// Window geometry, cursor and frame pacing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenSettings {
    pub fullscreen: bool,
    pub maximize: bool,
    pub window_width: i32,
    pub window_height: i32,
    pub hide_title_bar: bool,
    pub centered_window: bool,
    pub window_posx: i32,
    pub window_posy: i32,
    pub unlock_cursor: bool,
    pub auto_minimize: bool,
    pub dark_mode: bool,
    pub vsync: bool,
    pub foreground_fps: bool,
    pub foreground_fps_value: i32,
    pub background_fps: bool,
    pub background_fps_value: i32,
}

/// Post-processing and presentation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphicSettings {
    pub shader_preset: String,
    pub lut: i32,
    pub sharpen: bool,
    pub sharpen_strength: f32,
    pub sharpen_clamp: f32,
    pub sharpen_radius: f32,
    pub fxaa: bool,
    pub fxaa_preset: i32,
    pub bloom: bool,
    pub bloom_exposure: f32,
    pub bloom_gamma: f32,
    pub stretched_horizontal: bool,
    pub stretched_vertical: bool,
}

/// Optional gameplay features
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSettings {
    pub hd_cursor: bool,
    pub hd_text: bool,
    pub hd_text_scale: f32,
    pub mini_map: bool,
    pub mini_map_text_over: bool,
    pub mini_map_width: i32,
    pub mini_map_height: i32,
    pub motion_prediction: bool,
    pub skip_intro: bool,
    pub no_pickup: bool,
    pub show_item_quantity: bool,
    pub show_monster_res: bool,
    pub show_fps: bool,
}

/// Settings that only take effect on the next start
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OtherSettings {
    pub gl_ver_major: i32,
    pub gl_ver_minor: i32,
    pub use_compute_shader: bool,
    pub frame_latency: i32,
    pub load_dlls_early: String,
    pub load_dlls_late: String,
}

/// Current authoritative settings values
#[derive(Debug, Clone, PartialEq)]
pub struct LiveState {
    pub screen: ScreenSettings,
    pub graphic: GraphicSettings,
    pub feature: FeatureSettings,
    pub other: OtherSettings,
}

impl LiveState {
    /// Declared defaults, clamped for `env`
    pub fn defaults(env: &Environment) -> Self {
        let mut state = Self {
            screen: ScreenSettings::default(),
            graphic: GraphicSettings::default(),
            feature: FeatureSettings::default(),
            other: OtherSettings::default(),
        };
        for id in SettingId::all() {
            state.set(id, id.spec().default_value(env), env);
        }
        state
    }

    /// Read every setting from `store`, then enforce dependency rules
    pub fn load(store: &ConfigStore, env: &Environment) -> Self {
        let mut state = Self::defaults(env);
        for id in SettingId::all() {
            state.set(id, store.read(id.spec(), env), env);
        }
        state.enforce_dependencies(env);
        debug!(path = %store.path().display(), "Loaded live settings");
        state
    }

    pub fn get(&self, id: SettingId) -> SettingValue {
        use SettingId::*;
        use SettingValue::{Bool, Float, Int, Text};
        let s = &self.screen;
        let g = &self.graphic;
        let f = &self.feature;
        let o = &self.other;
        match id {
            Fullscreen => Bool(s.fullscreen),
            Maximize => Bool(s.maximize),
            WindowWidth => Int(s.window_width),
            WindowHeight => Int(s.window_height),
            HideTitleBar => Bool(s.hide_title_bar),
            CenteredWindow => Bool(s.centered_window),
            WindowPosX => Int(s.window_posx),
            WindowPosY => Int(s.window_posy),
            UnlockCursor => Bool(s.unlock_cursor),
            AutoMinimize => Bool(s.auto_minimize),
            DarkMode => Bool(s.dark_mode),
            Vsync => Bool(s.vsync),
            ForegroundFps => Bool(s.foreground_fps),
            ForegroundFpsValue => Int(s.foreground_fps_value),
            BackgroundFps => Bool(s.background_fps),
            BackgroundFpsValue => Int(s.background_fps_value),
            ShaderPreset => Text(g.shader_preset.clone()),
            Lut => Int(g.lut),
            Sharpen => Bool(g.sharpen),
            SharpenStrength => Float(g.sharpen_strength),
            SharpenClamp => Float(g.sharpen_clamp),
            SharpenRadius => Float(g.sharpen_radius),
            Fxaa => Bool(g.fxaa),
            FxaaPreset => Int(g.fxaa_preset),
            Bloom => Bool(g.bloom),
            BloomExposure => Float(g.bloom_exposure),
            BloomGamma => Float(g.bloom_gamma),
            StretchedHorizontal => Bool(g.stretched_horizontal),
            StretchedVertical => Bool(g.stretched_vertical),
            HdCursor => Bool(f.hd_cursor),
            HdText => Bool(f.hd_text),
            HdTextScale => Float(f.hd_text_scale),
            MiniMap => Bool(f.mini_map),
            MiniMapTextOver => Bool(f.mini_map_text_over),
            MiniMapWidth => Int(f.mini_map_width),
            MiniMapHeight => Int(f.mini_map_height),
            MotionPrediction => Bool(f.motion_prediction),
            SkipIntro => Bool(f.skip_intro),
            NoPickup => Bool(f.no_pickup),
            ShowItemQuantity => Bool(f.show_item_quantity),
            ShowMonsterRes => Bool(f.show_monster_res),
            ShowFps => Bool(f.show_fps),
            GlVerMajor => Int(o.gl_ver_major),
            GlVerMinor => Int(o.gl_ver_minor),
            UseComputeShader => Bool(o.use_compute_shader),
            FrameLatency => Int(o.frame_latency),
            LoadDllsEarly => Text(o.load_dlls_early.clone()),
            LoadDllsLate => Text(o.load_dlls_late.clone()),
        }
    }

    /// Clamp `value` into the setting's range and store it.
    ///
    /// Returns whether the stored value changed. A value of the wrong kind is
    /// logged and dropped.
    pub fn set(&mut self, id: SettingId, value: SettingValue, env: &Environment) -> bool {
        use SettingId::*;
        use SettingValue::{Bool, Float, Int, Text};
        let spec = id.spec();
        let value = value.clamped(spec.bounds(env));
        let s = &mut self.screen;
        let g = &mut self.graphic;
        let f = &mut self.feature;
        let o = &mut self.other;
        match (id, value) {
            (Fullscreen, Bool(v)) => put(&mut s.fullscreen, v),
            (Maximize, Bool(v)) => put(&mut s.maximize, v),
            (WindowWidth, Int(v)) => put(&mut s.window_width, v),
            (WindowHeight, Int(v)) => put(&mut s.window_height, v),
            (HideTitleBar, Bool(v)) => put(&mut s.hide_title_bar, v),
            (CenteredWindow, Bool(v)) => put(&mut s.centered_window, v),
            (WindowPosX, Int(v)) => put(&mut s.window_posx, v),
            (WindowPosY, Int(v)) => put(&mut s.window_posy, v),
            (UnlockCursor, Bool(v)) => put(&mut s.unlock_cursor, v),
            (AutoMinimize, Bool(v)) => put(&mut s.auto_minimize, v),
            (DarkMode, Bool(v)) => put(&mut s.dark_mode, v),
            (Vsync, Bool(v)) => put(&mut s.vsync, v),
            (ForegroundFps, Bool(v)) => put(&mut s.foreground_fps, v),
            (ForegroundFpsValue, Int(v)) => put(&mut s.foreground_fps_value, v),
            (BackgroundFps, Bool(v)) => put(&mut s.background_fps, v),
            (BackgroundFpsValue, Int(v)) => put(&mut s.background_fps_value, v),
            (ShaderPreset, Text(v)) => put(&mut g.shader_preset, v),
            (Lut, Int(v)) => put(&mut g.lut, v),
            (Sharpen, Bool(v)) => put(&mut g.sharpen, v),
            (SharpenStrength, Float(v)) => put(&mut g.sharpen_strength, v),
            (SharpenClamp, Float(v)) => put(&mut g.sharpen_clamp, v),
            (SharpenRadius, Float(v)) => put(&mut g.sharpen_radius, v),
            (Fxaa, Bool(v)) => put(&mut g.fxaa, v),
            (FxaaPreset, Int(v)) => put(&mut g.fxaa_preset, v),
            (Bloom, Bool(v)) => put(&mut g.bloom, v),
            (BloomExposure, Float(v)) => put(&mut g.bloom_exposure, v),
            (BloomGamma, Float(v)) => put(&mut g.bloom_gamma, v),
            (StretchedHorizontal, Bool(v)) => put(&mut g.stretched_horizontal, v),
            (StretchedVertical, Bool(v)) => put(&mut g.stretched_vertical, v),
            (HdCursor, Bool(v)) => put(&mut f.hd_cursor, v),
            (HdText, Bool(v)) => put(&mut f.hd_text, v),
            (HdTextScale, Float(v)) => put(&mut f.hd_text_scale, v),
            (MiniMap, Bool(v)) => put(&mut f.mini_map, v),
            (MiniMapTextOver, Bool(v)) => put(&mut f.mini_map_text_over, v),
            (MiniMapWidth, Int(v)) => put(&mut f.mini_map_width, v),
            (MiniMapHeight, Int(v)) => put(&mut f.mini_map_height, v),
            (MotionPrediction, Bool(v)) => put(&mut f.motion_prediction, v),
            (SkipIntro, Bool(v)) => put(&mut f.skip_intro, v),
            (NoPickup, Bool(v)) => put(&mut f.no_pickup, v),
            (ShowItemQuantity, Bool(v)) => put(&mut f.show_item_quantity, v),
            (ShowMonsterRes, Bool(v)) => put(&mut f.show_monster_res, v),
            (ShowFps, Bool(v)) => put(&mut f.show_fps, v),
            (GlVerMajor, Int(v)) => put(&mut o.gl_ver_major, v),
            (GlVerMinor, Int(v)) => put(&mut o.gl_ver_minor, v),
            (UseComputeShader, Bool(v)) => put(&mut o.use_compute_shader, v),
            (FrameLatency, Int(v)) => put(&mut o.frame_latency, v),
            (LoadDllsEarly, Text(v)) => put(&mut o.load_dlls_early, v),
            (LoadDllsLate, Text(v)) => put(&mut o.load_dlls_late, v),
            (id, value) => {
                warn!(
                    key = id.spec().key,
                    expected = %spec.kind(),
                    got = %value.kind(),
                    "Ignoring value of the wrong type"
                );
                false
            }
        }
    }

    /// Apply every dependency rule, returning the settings that were forced
    pub fn enforce_dependencies(&mut self, env: &Environment) -> Vec<SettingId> {
        let mut forced = Vec::new();
        for rule in DEPENDENCIES {
            let holds = match rule.when {
                Condition::IntEquals(other, expected) => self.get(other).as_int() == Some(expected),
                Condition::NotGlide => !env.glide,
                Condition::BuiltinHdText => env.builtin_hd_text,
            };
            if holds && self.set(rule.target, rule.forced.to_value(), env) {
                debug!(key = rule.target.spec().key, "Setting forced by dependency rule");
                forced.push(rule.target);
            }
        }
        forced
    }
}

impl Default for LiveState {
    fn default() -> Self {
        Self::defaults(&Environment::default())
    }
}

fn put<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DesktopBounds;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_registry() {
        let live = LiveState::default();
        assert_eq!(live.screen.window_width, 1068);
        assert_eq!(live.screen.window_height, 600);
        assert!(live.screen.vsync);
        assert!(live.screen.centered_window);
        assert_eq!(live.graphic.sharpen_clamp, 0.035);
        assert_eq!(live.feature.mini_map_width, 160);
        assert_eq!(live.other.gl_ver_major, 4);
        assert_eq!(live.other.gl_ver_minor, 6);
    }

    #[test]
    fn test_get_and_set_agree_for_every_id() {
        let env = Environment::default();
        let mut live = LiveState::default();
        for id in SettingId::all() {
            let value = live.get(id);
            assert!(!live.set(id, value.clone(), &env), "{} changed on identical set", id.spec().key);
            assert_eq!(live.get(id), value);
        }
    }

    #[test]
    fn test_set_clamps_and_reports_change() {
        let env = Environment::default();
        let mut live = LiveState::default();
        assert!(live.set(SettingId::WindowWidth, SettingValue::Int(100), &env));
        assert_eq!(live.screen.window_width, 800);
        assert!(live.set(SettingId::BloomGamma, SettingValue::Float(7.0), &env));
        assert_eq!(live.graphic.bloom_gamma, 2.0);
    }

    #[test]
    fn test_set_wrong_kind_is_ignored() {
        let env = Environment::default();
        let mut live = LiveState::default();
        assert!(!live.set(SettingId::Vsync, SettingValue::Int(0), &env));
        assert!(live.screen.vsync);
    }

    #[test]
    fn test_defaults_clamped_to_small_desktop() {
        let env = Environment {
            desktop: DesktopBounds { x: 0, y: 0, width: 1024, height: 500 },
            ..Environment::default()
        };
        let live = LiveState::defaults(&env);
        assert_eq!(live.screen.window_width, 1024);
        // Inverted range [600, 500] resolves to its minimum
        assert_eq!(live.screen.window_height, 600);
    }

    #[test]
    fn test_gl_major_three_forces_minor_three() {
        let env = Environment::default();
        let mut live = LiveState::default();
        live.set(SettingId::GlVerMajor, SettingValue::Int(3), &env);
        assert_eq!(live.enforce_dependencies(&env), vec![SettingId::GlVerMinor]);
        assert_eq!(live.other.gl_ver_minor, 3);
    }

    #[test]
    fn test_mini_map_off_outside_glide() {
        let env = Environment { glide: false, ..Environment::default() };
        let mut live = LiveState::default();
        live.set(SettingId::MiniMap, SettingValue::Bool(true), &env);
        live.enforce_dependencies(&env);
        assert!(!live.feature.mini_map);
    }

    #[test]
    fn test_builtin_hd_text_pins_scale() {
        let env = Environment { builtin_hd_text: true, ..Environment::default() };
        let mut live = LiveState::default();
        live.set(SettingId::HdTextScale, SettingValue::Float(1.2), &env);
        live.enforce_dependencies(&env);
        assert_eq!(live.feature.hd_text_scale, 1.0);
    }

    #[test]
    fn test_dependencies_idle_when_conditions_fail() {
        let env = Environment::default();
        let mut live = LiveState::default();
        live.set(SettingId::HdTextScale, SettingValue::Float(1.2), &env);
        assert!(live.enforce_dependencies(&env).is_empty());
        assert_eq!(live.feature.hd_text_scale, 1.2);
    }
}
