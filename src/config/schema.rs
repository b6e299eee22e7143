//! Option registry
//!
//! Declares every setting once: where it lives in the document, its type and
//! default, its numeric range (fixed or computed from the environment), how
//! edits are committed, and which side effect a change triggers.

use super::value::{Bounds, SettingValue, ValueKind};
use crate::constants;

/// Document sections in the order they are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Screen,
    Graphic,
    Feature,
    Other,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Screen,
        Section::Graphic,
        Section::Feature,
        Section::Other,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Section::Screen => "Screen",
            Section::Graphic => "Graphic",
            Section::Feature => "Feature",
            Section::Other => "Other",
        }
    }

    /// Settings of this section in document order
    pub fn specs(self) -> impl Iterator<Item = &'static SettingSpec> {
        SPECS.iter().filter(move |spec| spec.section == self)
    }
}

/// How an edit reaches live state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStrategy {
    /// Applied and persisted the moment the value changes
    Immediate,
    /// Staged while the panel is open, applied as one batch on save
    Deferred,
}

/// Feature modules that can be switched at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    HdText,
    MiniMap,
    MotionPrediction,
}

/// Work a setting change triggers outside the settings subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideEffect {
    ToggleFullscreen,
    ResizeWindow,
    RepositionWindow,
    ApplyCursorLock,
    ConfigureFrameLimiter,
    LoadShaderPreset,
    ResizeRenderTarget,
    RecomputeFontMetrics,
    ResizeMiniMap,
    ToggleFeature(Feature),
}

/// Desktop rectangle reported by the window system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for DesktopBounds {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: constants::desktop::FALLBACK_WIDTH,
            height: constants::desktop::FALLBACK_HEIGHT,
        }
    }
}

/// Facts about the host that ranges and dependency rules depend on
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub desktop: DesktopBounds,
    /// Renderer runs in glide mode (mini-map and color grading need it)
    pub glide: bool,
    /// Host ships its own HD text; the text scale is then fixed
    pub builtin_hd_text: bool,
    /// An external frame-rate mod owns frame pacing
    pub external_fps_mod: bool,
    /// Number of color grading tables, including the default at 0
    pub lut_count: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            desktop: DesktopBounds::default(),
            glide: true,
            builtin_hd_text: false,
            external_fps_mod: false,
            lut_count: constants::lut::COUNT,
        }
    }
}

/// One end of an integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Fixed(i32),
    DesktopX,
    DesktopY,
    DesktopWidth,
    DesktopHeight,
    LutMax,
}

impl Limit {
    fn resolve(self, env: &Environment) -> i32 {
        match self {
            Limit::Fixed(v) => v,
            Limit::DesktopX => env.desktop.x,
            Limit::DesktopY => env.desktop.y,
            Limit::DesktopWidth => env.desktop.width,
            Limit::DesktopHeight => env.desktop.height,
            Limit::LutMax => i32::try_from(env.lut_count.saturating_sub(1)).unwrap_or(i32::MAX),
        }
    }
}

/// Declared range, possibly computed at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeSpec {
    Int { min: Limit, max: Limit },
    Float { min: f32, max: f32 },
}

impl RangeSpec {
    pub fn resolve(&self, env: &Environment) -> Bounds {
        match *self {
            RangeSpec::Int { min, max } => Bounds::Int {
                min: min.resolve(env),
                max: max.resolve(env),
            },
            RangeSpec::Float { min, max } => Bounds::Float { min, max },
        }
    }
}

const fn int_range(min: i32, max: i32) -> RangeSpec {
    RangeSpec::Int {
        min: Limit::Fixed(min),
        max: Limit::Fixed(max),
    }
}

const fn float_range(min: f32, max: f32) -> RangeSpec {
    RangeSpec::Float { min, max }
}

/// Declared default; `const` counterpart of [`SettingValue`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(&'static str),
}

impl DefaultValue {
    pub fn to_value(self) -> SettingValue {
        match self {
            DefaultValue::Bool(b) => SettingValue::Bool(b),
            DefaultValue::Int(i) => SettingValue::Int(i),
            DefaultValue::Float(f) => SettingValue::Float(f),
            DefaultValue::Text(s) => SettingValue::Text(s.to_string()),
        }
    }

    pub const fn kind(self) -> ValueKind {
        match self {
            DefaultValue::Bool(_) => ValueKind::Bool,
            DefaultValue::Int(_) => ValueKind::Int,
            DefaultValue::Float(_) => ValueKind::Float,
            DefaultValue::Text(_) => ValueKind::Text,
        }
    }
}

/// Every setting the document knows about, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingId {
    // Screen
    Fullscreen,
    Maximize,
    WindowWidth,
    WindowHeight,
    HideTitleBar,
    CenteredWindow,
    WindowPosX,
    WindowPosY,
    UnlockCursor,
    AutoMinimize,
    DarkMode,
    Vsync,
    ForegroundFps,
    ForegroundFpsValue,
    BackgroundFps,
    BackgroundFpsValue,
    // Graphic
    ShaderPreset,
    Lut,
    Sharpen,
    SharpenStrength,
    SharpenClamp,
    SharpenRadius,
    Fxaa,
    FxaaPreset,
    Bloom,
    BloomExposure,
    BloomGamma,
    StretchedHorizontal,
    StretchedVertical,
    // Feature
    HdCursor,
    HdText,
    HdTextScale,
    MiniMap,
    MiniMapTextOver,
    MiniMapWidth,
    MiniMapHeight,
    MotionPrediction,
    SkipIntro,
    NoPickup,
    ShowItemQuantity,
    ShowMonsterRes,
    ShowFps,
    // Other
    GlVerMajor,
    GlVerMinor,
    UseComputeShader,
    FrameLatency,
    LoadDllsEarly,
    LoadDllsLate,
}

impl SettingId {
    pub fn spec(self) -> &'static SettingSpec {
        &SPECS[self as usize]
    }

    pub fn all() -> impl Iterator<Item = SettingId> {
        SPECS.iter().map(|spec| spec.id)
    }

    pub const fn section(self) -> Section {
        use SettingId::*;
        match self {
            Fullscreen | Maximize | WindowWidth | WindowHeight | HideTitleBar | CenteredWindow
            | WindowPosX | WindowPosY | UnlockCursor | AutoMinimize | DarkMode | Vsync
            | ForegroundFps | ForegroundFpsValue | BackgroundFps | BackgroundFpsValue => {
                Section::Screen
            }
            ShaderPreset | Lut | Sharpen | SharpenStrength | SharpenClamp | SharpenRadius
            | Fxaa | FxaaPreset | Bloom | BloomExposure | BloomGamma | StretchedHorizontal
            | StretchedVertical => Section::Graphic,
            HdCursor | HdText | HdTextScale | MiniMap | MiniMapTextOver | MiniMapWidth
            | MiniMapHeight | MotionPrediction | SkipIntro | NoPickup | ShowItemQuantity
            | ShowMonsterRes | ShowFps => Section::Feature,
            GlVerMajor | GlVerMinor | UseComputeShader | FrameLatency | LoadDllsEarly
            | LoadDllsLate => Section::Other,
        }
    }

    /// Whether the host currently allows this setting to be edited
    pub fn available(self, env: &Environment) -> bool {
        use SettingId::*;
        match self {
            Lut | Bloom | BloomExposure | BloomGamma | MiniMap | MiniMapTextOver
            | MiniMapWidth | MiniMapHeight => env.glide,
            ForegroundFps | ForegroundFpsValue | BackgroundFps | BackgroundFpsValue
            | MotionPrediction => !env.external_fps_mod,
            HdTextScale => !env.builtin_hd_text,
            _ => true,
        }
    }
}

/// Static declaration of one setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingSpec {
    pub id: SettingId,
    pub section: Section,
    pub key: &'static str,
    pub label: &'static str,
    pub default: DefaultValue,
    pub range: Option<RangeSpec>,
    pub commit: CommitStrategy,
    pub effect: Option<SideEffect>,
    /// Exposed in the settings panel; file-only settings apply on next start
    pub panel: bool,
    /// Comment block written above the key; empty continues the previous group
    pub doc: &'static [&'static str],
}

impl SettingSpec {
    const fn new(id: SettingId, key: &'static str, label: &'static str, default: DefaultValue) -> Self {
        let section = id.section();
        let (commit, panel) = match section {
            Section::Screen => (CommitStrategy::Deferred, true),
            Section::Graphic | Section::Feature => (CommitStrategy::Immediate, true),
            Section::Other => (CommitStrategy::Immediate, false),
        };
        Self {
            id,
            section,
            key,
            label,
            default,
            range: None,
            commit,
            effect: None,
            panel,
            doc: &[],
        }
    }

    const fn range(mut self, range: RangeSpec) -> Self {
        self.range = Some(range);
        self
    }

    const fn effect(mut self, effect: SideEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    const fn doc(mut self, doc: &'static [&'static str]) -> Self {
        self.doc = doc;
        self
    }

    const fn file_only(mut self) -> Self {
        self.panel = false;
        self
    }

    pub const fn kind(&self) -> ValueKind {
        self.default.kind()
    }

    pub fn bounds(&self, env: &Environment) -> Option<Bounds> {
        self.range.map(|range| range.resolve(env))
    }

    /// Declared default, clamped into the resolved range
    pub fn default_value(&self, env: &Environment) -> SettingValue {
        self.default.to_value().clamped(self.bounds(env))
    }
}

use DefaultValue::{Bool, Float, Int, Text};
use SideEffect::*;

static SPECS: [SettingSpec; 48] = [
    // [Screen]
    SettingSpec::new(SettingId::Fullscreen, "fullscreen", "Fullscreen", Bool(false))
        .effect(ToggleFullscreen)
        .doc(&[
            "; Run in a borderless fullscreen window.",
            "; window_width/window_height are ignored while this is on.",
        ]),
    SettingSpec::new(SettingId::Maximize, "maximize", "Maximize", Bool(false))
        .file_only()
        .doc(&[
            "; Start with a maximized window.",
            "; window_width/window_height are ignored while this is on.",
        ]),
    SettingSpec::new(SettingId::WindowWidth, "window_width", "Window width", Int(1068))
        .range(RangeSpec::Int {
            min: Limit::Fixed(constants::window::MIN_WIDTH),
            max: Limit::DesktopWidth,
        })
        .effect(ResizeWindow)
        .doc(&["; Window size in pixels."]),
    SettingSpec::new(SettingId::WindowHeight, "window_height", "Window height", Int(600))
        .range(RangeSpec::Int {
            min: Limit::Fixed(constants::window::MIN_HEIGHT),
            max: Limit::DesktopHeight,
        })
        .effect(ResizeWindow),
    SettingSpec::new(SettingId::HideTitleBar, "hide_title_bar", "Hide title bar", Bool(false))
        .effect(RepositionWindow)
        .doc(&["; Hide the window title bar."]),
    SettingSpec::new(SettingId::CenteredWindow, "centered_window", "Centered window", Bool(true))
        .effect(RepositionWindow)
        .doc(&[
            "; Center the window on the desktop at launch.",
            "; window_posx/window_posy are ignored while this is on.",
        ]),
    SettingSpec::new(SettingId::WindowPosX, "window_posx", "Window X", Int(0))
        .range(RangeSpec::Int {
            min: Limit::DesktopX,
            max: Limit::DesktopWidth,
        })
        .effect(RepositionWindow)
        .doc(&["; Window position (top-left corner) in desktop coordinates."]),
    SettingSpec::new(SettingId::WindowPosY, "window_posy", "Window Y", Int(0))
        .range(RangeSpec::Int {
            min: Limit::DesktopY,
            max: Limit::DesktopHeight,
        })
        .effect(RepositionWindow),
    SettingSpec::new(SettingId::UnlockCursor, "unlock_cursor", "Unlock cursor", Bool(false))
        .effect(ApplyCursorLock)
        .doc(&["; Let the cursor leave the window."]),
    SettingSpec::new(SettingId::AutoMinimize, "auto_minimize", "Auto minimize", Bool(false))
        .doc(&["; Minimize the fullscreen window when it loses focus."]),
    SettingSpec::new(SettingId::DarkMode, "dark_mode", "Dark mode", Bool(false))
        .doc(&["; Dark window title bar (applied on next start)."]),
    SettingSpec::new(SettingId::Vsync, "vsync", "V-Sync", Bool(true))
        .effect(ConfigureFrameLimiter)
        .doc(&[
            "; Vertical synchronization.",
            "; Frame rate follows the display refresh rate (may add input lag).",
        ]),
    SettingSpec::new(SettingId::ForegroundFps, "foreground_fps", "Max foreground FPS", Bool(false))
        .effect(ConfigureFrameLimiter)
        .doc(&[
            "; Frame rate cap while the window is focused.",
            "; Ignored while vsync is on.",
        ]),
    SettingSpec::new(SettingId::ForegroundFpsValue, "foreground_fps_value", "Foreground FPS", Int(60))
        .range(int_range(25, 240))
        .effect(ConfigureFrameLimiter),
    SettingSpec::new(SettingId::BackgroundFps, "background_fps", "Max background FPS", Bool(true))
        .effect(ConfigureFrameLimiter)
        .doc(&["; Frame rate cap while the window is in the background."]),
    SettingSpec::new(SettingId::BackgroundFpsValue, "background_fps_value", "Background FPS", Int(25))
        .range(int_range(10, 240))
        .effect(ConfigureFrameLimiter),
    // [Graphic]
    SettingSpec::new(SettingId::ShaderPreset, "shader_preset", "Shader preset", Text(""))
        .effect(LoadShaderPreset)
        .doc(&["; Upscale shader preset file (.slangp)."]),
    SettingSpec::new(SettingId::Lut, "lut", "Color grading", Int(0))
        .range(RangeSpec::Int {
            min: Limit::Fixed(0),
            max: Limit::LutMax,
        })
        .doc(&[
            "; Color grading lookup table (glide mode only).",
            "; 0 = game default, 1-{max} = predefined tables.",
        ]),
    SettingSpec::new(SettingId::Sharpen, "sharpen", "Luma sharpen", Bool(false))
        .doc(&["; Luma sharpen."]),
    SettingSpec::new(SettingId::SharpenStrength, "sharpen_strength", "Strength", Float(1.0))
        .range(float_range(0.02, 3.0)),
    SettingSpec::new(SettingId::SharpenClamp, "sharpen_clamp", "Clamp", Float(0.035))
        .range(float_range(0.0, 1.0)),
    SettingSpec::new(SettingId::SharpenRadius, "sharpen_radius", "Radius", Float(1.0))
        .range(float_range(0.0, 6.0)),
    SettingSpec::new(SettingId::Fxaa, "fxaa", "FXAA", Bool(false))
        .doc(&["; Fast approximate anti-aliasing (preset: 0-2)."]),
    SettingSpec::new(SettingId::FxaaPreset, "fxaa_preset", "FXAA preset", Int(1))
        .range(int_range(0, 2)),
    SettingSpec::new(SettingId::Bloom, "bloom", "Bloom", Bool(false))
        .doc(&["; Bloom effect."]),
    SettingSpec::new(SettingId::BloomExposure, "bloom_exposure", "Exposure", Float(1.0))
        .range(float_range(0.5, 3.0)),
    SettingSpec::new(SettingId::BloomGamma, "bloom_gamma", "Gamma", Float(1.0))
        .range(float_range(0.5, 2.0)),
    SettingSpec::new(SettingId::StretchedHorizontal, "stretched_horizontal", "Stretch horizontally", Bool(false))
        .effect(ResizeRenderTarget)
        .doc(&["; Stretch the viewport to the window size."]),
    SettingSpec::new(SettingId::StretchedVertical, "stretched_vertical", "Stretch vertically", Bool(false))
        .effect(ResizeRenderTarget),
    // [Feature]
    SettingSpec::new(SettingId::HdCursor, "hd_cursor", "HD cursor", Bool(true))
        .doc(&["; High resolution cursor in game and menus."]),
    SettingSpec::new(SettingId::HdText, "hd_text", "HD text", Bool(true))
        .effect(ToggleFeature(Feature::HdText))
        .doc(&["; High resolution in-game text."]),
    SettingSpec::new(SettingId::HdTextScale, "hd_text_scale", "HD text scale", Float(1.0))
        .range(float_range(0.8, 1.25))
        .effect(RecomputeFontMetrics),
    SettingSpec::new(SettingId::MiniMap, "mini_map", "Mini map", Bool(false))
        .effect(ToggleFeature(Feature::MiniMap))
        .doc(&["; Always-on mini-map widget (glide mode only)."]),
    SettingSpec::new(SettingId::MiniMapTextOver, "mini_map_text_over", "Text over map", Bool(false)),
    SettingSpec::new(SettingId::MiniMapWidth, "mini_map_width", "Map width", Int(160))
        .range(int_range(50, 300))
        .effect(ResizeMiniMap),
    SettingSpec::new(SettingId::MiniMapHeight, "mini_map_height", "Map height", Int(110))
        .range(int_range(50, 300))
        .effect(ResizeMiniMap),
    SettingSpec::new(SettingId::MotionPrediction, "motion_prediction", "Motion prediction", Bool(false))
        .effect(ToggleFeature(Feature::MotionPrediction))
        .doc(&["; Motion prediction for smoother movement."]),
    SettingSpec::new(SettingId::SkipIntro, "skip_intro", "Skip intro", Bool(false))
        .doc(&["; Skip the intro videos."]),
    SettingSpec::new(SettingId::NoPickup, "no_pickup", "No pickup", Bool(false))
        .doc(&["; Turn on /nopickup at launch."]),
    SettingSpec::new(SettingId::ShowItemQuantity, "show_item_quantity", "Show item quantity", Bool(false))
        .doc(&["; Show item quantity in the corner of the item icon."]),
    SettingSpec::new(SettingId::ShowMonsterRes, "show_monster_res", "Show monster resistances", Bool(false))
        .doc(&["; Show monster resistances on the health bar."]),
    SettingSpec::new(SettingId::ShowFps, "show_fps", "Show FPS", Bool(false))
        .doc(&["; Show an FPS counter."]),
    // [Other]
    SettingSpec::new(SettingId::GlVerMajor, "gl_ver_major", "OpenGL major", Int(4))
        .range(int_range(3, 4))
        .doc(&["; Preferred OpenGL version (3.3 or 4.0 - 4.6)."]),
    SettingSpec::new(SettingId::GlVerMinor, "gl_ver_minor", "OpenGL minor", Int(6))
        .range(int_range(0, 6)),
    SettingSpec::new(SettingId::UseComputeShader, "use_compute_shader", "Compute shader", Bool(false))
        .doc(&["; Use compute shaders where the renderer supports them."]),
    SettingSpec::new(SettingId::FrameLatency, "frame_latency", "Frame latency", Int(1))
        .range(int_range(1, 5))
        .doc(&[
            "; Frames the CPU may queue ahead of the GPU (1-5).",
            "; Higher values smooth out stutter but add input lag.",
        ]),
    SettingSpec::new(SettingId::LoadDllsEarly, "load_dlls_early", "Early modules", Text(""))
        .doc(&["; Comma-separated modules loaded right after startup."]),
    SettingSpec::new(SettingId::LoadDllsLate, "load_dlls_late", "Late modules", Text(""))
        .doc(&["; Comma-separated modules loaded after the window is created."]),
];

/// Condition under which a dependency rule forces its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Another integer setting holds this value
    IntEquals(SettingId, i32),
    /// Renderer is not in glide mode
    NotGlide,
    /// Host provides built-in HD text
    BuiltinHdText,
}

/// Forces `target` to `forced` whenever `when` holds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependencyRule {
    pub target: SettingId,
    pub when: Condition,
    pub forced: DefaultValue,
}

/// Evaluated after every load and every commit
pub const DEPENDENCIES: &[DependencyRule] = &[
    DependencyRule {
        target: SettingId::GlVerMinor,
        when: Condition::IntEquals(SettingId::GlVerMajor, 3),
        forced: Int(3),
    },
    DependencyRule {
        target: SettingId::MiniMap,
        when: Condition::NotGlide,
        forced: Bool(false),
    },
    DependencyRule {
        target: SettingId::HdTextScale,
        when: Condition::BuiltinHdText,
        forced: Float(1.0),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_order_matches_ids() {
        for (idx, spec) in SPECS.iter().enumerate() {
            assert_eq!(spec.id as usize, idx, "{} is out of place", spec.key);
            assert_eq!(spec.id.spec().key, spec.key);
        }
    }

    #[test]
    fn test_keys_unique_per_section() {
        let mut seen = HashSet::new();
        for spec in &SPECS {
            assert!(seen.insert((spec.section, spec.key)), "duplicate key {}", spec.key);
        }
    }

    #[test]
    fn test_sections_are_contiguous_and_ordered() {
        let order: Vec<Section> = SPECS.iter().map(|s| s.section).collect();
        let mut dedup = order.clone();
        dedup.dedup();
        assert_eq!(dedup, Section::ALL.to_vec());
    }

    #[test]
    fn test_each_section_starts_a_doc_group() {
        for section in Section::ALL {
            let first = section.specs().next().expect("section has settings");
            assert!(!first.doc.is_empty(), "{} has no doc comment", first.key);
        }
    }

    #[test]
    fn test_defaults_match_declared_ranges() {
        let env = Environment::default();
        for spec in &SPECS {
            if let Some(bounds) = spec.bounds(&env) {
                assert!(
                    bounds.contains(&spec.default.to_value()),
                    "default of {} outside its range",
                    spec.key
                );
            }
        }
    }

    #[test]
    fn test_screen_is_deferred_and_others_immediate() {
        for spec in &SPECS {
            let expected = match spec.section {
                Section::Screen => CommitStrategy::Deferred,
                _ => CommitStrategy::Immediate,
            };
            assert_eq!(spec.commit, expected, "{}", spec.key);
        }
        assert!(Section::Other.specs().all(|s| !s.panel));
    }

    #[test]
    fn test_window_range_computed_from_desktop() {
        let env = Environment {
            desktop: DesktopBounds { x: -1280, y: 0, width: 2560, height: 1440 },
            ..Environment::default()
        };
        assert_eq!(
            SettingId::WindowWidth.spec().bounds(&env),
            Some(Bounds::Int { min: 800, max: 2560 })
        );
        assert_eq!(
            SettingId::WindowPosX.spec().bounds(&env),
            Some(Bounds::Int { min: -1280, max: 2560 })
        );
    }

    #[test]
    fn test_lut_range_follows_lut_count() {
        let env = Environment { lut_count: 4, ..Environment::default() };
        assert_eq!(SettingId::Lut.spec().bounds(&env), Some(Bounds::Int { min: 0, max: 3 }));
    }

    #[test]
    fn test_availability_follows_environment() {
        let env = Environment {
            glide: false,
            external_fps_mod: true,
            builtin_hd_text: true,
            ..Environment::default()
        };
        assert!(!SettingId::MiniMap.available(&env));
        assert!(!SettingId::ForegroundFpsValue.available(&env));
        assert!(!SettingId::HdTextScale.available(&env));
        assert!(SettingId::Fullscreen.available(&env));
    }
}
