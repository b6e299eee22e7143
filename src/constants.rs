//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used by the
//! settings subsystem, providing a single source of truth for constant values.

/// Settings document location
pub mod config {
    /// Directory under the user's config dir
    pub const APP_DIR: &str = "gl-options";

    /// Settings document file name
    pub const FILENAME: &str = "gl-options.ini";
}

/// Settings document syntax
pub mod document {
    /// Line comment prefix
    pub const COMMENT_PREFIX: char = ';';

    /// Key/value separator
    pub const SEPARATOR: char = '=';

    /// Decimal places used when writing float values
    pub const FLOAT_PRECISION: usize = 3;

    /// Banner written above the first section
    pub const HEADER: &[&str] = &[
        "; ==== Renderer Settings ====",
        "",
        "; Press ctrl+O in game to open the settings panel.",
        "; Everything except the \"Other\" section can be changed there.",
    ];
}

/// Window size presets offered by the resolution selector
pub mod resolution {
    /// Label of the sentinel entry that leaves width/height free for editing
    pub const CUSTOM_LABEL: &str = "Custom Size";

    /// Presets in display order (4:3 first, then 16:9)
    pub const PRESETS: &[(i32, i32)] = &[
        (800, 600),
        (960, 720),
        (1024, 768),
        (1200, 900),
        (1280, 960),
        (1440, 1080),
        (1600, 1200),
        (1920, 1440),
        (2560, 1920),
        (2732, 2048),
        (1068, 600),
        (1280, 720),
        (1600, 900),
        (1920, 1080),
        (2048, 1152),
        (2560, 1440),
        (3200, 1800),
        (3840, 2160),
    ];
}

/// Window geometry limits
pub mod window {
    /// Smallest allowed window width
    pub const MIN_WIDTH: i32 = 800;

    /// Smallest allowed window height
    pub const MIN_HEIGHT: i32 = 600;
}

/// Color grading lookup tables
pub mod lut {
    /// Number of selectable LUT entries, including the "game default" entry at 0
    pub const COUNT: usize = 15;
}

/// Desktop bounds assumed when the host cannot report them
pub mod desktop {
    pub const FALLBACK_WIDTH: i32 = 1920;
    pub const FALLBACK_HEIGHT: i32 = 1080;
}
