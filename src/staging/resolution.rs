//! Window size presets with a "custom size" sentinel at index 0

use crate::config::schema::DesktopBounds;
use crate::constants::resolution::{CUSTOM_LABEL, PRESETS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: i32,
    pub height: i32,
}

impl Resolution {
    pub fn label(&self) -> String {
        // Nearest of the two ratios; some presets are rounded
        let off_4_3 = (self.width * 3 - self.height * 4).abs();
        let off_16_9 = (self.width * 9 - self.height * 16).abs();
        let aspect = if off_4_3 <= off_16_9 { "4:3" } else { "16:9" };
        format!("{} x {} ({aspect})", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionSelector {
    presets: Vec<Resolution>,
    selected: usize,
}

impl ResolutionSelector {
    pub const CUSTOM: usize = 0;

    /// Presets that fit strictly inside the desktop
    pub fn new(desktop: &DesktopBounds) -> Self {
        let presets = PRESETS
            .iter()
            .filter(|(w, h)| *w < desktop.width && *h < desktop.height)
            .map(|&(width, height)| Resolution { width, height })
            .collect();
        Self {
            presets,
            selected: Self::CUSTOM,
        }
    }

    /// Point at the preset matching `width` x `height`, else at the sentinel
    pub fn select_matching(&mut self, width: i32, height: i32) {
        self.selected = self
            .presets
            .iter()
            .position(|r| r.width == width && r.height == height)
            .map_or(Self::CUSTOM, |idx| idx + 1);
    }

    /// Select entry `index`; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index > self.presets.len() {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_custom(&self) -> bool {
        self.selected == Self::CUSTOM
    }

    /// Size of the selected preset; `None` for the sentinel
    pub fn preset(&self) -> Option<Resolution> {
        self.selected
            .checked_sub(1)
            .and_then(|idx| self.presets.get(idx))
            .copied()
    }

    /// False when the desktop is too small for any preset
    pub fn has_presets(&self) -> bool {
        !self.presets.is_empty()
    }

    pub fn label(&self, index: usize) -> String {
        match index.checked_sub(1) {
            None => CUSTOM_LABEL.to_string(),
            Some(idx) => self
                .presets
                .get(idx)
                .map(Resolution::label)
                .unwrap_or_default(),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        (0..=self.presets.len()).map(|idx| self.label(idx)).collect()
    }
}
