//! Value paired with the last value that was committed or observed

use crate::config::value::{Bounds, SettingValue};

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedField {
    current: SettingValue,
    committed: SettingValue,
    range: Option<Bounds>,
}

impl TrackedField {
    /// Start tracking `value`; current and committed are equal
    pub fn new(value: SettingValue, range: Option<Bounds>) -> Self {
        let value = value.clamped(range);
        Self {
            committed: value.clone(),
            current: value,
            range,
        }
    }

    pub fn current(&self) -> &SettingValue {
        &self.current
    }

    pub fn committed(&self) -> &SettingValue {
        &self.committed
    }

    pub fn range(&self) -> Option<Bounds> {
        self.range
    }

    /// Replace the working value, clamped into range
    pub fn set(&mut self, value: SettingValue) {
        self.current = value.clamped(self.range);
    }

    pub fn changed(&self) -> bool {
        self.current != self.committed
    }

    /// Record the working value as committed
    pub fn commit(&mut self) {
        self.committed = self.current.clone();
    }
}
