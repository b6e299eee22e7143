//! Staged edit buffer
//!
//! Working copy of the deferred settings while the panel is open. Nothing in
//! here touches live state; the dispatcher reads [`StagedEditBuffer::changed_fields`]
//! when the user saves.

use std::collections::BTreeMap;

use tracing::debug;

use super::resolution::ResolutionSelector;
use super::tracked::TrackedField;
use crate::config::live::LiveState;
use crate::config::schema::{CommitStrategy, Environment, SettingId};
use crate::config::value::SettingValue;

#[derive(Debug, Clone)]
pub struct StagedEditBuffer {
    fields: BTreeMap<SettingId, TrackedField>,
    resolution: ResolutionSelector,
}

impl StagedEditBuffer {
    /// Copy every deferred panel setting out of `live`
    pub fn open(live: &LiveState, env: &Environment) -> Self {
        let fields: BTreeMap<_, _> = SettingId::all()
            .map(SettingId::spec)
            .filter(|spec| spec.commit == CommitStrategy::Deferred && spec.panel)
            .map(|spec| (spec.id, TrackedField::new(live.get(spec.id), spec.bounds(env))))
            .collect();

        let mut resolution = ResolutionSelector::new(&env.desktop);
        resolution.select_matching(live.screen.window_width, live.screen.window_height);

        debug!(fields = fields.len(), "Opened staged edit session");
        Self { fields, resolution }
    }

    pub fn tracks(&self, id: SettingId) -> bool {
        self.fields.contains_key(&id)
    }

    pub fn get(&self, id: SettingId) -> Option<&SettingValue> {
        self.fields.get(&id).map(TrackedField::current)
    }

    pub fn get_bool(&self, id: SettingId) -> bool {
        self.get(id).and_then(SettingValue::as_bool).unwrap_or(false)
    }

    pub fn get_int(&self, id: SettingId) -> i32 {
        self.get(id).and_then(SettingValue::as_int).unwrap_or(0)
    }

    /// Stage a new value; returns false for settings this buffer does not hold
    pub fn set(&mut self, id: SettingId, value: SettingValue) -> bool {
        match self.fields.get_mut(&id) {
            Some(field) => {
                field.set(value);
                true
            }
            None => false,
        }
    }

    pub fn resolution(&self) -> &ResolutionSelector {
        &self.resolution
    }

    /// Pick a resolution entry; a preset overwrites the staged width and height
    pub fn select_resolution(&mut self, index: usize) {
        if self.resolution.select(index) {
            self.apply_resolution_override();
        }
    }

    /// Push the selected preset into the staged size. The sentinel leaves it alone.
    pub fn apply_resolution_override(&mut self) {
        if let Some(preset) = self.resolution.preset() {
            self.set(SettingId::WindowWidth, SettingValue::Int(preset.width));
            self.set(SettingId::WindowHeight, SettingValue::Int(preset.height));
        }
    }

    /// Resolution and placement only apply to a windowed renderer
    pub fn geometry_editable(&self) -> bool {
        !self.get_bool(SettingId::Fullscreen)
    }

    /// Width and height inputs accept direct edits
    pub fn size_editable(&self) -> bool {
        self.resolution.is_custom() && self.geometry_editable()
    }

    pub fn position_editable(&self) -> bool {
        self.geometry_editable() && !self.get_bool(SettingId::CenteredWindow)
    }

    /// The host moved the window while the panel was open
    pub fn note_window_moved(&mut self, x: i32, y: i32) {
        self.set(SettingId::WindowPosX, SettingValue::Int(x));
        self.set(SettingId::WindowPosY, SettingValue::Int(y));
    }

    pub fn changed(&self) -> bool {
        self.fields.values().any(TrackedField::changed)
    }

    /// Fields whose staged value differs from the last committed one, in document order
    pub fn changed_fields(&self) -> Vec<(SettingId, SettingValue)> {
        self.fields
            .iter()
            .filter(|(_, field)| field.changed())
            .map(|(id, field)| (*id, field.current().clone()))
            .collect()
    }

    /// Adopt the staged values as the new baseline after a commit
    pub fn mark_committed(&mut self) {
        self.fields.values_mut().for_each(TrackedField::commit);
    }

    /// Re-read committed values from `live`, e.g. after dependency rules adjusted them
    pub fn sync_from(&mut self, live: &LiveState) {
        for (id, field) in &mut self.fields {
            *field = TrackedField::new(live.get(*id), field.range());
        }
    }
}
