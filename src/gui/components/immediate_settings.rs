//! Table-driven tab for settings that apply as soon as they change

use std::collections::HashMap;

use eframe::egui;

use crate::config::schema::{Section, SettingId, SettingSpec};
use crate::config::value::{Bounds, SettingValue};
use crate::context::SettingsContext;

use super::super::constants::{ITEM_SPACING, SECTION_SPACING};

/// Text fields are edited locally and committed when focus leaves them
#[derive(Debug, Default)]
pub struct ImmediateSettingsState {
    drafts: HashMap<SettingId, String>,
}

/// Renders one section and returns true if any setting was committed
pub fn ui(
    ui: &mut egui::Ui,
    settings: &mut SettingsContext,
    section: Section,
    state: &mut ImmediateSettingsState,
) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new(format!("{} Settings", section.name())).strong());
        ui.add_space(ITEM_SPACING);

        for spec in section.specs().filter(|spec| spec.panel) {
            // A new comment group in the document starts a new visual group
            if !spec.doc.is_empty() {
                ui.add_space(ITEM_SPACING);
            }
            let enabled = spec.id.available(settings.env());
            let committed = ui
                .add_enabled_ui(enabled, |ui| setting_row(ui, settings, spec, state))
                .inner;
            changed |= committed;
        }
    });

    ui.add_space(SECTION_SPACING);
    changed
}

fn setting_row(
    ui: &mut egui::Ui,
    settings: &mut SettingsContext,
    spec: &SettingSpec,
    state: &mut ImmediateSettingsState,
) -> bool {
    let id = spec.id;
    match (settings.live().get(id), spec.bounds(settings.env())) {
        (SettingValue::Bool(mut value), _) => {
            if ui.checkbox(&mut value, spec.label).changed() {
                return settings.apply(id, SettingValue::Bool(value));
            }
            false
        }
        (SettingValue::Int(mut value), Some(Bounds::Int { min, max })) => {
            let response = ui.add(egui::Slider::new(&mut value, min..=max).text(spec.label));
            if response.changed() || response.drag_stopped() {
                return settings.slide(id, SettingValue::Int(value), response.dragged());
            }
            false
        }
        (SettingValue::Float(mut value), Some(Bounds::Float { min, max })) => {
            let response = ui.add(
                egui::Slider::new(&mut value, min..=max)
                    .fixed_decimals(3)
                    .text(spec.label),
            );
            if response.changed() || response.drag_stopped() {
                return settings.slide(id, SettingValue::Float(value), response.dragged());
            }
            false
        }
        (SettingValue::Text(current), _) => ui
            .horizontal(|ui| {
                ui.label(format!("{}:", spec.label));
                let draft = state.drafts.entry(id).or_insert_with(|| current.clone());
                let response = ui.text_edit_singleline(draft);
                if response.lost_focus() {
                    let text = state.drafts.remove(&id).unwrap_or(current);
                    return settings.apply(id, SettingValue::Text(text));
                }
                if !response.has_focus() {
                    // Follow live value while not being edited
                    state.drafts.remove(&id);
                }
                false
            })
            .inner,
        (value, _) => {
            ui.label(format!("{}: {value}", spec.label));
            false
        }
    }
}
