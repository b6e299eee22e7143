//! Screen tab: staged window, cursor and frame pacing settings

use eframe::egui;

use crate::config::schema::{Section, SettingId, SettingSpec};
use crate::config::value::{Bounds, SettingValue};
use crate::context::SettingsContext;

use super::super::constants::{INPUT_WIDTH, ITEM_SPACING, SECTION_SPACING, STATUS_PENDING};

/// Renders the Screen tab and returns true if staged changes were saved
pub fn ui(ui: &mut egui::Ui, settings: &mut SettingsContext) -> bool {
    let Some(session) = settings.session() else {
        ui.label("Open the settings panel to edit screen settings.");
        return false;
    };
    let labels = session.resolution().labels();
    let mut selected = session.resolution().selected();
    let resolution_editable = session.geometry_editable() && session.resolution().has_presets();
    let size_editable = session.size_editable();
    let position_editable = session.position_editable();

    ui.group(|ui| {
        ui.label(egui::RichText::new("Window").strong());
        ui.add_space(ITEM_SPACING);

        ui.add_enabled_ui(resolution_editable, |ui| {
            ui.horizontal(|ui| {
                ui.label("Resolution:");
                let before = selected;
                egui::ComboBox::from_id_salt("resolution")
                    .selected_text(labels.get(selected).cloned().unwrap_or_default())
                    .show_ui(ui, |ui| {
                        for (idx, label) in labels.iter().enumerate() {
                            ui.selectable_value(&mut selected, idx, label.as_str());
                        }
                    });
                if selected != before {
                    settings.select_resolution(selected);
                }
            });
        });

        ui.add_enabled_ui(size_editable, |ui| {
            ui.horizontal(|ui| {
                ui.label("Custom size:");
                staged_drag_value(ui, settings, SettingId::WindowWidth.spec());
                ui.label("x");
                staged_drag_value(ui, settings, SettingId::WindowHeight.spec());
            });
        });
        ui.add_space(ITEM_SPACING);

        for spec in Section::Screen.specs().filter(|spec| {
            spec.panel && !matches!(spec.id, SettingId::WindowWidth | SettingId::WindowHeight)
        }) {
            let placement = matches!(spec.id, SettingId::WindowPosX | SettingId::WindowPosY);
            let enabled = spec.id.available(settings.env()) && (position_editable || !placement);
            ui.add_enabled_ui(enabled, |ui| staged_row(ui, settings, spec));
        }
    });

    ui.add_space(SECTION_SPACING);

    let pending = settings.pending_changes();
    let mut saved = false;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(pending, egui::Button::new("Save Changes"))
            .clicked()
        {
            saved = settings.save_staged() > 0;
        }
        if pending {
            ui.colored_label(STATUS_PENDING, "Unsaved changes");
        }
    });
    saved
}

fn staged_value(settings: &SettingsContext, id: SettingId) -> Option<SettingValue> {
    settings.session().and_then(|session| session.get(id).cloned())
}

fn staged_row(ui: &mut egui::Ui, settings: &mut SettingsContext, spec: &SettingSpec) {
    match staged_value(settings, spec.id) {
        Some(SettingValue::Bool(mut value)) => {
            if ui.checkbox(&mut value, spec.label).changed() {
                settings.stage(spec.id, SettingValue::Bool(value));
            }
        }
        Some(SettingValue::Int(_)) => {
            ui.horizontal(|ui| {
                ui.label(format!("{}:", spec.label));
                staged_drag_value(ui, settings, spec);
            });
        }
        _ => {}
    }
}

fn staged_drag_value(ui: &mut egui::Ui, settings: &mut SettingsContext, spec: &SettingSpec) {
    let Some(SettingValue::Int(mut value)) = staged_value(settings, spec.id) else {
        return;
    };
    let mut drag = egui::DragValue::new(&mut value);
    if let Some(Bounds::Int { min, max }) = spec.bounds(settings.env()) {
        drag = drag.range(min..=max);
    }
    if ui.add_sized([INPUT_WIDTH, 20.0], drag).changed() {
        settings.stage(spec.id, SettingValue::Int(value));
    }
}
