//! Preview host implemented with egui/eframe
//!
//! Plays the part of the embedding application: owns the settings context,
//! draws the panel, reports window moves, and runs the reconciliation point
//! once per frame after the panel has been drawn.

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::info;

use super::components::{immediate_settings, screen_settings};
use super::constants::*;
use crate::config::schema::Section;
use crate::context::SettingsContext;
use crate::dispatch::recording::{Call, RecordingHost};

struct PanelApp {
    settings: SettingsContext,
    host: RecordingHost,
    tab: Section,
    immediate_state: immediate_settings::ImmediateSettingsState,
    effect_log: Vec<Call>,
    last_window_pos: Option<egui::Pos2>,
}

impl PanelApp {
    fn new(_cc: &CreationContext<'_>, settings: SettingsContext) -> Self {
        info!("Initializing settings panel host");
        Self {
            settings,
            host: RecordingHost::default(),
            tab: Section::Screen,
            immediate_state: immediate_settings::ImmediateSettingsState::default(),
            effect_log: Vec::new(),
            last_window_pos: None,
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::O)) {
            self.settings.toggle_panel();
        }
    }

    fn track_window_position(&mut self, ctx: &egui::Context) {
        let Some(pos) = ctx.input(|i| i.viewport().outer_rect).map(|rect| rect.min) else {
            return;
        };
        if self.last_window_pos.is_some_and(|last| last != pos) {
            self.settings.window_moved(pos.x.round() as i32, pos.y.round() as i32);
        }
        self.last_window_pos = Some(pos);
    }

    fn panel_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for section in [Section::Screen, Section::Graphic, Section::Feature] {
                ui.selectable_value(&mut self.tab, section, section.name());
            }
        });
        ui.separator();
        ui.add_space(ITEM_SPACING);

        egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
            Section::Screen => {
                if screen_settings::ui(ui, &mut self.settings) {
                    info!("Screen settings saved from panel");
                }
            }
            section => {
                immediate_settings::ui(ui, &mut self.settings, section, &mut self.immediate_state);
            }
        });
    }

    fn effect_log_ui(&self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(egui::RichText::new("Delivered side effects").strong());
            if self.effect_log.is_empty() {
                ui.label("None yet");
            }
            for call in self.effect_log.iter().rev() {
                ui.monospace(format!("{call:?}"));
            }
        });
    }

    fn reconcile(&mut self) {
        let mut collaborators = self.host.collaborators();
        if self.settings.reconcile(&mut collaborators) > 0 {
            self.effect_log.extend(self.host.calls());
            self.host.clear();
            let overflow = self.effect_log.len().saturating_sub(EFFECT_LOG_LEN);
            self.effect_log.drain(..overflow);
        }
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.track_window_position(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            ui.heading("Renderer Settings");
            ui.label(format!("File: {}", self.settings.store().path().display()));
            ui.add_space(ITEM_SPACING);

            let label = if self.settings.is_panel_open() {
                "Close panel (Ctrl+O)"
            } else {
                "Open panel (Ctrl+O)"
            };
            if ui.button(label).clicked() {
                self.settings.toggle_panel();
            }
            ui.add_space(SECTION_SPACING);

            if self.settings.is_panel_open() {
                self.panel_ui(ui);
            } else if self.settings.store().path().exists() {
                ui.colored_label(STATUS_SAVED, "Settings file is up to date");
            }

            ui.add_space(SECTION_SPACING);
            self.effect_log_ui(ui);
        });

        // Reconciliation point: after the settings UI, before the next frame
        self.reconcile();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.settings.is_panel_open() {
            self.settings.close_panel();
        }
        info!("Settings panel host exiting");
    }
}

pub fn run_gui(settings: SettingsContext) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Renderer Settings"),
        ..Default::default()
    };

    eframe::run_native(
        "Renderer Settings",
        options,
        Box::new(|cc| Ok(Box::new(PanelApp::new(cc, settings)))),
    )
    .map_err(|err| anyhow!("Failed to launch settings panel: {err}"))
}
