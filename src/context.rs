//! Application settings context
//!
//! Owns everything the settings subsystem touches: environment facts, live
//! values, the backing store, the dispatcher and the open edit session, if
//! any. The host holds one of these and passes it by reference.

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::config::live::LiveState;
use crate::config::schema::{Environment, SettingId, SideEffect};
use crate::config::store::ConfigStore;
use crate::config::value::SettingValue;
use crate::dispatch::collaborators::Collaborators;
use crate::dispatch::dispatcher::Dispatcher;
use crate::staging::buffer::StagedEditBuffer;

#[derive(Debug)]
pub struct SettingsContext {
    env: Environment,
    live: LiveState,
    store: ConfigStore,
    dispatcher: Dispatcher,
    session: Option<StagedEditBuffer>,
}

impl SettingsContext {
    /// Load settings from `path` and rewrite the document in canonical form
    pub fn load(path: impl Into<PathBuf>, env: Environment) -> Self {
        let mut store = ConfigStore::open(path);
        let live = LiveState::load(&store, &env);
        if let Err(e) = store.save_all(&live, &env) {
            error!(error = ?e, "Failed to write settings file at startup");
        }
        info!(path = %store.path().display(), "Settings ready");
        Self {
            env,
            live,
            store,
            dispatcher: Dispatcher::new(),
            session: None,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn live(&self) -> &LiveState {
        &self.live
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn session(&self) -> Option<&StagedEditBuffer> {
        self.session.as_ref()
    }

    pub fn is_panel_open(&self) -> bool {
        self.session.is_some()
    }

    /// Start an edit session from the current live values
    pub fn open_panel(&mut self) {
        if self.session.is_none() {
            self.session = Some(StagedEditBuffer::open(&self.live, &self.env));
        }
    }

    /// End the edit session; staged edits that were not saved are dropped.
    /// A slider still being dragged commits where it was left.
    pub fn close_panel(&mut self) {
        self.dispatcher
            .finish_drags(&mut self.live, &mut self.store, &self.env);
        if let Some(session) = self.session.take() {
            if session.changed() {
                debug!(pending = session.changed_fields().len(), "Discarding unsaved staged settings");
            }
            self.dispatcher.queue(None, SideEffect::ApplyCursorLock);
        }
    }

    pub fn toggle_panel(&mut self) {
        if self.is_panel_open() {
            self.close_panel();
        } else {
            self.open_panel();
        }
    }

    /// Stage a deferred value; ignored when no session is open
    pub fn stage(&mut self, id: SettingId, value: SettingValue) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.set(id, value))
    }

    pub fn select_resolution(&mut self, index: usize) {
        if let Some(session) = self.session.as_mut() {
            session.select_resolution(index);
        }
    }

    /// The host moved its window; staged so that it can be saved with the group
    pub fn window_moved(&mut self, x: i32, y: i32) {
        if let Some(session) = self.session.as_mut() {
            session.note_window_moved(x, y);
        }
    }

    pub fn pending_changes(&self) -> bool {
        self.session.as_ref().is_some_and(StagedEditBuffer::changed)
    }

    /// Commit the staged group; returns the number of fields committed
    pub fn save_staged(&mut self) -> usize {
        match self.session.as_mut() {
            Some(session) => {
                self.dispatcher
                    .commit_batch(session, &mut self.live, &mut self.store, &self.env)
            }
            None => 0,
        }
    }

    /// Commit an immediate setting (checkbox, combo, text field)
    pub fn apply(&mut self, id: SettingId, value: SettingValue) -> bool {
        self.dispatcher
            .commit_immediate(id, value, &mut self.live, &mut self.store, &self.env)
    }

    /// Commit an immediate numeric setting driven by a slider
    pub fn slide(&mut self, id: SettingId, value: SettingValue, dragging: bool) -> bool {
        self.dispatcher
            .slide(id, value, dragging, &mut self.live, &mut self.store, &self.env)
    }

    /// Regenerate the whole document from live state
    pub fn save_all(&mut self) {
        if let Err(e) = self.store.save_all(&self.live, &self.env) {
            error!(error = ?e, "Failed to save settings");
        }
    }

    /// Deliver queued side effects. Call once per frame, after the settings UI.
    pub fn reconcile(&mut self, host: &mut Collaborators<'_>) -> usize {
        let panel_open = self.is_panel_open();
        self.dispatcher.reconcile(&self.live, panel_open, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DesktopBounds;
    use crate::dispatch::recording::{Call, RecordingHost};
    use crate::staging::resolution::ResolutionSelector;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn context_with(contents: Option<&str>) -> (TempDir, SettingsContext) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.ini");
        if let Some(contents) = contents {
            fs::write(&path, contents).expect("write fixture");
        }
        let env = Environment {
            desktop: DesktopBounds { x: 0, y: 0, width: 1920, height: 1080 },
            ..Environment::default()
        };
        let ctx = SettingsContext::load(path, env);
        (dir, ctx)
    }

    fn reconcile(ctx: &mut SettingsContext, host: &mut RecordingHost) -> usize {
        let mut collaborators = host.collaborators();
        ctx.reconcile(&mut collaborators)
    }

    #[test]
    fn test_missing_fullscreen_loads_default_and_is_written() {
        let (_dir, ctx) = context_with(Some("[Screen]\nvsync=false\n"));
        assert!(!ctx.live().screen.fullscreen);
        let text = fs::read_to_string(ctx.store().path()).expect("read");
        assert!(text.contains("\nfullscreen=false\n"));
        assert!(text.contains("\nvsync=false\n"));
    }

    #[test]
    fn test_narrow_window_width_loads_as_minimum() {
        let (_dir, ctx) = context_with(Some("[Screen]\nwindow_width=100\n"));
        assert_eq!(ctx.live().screen.window_width, 800);
        assert_eq!(ctx.store().document().get("Screen", "window_width"), Some("800"));
    }

    #[test]
    fn test_load_applies_dependency_rules() {
        let (_dir, ctx) = context_with(Some("[Other]\ngl_ver_major=3\ngl_ver_minor=6\n"));
        assert_eq!(ctx.live().other.gl_ver_minor, 3);
    }

    #[test]
    fn test_close_without_save_leaves_live_untouched() {
        let (_dir, mut ctx) = context_with(None);
        let before = ctx.live().clone();

        ctx.open_panel();
        ctx.stage(SettingId::Fullscreen, SettingValue::Bool(true));
        ctx.stage(SettingId::WindowPosX, SettingValue::Int(300));
        ctx.window_moved(40, 50);
        assert!(ctx.pending_changes());
        ctx.close_panel();

        assert_eq!(ctx.live(), &before);
        assert!(!ctx.pending_changes());
        ctx.open_panel();
        assert!(!ctx.pending_changes());
    }

    #[test]
    fn test_stage_without_session_is_ignored() {
        let (_dir, mut ctx) = context_with(None);
        assert!(!ctx.stage(SettingId::Vsync, SettingValue::Bool(false)));
        assert_eq!(ctx.save_staged(), 0);
    }

    #[test]
    fn test_save_staged_then_reconcile() {
        let (_dir, mut ctx) = context_with(None);
        let mut host = RecordingHost::default();

        ctx.open_panel();
        ctx.select_resolution(ResolutionSelector::CUSTOM);
        ctx.stage(SettingId::WindowWidth, SettingValue::Int(1280));
        ctx.stage(SettingId::WindowHeight, SettingValue::Int(720));
        assert_eq!(ctx.save_staged(), 2);
        assert!(!ctx.pending_changes());

        // Width and height share an effect; each changed field fires once
        assert_eq!(reconcile(&mut ctx, &mut host), 2);
        assert_eq!(
            host.calls(),
            vec![
                Call::Resize { width: 1280, height: 720 },
                Call::Resize { width: 1280, height: 720 },
            ]
        );
        assert_eq!(reconcile(&mut ctx, &mut host), 0);
    }

    #[test]
    fn test_closing_panel_reapplies_cursor_lock() {
        let (_dir, mut ctx) = context_with(None);
        let mut host = RecordingHost::default();
        ctx.toggle_panel();
        assert!(ctx.is_panel_open());
        ctx.toggle_panel();
        reconcile(&mut ctx, &mut host);
        assert_eq!(host.calls(), vec![Call::CursorLocked(true)]);
    }

    #[test]
    fn test_closing_panel_mid_drag_persists_slider() {
        let (_dir, mut ctx) = context_with(None);
        let mut host = RecordingHost::default();
        ctx.open_panel();
        assert!(!ctx.slide(SettingId::HdTextScale, SettingValue::Float(1.2), true));
        ctx.close_panel();
        reconcile(&mut ctx, &mut host);

        assert_eq!(ctx.live().feature.hd_text_scale, 1.2);
        let reread = ConfigStore::open(ctx.store().path());
        assert_eq!(reread.read_float("Feature", "hd_text_scale", 1.0, 0.8, 1.25), 1.2);
        assert_eq!(host.calls(), vec![Call::FontMetrics(1.2), Call::CursorLocked(true)]);
    }

    #[test]
    fn test_window_move_saved_with_group() {
        let (_dir, mut ctx) = context_with(None);
        ctx.open_panel();
        ctx.window_moved(120, 80);
        assert_eq!(ctx.save_staged(), 2);
        assert_eq!(ctx.live().screen.window_posx, 120);
        assert_eq!(ctx.live().screen.window_posy, 80);
    }

    #[test]
    fn test_immediate_write_survives_full_save() {
        let (_dir, mut ctx) = context_with(None);
        ctx.apply(SettingId::Sharpen, SettingValue::Bool(true));
        ctx.open_panel();
        ctx.stage(SettingId::Vsync, SettingValue::Bool(false));
        ctx.save_staged();
        ctx.save_all();

        let reread = ConfigStore::open(ctx.store().path());
        assert!(reread.read_bool("Graphic", "sharpen", false));
        assert!(!reread.read_bool("Screen", "vsync", true));
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let source = "\
[Screen]
fullscreen=true
window_width=1600
foreground_fps_value=144
[Graphic]
shader_preset=crt/crt-royale.slangp
sharpen_strength=2.500
[Feature]
mini_map=true
hd_text_scale=1.100
[Other]
frame_latency=3
load_dlls_late=a.dll,b.dll
";
        let (_dir, ctx) = context_with(Some(source));
        let reloaded = LiveState::load(&ConfigStore::open(ctx.store().path()), ctx.env());
        assert_eq!(&reloaded, ctx.live());
        assert!(reloaded.screen.fullscreen);
        assert_eq!(reloaded.screen.window_width, 1600);
        assert_eq!(reloaded.screen.foreground_fps_value, 144);
        assert_eq!(reloaded.graphic.shader_preset, "crt/crt-royale.slangp");
        assert_eq!(reloaded.graphic.sharpen_strength, 2.5);
        assert!(reloaded.feature.mini_map);
        assert_eq!(reloaded.feature.hd_text_scale, 1.1);
        assert_eq!(reloaded.other.frame_latency, 3);
        assert_eq!(reloaded.other.load_dlls_late, "a.dll,b.dll");
    }
}
