//! Commit and side-effect dispatch
//!
//! Commits write live state first, then persist, then queue the setting's side
//! effect. Queued effects run only at [`Dispatcher::reconcile`], which the host
//! calls once per frame after the settings UI has been drawn.

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use super::collaborators::{Collaborators, FrameLimits, WindowPlacement};
use crate::config::live::LiveState;
use crate::config::schema::{CommitStrategy, Environment, Feature, SettingId, SideEffect};
use crate::config::store::ConfigStore;
use crate::config::value::SettingValue;
use crate::staging::buffer::StagedEditBuffer;

/// Side effect waiting for the reconciliation point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedEffect {
    /// Setting whose change caused it; `None` for lifecycle events
    pub setting: Option<SettingId>,
    pub effect: SideEffect,
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    queue: Vec<QueuedEffect>,
    /// Committed value of each slider currently being dragged
    drag_origin: HashMap<SettingId, SettingValue>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[QueuedEffect] {
        &self.queue
    }

    pub fn queue(&mut self, setting: Option<SettingId>, effect: SideEffect) {
        self.queue.push(QueuedEffect { setting, effect });
    }

    fn queue_for(&mut self, id: SettingId) {
        if let Some(effect) = id.spec().effect {
            self.queue(Some(id), effect);
        }
    }

    /// Move every changed staged field into live state as one batch.
    ///
    /// Only changed keys (and any forced by dependency rules) are written, in a
    /// single pass; full rewrites happen at startup and through `save_all`.
    ///
    /// Returns the number of fields committed.
    pub fn commit_batch(
        &mut self,
        buffer: &mut StagedEditBuffer,
        live: &mut LiveState,
        store: &mut ConfigStore,
        env: &Environment,
    ) -> usize {
        buffer.apply_resolution_override();
        let changes = buffer.changed_fields();
        if changes.is_empty() {
            debug!("No staged changes to commit");
            return 0;
        }

        for (id, value) in &changes {
            live.set(*id, value.clone(), env);
        }
        let forced = live.enforce_dependencies(env);

        let touched: Vec<SettingId> = changes
            .iter()
            .map(|(id, _)| *id)
            .chain(forced.iter().copied().filter(|id| changes.iter().all(|(c, _)| c != id)))
            .collect();

        let entries: Vec<(&str, &str, SettingValue)> = touched
            .iter()
            .map(|id| {
                let spec = id.spec();
                (spec.section.name(), spec.key, live.get(*id))
            })
            .collect();
        if let Err(e) = store.write_many(entries) {
            error!(error = ?e, "Failed to persist staged settings");
        }

        for id in &touched {
            self.queue_for(*id);
        }
        buffer.sync_from(live);

        info!(count = changes.len(), "Committed staged settings");
        changes.len()
    }

    /// Apply one immediate setting. Does nothing when the value is unchanged.
    pub fn commit_immediate(
        &mut self,
        id: SettingId,
        value: SettingValue,
        live: &mut LiveState,
        store: &mut ConfigStore,
        env: &Environment,
    ) -> bool {
        let spec = id.spec();
        if spec.commit != CommitStrategy::Immediate {
            warn!(key = spec.key, "Deferred setting must be staged, ignoring immediate commit");
            return false;
        }
        if !live.set(id, value, env) {
            return false;
        }
        self.persist_and_queue(id, live, store, env);
        true
    }

    /// Slider input. While `dragging`, live state previews the value but nothing
    /// is persisted or fired; on release the change commits once if it differs
    /// from the value the drag started from.
    pub fn slide(
        &mut self,
        id: SettingId,
        value: SettingValue,
        dragging: bool,
        live: &mut LiveState,
        store: &mut ConfigStore,
        env: &Environment,
    ) -> bool {
        if id.spec().commit != CommitStrategy::Immediate {
            warn!(key = id.spec().key, "Deferred setting must be staged, ignoring slider input");
            return false;
        }
        if dragging {
            self.drag_origin.entry(id).or_insert_with(|| live.get(id));
            live.set(id, value, env);
            return false;
        }
        match self.drag_origin.remove(&id) {
            Some(origin) => {
                live.set(id, value, env);
                if live.get(id) == origin {
                    debug!(key = id.spec().key, "Slider released on its original value");
                    return false;
                }
                self.persist_and_queue(id, live, store, env);
                true
            }
            None => self.commit_immediate(id, value, live, store, env),
        }
    }

    /// Commit every drag that never saw its release frame, e.g. when the panel
    /// closes mid-drag. Returns the number of settings committed.
    pub fn finish_drags(&mut self, live: &mut LiveState, store: &mut ConfigStore, env: &Environment) -> usize {
        let mut committed = 0;
        for (id, origin) in std::mem::take(&mut self.drag_origin) {
            if live.get(id) == origin {
                continue;
            }
            debug!(key = id.spec().key, "Committing unfinished slider drag");
            self.persist_and_queue(id, live, store, env);
            committed += 1;
        }
        committed
    }

    fn persist_and_queue(
        &mut self,
        id: SettingId,
        live: &mut LiveState,
        store: &mut ConfigStore,
        env: &Environment,
    ) {
        let forced = live.enforce_dependencies(env);
        for id in std::iter::once(id).chain(forced) {
            let spec = id.spec();
            if let Err(e) = store.write(spec.section.name(), spec.key, &live.get(id)) {
                error!(error = ?e, key = spec.key, "Failed to persist setting");
            }
            self.queue_for(id);
        }
    }

    /// Run every queued effect against the current live values.
    ///
    /// Returns the number of effects delivered.
    pub fn reconcile(&mut self, live: &LiveState, panel_open: bool, host: &mut Collaborators<'_>) -> usize {
        let queue = std::mem::take(&mut self.queue);
        for queued in &queue {
            debug!(effect = ?queued.effect, setting = ?queued.setting, "Running side effect");
            run_effect(queued.effect, live, panel_open, host);
        }
        queue.len()
    }
}

fn run_effect(effect: SideEffect, live: &LiveState, panel_open: bool, host: &mut Collaborators<'_>) {
    let screen = &live.screen;
    match effect {
        SideEffect::ToggleFullscreen => host.window.set_fullscreen(screen.fullscreen),
        SideEffect::ResizeWindow => host.window.resize(screen.window_width, screen.window_height),
        SideEffect::RepositionWindow => host.window.reposition(&WindowPlacement::from(screen)),
        // The panel needs a free cursor while it is open
        SideEffect::ApplyCursorLock => host
            .window
            .set_cursor_locked(!panel_open && !screen.unlock_cursor),
        SideEffect::ConfigureFrameLimiter => host.limiter.configure(&FrameLimits::from(screen)),
        SideEffect::LoadShaderPreset => host.renderer.load_shader_preset(&live.graphic.shader_preset),
        SideEffect::ResizeRenderTarget => host.renderer.resize_render_target(
            live.graphic.stretched_horizontal,
            live.graphic.stretched_vertical,
        ),
        SideEffect::RecomputeFontMetrics => {
            host.renderer.recompute_font_metrics(live.feature.hd_text_scale)
        }
        SideEffect::ResizeMiniMap => host
            .renderer
            .resize_mini_map(live.feature.mini_map_width, live.feature.mini_map_height),
        SideEffect::ToggleFeature(feature) => {
            let enabled = match feature {
                Feature::HdText => live.feature.hd_text,
                Feature::MiniMap => live.feature.mini_map,
                Feature::MotionPrediction => live.feature.motion_prediction,
            };
            host.features.set_enabled(feature, enabled);
        }
    }
}
