//! Settings document on disk
//!
//! Reads never fail: a missing key, a malformed value or an out-of-range
//! number falls back (or clamps) and is logged. Writes update the in-memory
//! document first, then rewrite the file in one go.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use super::document::SettingsDocument;
use super::error::ConfigError;
use super::live::LiveState;
use super::schema::{Environment, SettingSpec};
use super::value::{Bounds, SettingValue, ValueKind};
use super::writer;

/// Typed access to the persisted settings document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    document: SettingsDocument,
}

impl ConfigStore {
    /// `<config dir>/gl-options/gl-options.ini`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Open the document at `path`; a missing or unreadable file reads as empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(contents) => SettingsDocument::parse(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No settings file found, using defaults");
                SettingsDocument::new()
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read settings file, using defaults");
                SettingsDocument::new()
            }
        };
        Self { path, document }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &SettingsDocument {
        &self.document
    }

    /// Parse the stored value of `key`, without fallback
    pub fn lookup(&self, section: &str, key: &str, kind: ValueKind) -> Result<SettingValue, ConfigError> {
        let raw = self
            .document
            .get(section, key)
            .ok_or_else(|| ConfigError::missing(section, key))?;
        SettingValue::parse(kind, raw)
    }

    /// Stored value, or `default` when missing or malformed; always within `bounds`
    pub fn read_value(
        &self,
        section: &str,
        key: &str,
        default: SettingValue,
        bounds: Option<Bounds>,
    ) -> SettingValue {
        let value = match self.lookup(section, key, default.kind()) {
            Ok(value) => value,
            Err(e @ ConfigError::MissingKey { .. }) => {
                debug!(section, key, reason = %e, "Using default");
                default
            }
            Err(e) => {
                warn!(section, key, error = %e, using = %default, "Invalid setting, using default");
                default
            }
        };
        match bounds {
            Some(bounds) if !bounds.contains(&value) => {
                let clamped = bounds.clamp(value.clone());
                warn!(
                    section,
                    key,
                    error = %bounds.out_of_range(&value),
                    using = %clamped,
                    "Setting out of range, clamping"
                );
                clamped
            }
            _ => value,
        }
    }

    /// Read a registry-declared setting with its resolved range
    pub fn read(&self, spec: &SettingSpec, env: &Environment) -> SettingValue {
        self.read_value(
            spec.section.name(),
            spec.key,
            spec.default_value(env),
            spec.bounds(env),
        )
    }

    pub fn read_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.read_value(section, key, SettingValue::Bool(default), None)
            .as_bool()
            .unwrap_or(default)
    }

    pub fn read_int(&self, section: &str, key: &str, default: i32, min: i32, max: i32) -> i32 {
        self.read_value(section, key, SettingValue::Int(default), Some(Bounds::Int { min, max }))
            .as_int()
            .unwrap_or(default)
    }

    pub fn read_float(&self, section: &str, key: &str, default: f32, min: f32, max: f32) -> f32 {
        self.read_value(section, key, SettingValue::Float(default), Some(Bounds::Float { min, max }))
            .as_float()
            .unwrap_or(default)
    }

    pub fn read_text(&self, section: &str, key: &str, default: &str) -> String {
        match self.read_value(section, key, SettingValue::Text(default.to_string()), None) {
            SettingValue::Text(text) => text,
            _ => default.to_string(),
        }
    }

    /// Update one key and rewrite the file
    pub fn write(&mut self, section: &str, key: &str, value: &SettingValue) -> Result<()> {
        self.document.set(section, key, &value.encode());
        self.persist()
    }

    /// Update several keys with a single file write
    pub fn write_many<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str, SettingValue)>,
    {
        let mut count = 0usize;
        for (section, key, value) in entries {
            self.document.set(section, key, &value.encode());
            count += 1;
        }
        if count == 0 {
            return Ok(());
        }
        debug!(count, path = %self.path.display(), "Writing settings batch");
        self.persist()
    }

    /// Regenerate the whole document from `live` and make it the backing document
    pub fn save_all(&mut self, live: &LiveState, env: &Environment) -> Result<()> {
        let text = writer::render(live, env);
        self.document = SettingsDocument::parse(&text);
        self.persist()
            .inspect(|_| info!(path = %self.path.display(), "Saved full settings document"))
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        fs::write(&self.path, self.document.to_string())
            .with_context(|| format!("Failed to write settings file to {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SettingId;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_with(contents: &str) -> (TempDir, ConfigStore) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.ini");
        fs::write(&path, contents).expect("write fixture");
        let store = ConfigStore::open(&path);
        (dir, store)
    }

    #[test]
    fn test_missing_file_reads_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let store = ConfigStore::open(dir.path().join("absent.ini"));
        assert!(store.document().is_empty());
        assert!(store.read_bool("Screen", "vsync", true));
        assert_eq!(store.read_int("Screen", "window_width", 1068, 800, 1920), 1068);
    }

    #[test]
    fn test_bool_reads() {
        let (_dir, store) = store_with("[Screen]\na=true\nb=1\nc=yes\nd=\n");
        assert!(store.read_bool("Screen", "a", false));
        assert!(store.read_bool("Screen", "b", false));
        assert!(!store.read_bool("Screen", "c", true));
        assert!(!store.read_bool("Screen", "d", true));
        assert!(store.read_bool("Screen", "missing", true));
    }

    #[test]
    fn test_int_reads_clamp_and_fall_back() {
        let (_dir, store) = store_with("[Screen]\nlow=100\nhigh=5000\nbad=wide\nempty=\n");
        assert_eq!(store.read_int("Screen", "low", 1068, 800, 1920), 800);
        assert_eq!(store.read_int("Screen", "high", 1068, 800, 1920), 1920);
        assert_eq!(store.read_int("Screen", "bad", 1068, 800, 1920), 1068);
        assert_eq!(store.read_int("Screen", "empty", 1068, 800, 1920), 1068);
    }

    #[test]
    fn test_fallback_default_is_clamped_too() {
        let (_dir, store) = store_with("[Screen]\n");
        assert_eq!(store.read_int("Screen", "window_width", 1068, 800, 1024), 1024);
    }

    #[test]
    fn test_float_reads() {
        let (_dir, store) = store_with("[Graphic]\nclamp=0.5\ngamma=9\nnan=nan\n");
        assert_eq!(store.read_float("Graphic", "clamp", 0.035, 0.0, 1.0), 0.5);
        assert_eq!(store.read_float("Graphic", "gamma", 1.0, 0.5, 2.0), 2.0);
        assert_eq!(store.read_float("Graphic", "nan", 1.0, 0.5, 2.0), 1.0);
    }

    #[test]
    fn test_text_reads() {
        let (_dir, store) = store_with("[Graphic]\nshader_preset=crt/crt-geom.slangp\n");
        assert_eq!(store.read_text("Graphic", "shader_preset", ""), "crt/crt-geom.slangp");
        assert_eq!(store.read_text("Other", "load_dlls_early", ""), "");
    }

    #[test]
    fn test_lookup_reports_degradation_kind() {
        let (_dir, store) = store_with("[Other]\nframe_latency=two\n");
        assert_eq!(
            store.lookup("Other", "frame_latency", ValueKind::Int),
            Err(ConfigError::malformed(ValueKind::Int, "two"))
        );
        assert_eq!(
            store.lookup("Other", "gl_ver_major", ValueKind::Int),
            Err(ConfigError::missing("Other", "gl_ver_major"))
        );
    }

    #[test]
    fn test_read_registry_setting_uses_desktop_range() {
        let (_dir, store) = store_with("[Screen]\nwindow_width=9999\n");
        let env = Environment::default();
        assert_eq!(store.read(SettingId::WindowWidth.spec(), &env), SettingValue::Int(1920));
    }

    #[test]
    fn test_write_touches_only_one_key() {
        let original = "; keep me\n[Screen]\nvsync=true\nwindow_width=1280\n";
        let (_dir, mut store) = store_with(original);
        store
            .write("Screen", "window_width", &SettingValue::Int(1600))
            .expect("write");

        let on_disk = fs::read_to_string(store.path()).expect("read back");
        assert_eq!(on_disk, "; keep me\n[Screen]\nvsync=true\nwindow_width=1600\n");
    }

    #[test]
    fn test_write_float_uses_three_decimals() {
        let (_dir, mut store) = store_with("[Graphic]\n");
        store
            .write("Graphic", "bloom_gamma", &SettingValue::Float(1.25))
            .expect("write");
        assert_eq!(store.document().get("Graphic", "bloom_gamma"), Some("1.250"));
    }

    #[test]
    fn test_write_many_single_pass() {
        let (_dir, mut store) = store_with("[Screen]\nvsync=true\n");
        store
            .write_many([
                ("Screen", "vsync", SettingValue::Bool(false)),
                ("Screen", "window_width", SettingValue::Int(1280)),
            ])
            .expect("write batch");
        let reopened = ConfigStore::open(store.path());
        assert!(!reopened.read_bool("Screen", "vsync", true));
        assert_eq!(reopened.read_int("Screen", "window_width", 0, 0, 4000), 1280);
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("settings.ini");
        let mut store = ConfigStore::open(&path);
        store.write("Other", "frame_latency", &SettingValue::Int(2)).expect("write");
        assert!(path.exists());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        // A directory cannot be overwritten as a file
        let mut store = ConfigStore::open(dir.path());
        let result = store.write("Other", "frame_latency", &SettingValue::Int(2));
        assert!(result.is_err());
        assert_eq!(store.document().get("Other", "frame_latency"), Some("2"));
    }

    #[test]
    fn test_save_all_round_trips_live_state() {
        let dir = TempDir::new().expect("tempdir");
        let env = Environment::default();
        let mut live = LiveState::defaults(&env);
        live.set(SettingId::WindowWidth, SettingValue::Int(1280), &env);
        live.set(SettingId::SharpenStrength, SettingValue::Float(2.5), &env);

        let mut store = ConfigStore::open(dir.path().join("settings.ini"));
        store.save_all(&live, &env).expect("save");

        let reloaded = LiveState::load(&ConfigStore::open(store.path()), &env);
        assert_eq!(reloaded, live);
    }
}
