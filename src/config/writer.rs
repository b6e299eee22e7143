//! Full settings document generation
//!
//! Produces the canonical document: banner, the four sections in fixed order,
//! each key preceded by its comment group. Used at startup so the file on disk
//! always lists every setting with the values actually in effect.

use std::fmt::Write as _;

use super::live::LiveState;
use super::schema::{Environment, Section};
use crate::constants::document::HEADER;

/// Render `live` as a complete settings document
pub fn render(live: &LiveState, env: &Environment) -> String {
    let lut_max = env.lut_count.saturating_sub(1).to_string();
    let mut out = String::new();

    for line in HEADER {
        out.push_str(line);
        out.push('\n');
    }

    for section in Section::ALL {
        let _ = writeln!(out, "\n[{}]", section.name());
        for spec in section.specs() {
            if !spec.doc.is_empty() {
                out.push('\n');
                for line in spec.doc {
                    out.push_str(&line.replace("{max}", &lut_max));
                    out.push('\n');
                }
            }
            let _ = writeln!(out, "{}={}", spec.key, live.get(spec.id).encode());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::document::SettingsDocument;
    use crate::config::schema::SettingId;
    use crate::config::value::SettingValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sections_in_fixed_order() {
        let env = Environment::default();
        let doc = SettingsDocument::parse(&render(&LiveState::defaults(&env), &env));
        assert_eq!(doc.sections(), vec!["Screen", "Graphic", "Feature", "Other"]);
    }

    #[test]
    fn test_every_setting_written_once_in_registry_order() {
        let env = Environment::default();
        let doc = SettingsDocument::parse(&render(&LiveState::defaults(&env), &env));
        for section in Section::ALL {
            let written: Vec<&str> = doc.entries(section.name()).map(|(k, _)| k).collect();
            let declared: Vec<&str> = section.specs().map(|s| s.key).collect();
            assert_eq!(written, declared);
        }
    }

    #[test]
    fn test_screen_section_layout() {
        let env = Environment::default();
        let text = render(&LiveState::defaults(&env), &env);
        let expected = "\
[Screen]

; Run in a borderless fullscreen window.
; window_width/window_height are ignored while this is on.
fullscreen=false

; Start with a maximized window.
; window_width/window_height are ignored while this is on.
maximize=false

; Window size in pixels.
window_width=1068
window_height=600
";
        assert!(text.contains(expected), "unexpected layout:\n{text}");
    }

    #[test]
    fn test_lut_comment_names_table_count() {
        let env = Environment { lut_count: 8, ..Environment::default() };
        let text = render(&LiveState::defaults(&env), &env);
        assert!(text.contains("; 0 = game default, 1-7 = predefined tables.\nlut=0\n"));
    }

    #[test]
    fn test_values_reflect_live_state() {
        let env = Environment::default();
        let mut live = LiveState::defaults(&env);
        live.set(SettingId::SharpenClamp, SettingValue::Float(0.5), &env);
        live.set(SettingId::LoadDllsLate, SettingValue::Text("a.dll,b.dll".into()), &env);

        let doc = SettingsDocument::parse(&render(&live, &env));
        assert_eq!(doc.get("Graphic", "sharpen_clamp"), Some("0.500"));
        assert_eq!(doc.get("Other", "load_dlls_late"), Some("a.dll,b.dll"));
        assert_eq!(doc.get("Screen", "vsync"), Some("true"));
    }

    #[test]
    fn test_header_precedes_first_section() {
        let env = Environment::default();
        let text = render(&LiveState::defaults(&env), &env);
        assert!(text.starts_with(HEADER[0]));
        let header_end = text.find("[Screen]").expect("screen section");
        assert!(text[..header_end].lines().all(|l| l.is_empty() || l.starts_with(';')));
    }
}
