//! Line-oriented settings document
//!
//! `[Section]` headers, `key=value` entries, `;` comments. Keys and section
//! names are case-sensitive. Every line is kept verbatim so that updating
//! one key never reformats the rest of the file.

use std::fmt;

use tracing::debug;

use crate::constants::document::{COMMENT_PREFIX, SEPARATOR};

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Section(String),
    Entry { key: String, value: String, raw: String },
    /// Comments, blank lines and anything unrecognized
    Verbatim(String),
}

impl Line {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
            return Line::Verbatim(raw.to_string());
        }
        if let Some(name) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            return Line::Section(name.trim().to_string());
        }
        match trimmed.split_once(SEPARATOR) {
            Some((key, value)) if !key.trim().is_empty() => Line::Entry {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
                raw: raw.to_string(),
            },
            _ => {
                debug!(line = %raw, "Ignoring unrecognized settings line");
                Line::Verbatim(raw.to_string())
            }
        }
    }

    fn entry(key: &str, value: &str) -> Self {
        Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: format!("{key}{SEPARATOR}{value}"),
        }
    }
}

/// Parsed settings document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    lines: Vec<Line>,
}

impl SettingsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(Line::parse).collect(),
        }
    }

    /// Raw value of `key` in `section`; the first occurrence wins
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.entries(section)
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Entries of `section` in document order
    pub fn entries<'a, 's>(&'a self, section: &'s str) -> impl Iterator<Item = (&'a str, &'a str)> {
        let mut current: Option<&str> = None;
        self.lines.iter().filter_map(move |line| match line {
            Line::Section(name) => {
                current = Some(name.as_str());
                None
            }
            Line::Entry { key, value, .. } if current == Some(section) => {
                Some((key.as_str(), value.as_str()))
            }
            _ => None,
        })
    }

    /// Section names in first-appearance order
    pub fn sections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for line in &self.lines {
            if let Line::Section(name) = line
                && !names.contains(&name.as_str())
            {
                names.push(name.as_str());
            }
        }
        names
    }

    /// Set one key, touching only that key's line.
    ///
    /// A missing key is inserted after the last entry of its section, and a
    /// missing section is appended at the end of the document.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let mut current: Option<&str> = None;
        let mut header_at = None;
        let mut last_entry_at = None;
        let mut found = None;

        for (idx, line) in self.lines.iter().enumerate() {
            match line {
                Line::Section(name) => {
                    current = Some(name.as_str());
                    if name == section && header_at.is_none() {
                        header_at = Some(idx);
                    }
                }
                Line::Entry { key: k, .. } if current == Some(section) => {
                    last_entry_at = Some(idx);
                    if k == key {
                        found = Some(idx);
                        break;
                    }
                }
                _ => {}
            }
        }

        let entry = Line::entry(key, value);
        if let Some(idx) = found {
            self.lines[idx] = entry;
        } else if let Some(idx) = last_entry_at.or(header_at) {
            self.lines.insert(idx + 1, entry);
        } else {
            if self.lines.last().is_some_and(|l| !matches!(l, Line::Verbatim(raw) if raw.trim().is_empty())) {
                self.lines.push(Line::Verbatim(String::new()));
            }
            self.lines.push(Line::Section(section.to_string()));
            self.lines.push(entry);
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.lines.iter().any(|l| matches!(l, Line::Entry { .. }))
    }
}

impl fmt::Display for SettingsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Section(name) => writeln!(f, "[{name}]")?,
                Line::Entry { raw, .. } => writeln!(f, "{raw}")?,
                Line::Verbatim(raw) => writeln!(f, "{raw}")?,
            }
        }
        Ok(())
    }
}
