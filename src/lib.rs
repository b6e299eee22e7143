//! Renderer settings persistence and staged-edit reconciliation
//!
//! Settings live in a line-oriented `[Section]` / `key=value` document. The
//! [`SettingsContext`] loads them into live state, stages panel edits, commits
//! them and delivers side effects at a single reconciliation point per frame.

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod context;
pub mod dispatch;
pub mod gui;
pub mod staging;

pub use context::SettingsContext;
